// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::session::SessionSnapshot;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateParams {
    /// Free-text description of the diagram.
    pub description: String,
    /// Diagram family (`flowchart`, `process`, `sequence`, `mindmap`, `organization`) or a
    /// notation name (`graphviz`, `mermaid`, `plantuml`, `excalidraw`).
    pub diagram_type: String,
    /// Session to run in; defaults to `default`.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateResponse {
    /// `ready`, `ignored` (another flow was in flight) or `discarded` (reset mid-flow).
    pub outcome: String,
    pub session: McpSessionState,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExportParams {
    /// `svg` or `png`.
    pub format: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportResponse {
    pub filename: String,
    pub mime_type: String,
    /// `utf8` for SVG markup, `base64` for PNG bytes.
    pub encoding: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionParams {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetTitleParams {
    /// Title used for export filenames; omit or send an empty string to clear it.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResolveParams {
    pub diagram_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveResponse {
    pub category: String,
    pub notation: String,
    pub render_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpSessionState {
    pub session_id: String,
    pub state: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub notation: Option<String>,
    pub code: Option<String>,
    pub svg: Option<String>,
    pub error: Option<String>,
    pub title: Option<String>,
    pub epoch: u64,
    pub exporting: bool,
}

impl McpSessionState {
    pub fn from_snapshot(session_id: &str, snapshot: SessionSnapshot) -> Self {
        Self {
            session_id: session_id.to_owned(),
            state: snapshot.state.as_str().to_owned(),
            description: snapshot.description,
            category: snapshot.category,
            notation: snapshot.notation.map(|n| n.as_str().to_owned()),
            code: snapshot.code,
            svg: snapshot.svg,
            error: snapshot.error,
            title: snapshot.title,
            epoch: snapshot.epoch,
            exporting: snapshot.exporting,
        }
    }
}
