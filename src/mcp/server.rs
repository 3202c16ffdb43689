// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::error::{ExportError, FlowError};
use crate::export::ExportData;
use crate::generate::GeneratorBackend;
use crate::model::{OutputFormat, SessionId};
use crate::render::KrokiRenderer;
use crate::session::{GenerateOutcome, Session, SessionRegistry};

use super::types::*;

pub const DEFAULT_SESSION_ID: &str = "default";

pub type McpRegistry = SessionRegistry<GeneratorBackend, KrokiRenderer>;

#[derive(Clone)]
pub struct DiagramMakerMcp {
    registry: Arc<McpRegistry>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DiagramMakerMcp {
    /// Shares `registry` with any other surface (the HTTP API) serving the same sessions.
    pub fn new(registry: Arc<McpRegistry>) -> Self {
        Self {
            registry,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    fn session(
        &self,
        raw: Option<&str>,
    ) -> Result<(SessionId, Arc<Session<GeneratorBackend, KrokiRenderer>>), ErrorData> {
        let id = session_id_param(raw)?;
        let session = self.registry.get_or_create(&id);
        Ok((id, session))
    }

    fn existing_session(
        &self,
        raw: Option<&str>,
    ) -> Result<(SessionId, Arc<Session<GeneratorBackend, KrokiRenderer>>), ErrorData> {
        let id = session_id_param(raw)?;
        let Some(session) = self.registry.get(&id) else {
            return Err(ErrorData::invalid_params(format!("unknown session: {id}"), None));
        };
        Ok((id, session))
    }

    /// Generate diagram code from a description and render it to SVG. Returns the session state;
    /// call `diagram.export` afterwards for a file.
    #[tool(name = "diagram.generate")]
    async fn diagram_generate(
        &self,
        params: Parameters<GenerateParams>,
    ) -> Result<Json<GenerateResponse>, ErrorData> {
        let GenerateParams {
            description,
            diagram_type,
            session_id,
        } = params.0;
        let (id, session) = self.session(session_id.as_deref())?;

        let outcome = session
            .generate(&description, &diagram_type)
            .await
            .map_err(flow_error_data)?;
        let outcome = match outcome {
            GenerateOutcome::Ready { .. } => "ready",
            GenerateOutcome::Ignored => "ignored",
            GenerateOutcome::Discarded => "discarded",
        };

        Ok(Json(GenerateResponse {
            outcome: outcome.to_owned(),
            session: McpSessionState::from_snapshot(id.as_str(), session.snapshot()),
        }))
    }

    /// Export the current diagram as `svg` (markup) or `png` (base64).
    #[tool(name = "diagram.export")]
    async fn diagram_export(
        &self,
        params: Parameters<ExportParams>,
    ) -> Result<Json<ExportResponse>, ErrorData> {
        let ExportParams { format, session_id } = params.0;
        let format = format
            .parse::<OutputFormat>()
            .map_err(|err| ErrorData::invalid_params(err.to_string(), None))?;
        let (_, session) = self.existing_session(session_id.as_deref())?;

        let file = session.export(format).await.map_err(export_error_data)?;
        let (encoding, data) = match file.data {
            ExportData::Text(text) => ("utf8", text),
            ExportData::Binary(bytes) => ("base64", STANDARD.encode(bytes)),
        };

        Ok(Json(ExportResponse {
            filename: file.filename,
            mime_type: file.mime_type.to_owned(),
            encoding: encoding.to_owned(),
            data,
        }))
    }

    #[tool(name = "diagram.state")]
    async fn diagram_state(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<McpSessionState>, ErrorData> {
        let (id, session) = self.existing_session(params.0.session_id.as_deref())?;
        Ok(Json(McpSessionState::from_snapshot(id.as_str(), session.snapshot())))
    }

    /// Clear the session. A flow still in flight finishes but its result is dropped.
    #[tool(name = "diagram.reset")]
    async fn diagram_reset(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<McpSessionState>, ErrorData> {
        let (id, session) = self.session(params.0.session_id.as_deref())?;
        session.reset();
        Ok(Json(McpSessionState::from_snapshot(id.as_str(), session.snapshot())))
    }

    #[tool(name = "diagram.set_title")]
    async fn diagram_set_title(
        &self,
        params: Parameters<SetTitleParams>,
    ) -> Result<Json<McpSessionState>, ErrorData> {
        let SetTitleParams { title, session_id } = params.0;
        let (id, session) = self.session(session_id.as_deref())?;
        session.set_title(title);
        Ok(Json(McpSessionState::from_snapshot(id.as_str(), session.snapshot())))
    }

    /// Show which notation and template a diagram type resolves to, without generating.
    #[tool(name = "diagram.resolve")]
    async fn diagram_resolve(
        &self,
        params: Parameters<ResolveParams>,
    ) -> Result<Json<ResolveResponse>, ErrorData> {
        let route = self.registry.router().resolve(&params.0.diagram_type);
        Ok(Json(ResolveResponse {
            category: route.category.as_str().to_owned(),
            notation: route.notation.as_str().to_owned(),
            render_path: route.render_path_segment().to_owned(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for DiagramMakerMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Diagram Maker server (tools: diagram.generate, diagram.export, diagram.state, diagram.reset, diagram.set_title, diagram.resolve)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Parameter parsing and error mapping shared by the tool handlers.
include!("server/helpers.rs");
