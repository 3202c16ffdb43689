// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A diagram-description language accepted by the rendering service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotationKind {
    Graphviz,
    Mermaid,
    #[serde(rename = "plantuml")]
    PlantUml,
    Excalidraw,
}

impl NotationKind {
    pub const ALL: [NotationKind; 4] = [
        Self::Graphviz,
        Self::Mermaid,
        Self::PlantUml,
        Self::Excalidraw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Graphviz => "graphviz",
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
            Self::Excalidraw => "excalidraw",
        }
    }

    /// Path segment of the rendering endpoint (`<base>/<segment>/<format>`).
    pub fn render_path_segment(self) -> &'static str {
        self.as_str()
    }

    /// Matches a notation name as typed by a user. `dot` is accepted as an alias for GraphViz.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "graphviz" | "dot" => Some(Self::Graphviz),
            "mermaid" => Some(Self::Mermaid),
            "plantuml" => Some(Self::PlantUml),
            "excalidraw" => Some(Self::Excalidraw),
            _ => None,
        }
    }

    /// Excalidraw scenes only have a vector endpoint at the renderer.
    pub fn supports(self, format: OutputFormat) -> bool {
        !matches!((self, format), (Self::Excalidraw, OutputFormat::Png))
    }
}

impl fmt::Display for NotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format '{0}' (expected svg or png)")]
pub struct ParseOutputFormatError(String);

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(ParseOutputFormatError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NotationKind, OutputFormat};

    #[test]
    fn notation_tags_are_case_insensitive() {
        assert_eq!(
            NotationKind::from_tag(" PlantUML "),
            Some(NotationKind::PlantUml)
        );
        assert_eq!(NotationKind::from_tag("dot"), Some(NotationKind::Graphviz));
        assert_eq!(NotationKind::from_tag("d2"), None);
    }

    #[test]
    fn render_path_segments_match_renderer_names() {
        let segments: Vec<_> = NotationKind::ALL
            .iter()
            .map(|n| n.render_path_segment())
            .collect();
        assert_eq!(segments, ["graphviz", "mermaid", "plantuml", "excalidraw"]);
    }

    #[test]
    fn excalidraw_has_no_raster_output() {
        assert!(NotationKind::Excalidraw.supports(OutputFormat::Svg));
        assert!(!NotationKind::Excalidraw.supports(OutputFormat::Png));
        assert!(NotationKind::Graphviz.supports(OutputFormat::Png));
    }

    #[test]
    fn output_format_parses_and_knows_its_mime_type() {
        let png: OutputFormat = "PNG".parse().expect("format");
        assert_eq!(png, OutputFormat::Png);
        assert_eq!(png.mime_type(), "image/png");
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn notation_serializes_lowercase() {
        let json = serde_json::to_string(&NotationKind::PlantUml).expect("serialize");
        assert_eq!(json, "\"plantuml\"");
    }
}
