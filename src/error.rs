// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error taxonomy shared by the generation pipeline and its surfaces.
//!
//! Every error is terminal for the current flow and never for the process.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::model::{NotationKind, OutputFormat};

/// Caller mistakes detected before any dependency is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description must not be blank")]
    BlankDescription,
    #[error("nothing to export: generate a diagram first")]
    NothingToExport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation failed ({status}): {message}")]
    Failed { status: u16, message: String },
    #[error("generation returned no usable diagram code")]
    Malformed,
    #[error("generation request failed: {0}")]
    Transport(String),
    #[error("generation timed out")]
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer answered with a non-success status. `body` is kept verbatim so syntax errors
    /// reach the caller unchanged.
    #[error("renderer rejected {notation} source ({status}): {body}")]
    Rejected {
        notation: NotationKind,
        status: u16,
        body: String,
    },
    #[error("renderer request failed: {0}")]
    Transport(String),
    #[error("renderer timed out")]
    TimedOut,
    #[error("{notation} cannot be rendered as {format}")]
    Unsupported {
        notation: NotationKind,
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generation,
    Rendering,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generation => "generation",
            Self::Rendering => "rendering",
            Self::Export => "export",
        })
    }
}

/// Why a generate/render flow ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("{stage} timed out after {}s", after.as_secs())]
    Timeout { stage: Stage, after: Duration },
    /// The flow was dropped before it reached `Ready` or `Failed`, e.g. a caller disconnected.
    #[error("flow cancelled before completion")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("an export is already in progress")]
    Busy,
    #[error("{notation} diagrams cannot be exported as {format}")]
    UnsupportedFormat {
        notation: NotationKind,
        format: OutputFormat,
    },
    #[error("export failed: {0}")]
    Render(RenderError),
    #[error("export timed out after {}s", after.as_secs())]
    Timeout { after: Duration },
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ExportError, FlowError, GenerationError, RenderError, Stage, ValidationError};
    use crate::model::{NotationKind, OutputFormat};

    #[test]
    fn rejected_render_keeps_body_verbatim() {
        let err = FlowError::from(RenderError::Rejected {
            notation: NotationKind::Graphviz,
            status: 400,
            body: "syntax error line 3".to_owned(),
        });
        assert_eq!(
            err.to_string(),
            "renderer rejected graphviz source (400): syntax error line 3"
        );
    }

    #[test]
    fn generation_failure_carries_status_and_message() {
        let err = FlowError::from(GenerationError::Failed {
            status: 503,
            message: "model overloaded".to_owned(),
        });
        assert_eq!(err.to_string(), "generation failed (503): model overloaded");
    }

    #[test]
    fn timeouts_name_their_stage() {
        let err = FlowError::Timeout {
            stage: Stage::Rendering,
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "rendering timed out after 30s");
    }

    #[test]
    fn cancelled_flows_explain_themselves() {
        assert_eq!(
            FlowError::Cancelled.to_string(),
            "flow cancelled before completion"
        );
    }

    #[test]
    fn export_errors_are_distinct_from_render_errors() {
        let err = ExportError::Render(RenderError::Transport("connection refused".to_owned()));
        assert_eq!(
            err.to_string(),
            "export failed: renderer request failed: connection refused"
        );

        let err = ExportError::from(ValidationError::NothingToExport);
        assert!(matches!(
            err,
            ExportError::Validation(ValidationError::NothingToExport)
        ));

        let err = ExportError::UnsupportedFormat {
            notation: NotationKind::Excalidraw,
            format: OutputFormat::Png,
        };
        assert_eq!(
            err.to_string(),
            "excalidraw diagrams cannot be exported as png"
        );
    }
}
