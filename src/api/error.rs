// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::{ExportError, FlowError, ValidationError};
use crate::model::IdError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("invalid session id: {0}")]
    InvalidSessionId(#[from] IdError),
    #[error("unknown session: {0}")]
    UnknownSession(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Flow(FlowError::Validation(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Flow(FlowError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Flow(FlowError::Generation(_) | FlowError::Render(_)) => StatusCode::BAD_GATEWAY,
            Self::Flow(FlowError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Flow(FlowError::Cancelled) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Export(ExportError::Validation(_) | ExportError::UnsupportedFormat { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Export(ExportError::Busy) => StatusCode::CONFLICT,
            Self::Export(ExportError::Render(_)) => StatusCode::BAD_GATEWAY,
            Self::Export(ExportError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::InvalidSessionId(_) => StatusCode::BAD_REQUEST,
            Self::UnknownSession(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::warn!(status = status.as_u16(), error = self.to_string(); "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use rstest::rstest;

    use super::ApiError;
    use crate::error::{
        ExportError, FlowError, GenerationError, RenderError, Stage, ValidationError,
    };
    use crate::model::{NotationKind, OutputFormat};

    #[rstest]
    #[case(ValidationError::BlankDescription.into(), StatusCode::BAD_REQUEST)]
    #[case(
        ApiError::Flow(FlowError::Generation(GenerationError::Malformed)),
        StatusCode::BAD_GATEWAY
    )]
    #[case(
        ApiError::Flow(FlowError::Render(RenderError::Transport("refused".to_owned()))),
        StatusCode::BAD_GATEWAY
    )]
    #[case(
        ApiError::Flow(FlowError::Timeout {
            stage: Stage::Rendering,
            after: Duration::from_secs(30),
        }),
        StatusCode::GATEWAY_TIMEOUT
    )]
    #[case(
        ApiError::Flow(FlowError::Cancelled),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(ApiError::Export(ExportError::Busy), StatusCode::CONFLICT)]
    #[case(
        ApiError::Export(ExportError::UnsupportedFormat {
            notation: NotationKind::Excalidraw,
            format: OutputFormat::Png,
        }),
        StatusCode::BAD_REQUEST
    )]
    #[case(ApiError::UnknownSession("gone".to_owned()), StatusCode::NOT_FOUND)]
    fn statuses_follow_the_error_kind(#[case] err: ApiError, #[case] status: StatusCode) {
        assert_eq!(err.status(), status);
    }

    #[test]
    fn timeout_message_names_the_stage() {
        let err = ApiError::Flow(FlowError::Timeout {
            stage: Stage::Generation,
            after: Duration::from_secs(30),
        });
        assert_eq!(err.to_string(), "generation timed out after 30s");
    }
}
