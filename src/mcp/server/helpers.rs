// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn session_id_param(raw: Option<&str>) -> Result<SessionId, ErrorData> {
    let raw = raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID);
    raw.parse::<SessionId>()
        .map_err(|err| ErrorData::invalid_params(format!("invalid session_id: {err}"), None))
}

/// Caller mistakes become `invalid_params`; dependency failures and timeouts `internal_error`.
fn flow_error_data(err: FlowError) -> ErrorData {
    match err {
        FlowError::Validation(_) => ErrorData::invalid_params(err.to_string(), None),
        FlowError::Generation(_)
        | FlowError::Render(_)
        | FlowError::Timeout { .. }
        | FlowError::Cancelled => ErrorData::internal_error(err.to_string(), None),
    }
}

fn export_error_data(err: ExportError) -> ErrorData {
    match err {
        ExportError::Validation(_) | ExportError::Busy | ExportError::UnsupportedFormat { .. } => {
            ErrorData::invalid_params(err.to_string(), None)
        }
        ExportError::Render(_) | ExportError::Timeout { .. } => {
            ErrorData::internal_error(err.to_string(), None)
        }
    }
}
