// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP API.
//!
//! `POST /api/generate-diagram` is stateless and returns only the generated code. The
//! `/api/sessions/{session_id}/…` routes drive a full [`Session`](crate::session::Session):
//! generate + render, export, state, title and reset.

mod error;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Stage};
use crate::generate::Generator;
use crate::model::{GenerationRequest, NotationKind, OutputFormat, SessionId};
use crate::render::Renderer;
use crate::route::DiagramCategory;
use crate::session::{GenerateOutcome, SessionRegistry, SessionSnapshot};

pub use error::ApiError;

pub type Registry<G, R> = Arc<SessionRegistry<G, R>>;

pub fn router<G, R>(registry: Registry<G, R>) -> Router
where
    G: Generator + 'static,
    R: Renderer + 'static,
{
    Router::new()
        .route("/api/", get(root))
        .route("/api/generate-diagram", post(generate_diagram::<G, R>))
        .route("/api/resolve", get(resolve_category::<G, R>))
        .route(
            "/api/sessions/{session_id}",
            get(session_state::<G, R>).delete(reset::<G, R>),
        )
        .route(
            "/api/sessions/{session_id}/generate",
            post(generate::<G, R>),
        )
        .route("/api/sessions/{session_id}/export", post(export::<G, R>))
        .route("/api/sessions/{session_id}/title", put(set_title::<G, R>))
        .with_state(registry)
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBody {
    pub description: String,
    pub diagram_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateDiagramResponse {
    pub code: String,
    pub kroki_type: NotationKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveQuery {
    pub diagram_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveResponse {
    pub category: DiagramCategory,
    pub notation: NotationKind,
    pub render_path: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionGenerateResponse {
    pub outcome: &'static str,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportBody {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleBody {
    pub title: Option<String>,
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    Ok(raw.parse::<SessionId>()?)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Diagram Maker API" }))
}

async fn generate_diagram<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateDiagramResponse>, ApiError> {
    let request = GenerationRequest::new(body.description, body.diagram_type)?;
    let route = registry.router().resolve(request.category());
    let limit = registry.timeouts().generation;
    let source = tokio::time::timeout(limit, registry.generator().generate(&request, &route))
        .await
        .map_err(|_| FlowError::Timeout {
            stage: Stage::Generation,
            after: limit,
        })?
        .map_err(FlowError::Generation)?;
    Ok(Json(GenerateDiagramResponse {
        kroki_type: source.notation(),
        code: source.into_code(),
    }))
}

async fn resolve_category<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Query(query): Query<ResolveQuery>,
) -> Json<ResolveResponse> {
    let route = registry.router().resolve(&query.diagram_type);
    Json(ResolveResponse {
        category: route.category,
        notation: route.notation,
        render_path: route.render_path_segment(),
    })
}

async fn generate<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Path(session_id): Path<String>,
    Json(body): Json<GenerateBody>,
) -> Result<Response, ApiError> {
    let id = parse_session_id(&session_id)?;
    let session = registry.get_or_create(&id);
    let outcome = session
        .generate(&body.description, &body.diagram_type)
        .await?;
    let (status, outcome) = match outcome {
        GenerateOutcome::Ready { .. } => (StatusCode::OK, "ready"),
        GenerateOutcome::Ignored => (StatusCode::CONFLICT, "ignored"),
        GenerateOutcome::Discarded => (StatusCode::OK, "discarded"),
    };
    debug!(session = id.as_str(), outcome = outcome; "session generate finished");
    let body = SessionGenerateResponse {
        outcome,
        session: session.snapshot(),
    };
    Ok((status, Json(body)).into_response())
}

async fn export<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Path(session_id): Path<String>,
    Json(body): Json<ExportBody>,
) -> Result<Response, ApiError> {
    let id = parse_session_id(&session_id)?;
    let session = registry
        .get(&id)
        .ok_or_else(|| ApiError::UnknownSession(id.to_string()))?;
    let file = session.export(body.format).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    let headers = [
        (header::CONTENT_TYPE, file.mime_type.to_owned()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, file.data.into_bytes()).into_response())
}

async fn session_state<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let id = parse_session_id(&session_id)?;
    let session = registry
        .get(&id)
        .ok_or_else(|| ApiError::UnknownSession(id.to_string()))?;
    Ok(Json(session.snapshot()))
}

async fn reset<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&session_id)?;
    if let Some(session) = registry.get(&id) {
        session.reset();
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn set_title<G: Generator + 'static, R: Renderer + 'static>(
    State(registry): State<Registry<G, R>>,
    Path(session_id): Path<String>,
    Json(body): Json<TitleBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let id = parse_session_id(&session_id)?;
    let session = registry.get_or_create(&id);
    session.set_title(body.title);
    Ok(Json(session.snapshot()))
}
