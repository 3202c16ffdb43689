// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Description → diagram source.
//!
//! The local path is fully deterministic: keyword cues (or free-form steps) become a
//! [`plan::WorkflowPlan`], which the per-notation [`templates`] format. The remote path asks an
//! OpenAI-compatible completion endpoint for the code instead. Both sit behind [`Generator`].

pub mod plan;
pub mod remote;
pub mod rules;
pub mod steps;
pub mod style;
pub mod templates;

#[cfg(test)]
mod tests;

use std::future::Future;

use crate::error::{GenerationError, ValidationError};
use crate::model::{GeneratedSource, GenerationRequest, NotationKind};
use crate::route::{Direction, Route, Template};

pub use remote::{CompletionConfig, CompletionGenerator};

/// Generates source for `description` along `route`.
///
/// Blank descriptions are rejected before any work is done.
pub fn generate_source(
    description: &str,
    route: &Route,
) -> Result<GeneratedSource, ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::BlankDescription);
    }
    Ok(generate_validated(description, route))
}

fn generate_validated(description: &str, route: &Route) -> GeneratedSource {
    match route.template {
        Template::Workflow(direction) => {
            let plan = plan::workflow_plan(rules::detect_cues(description));
            templates::render_plan(&plan, route.notation, direction)
        }
        Template::FreeformSteps => {
            let plan = steps::steps_plan(&steps::extract_workflow(description));
            templates::render_plan(&plan, route.notation, Direction::TopToBottom)
        }
        Template::Generic => {
            let plan = plan::minimal_plan();
            templates::render_plan(&plan, route.notation, Direction::TopToBottom)
        }
        Template::Sequence => match route.notation {
            NotationKind::PlantUml => {
                GeneratedSource::new(NotationKind::PlantUml, templates::plantuml::sequence())
            }
            _ => GeneratedSource::new(NotationKind::Mermaid, templates::mermaid::sequence()),
        },
        Template::Mindmap => {
            GeneratedSource::new(NotationKind::Mermaid, templates::mermaid::mindmap())
        }
        Template::Organization => {
            GeneratedSource::new(NotationKind::Graphviz, templates::graphviz::organization())
        }
    }
}

/// A source of diagram code: the local heuristic or a remote model.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
        route: &Route,
    ) -> impl Future<Output = Result<GeneratedSource, GenerationError>> + Send;
}

/// Keyword-driven local generator. Never fails for a validated request.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicGenerator;

impl Generator for HeuristicGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        route: &Route,
    ) -> Result<GeneratedSource, GenerationError> {
        Ok(generate_validated(request.description(), route))
    }
}

/// Generator chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum GeneratorBackend {
    Heuristic(HeuristicGenerator),
    Completion(CompletionGenerator),
}

impl Generator for GeneratorBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
        route: &Route,
    ) -> Result<GeneratedSource, GenerationError> {
        match self {
            Self::Heuristic(generator) => generator.generate(request, route).await,
            Self::Completion(generator) => generator.generate(request, route).await,
        }
    }
}
