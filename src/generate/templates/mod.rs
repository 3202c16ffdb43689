// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-notation snippet builders.

pub mod excalidraw;
pub mod graphviz;
pub mod mermaid;
pub mod plantuml;

use super::plan::WorkflowPlan;
use crate::model::{GeneratedSource, NotationKind};
use crate::route::Direction;

/// Formats `plan` in `notation`.
pub fn render_plan(
    plan: &WorkflowPlan,
    notation: NotationKind,
    direction: Direction,
) -> GeneratedSource {
    let code = match notation {
        NotationKind::Graphviz => graphviz::workflow(plan, direction),
        NotationKind::Mermaid => mermaid::workflow(plan, direction),
        NotationKind::PlantUml => plantuml::workflow(plan),
        NotationKind::Excalidraw => excalidraw::workflow(plan),
    };
    GeneratedSource::new(notation, code)
}
