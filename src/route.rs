// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram-type routing: user-facing category → notation, template and render path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::NotationKind;

/// Which notation the `sequence` category produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceNotation {
    #[default]
    Mermaid,
    #[serde(rename = "plantuml")]
    PlantUml,
}

impl SequenceNotation {
    pub fn notation(self) -> NotationKind {
        match self {
            Self::Mermaid => NotationKind::Mermaid,
            Self::PlantUml => NotationKind::PlantUml,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramCategory {
    Flowchart,
    Process,
    Organization,
    Sequence,
    Mindmap,
    /// A notation name was given instead of a family.
    Notation,
    /// Anything unrecognised.
    Generic,
}

impl DiagramCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Process => "process",
            Self::Organization => "organization",
            Self::Sequence => "sequence",
            Self::Mindmap => "mindmap",
            Self::Notation => "notation",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for DiagramCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    TopToBottom,
    LeftToRight,
}

impl Direction {
    pub fn rankdir(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::LeftToRight => "LR",
        }
    }

    pub fn mermaid(self) -> &'static str {
        match self {
            Self::TopToBottom => "TD",
            Self::LeftToRight => "LR",
        }
    }
}

/// How the description is turned into source once the notation is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Keyword-cue workflow skeleton.
    Workflow(Direction),
    Sequence,
    Mindmap,
    Organization,
    /// Free-form step extraction.
    FreeformSteps,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub notation: NotationKind,
    pub template: Template,
    pub category: DiagramCategory,
}

impl Route {
    pub fn render_path_segment(&self) -> &'static str {
        self.notation.render_path_segment()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryRouter {
    sequence: SequenceNotation,
}

impl CategoryRouter {
    pub fn new(sequence: SequenceNotation) -> Self {
        Self { sequence }
    }

    /// Never fails: unknown categories fall back to a generic GraphViz diagram.
    pub fn resolve(&self, category: &str) -> Route {
        let tag = category.trim().to_ascii_lowercase();
        let (notation, template, category) = match tag.as_str() {
            "flowchart" => (
                NotationKind::Graphviz,
                Template::Workflow(Direction::TopToBottom),
                DiagramCategory::Flowchart,
            ),
            "process" => (
                NotationKind::Graphviz,
                Template::Workflow(Direction::LeftToRight),
                DiagramCategory::Process,
            ),
            "organization" => (
                NotationKind::Graphviz,
                Template::Organization,
                DiagramCategory::Organization,
            ),
            "sequence" => (
                self.sequence.notation(),
                Template::Sequence,
                DiagramCategory::Sequence,
            ),
            "mindmap" => (
                NotationKind::Mermaid,
                Template::Mindmap,
                DiagramCategory::Mindmap,
            ),
            other => match NotationKind::from_tag(other) {
                Some(notation) => (notation, Template::FreeformSteps, DiagramCategory::Notation),
                None => (
                    NotationKind::Graphviz,
                    Template::Generic,
                    DiagramCategory::Generic,
                ),
            },
        };
        Route {
            notation,
            template,
            category,
        }
    }
}

/// Resolves with the default edition (Mermaid sequences).
pub fn resolve(category: &str) -> Route {
    CategoryRouter::default().resolve(category)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{resolve, CategoryRouter, DiagramCategory, Direction, SequenceNotation, Template};
    use crate::model::NotationKind;

    #[rstest]
    #[case(
        "flowchart",
        NotationKind::Graphviz,
        Template::Workflow(Direction::TopToBottom)
    )]
    #[case(
        "process",
        NotationKind::Graphviz,
        Template::Workflow(Direction::LeftToRight)
    )]
    #[case("organization", NotationKind::Graphviz, Template::Organization)]
    #[case("sequence", NotationKind::Mermaid, Template::Sequence)]
    #[case("mindmap", NotationKind::Mermaid, Template::Mindmap)]
    #[case(
        "  FlowChart ",
        NotationKind::Graphviz,
        Template::Workflow(Direction::TopToBottom)
    )]
    #[case("plantuml", NotationKind::PlantUml, Template::FreeformSteps)]
    #[case("dot", NotationKind::Graphviz, Template::FreeformSteps)]
    #[case("Excalidraw", NotationKind::Excalidraw, Template::FreeformSteps)]
    fn known_categories_route_to_their_notation(
        #[case] category: &str,
        #[case] notation: NotationKind,
        #[case] template: Template,
    ) {
        let route = resolve(category);
        assert_eq!(route.notation, notation);
        assert_eq!(route.template, template);
        assert_eq!(route.render_path_segment(), notation.render_path_segment());
    }

    #[rstest]
    #[case("")]
    #[case("gantt")]
    #[case("🦀")]
    #[case("flow chart")]
    fn unknown_categories_fall_back_to_generic_graphviz(#[case] category: &str) {
        let route = resolve(category);
        assert_eq!(route.notation, NotationKind::Graphviz);
        assert_eq!(route.template, Template::Generic);
        assert_eq!(route.category, DiagramCategory::Generic);
        assert_eq!(route.render_path_segment(), "graphviz");
    }

    #[test]
    fn sequence_edition_is_configurable() {
        let router = CategoryRouter::new(SequenceNotation::PlantUml);
        let route = router.resolve("sequence");
        assert_eq!(route.notation, NotationKind::PlantUml);
        assert_eq!(route.render_path_segment(), "plantuml");
    }

    #[test]
    fn resolve_is_pure() {
        assert_eq!(resolve("process"), resolve("process"));
    }
}
