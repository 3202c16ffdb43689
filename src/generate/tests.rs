// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{generate_source, Generator, GeneratorBackend, HeuristicGenerator};
use crate::error::ValidationError;
use crate::model::{GenerationRequest, NotationKind};
use crate::route::{resolve, CategoryRouter, SequenceNotation};

const APPROVAL_FLOW: &str = "Submit a document for review, manager can approve or reject it, \
                             then complete the process.";
const BRANCH_LABELS: &str = "Start, Review Document, Approve or Reject, if approved go to \
                             Complete, if rejected go back to Review, End";
const SIMPLE_WORKFLOW: &str = "Create a simple workflow showing: Start → Review Document → \
                               Approve or Reject → If approved go to Complete, \
                               if rejected go back to Review → End";

const APPROVAL_EDGES: [&str; 5] = [
    "start -> review",
    "review -> decision",
    "decision -> complete [label=\"Approved\", color=\"#64748b\"]",
    "decision -> review [label=\"Rejected\", color=\"#64748b\"]",
    "complete -> end",
];

fn edge_lines(code: &str) -> Vec<&str> {
    code.lines()
        .map(str::trim)
        .filter(|line| line.contains("->"))
        .collect()
}

#[test]
fn approval_flow_in_graphviz_has_five_nodes_and_two_labelled_branches() {
    let source = generate_source(APPROVAL_FLOW, &resolve("flowchart")).expect("source");
    assert_eq!(source.notation(), NotationKind::Graphviz);

    let code = source.code();
    for id in ["start", "review", "decision", "complete", "end"] {
        assert!(
            code.contains(&format!("  {id} [label=")),
            "missing node {id}:\n{code}"
        );
    }
    assert_eq!(edge_lines(code), APPROVAL_EDGES);
}

#[rstest]
#[case(BRANCH_LABELS)]
#[case(SIMPLE_WORKFLOW)]
fn approved_goes_forward_and_rejected_loops_back_to_review(#[case] description: &str) {
    let source = generate_source(description, &resolve("flowchart")).expect("source");
    assert_eq!(source.notation(), NotationKind::Graphviz);
    assert_eq!(edge_lines(source.code()), APPROVAL_EDGES);
}

#[rstest]
#[case("flowchart")]
#[case("process")]
#[case("organization")]
#[case("unknown")]
#[case("graphviz")]
fn graphviz_attribute_lists_never_start_with_a_separator(#[case] category: &str) {
    for description in [
        APPROVAL_FLOW,
        "Draw something",
        "Check the invoice",
        "If stock is low then reorder else ship, save order to database",
    ] {
        let source = generate_source(description, &resolve(category)).expect("source");
        assert_eq!(source.notation(), NotationKind::Graphviz);
        assert!(
            !source.code().contains("[,"),
            "{category}: {}",
            source.code()
        );
    }
}

#[rstest]
#[case("flowchart")]
#[case("process")]
#[case("sequence")]
#[case("mindmap")]
#[case("organization")]
#[case("mermaid")]
#[case("plantuml")]
#[case("excalidraw")]
#[case("nonsense")]
fn generation_is_deterministic(#[case] category: &str) {
    let route = resolve(category);
    let first = generate_source(APPROVAL_FLOW, &route).expect("first");
    let second = generate_source(APPROVAL_FLOW, &route).expect("second");
    assert_eq!(first, second);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn blank_descriptions_are_rejected(#[case] description: &str) {
    assert_eq!(
        generate_source(description, &resolve("flowchart")),
        Err(ValidationError::BlankDescription)
    );
}

#[test]
fn process_category_lays_out_left_to_right() {
    let source = generate_source("Review the draft", &resolve("process")).expect("source");
    assert!(source.code().contains("  rankdir=LR\n"));
}

#[test]
fn sequence_follows_configured_edition() {
    let mermaid = generate_source("User logs in", &resolve("sequence")).expect("mermaid");
    assert_eq!(mermaid.notation(), NotationKind::Mermaid);
    assert!(mermaid.code().starts_with("sequenceDiagram\n"));

    let route = CategoryRouter::new(SequenceNotation::PlantUml).resolve("sequence");
    let plantuml = generate_source("User logs in", &route).expect("plantuml");
    assert_eq!(plantuml.notation(), NotationKind::PlantUml);
    assert!(plantuml.code().starts_with("@startuml\n"));
}

#[test]
fn notation_names_use_free_form_steps() {
    let description = "User submits order, validate payment, save order to database";
    let source = generate_source(description, &resolve("mermaid")).expect("source");
    assert_eq!(source.notation(), NotationKind::Mermaid);
    let code = source.code();
    assert!(code.contains("step0([\"User submits order\"]):::startStyle"));
    assert!(code.contains("step1{\"Validate payment\"}:::decisionStyle"));
    assert!(code.contains("step2[(\"Save order database\")]:::storageStyle"));
    assert!(code.contains("    step0 --> step1\n"));
}

#[test]
fn unknown_category_yields_generic_chart() {
    let source = generate_source("anything at all", &resolve("gantt")).expect("source");
    assert_eq!(
        edge_lines(source.code()),
        ["start -> process", "process -> end"]
    );
}

#[tokio::test]
async fn heuristic_generator_matches_pure_function() {
    let request = GenerationRequest::new(APPROVAL_FLOW, "flowchart").expect("request");
    let route = resolve(request.category());
    let backend = GeneratorBackend::Heuristic(HeuristicGenerator);
    let generated = backend.generate(&request, &route).await.expect("generated");
    assert_eq!(
        generated,
        generate_source(APPROVAL_FLOW, &route).expect("pure")
    );
}
