// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

use crate::generate::plan::{PlanNode, WorkflowPlan};
use crate::generate::style::{EdgeTone, NodeRole, Shape};
use crate::route::Direction;

/// Words Mermaid's flowchart grammar treats as keywords when used as a bare node id.
const RESERVED_IDS: &[&str] = &[
    "end",
    "graph",
    "flowchart",
    "subgraph",
    "style",
    "class",
    "classdef",
    "click",
    "linkstyle",
];

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_valid_ident(ident: &str) -> bool {
    !ident.is_empty() && ident.chars().all(is_ident_char)
}

/// Maps a plan id onto a Mermaid-safe node id.
fn node_ident(id: &str) -> Cow<'_, str> {
    let ident: Cow<'_, str> = if is_valid_ident(id) {
        Cow::Borrowed(id)
    } else {
        let replaced = id
            .chars()
            .map(|c| if is_ident_char(c) { c } else { '_' })
            .collect::<String>();
        if replaced.is_empty() {
            Cow::Borrowed("node")
        } else {
            Cow::Owned(replaced)
        }
    };
    if RESERVED_IDS.contains(&ident.to_ascii_lowercase().as_str()) {
        Cow::Owned(format!("{ident}_node"))
    } else {
        ident
    }
}

fn quote_label(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "#quot;").replace('\n', " "))
}

fn edge_label(label: &str) -> String {
    label.replace('|', "/").replace('"', "#quot;")
}

fn node_decl(node: &PlanNode) -> String {
    let label = quote_label(&node.label);
    let ident = node_ident(&node.id);
    let shaped = match node.role.shape() {
        Shape::Oval => format!("{ident}([{label}])"),
        Shape::Diamond => format!("{ident}{{{label}}}"),
        Shape::RoundedBox => format!("{ident}({label})"),
        Shape::Cylinder => format!("{ident}[({label})]"),
    };
    format!("{shaped}:::{}", node.role.class_name())
}

/// Formats a workflow plan as a Mermaid `flowchart` with one `classDef` per role.
pub fn workflow(plan: &WorkflowPlan, direction: Direction) -> String {
    let mut out = String::new();
    out.push_str(&format!("flowchart {}\n", direction.mermaid()));
    for role in NodeRole::ALL {
        let palette = role.palette();
        out.push_str(&format!(
            "    classDef {} fill:{},stroke:{},stroke-width:2px,color:{}\n",
            role.class_name(),
            palette.fill,
            palette.border,
            palette.font
        ));
    }
    out.push('\n');
    for node in plan.nodes() {
        out.push_str("    ");
        out.push_str(&node_decl(node));
        out.push('\n');
    }
    out.push('\n');

    let mut styled = Vec::new();
    for (idx, edge) in plan.edges().iter().enumerate() {
        let from = node_ident(&edge.from);
        let to = node_ident(&edge.to);
        match edge.label.as_deref() {
            Some(label) => {
                out.push_str(&format!("    {from} -->|{}| {to}\n", edge_label(label)));
            }
            None => out.push_str(&format!("    {from} --> {to}\n")),
        }
        if edge.tone != EdgeTone::Neutral {
            styled.push((idx, edge.tone.color()));
        }
    }
    for (idx, color) in styled {
        out.push_str(&format!("    linkStyle {idx} stroke:{color},stroke-width:2px\n"));
    }
    out
}

pub fn sequence() -> String {
    let mut out = String::new();
    out.push_str("sequenceDiagram\n");
    out.push_str("    participant User\n");
    out.push_str("    participant System\n");
    out.push_str("    participant Database\n");
    out.push('\n');
    out.push_str("    User->>System: Send Request\n");
    out.push_str("    System->>Database: Query Data\n");
    out.push_str("    Database-->>System: Return Results\n");
    out.push_str("    System-->>User: Display Response\n");
    out
}

const MINDMAP_TREE: &[(&str, &str, &[(&str, &str)])] = &[
    ("B", "Subtopic 1", &[("E", "Detail 1"), ("F", "Detail 2")]),
    ("C", "Subtopic 2", &[("G", "Detail 3")]),
    ("D", "Subtopic 3", &[("H", "Detail 4")]),
];

/// Topic tree rendered as a top-down Mermaid graph.
pub fn mindmap() -> String {
    let mut out = String::from("graph TD\n");
    for (idx, (id, label, _)) in MINDMAP_TREE.iter().enumerate() {
        if idx == 0 {
            out.push_str(&format!("    A[Main Topic] --> {id}[{label}]\n"));
        } else {
            out.push_str(&format!("    A --> {id}[{label}]\n"));
        }
    }
    for (parent, _, children) in MINDMAP_TREE {
        for (id, label) in *children {
            out.push_str(&format!("    {parent} --> {id}[{label}]\n"));
        }
    }
    out
}
