// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::generate::plan::{PlanEdge, PlanNode, WorkflowPlan};
use crate::generate::style::{EdgeTone, Shape, EDGE_COLOR, FONT_NAME};
use crate::route::Direction;

/// `key=value` pairs joined with `, `.
///
/// Attributes are only ever joined, never prefixed, so a list cannot start with a separator.
#[derive(Debug, Default)]
struct AttrList {
    attrs: Vec<(&'static str, String)>,
}

impl AttrList {
    fn raw(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    fn quoted(self, key: &'static str, value: &str) -> Self {
        let quoted = format!("\"{}\"", escape(value));
        self.raw(key, quoted)
    }

    fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl fmt::Display for AttrList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.attrs.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

fn header(out: &mut String, direction: Direction) {
    out.push_str("digraph G {\n");
    out.push_str("  bgcolor=\"transparent\"\n");
    out.push_str(&format!("  rankdir={}\n", direction.rankdir()));
    out.push_str(&format!("  node [fontname=\"{FONT_NAME}\", fontsize=12]\n"));
    out.push_str(&format!(
        "  edge [fontname=\"{FONT_NAME}\", fontsize=10, color=\"{EDGE_COLOR}\"]\n"
    ));
}

fn node_attrs(node: &PlanNode) -> AttrList {
    let palette = node.role.palette();
    let (shape, style) = match node.role.shape() {
        Shape::Oval => ("oval", "filled"),
        Shape::Diamond => ("diamond", "filled"),
        Shape::RoundedBox => ("box", "\"rounded,filled\""),
        Shape::Cylinder => ("cylinder", "filled"),
    };
    AttrList::default()
        .quoted("label", &node.label)
        .raw("shape", shape)
        .raw("style", style)
        .quoted("fillcolor", palette.fill)
        .quoted("color", palette.border)
        .quoted("fontcolor", palette.font)
}

fn edge_attrs(edge: &PlanEdge) -> AttrList {
    let mut attrs = AttrList::default();
    if let Some(label) = edge.label.as_deref() {
        attrs = attrs
            .quoted("label", label)
            .quoted("color", edge.tone.color());
        if edge.tone != EdgeTone::Neutral {
            attrs = attrs.quoted("fontcolor", edge.tone.color());
        }
    } else if edge.tone != EdgeTone::Neutral {
        attrs = attrs.quoted("color", edge.tone.color());
    }
    attrs
}

/// Formats a workflow plan as a styled `digraph`.
pub fn workflow(plan: &WorkflowPlan, direction: Direction) -> String {
    let mut out = String::new();
    header(&mut out, direction);
    out.push('\n');
    for node in plan.nodes() {
        out.push_str(&format!("  {} [{}]\n", node.id, node_attrs(node)));
    }
    out.push('\n');
    for edge in plan.edges() {
        let attrs = edge_attrs(edge);
        if attrs.is_empty() {
            out.push_str(&format!("  {} -> {}\n", edge.from, edge.to));
        } else {
            out.push_str(&format!("  {} -> {} [{}]\n", edge.from, edge.to, attrs));
        }
    }
    out.push_str("}\n");
    out
}

const ORG_MEMBERS: &[(&str, &str)] = &[
    ("CEO", "CEO"),
    ("CTO", "CTO"),
    ("CFO", "CFO"),
    ("Dev1", "Developer 1"),
    ("Dev2", "Developer 2"),
    ("Acc1", "Accountant"),
];

const ORG_REPORTS: &[(&str, &str)] = &[
    ("CEO", "CTO"),
    ("CEO", "CFO"),
    ("CTO", "Dev1"),
    ("CTO", "Dev2"),
    ("CFO", "Acc1"),
];

pub fn organization() -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    out.push_str("  bgcolor=\"transparent\"\n");
    out.push_str("  rankdir=TB\n");
    let defaults = AttrList::default()
        .quoted("fontname", FONT_NAME)
        .raw("fontsize", "12")
        .raw("shape", "box")
        .quoted("style", "rounded,filled")
        .quoted("fillcolor", "#fce7f3")
        .quoted("color", "#db2777")
        .quoted("fontcolor", "#831843");
    out.push_str(&format!("  node [{defaults}]\n\n"));
    for (id, label) in ORG_MEMBERS {
        out.push_str(&format!("  {id} [{}]\n", AttrList::default().quoted("label", label)));
    }
    out.push('\n');
    for (from, to) in ORG_REPORTS {
        out.push_str(&format!("  {from} -> {to}\n"));
    }
    out.push_str("}\n");
    out
}
