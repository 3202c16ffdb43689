// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Excalidraw scene output.
//!
//! Layout is rank based: each node sits on the row of its longest forward distance from the
//! first node, and rows are centred horizontally. Seeds are derived from element ids, so the same
//! plan always produces byte-identical JSON.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::generate::plan::{PlanEdge, PlanNode, WorkflowPlan};
use crate::generate::style::{Shape, EDGE_COLOR};

const NODE_WIDTH: i64 = 200;
const NODE_HEIGHT: i64 = 80;
const ROW_GAP: i64 = 90;
const COLUMN_GAP: i64 = 60;
const ORIGIN_X: i64 = 400;
const ORIGIN_Y: i64 = 100;
const FONT_SIZE: i64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    x: i64,
    y: i64,
}

impl Placement {
    fn center_x(self) -> i64 {
        self.x + NODE_WIDTH / 2
    }

    fn bottom(self) -> i64 {
        self.y + NODE_HEIGHT
    }
}

/// 32-bit FNV-1a, folded into Excalidraw's positive seed range.
fn stable_seed(key: &str) -> i64 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in key.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    i64::from(hash & 0x7fff_ffff)
}

fn ranks(plan: &WorkflowPlan) -> BTreeMap<&str, usize> {
    let mut rank = plan
        .nodes()
        .iter()
        .map(|node| (node.id.as_str(), 0usize))
        .collect::<BTreeMap<_, _>>();
    // Forward edges only point to later nodes, so one pass in insertion order settles every rank.
    for node in plan.nodes() {
        let from_rank = rank.get(node.id.as_str()).copied().unwrap_or(0);
        for edge in plan.outgoing(&node.id) {
            if plan.is_back_edge(edge) {
                continue;
            }
            if let Some(to_rank) = rank.get_mut(edge.to.as_str()) {
                *to_rank = (*to_rank).max(from_rank + 1);
            }
        }
    }
    rank
}

fn layout(plan: &WorkflowPlan) -> BTreeMap<&str, Placement> {
    let ranks = ranks(plan);
    let mut rows: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for node in plan.nodes() {
        let rank = ranks.get(node.id.as_str()).copied().unwrap_or(0);
        rows.entry(rank).or_default().push(node.id.as_str());
    }

    let mut placements = BTreeMap::new();
    for (rank, ids) in rows {
        let count = ids.len() as i64;
        let row_width = count * NODE_WIDTH + (count - 1) * COLUMN_GAP;
        let left = ORIGIN_X - row_width / 2;
        for (column, id) in ids.into_iter().enumerate() {
            let x = left + column as i64 * (NODE_WIDTH + COLUMN_GAP);
            let y = ORIGIN_Y + rank as i64 * (NODE_HEIGHT + ROW_GAP);
            placements.insert(id, Placement { x, y });
        }
    }
    placements
}

fn base_element(id: &str, kind: &str, x: i64, y: i64, width: i64, height: i64) -> Value {
    json!({
        "id": id,
        "type": kind,
        "x": x,
        "y": y,
        "width": width,
        "height": height,
        "angle": 0,
        "strokeColor": EDGE_COLOR,
        "backgroundColor": "transparent",
        "fillStyle": "solid",
        "strokeWidth": 2,
        "strokeStyle": "solid",
        "roughness": 1,
        "opacity": 100,
        "groupIds": [],
        "frameId": null,
        "roundness": null,
        "seed": stable_seed(id),
        "version": 1,
        "versionNonce": stable_seed(&format!("{id}:nonce")),
        "isDeleted": false,
        "boundElements": [],
        "updated": 1,
        "link": null,
        "locked": false,
    })
}

fn node_elements(node: &PlanNode, at: Placement, arrows: &[String]) -> [Value; 2] {
    let palette = node.role.palette();
    let shape_id = format!("node-{}", node.id);
    let text_id = format!("label-{}", node.id);
    let kind = match node.role.shape() {
        Shape::Oval => "ellipse",
        Shape::Diamond => "diamond",
        Shape::RoundedBox | Shape::Cylinder => "rectangle",
    };

    let mut shape = base_element(&shape_id, kind, at.x, at.y, NODE_WIDTH, NODE_HEIGHT);
    shape["strokeColor"] = json!(palette.border);
    shape["backgroundColor"] = json!(palette.fill);
    if kind == "rectangle" {
        shape["roundness"] = json!({ "type": 3 });
    }
    let mut bound = vec![json!({ "type": "text", "id": text_id })];
    for arrow in arrows {
        bound.push(json!({ "type": "arrow", "id": arrow }));
    }
    shape["boundElements"] = Value::Array(bound);

    let text_height = FONT_SIZE * 5 / 4;
    let mut text = base_element(
        &text_id,
        "text",
        at.x + 10,
        at.y + (NODE_HEIGHT - text_height) / 2,
        NODE_WIDTH - 20,
        text_height,
    );
    text["strokeColor"] = json!(palette.font);
    text["roughness"] = json!(0);
    let fields = json!({
        "text": node.label,
        "originalText": node.label,
        "fontSize": FONT_SIZE,
        "fontFamily": 1,
        "textAlign": "center",
        "verticalAlign": "middle",
        "containerId": shape_id,
        "lineHeight": 1.25,
        "autoResize": true,
    });
    merge(&mut text, fields);
    [shape, text]
}

fn arrow_id(index: usize) -> String {
    format!("edge-{index}")
}

fn arrow_elements(
    index: usize,
    edge: &PlanEdge,
    from: Placement,
    to: Placement,
    back: bool,
) -> Vec<Value> {
    let id = arrow_id(index);
    let (start_x, start_y, end_x, end_y) = if back {
        // Loop-backs leave from the left flank and climb to the target's left flank.
        (from.x, from.y + NODE_HEIGHT / 2, to.x, to.y + NODE_HEIGHT / 2)
    } else {
        (from.center_x(), from.bottom(), to.center_x(), to.y)
    };
    let dx = end_x - start_x;
    let dy = end_y - start_y;
    let points = if back {
        json!([[0, 0], [-COLUMN_GAP, 0], [-COLUMN_GAP, dy], [dx, dy]])
    } else {
        json!([[0, 0], [dx, dy]])
    };

    let mut arrow = base_element(&id, "arrow", start_x, start_y, dx.abs(), dy.abs());
    arrow["strokeColor"] = json!(edge.tone.color());
    arrow["roundness"] = json!({ "type": 2 });
    let fields = json!({
        "points": points,
        "lastCommittedPoint": null,
        "startBinding": { "elementId": format!("node-{}", edge.from), "focus": 0, "gap": 4 },
        "endBinding": { "elementId": format!("node-{}", edge.to), "focus": 0, "gap": 4 },
        "startArrowhead": null,
        "endArrowhead": "arrow",
    });
    merge(&mut arrow, fields);

    let mut out = vec![arrow];
    if let Some(label) = edge.label.as_deref() {
        let label_id = format!("{id}-label");
        let width = (label.chars().count() as i64) * 9 + 10;
        let (x, y) = if back {
            (start_x - COLUMN_GAP - width, start_y + dy / 2)
        } else {
            (start_x + dx / 2 + 8, start_y + dy / 2 - 10)
        };
        let mut text = base_element(&label_id, "text", x, y, width, 20);
        text["strokeColor"] = json!(edge.tone.color());
        text["roughness"] = json!(0);
        merge(
            &mut text,
            json!({
                "text": label,
                "originalText": label,
                "fontSize": 14,
                "fontFamily": 1,
                "textAlign": "left",
                "verticalAlign": "top",
                "containerId": null,
                "lineHeight": 1.25,
                "autoResize": true,
            }),
        );
        out.push(text);
    }
    out
}

fn merge(target: &mut Value, fields: Value) {
    if let (Value::Object(target), Value::Object(fields)) = (target, fields) {
        target.extend(fields);
    }
}

/// Formats a workflow plan as an Excalidraw scene document.
pub fn workflow(plan: &WorkflowPlan) -> String {
    let placements = layout(plan);

    let mut arrows_by_node: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (index, edge) in plan.edges().iter().enumerate() {
        for endpoint in [&edge.from, &edge.to] {
            arrows_by_node
                .entry(endpoint.as_str())
                .or_default()
                .push(arrow_id(index));
        }
    }

    let mut elements = Vec::new();
    for node in plan.nodes() {
        let Some(at) = placements.get(node.id.as_str()).copied() else {
            continue;
        };
        let arrows = arrows_by_node
            .get(node.id.as_str())
            .map_or(&[][..], Vec::as_slice);
        elements.extend(node_elements(node, at, arrows));
    }
    for (index, edge) in plan.edges().iter().enumerate() {
        let (Some(from), Some(to)) =
            (placements.get(edge.from.as_str()), placements.get(edge.to.as_str()))
        else {
            continue;
        };
        elements.extend(arrow_elements(index, edge, *from, *to, plan.is_back_edge(edge)));
    }

    let scene = json!({
        "type": "excalidraw",
        "version": 2,
        "source": "diagram-maker",
        "elements": elements,
        "appState": {
            "gridSize": null,
            "viewBackgroundColor": "#ffffff",
        },
        "files": {},
    });
    format!("{scene:#}")
}
