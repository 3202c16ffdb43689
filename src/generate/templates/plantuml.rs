// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use crate::generate::plan::{PlanEdge, WorkflowPlan, END, START};
use crate::generate::style::{EDGE_COLOR, FONT_NAME};

fn activity_text(label: &str) -> String {
    label.replace(';', ",").replace(['\n', '\r'], " ")
}

fn guard_text(label: &str) -> String {
    label.replace(['(', ')'], "").replace(['\n', '\r'], " ")
}

struct ActivityWriter<'a> {
    plan: &'a WorkflowPlan,
    loop_targets: BTreeSet<&'a str>,
    visited: BTreeSet<&'a str>,
    out: String,
}

impl<'a> ActivityWriter<'a> {
    fn new(plan: &'a WorkflowPlan) -> Self {
        let loop_targets = plan
            .edges()
            .iter()
            .filter(|edge| plan.is_back_edge(edge))
            .map(|edge| edge.to.as_str())
            .collect();
        Self {
            plan,
            loop_targets,
            visited: BTreeSet::new(),
            out: String::new(),
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Emits `id` and everything reachable from it that has not been emitted yet.
    ///
    /// A decision with one back edge becomes `repeat ... repeat while`, a decision with forward
    /// branches becomes `if/else/endif`.
    fn walk(&mut self, id: &'a str, depth: usize) {
        let plan = self.plan;
        let mut current = id;
        loop {
            if !self.visited.insert(current) {
                return;
            }
            let Some(node) = plan.node(current) else {
                return;
            };
            let edges = plan.outgoing(current).collect::<Vec<&'a PlanEdge>>();

            if current != END {
                if self.loop_targets.contains(current) {
                    self.line(depth, "repeat");
                }
                // Branching nodes only appear as guards.
                if current != START && edges.len() <= 1 {
                    let fill = node.role.palette().fill;
                    self.line(depth, &format!("{fill}:{};", activity_text(&node.label)));
                }
            }

            match edges.as_slice() {
                [] => return,
                [next] => current = next.to.as_str(),
                _ => {
                    let back = edges.iter().copied().find(|e| plan.is_back_edge(e));
                    let forward = edges
                        .iter()
                        .copied()
                        .filter(|e| !plan.is_back_edge(e))
                        .collect::<Vec<_>>();
                    match (back, forward.as_slice()) {
                        (Some(back), [next]) => {
                            self.line(
                                depth,
                                &format!(
                                    "repeat while ({}) is ({}) not ({})",
                                    guard_text(&node.label),
                                    guard_text(back.label.as_deref().unwrap_or("no")),
                                    guard_text(next.label.as_deref().unwrap_or("yes")),
                                ),
                            );
                            current = next.to.as_str();
                        }
                        (_, [yes, no, ..]) => {
                            self.line(
                                depth,
                                &format!(
                                    "if ({}) then ({})",
                                    guard_text(&node.label),
                                    guard_text(yes.label.as_deref().unwrap_or("yes")),
                                ),
                            );
                            self.walk(yes.to.as_str(), depth + 1);
                            self.line(
                                depth,
                                &format!(
                                    "else ({})",
                                    guard_text(no.label.as_deref().unwrap_or("no"))
                                ),
                            );
                            self.walk(no.to.as_str(), depth + 1);
                            self.line(depth, "endif");
                            return;
                        }
                        (_, [next]) => current = next.to.as_str(),
                        _ => return,
                    }
                }
            }
        }
    }
}

/// Formats a workflow plan as a PlantUML activity diagram.
pub fn workflow(plan: &WorkflowPlan) -> String {
    let mut writer = ActivityWriter::new(plan);
    let out = &mut writer.out;
    out.push_str("@startuml\n");
    out.push_str("skinparam backgroundColor transparent\n");
    out.push_str(&format!("skinparam defaultFontName {FONT_NAME}\n"));
    out.push_str(&format!("skinparam ArrowColor {EDGE_COLOR}\n"));
    out.push_str("skinparam activityBorderThickness 2\n");
    out.push('\n');
    out.push_str("start\n");
    if let Some(first) = plan.nodes().first() {
        writer.walk(first.id.as_str(), 0);
    }
    writer.out.push_str("stop\n");
    writer.out.push_str("@enduml\n");
    writer.out
}

pub fn sequence() -> String {
    let mut out = String::new();
    out.push_str("@startuml\n");
    out.push_str("skinparam backgroundColor transparent\n");
    out.push_str("actor User\n");
    out.push_str("participant System\n");
    out.push_str("database Database\n");
    out.push('\n');
    out.push_str("User -> System: Send Request\n");
    out.push_str("System -> Database: Query Data\n");
    out.push_str("Database --> System: Return Results\n");
    out.push_str("System --> User: Display Response\n");
    out.push_str("@enduml\n");
    out
}
