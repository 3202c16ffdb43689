// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Notation-independent workflow graph.
//!
//! The cue rules and the free-form extractor both produce a [`WorkflowPlan`]; the per-notation
//! templates only format it.

use super::rules::CueSet;
use super::style::{EdgeTone, NodeRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNode {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub tone: EdgeTone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowPlan {
    nodes: Vec<PlanNode>,
    edges: Vec<PlanEdge>,
}

impl WorkflowPlan {
    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[PlanEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&PlanNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub(crate) fn add_node(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        role: NodeRole,
    ) {
        self.nodes.push(PlanNode {
            id: id.into(),
            label: label.into(),
            role,
        });
    }

    pub(crate) fn connect(&mut self, from: &str, to: &str) {
        self.edges.push(PlanEdge {
            from: from.to_owned(),
            to: to.to_owned(),
            label: None,
            tone: EdgeTone::Neutral,
        });
    }

    pub(crate) fn branch(&mut self, from: &str, to: &str, label: &str, tone: EdgeTone) {
        self.edges.push(PlanEdge {
            from: from.to_owned(),
            to: to.to_owned(),
            label: Some(label.to_owned()),
            tone,
        });
    }

    /// Position of `id` in insertion order; used for back-edge detection.
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PlanEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    pub fn is_back_edge(&self, edge: &PlanEdge) -> bool {
        match (self.rank(&edge.from), self.rank(&edge.to)) {
            (Some(from), Some(to)) => to <= from,
            _ => false,
        }
    }
}

pub const START: &str = "start";
pub const REVIEW: &str = "review";
pub const DECISION: &str = "decision";
pub const COMPLETE: &str = "complete";
pub const PROCESS: &str = "process";
pub const END: &str = "end";

/// The `start → process → end` plan used when nothing more specific applies.
pub fn minimal_plan() -> WorkflowPlan {
    let mut plan = WorkflowPlan::default();
    plan.add_node(START, "Start", NodeRole::Start);
    plan.add_node(PROCESS, "Process", NodeRole::Process);
    plan.add_node(END, "End", NodeRole::End);
    plan.connect(START, PROCESS);
    plan.connect(PROCESS, END);
    plan
}

/// Builds the `start → [review] → decision → [complete | loop-back] → end` skeleton.
///
/// Rejection (or "No") always loops back to the earliest optional step: review when present,
/// otherwise start.
pub fn workflow_plan(cues: CueSet) -> WorkflowPlan {
    if cues.is_empty() {
        return minimal_plan();
    }

    let mut plan = WorkflowPlan::default();
    plan.add_node(START, "Start", NodeRole::Start);

    let mut last = START;
    if cues.review {
        plan.add_node(REVIEW, "Review Document", NodeRole::Process);
        plan.connect(START, REVIEW);
        last = REVIEW;
    }
    let loop_target = last;

    if cues.decision {
        plan.add_node(DECISION, "Approve?", NodeRole::Decision);
        plan.connect(last, DECISION);

        if cues.completion {
            plan.add_node(COMPLETE, "Complete", NodeRole::Process);
            plan.add_node(END, "End", NodeRole::End);
            plan.branch(DECISION, COMPLETE, "Approved", EdgeTone::Neutral);
            plan.branch(DECISION, loop_target, "Rejected", EdgeTone::Neutral);
            plan.connect(COMPLETE, END);
        } else {
            plan.add_node(END, "End", NodeRole::End);
            plan.branch(DECISION, END, "Yes", EdgeTone::Neutral);
            plan.branch(DECISION, loop_target, "No", EdgeTone::Neutral);
        }
        return plan;
    }

    if cues.completion {
        plan.add_node(COMPLETE, "Complete", NodeRole::Process);
        plan.connect(last, COMPLETE);
        last = COMPLETE;
    }
    plan.add_node(END, "End", NodeRole::End);
    plan.connect(last, END);
    plan
}

#[cfg(test)]
mod tests {
    use super::{minimal_plan, workflow_plan, WorkflowPlan};
    use crate::generate::rules::CueSet;

    fn edge_list(plan: &WorkflowPlan) -> Vec<(String, String, Option<String>)> {
        plan.edges()
            .iter()
            .map(|edge| (edge.from.clone(), edge.to.clone(), edge.label.clone()))
            .collect()
    }

    fn e(from: &str, to: &str, label: Option<&str>) -> (String, String, Option<String>) {
        (from.to_owned(), to.to_owned(), label.map(str::to_owned))
    }

    #[test]
    fn no_cues_yields_minimal_chain() {
        let plan = workflow_plan(CueSet::default());
        assert_eq!(plan, minimal_plan());
        assert_eq!(
            edge_list(&plan),
            vec![e("start", "process", None), e("process", "end", None)]
        );
    }

    #[test]
    fn review_without_decision_is_linear() {
        let plan = workflow_plan(CueSet {
            review: true,
            ..CueSet::default()
        });
        assert_eq!(
            edge_list(&plan),
            vec![e("start", "review", None), e("review", "end", None)]
        );
    }

    #[test]
    fn approval_with_completion_loops_rejections_back_to_review() {
        let plan = workflow_plan(CueSet {
            review: true,
            decision: true,
            completion: true,
        });
        assert_eq!(plan.nodes().len(), 5);
        assert_eq!(
            edge_list(&plan),
            vec![
                e("start", "review", None),
                e("review", "decision", None),
                e("decision", "complete", Some("Approved")),
                e("decision", "review", Some("Rejected")),
                e("complete", "end", None),
            ]
        );
    }

    #[test]
    fn decision_without_review_loops_back_to_start() {
        let plan = workflow_plan(CueSet {
            decision: true,
            ..CueSet::default()
        });
        assert_eq!(
            edge_list(&plan),
            vec![
                e("start", "decision", None),
                e("decision", "end", Some("Yes")),
                e("decision", "start", Some("No")),
            ]
        );
    }

    #[test]
    fn completion_without_decision_is_spliced_before_end() {
        let plan = workflow_plan(CueSet {
            completion: true,
            ..CueSet::default()
        });
        assert_eq!(
            edge_list(&plan),
            vec![e("start", "complete", None), e("complete", "end", None)]
        );
    }

    #[test]
    fn rejection_edge_is_a_back_edge() {
        let plan = workflow_plan(CueSet {
            review: true,
            decision: true,
            completion: true,
        });
        let back = plan
            .edges()
            .iter()
            .filter(|edge| plan.is_back_edge(edge))
            .collect::<Vec<_>>();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].to, "review");
    }
}
