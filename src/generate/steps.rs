// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Free-form step extraction for requests that name a notation directly.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::plan::{minimal_plan, WorkflowPlan};
use super::rules::classify_step;
use super::style::{EdgeTone, NodeRole};

const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "do", "does", "did", "will", "would", "should", "could", "may",
    "might", "can", "must", "shall", "it", "this", "that", "these", "those",
];

const STEP_WORDS: usize = 6;
const CONDITION_WORDS: usize = 5;
const MIN_STEP_CHARS: usize = 5;
const FALLBACK_NO_BRANCH: &str = "Alternative path";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub role: NodeRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub condition: String,
    pub yes: String,
    pub no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workflow {
    pub steps: Vec<Step>,
    pub conditionals: Vec<Conditional>,
}

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[,;]|\bthen\b|\bnext\b|\bafter\b").expect("separator regex")
    })
}

fn if_else_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\bif\s+([^,]+?)\s+(?:show|display|go to|then|:)\s+([^,]+?)(?:\s+else\s+([^,]+?))?(?:[,;.]|$)",
        )
        .expect("if/else regex")
    })
}

fn either_or_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:either|when)\s+([^,]+?)\s+(?:or|otherwise)\s+([^,]+?)(?:[,;.]|$)",
        )
        .expect("either/or regex")
    })
}

/// Drops filler words (short ones only), keeps at most `max_words` and capitalises the result.
pub fn clean_label(text: &str, max_words: usize) -> String {
    let words = text.split_whitespace().collect::<Vec<_>>();
    let kept = words
        .iter()
        .copied()
        .filter(|word| word.len() > 4 || !FILLER_WORDS.contains(&word.to_lowercase().as_str()))
        .take(max_words)
        .collect::<Vec<_>>();
    let joined = if kept.is_empty() {
        words.iter().copied().take(max_words).collect::<Vec<_>>().join(" ")
    } else {
        kept.join(" ")
    };
    let trimmed = joined.trim_end_matches(['.', '!', '?']);
    capitalize(trimmed)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn conditionals(description: &str) -> (Vec<Conditional>, Vec<Range<usize>>) {
    let mut found = Vec::new();
    let mut spans = Vec::new();

    for caps in if_else_re().captures_iter(description) {
        let (Some(whole), Some(condition), Some(yes)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let no = caps.get(3).map_or_else(
            || FALLBACK_NO_BRANCH.to_owned(),
            |m| clean_label(m.as_str(), CONDITION_WORDS),
        );
        found.push(Conditional {
            condition: clean_label(condition.as_str(), CONDITION_WORDS),
            yes: clean_label(yes.as_str(), CONDITION_WORDS),
            no,
        });
        spans.push(whole.range());
    }

    for caps in either_or_re().captures_iter(description) {
        let (Some(whole), Some(condition), Some(yes)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if spans.iter().any(|span| overlaps(span, &whole.range())) {
            continue;
        }
        found.push(Conditional {
            condition: clean_label(condition.as_str(), CONDITION_WORDS),
            yes: clean_label(yes.as_str(), CONDITION_WORDS),
            no: FALLBACK_NO_BRANCH.to_owned(),
        });
        spans.push(whole.range());
    }

    (found, spans)
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// The parts of `range` that no span covers.
fn uncovered(range: Range<usize>, spans: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut pieces = vec![range];
    for span in spans {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| {
                if !overlaps(span, &piece) {
                    return vec![piece];
                }
                [piece.start..span.start, span.end..piece.end]
                    .into_iter()
                    .filter(|part| part.start < part.end)
                    .collect()
            })
            .collect();
    }
    pieces
}

/// Splits the description into typed steps plus conditionals.
///
/// Text covered by a recognised conditional is not repeated as a plain step; the rest of a
/// segment that runs into a conditional still counts.
pub fn extract_workflow(description: &str) -> Workflow {
    let (conditionals, spans) = conditionals(description);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for sep in separator_re().find_iter(description) {
        segments.push(cursor..sep.start());
        cursor = sep.end();
    }
    segments.push(cursor..description.len());

    let steps = segments
        .into_iter()
        .flat_map(|range| uncovered(range, &spans))
        .filter_map(|range| {
            let text = description[range].trim().trim_end_matches('.').trim();
            if text.chars().count() <= MIN_STEP_CHARS {
                return None;
            }
            let label = clean_label(text, STEP_WORDS);
            (!label.is_empty()).then(|| Step {
                role: classify_step(&label),
                label,
            })
        })
        .collect();

    Workflow {
        steps,
        conditionals,
    }
}

/// Chains steps in order, then hangs each conditional off the previous node with `Yes`/`No`
/// branches. Later nodes continue from the `Yes` branch.
pub fn steps_plan(workflow: &Workflow) -> WorkflowPlan {
    if workflow.steps.is_empty() && workflow.conditionals.is_empty() {
        return minimal_plan();
    }

    let mut plan = WorkflowPlan::default();
    let mut previous: Option<String> = None;

    for (idx, step) in workflow.steps.iter().enumerate() {
        let id = format!("step{idx}");
        plan.add_node(id.clone(), step.label.clone(), step.role);
        if let Some(prev) = previous.as_deref() {
            plan.connect(prev, &id);
        }
        previous = Some(id);
    }

    for (idx, cond) in workflow.conditionals.iter().enumerate() {
        let cond_id = format!("cond{idx}");
        let yes_id = format!("yes{idx}");
        let no_id = format!("no{idx}");
        plan.add_node(
            cond_id.clone(),
            format!("{}?", cond.condition),
            NodeRole::Decision,
        );
        plan.add_node(yes_id.clone(), cond.yes.clone(), NodeRole::Process);
        plan.add_node(no_id.clone(), cond.no.clone(), NodeRole::Error);
        if let Some(prev) = previous.as_deref() {
            plan.connect(prev, &cond_id);
        }
        plan.branch(&cond_id, &yes_id, "Yes", EdgeTone::Positive);
        plan.branch(&cond_id, &no_id, "No", EdgeTone::Negative);
        previous = Some(yes_id);
    }

    plan
}
