// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyword rule tables.
//!
//! Both tables are ordered and data-only; evaluation happens once per generation and never looks
//! at the output notation.

use super::style::NodeRole;

/// A workflow feature signalled by the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Review,
    Decision,
    Completion,
}

#[derive(Debug, Clone, Copy)]
pub struct CueRule {
    pub keywords: &'static [&'static str],
    pub cue: Cue,
}

pub const CUE_RULES: &[CueRule] = &[
    CueRule {
        keywords: &["review", "check"],
        cue: Cue::Review,
    },
    CueRule {
        keywords: &["approve", "decision", "reject"],
        cue: Cue::Decision,
    },
    CueRule {
        keywords: &["complete", "finish"],
        cue: Cue::Completion,
    },
];

/// Cues present in one description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CueSet {
    pub review: bool,
    pub decision: bool,
    pub completion: bool,
}

impl CueSet {
    pub fn is_empty(&self) -> bool {
        !(self.review || self.decision || self.completion)
    }

    fn insert(&mut self, cue: Cue) {
        match cue {
            Cue::Review => self.review = true,
            Cue::Decision => self.decision = true,
            Cue::Completion => self.completion = true,
        }
    }
}

/// Substring match on the lower-cased description, so "reviewer" and "approved" count.
pub fn detect_cues(description: &str) -> CueSet {
    let lower = description.to_lowercase();
    let mut cues = CueSet::default();
    for rule in CUE_RULES {
        if rule.keywords.iter().any(|keyword| lower.contains(keyword)) {
            cues.insert(rule.cue);
        }
    }
    cues
}

#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub prefixes: &'static [&'static str],
    pub role: NodeRole,
}

impl RoleRule {
    fn matches(&self, lower: &str) -> bool {
        self.prefixes.iter().any(|p| starts_a_word(lower, p))
    }
}

/// First matching rule wins.
pub const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        prefixes: &["start", "begin", "login", "log in", "submit"],
        role: NodeRole::Start,
    },
    RoleRule {
        prefixes: &["end", "complete", "finish", "logout", "log out", "exit"],
        role: NodeRole::End,
    },
    RoleRule {
        prefixes: &["validat", "check", "verif", "review"],
        role: NodeRole::Decision,
    },
    RoleRule {
        prefixes: &["error", "fail", "reject", "deny", "denied"],
        role: NodeRole::Error,
    },
    RoleRule {
        prefixes: &["database", "store", "save", "archive"],
        role: NodeRole::Storage,
    },
    RoleRule {
        prefixes: &["process", "execute", "run", "perform"],
        role: NodeRole::Process,
    },
];

/// Classifies a free-form step by keywords that start a word ("send" is not an end step).
pub fn classify_step(step: &str) -> NodeRole {
    let lower = step.to_lowercase();
    ROLE_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map_or(NodeRole::Process, |rule| rule.role)
}

fn starts_a_word(haystack: &str, prefix: &str) -> bool {
    haystack.match_indices(prefix).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}
