// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Declarative per-role node styling shared by every notation.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Start,
    End,
    Process,
    Decision,
    Error,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Oval,
    Diamond,
    RoundedBox,
    Cylinder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fill: &'static str,
    pub border: &'static str,
    pub font: &'static str,
}

const TERMINAL: Palette = Palette {
    fill: "#dcfce7",
    border: "#16a34a",
    font: "#14532d",
};
const PROCESS: Palette = Palette {
    fill: "#e0f2fe",
    border: "#0284c7",
    font: "#0c4a6e",
};
const DECISION: Palette = Palette {
    fill: "#fef3c7",
    border: "#f59e0b",
    font: "#78350f",
};
const ERROR: Palette = Palette {
    fill: "#fee2e2",
    border: "#dc2626",
    font: "#991b1b",
};
const STORAGE: Palette = Palette {
    fill: "#e0e7ff",
    border: "#4f46e5",
    font: "#3730a3",
};

pub const EDGE_COLOR: &str = "#64748b";
pub const FONT_NAME: &str = "Arial";

impl NodeRole {
    pub const ALL: [NodeRole; 6] = [
        Self::Start,
        Self::End,
        Self::Process,
        Self::Decision,
        Self::Error,
        Self::Storage,
    ];

    pub fn shape(self) -> Shape {
        match self {
            Self::Start | Self::End => Shape::Oval,
            Self::Decision => Shape::Diamond,
            Self::Process | Self::Error => Shape::RoundedBox,
            Self::Storage => Shape::Cylinder,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Start | Self::End => TERMINAL,
            Self::Process => PROCESS,
            Self::Decision => DECISION,
            Self::Error => ERROR,
            Self::Storage => STORAGE,
        }
    }

    /// Class name used by notations with named style classes (Mermaid `classDef`).
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Start => "startStyle",
            Self::End => "endStyle",
            Self::Process => "processStyle",
            Self::Decision => "decisionStyle",
            Self::Error => "errorStyle",
            Self::Storage => "storageStyle",
        }
    }
}

/// Colour of a connector, mostly for labelled decision branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeTone {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl EdgeTone {
    pub fn color(self) -> &'static str {
        match self {
            Self::Neutral => EDGE_COLOR,
            Self::Positive => "#16a34a",
            Self::Negative => "#dc2626",
        }
    }
}
