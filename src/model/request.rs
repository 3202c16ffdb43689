// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::error::ValidationError;

/// A validated "turn this text into a diagram" request.
///
/// The category is kept as the caller typed it; the router decides what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    description: String,
    category: String,
}

impl GenerationRequest {
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::BlankDescription);
        }
        Ok(Self {
            description,
            category: category.into(),
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}
