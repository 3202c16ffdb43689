// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::notation::NotationKind;

/// Diagram source code in a specific notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    notation: NotationKind,
    code: String,
}

impl GeneratedSource {
    pub fn new(notation: NotationKind, code: impl Into<String>) -> Self {
        Self {
            notation,
            code: code.into(),
        }
    }

    pub fn notation(&self) -> NotationKind {
        self.notation
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

/// Output of the rendering service for one [`GeneratedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedArtifact {
    Svg(String),
    Raster(Vec<u8>),
}

impl RenderedArtifact {
    pub fn as_svg(&self) -> Option<&str> {
        match self {
            Self::Svg(markup) => Some(markup),
            Self::Raster(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Svg(markup) => markup.as_bytes(),
            Self::Raster(bytes) => bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RenderedArtifact;

    #[test]
    fn svg_artifact_exposes_markup_and_bytes() {
        let artifact = RenderedArtifact::Svg("<svg/>".to_owned());
        assert_eq!(artifact.as_svg(), Some("<svg/>"));
        assert_eq!(artifact.as_bytes(), b"<svg/>");
    }

    #[test]
    fn raster_artifact_has_no_markup() {
        let artifact = RenderedArtifact::Raster(vec![0x89, b'P', b'N', b'G']);
        assert_eq!(artifact.as_svg(), None);
        assert_eq!(artifact.as_bytes(), [0x89, b'P', b'N', b'G']);
    }
}
