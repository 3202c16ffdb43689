// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turning a rendered diagram into a downloadable file.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ExportError;
use crate::model::{GeneratedSource, OutputFormat, RenderedArtifact};
use crate::render::Renderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportData {
    Text(String),
    Binary(Vec<u8>),
}

impl ExportData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub data: ExportData,
    pub mime_type: &'static str,
}

/// Lower-case ASCII slug: alphanumerics kept, every other run collapsed into a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// `<slug>.<ext>` when the title slugs to something, otherwise `diagram-<millis>.<ext>`.
pub fn export_filename(title: Option<&str>, format: OutputFormat, stamp_millis: u128) -> String {
    let slug = title.map(slugify).unwrap_or_default();
    if slug.is_empty() {
        format!("diagram-{stamp_millis}.{}", format.extension())
    } else {
        format!("{slug}.{}", format.extension())
    }
}

/// Produces the file for `format`.
///
/// SVG reuses the held artifact and makes no network call. PNG makes exactly one fresh render
/// call with the retained source.
pub async fn export_artifact<R: Renderer>(
    renderer: &R,
    source: &GeneratedSource,
    artifact: &RenderedArtifact,
    format: OutputFormat,
    filename: String,
) -> Result<ExportedFile, ExportError> {
    let data = match format {
        OutputFormat::Svg => match artifact {
            RenderedArtifact::Svg(markup) => ExportData::Text(markup.clone()),
            RenderedArtifact::Raster(_) => {
                return Err(ExportError::UnsupportedFormat {
                    notation: source.notation(),
                    format,
                });
            }
        },
        OutputFormat::Png => {
            if !source.notation().supports(format) {
                return Err(ExportError::UnsupportedFormat {
                    notation: source.notation(),
                    format,
                });
            }
            let rendered = renderer.render(source, format).await;
            match rendered.map_err(ExportError::Render)? {
                RenderedArtifact::Raster(bytes) => ExportData::Binary(bytes),
                RenderedArtifact::Svg(markup) => ExportData::Binary(markup.into_bytes()),
            }
        }
    };
    Ok(ExportedFile {
        filename,
        data,
        mime_type: format.mime_type(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{export_filename, slugify};
    use crate::model::OutputFormat;

    #[rstest]
    #[case("Quarterly Approval Flow", "quarterly-approval-flow")]
    #[case("  --Hello, World!--  ", "hello-world")]
    #[case("Ünïcode only ✓", "n-code-only")]
    #[case("???", "")]
    fn slugs_are_lowercase_ascii(#[case] title: &str, #[case] slug: &str) {
        assert_eq!(slugify(title), slug);
    }

    #[test]
    fn titled_exports_use_the_slug() {
        assert_eq!(
            export_filename(Some("Order Flow"), OutputFormat::Png, 1_700_000_000_000),
            "order-flow.png"
        );
    }

    #[test]
    fn untitled_exports_use_a_timestamp() {
        assert_eq!(
            export_filename(None, OutputFormat::Svg, 1_700_000_000_000),
            "diagram-1700000000000.svg"
        );
        assert_eq!(
            export_filename(Some("!!!"), OutputFormat::Svg, 7),
            "diagram-7.svg"
        );
    }
}
