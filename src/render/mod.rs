// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering dependency: diagram source in, SVG or PNG out.

pub mod kroki;

use std::future::Future;

use crate::error::RenderError;
use crate::model::{GeneratedSource, OutputFormat, RenderedArtifact};

pub use kroki::{encode_source, KrokiRenderer, Transport};

pub trait Renderer: Send + Sync {
    fn render(
        &self,
        source: &GeneratedSource,
        format: OutputFormat,
    ) -> impl Future<Output = Result<RenderedArtifact, RenderError>> + Send;
}
