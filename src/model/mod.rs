// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Everything here is request-scoped: requests, generated source and rendered artifacts live in a
//! [`crate::session::Session`] until the next generation replaces them.

pub mod ids;
pub mod notation;
pub mod request;
pub mod source;

pub use ids::{Id, IdError, SessionId};
pub use notation::{NotationKind, OutputFormat, ParseOutputFormatError};
pub use request::GenerationRequest;
pub use source::{GeneratedSource, RenderedArtifact};
