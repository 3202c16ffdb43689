// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Exposes the session operations (generate, export, state, reset, title) and category
//! resolution as tools, over stdio or streamable HTTP.

mod server;
mod types;

pub use server::{DiagramMakerMcp, McpRegistry, DEFAULT_SESSION_ID};
