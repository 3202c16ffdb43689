// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram Maker: description → diagram code → rendered SVG/PNG.
//!
//! A [`route::CategoryRouter`] picks the notation, a [`generate::Generator`] writes the code,
//! a [`render::Renderer`] (Kroki) draws it and a [`session::Session`] orchestrates the flow and
//! holds the result for [`export`]. The HTTP API ([`api`]) and MCP server ([`mcp`]) are thin
//! adapters over sessions.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod mcp;
pub mod model;
pub mod render;
pub mod route;
pub mod session;
