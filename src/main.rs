// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram Maker CLI entrypoint.
//!
//! `diagram-maker serve` serves the HTTP API at `http://127.0.0.1:<port>/api/` and MCP over
//! streamable HTTP at `/mcp`. Use `diagram-maker mcp` to run MCP over stdio instead.

use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, info, LevelFilter};

use diagram_maker::cli::{self, Args};

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "starting diagram-maker");
    debug!(args:?; "parsed arguments");

    if let Err(err) = cli::run(&args) {
        eprintln!("diagram-maker: {err}");
        process::exit(1);
    }
}
