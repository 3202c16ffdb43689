// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line interface.
//!
//! `serve` runs the HTTP API with MCP nested at `/mcp`; `mcp` speaks MCP over stdio. `generate`
//! prints diagram code and, with `--output`, renders and writes an export file. `resolve` prints
//! the route a diagram type takes.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, info};
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use thiserror::Error;

use crate::config::{load_config, AppConfig, ConfigError};
use crate::error::{ExportError, FlowError};
use crate::generate::Generator;
use crate::mcp::{DiagramMakerMcp, McpRegistry};
use crate::model::{GenerationRequest, OutputFormat};
use crate::render::KrokiRenderer;
use crate::session::{GenerateOutcome, Session, SessionRegistry, Timeouts};

/// Natural-language diagram generator with Kroki rendering.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API, with MCP over streamable HTTP at `/mcp`
    Serve(ServeArgs),
    /// Serve MCP over stdio
    Mcp,
    /// Generate diagram code for a description
    Generate(GenerateArgs),
    /// Show the notation and template a diagram type resolves to
    Resolve {
        /// Diagram family or notation name
        diagram_type: String,
    },
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// Overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Overrides `server.port` (0 = ephemeral)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Free-text description of the diagram
    pub description: String,

    /// Diagram family or notation name
    #[arg(short = 't', long = "type", default_value = "flowchart")]
    pub diagram_type: String,

    /// Render and write the export here (a directory gets a generated filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format used with `--output`
    #[arg(short, long, default_value = "svg")]
    pub format: OutputFormat,

    /// Title used for the generated export filename
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("HTTP server error: {0}")]
    Http(#[source] io::Error),

    #[error("MCP server error: {0}")]
    Mcp(#[from] rmcp::RmcpError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn timeouts(config: &AppConfig) -> Timeouts {
    Timeouts {
        generation: config.generator.timeout(),
        rendering: config.renderer.timeout(),
    }
}

/// One registry shared by the HTTP API and MCP.
pub fn build_registry(config: &AppConfig) -> Arc<McpRegistry> {
    Arc::new(SessionRegistry::new(
        Arc::new(config.generator_backend()),
        Arc::new(KrokiRenderer::from_config(&config.renderer)),
        config.router(),
        timeouts(config),
    ))
}

pub fn run(args: &Args) -> Result<(), ServeError> {
    let config = load_config(args.config.as_deref())?;
    debug!(config:?; "loaded configuration");

    if let Command::Resolve { diagram_type } = &args.command {
        let route = config.router().resolve(diagram_type);
        println!(
            "{} {} {}",
            route.category,
            route.notation,
            route.render_path_segment()
        );
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ServeError::Runtime)?;

    match &args.command {
        Command::Serve(serve_args) => runtime.block_on(serve(&config, serve_args)),
        Command::Mcp => runtime.block_on(async {
            DiagramMakerMcp::new(build_registry(&config))
                .serve_stdio()
                .await?;
            Ok::<(), ServeError>(())
        }),
        Command::Generate(generate_args) => runtime.block_on(generate(&config, generate_args)),
        Command::Resolve { .. } => Ok(()),
    }
}

async fn serve(config: &AppConfig, args: &ServeArgs) -> Result<(), ServeError> {
    let host = args.host
        .clone()
        .unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|source| ServeError::Bind {
            addr: format!("{host}:{port}"),
            source,
        })?;
    let addr = listener.local_addr().map_err(ServeError::Http)?;

    let registry = build_registry(config);
    let mcp_config = StreamableHttpServerConfig {
        stateful_mode: true,
        ..StreamableHttpServerConfig::default()
    };
    let shutdown_token = mcp_config.cancellation_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = {
        let mcp = DiagramMakerMcp::new(registry.clone());
        StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, mcp_config)
    };
    let app = crate::api::router(registry).nest_service("/mcp", mcp_service);

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
        }
        signal_token.cancel();
    });

    info!(address = addr.to_string(); "serving HTTP API at /api and MCP at /mcp");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_token.cancelled().await;
        })
        .await
        .map_err(ServeError::Http)
}

async fn generate(config: &AppConfig, args: &GenerateArgs) -> Result<(), ServeError> {
    let Some(output) = &args.output else {
        let request = GenerationRequest::new(args.description.clone(), args.diagram_type.clone())
            .map_err(FlowError::from)?;
        let route = config.router().resolve(request.category());
        let source = config
            .generator_backend()
            .generate(&request, &route)
            .await
            .map_err(FlowError::from)?;
        println!("{}", source.code());
        return Ok(());
    };

    let session = Session::with_options(
        Arc::new(config.generator_backend()),
        Arc::new(KrokiRenderer::from_config(&config.renderer)),
        config.router(),
        timeouts(config),
    );
    let outcome = session
        .generate(&args.description, &args.diagram_type)
        .await?;
    if let GenerateOutcome::Ready { source, .. } = outcome {
        println!("{}", source.code());
    }
    session.set_title(args.title.clone());

    let file = session.export(args.format).await?;
    let path = if output.is_dir() {
        output.join(&file.filename)
    } else {
        output.clone()
    };
    std::fs::write(&path, file.data.as_bytes()).map_err(|source| ServeError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = path.display().to_string(), mime = file.mime_type; "wrote export");
    Ok(())
}
