// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TOML configuration.
//!
//! Search order for [`load_config`]:
//! 1. explicit path (must exist)
//! 2. `diagram-maker/config.toml` relative to the working directory
//! 3. the platform config directory (`config.toml`)
//! 4. built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generate::{CompletionConfig, CompletionGenerator, GeneratorBackend, HeuristicGenerator};
use crate::render::Transport;
use crate::route::{CategoryRouter, SequenceNotation};

pub const DEFAULT_RENDERER_URL: &str = "https://kroki.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

const LOCAL_CONFIG: &str = "diagram-maker/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub renderer: RendererConfig,
    pub generator: GeneratorConfig,
    pub router: RouterConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub base_url: String,
    pub transport: Transport,
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RENDERER_URL.to_owned(),
            transport: Transport::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Heuristic,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub backend: BackendKind,
    pub timeout_secs: u64,
    pub remote: RemoteConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            remote: RemoteConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_owned(),
            model: DEFAULT_COMPLETION_MODEL.to_owned(),
            api_key_env: DEFAULT_API_KEY_ENV.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    pub sequence_notation: SequenceNotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.renderer.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("renderer.base_url must not be empty".to_owned()));
        }
        if self.renderer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "renderer.timeout_secs must be positive".to_owned(),
            ));
        }
        if self.generator.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "generator.timeout_secs must be positive".to_owned(),
            ));
        }
        if self.generator.backend == BackendKind::Remote
            && self.generator.remote.endpoint.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "generator.remote.endpoint must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn router(&self) -> CategoryRouter {
        CategoryRouter::new(self.router.sequence_notation)
    }

    /// Builds the configured generator. The remote API key is read from the environment here.
    pub fn generator_backend(&self) -> GeneratorBackend {
        match self.generator.backend {
            BackendKind::Heuristic => GeneratorBackend::Heuristic(HeuristicGenerator),
            BackendKind::Remote => {
                let remote = &self.generator.remote;
                let api_key = std::env::var(&remote.api_key_env)
                    .ok()
                    .filter(|key| !key.is_empty());
                if api_key.is_none() {
                    debug!(variable = remote.api_key_env.as_str(); "no API key in environment");
                }
                GeneratorBackend::Completion(CompletionGenerator::new(CompletionConfig {
                    endpoint: remote.endpoint.clone(),
                    model: remote.model.clone(),
                    api_key,
                    timeout: self.generator.timeout(),
                }))
            }
        }
    }
}

pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        info!(path = path.display().to_string(); "loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        info!(path = local.display().to_string(); "loading configuration from local path");
        return load_config_file(local);
    }

    if let Some(dirs) = ProjectDirs::from("com", "diagram-maker", "diagram-maker") {
        let system = dirs.config_dir().join("config.toml");
        if system.exists() {
            info!(path = system.display().to_string(); "loading configuration from system path");
            return load_config_file(&system);
        }
        debug!(path = system.display().to_string(); "system configuration file not found");
    } else {
        debug!("could not determine platform-specific config directory");
    }

    debug!("no configuration file found, using defaults");
    Ok(AppConfig::default())
}

pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|err| match err {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content).map_err(|err| ConfigError::Parse {
        path: PathBuf::from("<inline>"),
        message: err.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::time::Duration;

    use super::{load_config, parse_config, AppConfig, BackendKind, ConfigError};
    use crate::generate::GeneratorBackend;
    use crate::model::NotationKind;
    use crate::render::Transport;
    use crate::route::SequenceNotation;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").expect("config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.renderer.base_url, "https://kroki.io");
        assert_eq!(config.renderer.timeout(), Duration::from_secs(30));
        assert_eq!(config.generator.backend, BackendKind::Heuristic);
    }

    #[test]
    fn parses_every_section() {
        let config = parse_config(
            r#"
[renderer]
base_url = "http://localhost:8000"
transport = "get"
timeout_secs = 5

[generator]
backend = "remote"
timeout_secs = 12

[generator.remote]
model = "local-model"
api_key_env = "DIAGRAM_MAKER_TEST_KEY_UNSET"

[router]
sequence_notation = "plantuml"

[server]
host = "0.0.0.0"
port = 9000
"#,
        )
        .expect("config");
        assert_eq!(config.renderer.transport, Transport::Get);
        assert_eq!(config.renderer.timeout(), Duration::from_secs(5));
        assert_eq!(config.generator.timeout(), Duration::from_secs(12));
        assert_eq!(config.generator.remote.model, "local-model");
        assert_eq!(config.router.sequence_notation, SequenceNotation::PlantUml);
        assert_eq!(
            config.router().resolve("sequence").notation,
            NotationKind::PlantUml
        );
        assert_eq!(config.server.port, 9000);
        assert!(matches!(config.generator_backend(), GeneratorBackend::Completion(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("[renderer]\nbase_uri = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn zero_timeouts_are_invalid() {
        let err = parse_config("[renderer]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(path) if path == missing));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[server]\nport = 7070").expect("write");
        let config = load_config(Some(file.path())).expect("config");
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
