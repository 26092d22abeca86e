//! Configuration loading

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::install::InstallLayout;

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/mcp-hub/
///
/// Returns the path if found, None otherwise.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    // Walk up the directory tree
    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break, // Reached filesystem root
        }
    }

    // Fallback: check global config
    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("mcp-hub").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Top-level hub configuration (from .hub.toml)
#[derive(Debug, Default, Deserialize)]
pub struct HubFileConfig {
    #[serde(default)]
    pub hub: HubSection,
    #[serde(default)]
    pub startup: StartupSection,
    #[serde(default)]
    pub health: HealthSection,
}

/// Hub endpoint and filesystem section
#[derive(Debug, Deserialize)]
pub struct HubSection {
    /// Host the hub binds to. The port varies between deployments, so both
    /// live in configuration rather than constants.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Install root override. Defaults to ~/.mcp-hub.
    pub install_root: Option<PathBuf>,
    /// Bundled payload override. Defaults to payload/ next to the executable.
    pub payload_dir: Option<PathBuf>,
}

/// Startup and shutdown timing section
#[derive(Debug, Deserialize)]
pub struct StartupSection {
    /// Total budget for the post-launch readiness poll, in seconds.
    #[serde(default = "default_startup_budget")]
    pub budget_secs: u64,
    /// How long to wait after a graceful stop signal before killing.
    #[serde(default = "default_stop_grace")]
    pub stop_grace_secs: u64,
}

/// Health probe section
#[derive(Debug, Deserialize)]
pub struct HealthSection {
    /// Per-attempt probe timeout, in seconds.
    #[serde(default = "default_health_timeout")]
    pub timeout_secs: u64,
    /// Ordered candidate paths; the first sub-500 response wins.
    #[serde(default = "default_health_paths")]
    pub paths: Vec<String>,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7423
}

fn default_startup_budget() -> u64 {
    10
}

fn default_stop_grace() -> u64 {
    5
}

fn default_health_timeout() -> u64 {
    3
}

fn default_health_paths() -> Vec<String> {
    ["/health", "/", "/docs", "/status"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for HubSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            install_root: None,
            payload_dir: None,
        }
    }
}

impl Default for StartupSection {
    fn default() -> Self {
        Self {
            budget_secs: default_startup_budget(),
            stop_grace_secs: default_stop_grace(),
        }
    }
}

impl Default for HealthSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_health_timeout(),
            paths: default_health_paths(),
        }
    }
}

impl HubFileConfig {
    /// Load config from .hub.toml
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd looking for .hub.toml
    /// 2. Check ~/.config/mcp-hub/.hub.toml (global fallback)
    /// 3. Fall back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(".hub.toml") {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No .hub.toml found, using defaults");
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HubFileConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Command-line overrides applied on top of the file config.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub install_root: Option<PathBuf>,
}

/// Resolved runtime settings shared by every component.
#[derive(Debug)]
pub struct HubSettings {
    pub host: String,
    pub port: u16,
    pub layout: InstallLayout,
    pub payload_dir: PathBuf,
    pub startup_budget: Duration,
    pub stop_grace: Duration,
    pub health_timeout: Duration,
    pub health_paths: Vec<String>,
}

impl HubSettings {
    /// Resolve settings with priority: CLI/env > config file > defaults.
    pub fn resolve(file: HubFileConfig, overrides: Overrides) -> Arc<Self> {
        let host = overrides.host.unwrap_or(file.hub.host);
        let port = overrides.port.unwrap_or(file.hub.port);
        let root = overrides
            .install_root
            .or(file.hub.install_root)
            .unwrap_or_else(default_install_root);
        let payload_dir = file.hub.payload_dir.unwrap_or_else(default_payload_dir);

        Arc::new(Self {
            host,
            port,
            layout: InstallLayout::new(root),
            payload_dir,
            startup_budget: Duration::from_secs(file.startup.budget_secs),
            stop_grace: Duration::from_secs(file.startup.stop_grace_secs),
            health_timeout: Duration::from_secs(file.health.timeout_secs),
            health_paths: file.health.paths,
        })
    }

    /// Base URL of the hub endpoint.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// URL consumers connect to for MCP traffic.
    pub fn mcp_url(&self) -> String {
        format!("{}/mcp", self.base_url())
    }

    /// URL of the hub's API docs page.
    pub fn docs_url(&self) -> String {
        format!("{}/docs", self.base_url())
    }
}

fn default_install_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".mcp-hub")
}

fn default_payload_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("payload")
}
