//! Configuration loading for `drover.toml`
//!
//! The config file describes the application being deployed and the remote
//! host the tasks run against. Every value can be overridden from the
//! command line; required values missing from both places surface as
//! `DroverError::MissingSetting`.
//!
//! ```toml
//! [app]
//! name = "shop"
//! host_header = "shop.example.com"
//! release_path = "/srv/shop/current"
//! shared_path = "/srv/shop/shared"
//!
//! [remote]
//! host = "deploy@web1"
//!
//! [paths]
//! local_config_dir = "config"
//! link_dir = "/var/www/unicorn"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::DeployContext;
use crate::error::{DroverError, DroverResult};

/// Application section of drover.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub host_header: Option<String>,

    #[serde(default)]
    pub release_path: Option<String>,

    #[serde(default)]
    pub shared_path: Option<String>,
}

/// Remote host section of drover.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// SSH destination ("host" or "user@host")
    #[serde(default)]
    pub host: Option<String>,
}

/// Local and remote path conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Local directory the rendered configs are written into
    #[serde(default = "default_local_config_dir")]
    pub local_config_dir: PathBuf,

    /// Remote directory the proxy includes per-application configs from
    #[serde(default = "default_link_dir")]
    pub link_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            local_config_dir: default_local_config_dir(),
            link_dir: default_link_dir(),
        }
    }
}

fn default_local_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_link_dir() -> String {
    "/var/www/unicorn".to_string()
}

/// Top-level drover.toml structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DroverResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DroverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| DroverError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `path` if it exists, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> DroverResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Command-line overrides applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub app: Option<String>,
    pub host_header: Option<String>,
    pub release_path: Option<String>,
    pub shared_path: Option<String>,
    pub host: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub context: DeployContext,
    /// SSH destination for the remote transport
    pub host: String,
    pub local_config_dir: PathBuf,
    pub link_dir: String,
}

impl Settings {
    /// Merge a loaded config with CLI overrides, rejecting missing values
    pub fn resolve(config: Config, overrides: Overrides) -> DroverResult<Self> {
        let host_value = overrides.host.clone().or_else(|| config.remote.host.clone());
        let local_config_dir = config.paths.local_config_dir.clone();
        let link_dir = config.paths.link_dir.clone();
        let context = resolve_context(config, overrides)?;
        let host = require(host_value, "remote.host", "host")?;

        Ok(Self {
            context,
            host,
            local_config_dir,
            link_dir,
        })
    }
}

/// Resolve just the deployment context, for tasks with no remote side
pub fn resolve_context(config: Config, overrides: Overrides) -> DroverResult<DeployContext> {
    let app = require(overrides.app.or(config.app.name), "app.name", "app")?;
    let host_header = require(
        overrides.host_header.or(config.app.host_header),
        "app.host_header",
        "host-header",
    )?;
    let release_path = require(
        overrides.release_path.or(config.app.release_path),
        "app.release_path",
        "release-path",
    )?;
    let shared_path = require(
        overrides.shared_path.or(config.app.shared_path),
        "app.shared_path",
        "shared-path",
    )?;
    Ok(DeployContext::new(
        app,
        release_path,
        shared_path,
        host_header,
    ))
}

fn require(
    value: Option<String>,
    key: &'static str,
    flag: &'static str,
) -> DroverResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DroverError::MissingSetting { key, flag }),
    }
}
