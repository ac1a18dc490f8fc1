//! Command line and config file
//!
//! Settings resolve in three layers: built-in defaults, then the JSON config
//! file (`--config`, or `<config dir>/blog-admin/config.json` when it
//! exists), then command line flags.

use std::fs;
use std::path::{Path, PathBuf};

use blog_admin_core::Keybindings;
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::api::parse_base_url;
use crate::keys::{default_keybindings, RouteContext};
use crate::routes::Route;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SORT: &str = "id,asc";

/// Terminal admin for blog entries
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "blog-admin", version)]
#[command(about = "Browse, create, edit and delete blog entries over the REST API")]
pub struct Cli {
    /// Backend root URL, e.g. http://localhost:8080/
    #[arg(long)]
    pub base_url: Option<String>,

    /// Items fetched per list page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Initial sort, `property,direction`
    #[arg(long)]
    pub sort: Option<String>,

    /// Screen to open, e.g. /entity/blog-entry/3/edit
    #[arg(long)]
    pub route: Option<String>,

    /// Config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `blog_admin=debug`
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid base URL {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Contents of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
    pub keybindings: Option<Keybindings<RouteContext>>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub base_url: String,
    pub page_size: u32,
    pub sort: String,
    pub start_route: Route,
    pub keybindings: Keybindings<RouteContext>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            start_route: Route::List,
            keybindings: default_keybindings(),
        }
    }
}

impl AdminConfig {
    /// Resolve settings from the command line, reading the config file it
    /// names (or the default one, if present).
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "loading default config file");
                    Some(ConfigFile::load(&path)?)
                }
                None => None,
            },
        };
        Self::from_layers(file, cli)
    }

    /// Apply `file` then `cli` on top of the defaults.
    pub fn from_layers(file: Option<ConfigFile>, cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(file) = file {
            if let Some(base_url) = file.base_url {
                config.base_url = base_url;
            }
            if let Some(page_size) = file.page_size {
                config.page_size = page_size;
            }
            if let Some(sort) = file.sort {
                config.sort = sort;
            }
            if let Some(user) = file.keybindings {
                config.keybindings = Keybindings::merge(config.keybindings, user);
            }
        }

        if let Some(base_url) = &cli.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(page_size) = cli.page_size {
            config.page_size = page_size;
        }
        if let Some(sort) = &cli.sort {
            config.sort = sort.clone();
        }
        if let Some(route) = &cli.route {
            config.start_route = Route::parse(route);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        parse_base_url(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// `<config dir>/blog-admin/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blog-admin").join("config.json"))
}

/// `<data dir>/blog-admin/blog-admin.log`, or the temp dir when the platform
/// has no data dir.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("blog-admin"))
        .unwrap_or_else(std::env::temp_dir)
        .join("blog-admin.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_admin_core::testing::key;

    use crate::keys::{command_for, Command};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("blog-admin").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = AdminConfig::from_layers(None, &cli(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.sort, "id,asc");
        assert_eq!(config.start_route, Route::List);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: ConfigFile = serde_json::from_str(
            r#"{ "base_url": "http://blog.internal/", "page_size": 50, "sort": "title,asc" }"#,
        )
        .unwrap();
        let config = AdminConfig::from_layers(
            Some(file),
            &cli(&["--page-size", "5", "--route", "/entity/blog-entry/new"]),
        )
        .unwrap();

        assert_eq!(config.base_url, "http://blog.internal/");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.sort, "title,asc");
        assert_eq!(config.start_route, Route::New);
    }

    #[test]
    fn test_file_keybindings_merge_onto_defaults() {
        let file: ConfigFile =
            serde_json::from_str(r#"{ "keybindings": { "list": { "entry.new": ["a"] } } }"#)
                .unwrap();
        let config = AdminConfig::from_layers(Some(file), &cli(&[])).unwrap();

        let kb = &config.keybindings;
        assert_eq!(
            command_for(kb, &key("a"), RouteContext::List),
            Some(Command::EntryNew)
        );
        assert_eq!(
            command_for(kb, &key("d"), RouteContext::List),
            Some(Command::EntryDelete)
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            AdminConfig::from_layers(None, &cli(&["--page-size", "0"])),
            Err(ConfigError::InvalidPageSize)
        ));
        assert!(matches!(
            AdminConfig::from_layers(None, &cli(&["--base-url", "::nope"])),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let missing = std::env::temp_dir().join("blog-admin-no-such-config.json");
        let result = AdminConfig::resolve(&Cli {
            config: Some(missing),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("blog-admin-test-{}.json", std::process::id()));
        fs::write(&path, r#"{ "sort": "id,desc" }"#).unwrap();
        let file = ConfigFile::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(file.sort.as_deref(), Some("id,desc"));
    }
}
