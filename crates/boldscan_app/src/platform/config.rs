//! RON config file plus CLI and environment overrides.
//!
//! Precedence for every setting: command-line flag, then environment (API key only),
//! then the config file, then built-in defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use boldscan_core::PanelOptions;
use boldscan_engine::{EngineConfig, FetchSettings, ResolverSettings};
use boldscan_logging::scan_info;
use serde::{Deserialize, Serialize};

use super::args::Args;

pub const DEFAULT_CONFIG_FILE: &str = "boldscan.ron";
pub const API_KEY_ENV: &str = "BOLDSCAN_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enrich_with_video: bool,
    pub max_concurrent_lookups: usize,
    pub copy_ack_ms: u64,
    pub fallback_video_id: String,
    pub api_endpoint: String,
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    pub page_timeout_ms: u64,
    pub max_page_bytes: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        let panel = PanelOptions::default();
        let resolver = ResolverSettings::default();
        let fetch = FetchSettings::default();
        Self {
            enrich_with_video: panel.enrich_with_video,
            max_concurrent_lookups: panel.max_concurrent_lookups,
            copy_ack_ms: panel.copy_ack.as_millis() as u64,
            fallback_video_id: resolver.fallback_video_id,
            api_endpoint: resolver.endpoint,
            api_key: None,
            request_timeout_ms: resolver.request_timeout.as_millis() as u64,
            page_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_page_bytes: fetch.max_bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Everything the app needs to start a session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub panel: PanelOptions,
    pub engine: EngineConfig,
}

/// Reads `explicit`, or `./boldscan.ron` if it exists. An explicit path must exist.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    scan_info!("loaded config from {:?}", path);
    Ok(config)
}

pub fn resolve(file: FileConfig, args: &Args, env_api_key: Option<String>) -> Settings {
    let api_key = [args.api_key.clone(), env_api_key, file.api_key]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty());

    let panel = PanelOptions {
        enrich_with_video: args.enrich || file.enrich_with_video,
        max_concurrent_lookups: args
            .concurrency
            .unwrap_or(file.max_concurrent_lookups)
            .max(1),
        copy_ack: Duration::from_millis(file.copy_ack_ms),
    };

    let engine = EngineConfig {
        fetch: FetchSettings {
            request_timeout: Duration::from_millis(file.page_timeout_ms),
            max_bytes: file.max_page_bytes,
            ..FetchSettings::default()
        },
        resolver: ResolverSettings {
            endpoint: file.api_endpoint,
            api_key,
            fallback_video_id: args
                .fallback_id
                .clone()
                .unwrap_or(file.fallback_video_id),
            request_timeout: Duration::from_millis(file.request_timeout_ms),
        },
    };

    Settings { panel, engine }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("boldscan").chain(extra.iter().copied()))
    }

    #[test]
    fn explicit_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("absent.ron");
        assert!(matches!(
            load(Some(&explicit)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boldscan.ron");
        fs::write(
            &path,
            r#"(enrich_with_video: true, max_concurrent_lookups: 4, api_key: Some("file-key"))"#,
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(
            config,
            FileConfig {
                enrich_with_video: true,
                max_concurrent_lookups: 4,
                api_key: Some("file-key".to_string()),
                ..FileConfig::default()
            }
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        fs::write(&path, "(enrich_with_video: maybe)").unwrap();
        assert!(matches!(load(Some(&path)), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn api_key_precedence_is_flag_env_file() {
        let file = FileConfig {
            api_key: Some("file".to_string()),
            ..FileConfig::default()
        };

        let flag = resolve(file.clone(), &args(&["--api-key", "flag"]), Some("env".into()));
        assert_eq!(flag.engine.resolver.api_key.as_deref(), Some("flag"));

        let env = resolve(file.clone(), &args(&[]), Some("env".into()));
        assert_eq!(env.engine.resolver.api_key.as_deref(), Some("env"));

        let from_file = resolve(file, &args(&[]), None);
        assert_eq!(from_file.engine.resolver.api_key.as_deref(), Some("file"));
    }

    #[test]
    fn blank_keys_are_skipped() {
        let settings = resolve(
            FileConfig::default(),
            &args(&["--api-key", "  "]),
            Some(String::new()),
        );
        assert_eq!(settings.engine.resolver.api_key, None);
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            max_concurrent_lookups: 4,
            fallback_video_id: "from-file".to_string(),
            page_timeout_ms: 1_500,
            ..FileConfig::default()
        };
        let settings = resolve(
            file,
            &args(&["--enrich", "--concurrency", "0", "--fallback-id", "from-flag"]),
            None,
        );
        assert!(settings.panel.enrich_with_video);
        assert_eq!(settings.panel.max_concurrent_lookups, 1);
        assert_eq!(settings.engine.resolver.fallback_video_id, "from-flag");
        assert_eq!(
            settings.engine.fetch.request_timeout,
            Duration::from_millis(1_500)
        );
    }
}
