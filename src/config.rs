use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sections::SectionDefault;

pub const SERVER_ENV: &str = "ISSUEDECK_SERVER";
const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
const DEFAULT_ISSUES_PATH: &str = "/get_csv_data";
const DEFAULT_CHAT_PATH: &str = "/chat";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub issues_path: String,
    pub chat_path: String,
    pub theme: Option<String>,
    pub sections: SectionDefault,
    pub request_timeout_secs: Option<u64>,
    pub keys: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            issues_path: DEFAULT_ISSUES_PATH.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            theme: None,
            sections: SectionDefault::default(),
            request_timeout_secs: None,
            keys: HashMap::new(),
        }
    }
}

/// Fully resolved URLs for the two server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub issues_url: String,
    pub chat_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Reads the config file (defaults when absent) and applies the server
    /// override from the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path())?;
        if let Ok(server) = env::var(SERVER_ENV)
            && !server.trim().is_empty()
        {
            debug!(server = %server, "server overridden from environment");
            config.server = server;
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn set_server(&mut self, server: Option<String>) {
        if let Some(server) = server {
            self.server = server;
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            issues_url: join_url(&self.server, &self.issues_path),
            chat_url: join_url(&self.server, &self.chat_path),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn config_path() -> PathBuf {
    config_dir().join("issuedeck").join("config.toml")
}

fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

pub fn state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("issuedeck")
}

fn xdg_dir(variable: &str, home_fallback: &str) -> PathBuf {
    if let Ok(dir) = env::var(variable)
        && !dir.is_empty()
    {
        return Path::new(&dir).to_path_buf();
    }

    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(home_fallback);
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::{Config, join_url};
    use crate::sections::SectionDefault;
    use std::time::Duration;

    #[test]
    fn parses_partial_config_over_defaults() {
        let input = r#"
            server = "https://triage.internal:8443/"
            sections = "collapsed"
            request_timeout_secs = 90

            [keys]
            next_issue = "n"
        "#;

        let config: Config = toml::from_str(input).expect("parse config");
        assert_eq!(config.sections, SectionDefault::Collapsed);
        assert_eq!(config.keys.get("next_issue").map(String::as_str), Some("n"));

        let endpoints = config.endpoints();
        assert_eq!(endpoints.issues_url, "https://triage.internal:8443/get_csv_data");
        assert_eq!(endpoints.chat_url, "https://triage.internal:8443/chat");
        assert_eq!(endpoints.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").expect("parse config");
        assert_eq!(config.server, "http://127.0.0.1:5000");
        assert_eq!(config.sections, SectionDefault::Expanded);
        assert_eq!(config.endpoints().timeout, None);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load_from(std::path::Path::new("/nonexistent/issuedeck.toml"))
            .expect("defaults");
        assert_eq!(config.chat_path, "/chat");
    }

    #[test]
    fn join_url_handles_slashes_and_absolute_paths() {
        assert_eq!(join_url("http://h:1", "chat"), "http://h:1/chat");
        assert_eq!(join_url("http://h:1/", "/chat"), "http://h:1/chat");
        assert_eq!(
            join_url("http://h:1", "https://other/issues.json"),
            "https://other/issues.json"
        );
    }

    #[test]
    fn cli_server_wins() {
        let mut config = Config::default();
        config.set_server(Some("http://cli:1".to_string()));
        config.set_server(None);
        assert_eq!(config.server, "http://cli:1");
    }
}
