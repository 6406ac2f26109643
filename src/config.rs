//! TOML-based client configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::http::{ProxyMap, ProxySpec};

/// Client configuration parsed from TOML.
///
/// All fields have defaults matching a plain production-engine client. Load
/// from TOML with [`ClientConfig::from_toml_file`] or build the default with
/// [`ClientConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Target the beta engine deployment instead of production.
    pub beta_engine: bool,
    /// Custom engine base URL, e.g. for a self-hosted engine. Takes
    /// precedence over `beta_engine` while set.
    pub engine_url: Option<String>,
    /// Scenario id to bind at construction time.
    pub scenario_id: Option<String>,
    /// Proxy settings.
    pub proxies: ProxyConfig,
}

/// Proxy settings section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Resolution mode: `"none"`, `"auto"` (snapshot `HTTP_PROXY` /
    /// `HTTPS_PROXY` from the environment), or `"manual"`.
    pub mode: String,
    /// Proxy URL for HTTP traffic, `"manual"` mode only.
    pub http: Option<String>,
    /// Proxy URL for HTTPS traffic, `"manual"` mode only.
    pub https: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            mode: "none".to_string(),
            http: None,
            https: None,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        toml::from_str(s).map_err(|e| Error::Config {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<Error> {
        let mut errors = Vec::new();

        if self.engine_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            errors.push(Error::Config {
                field: "engine_url".to_string(),
                message: "must not be empty when set".to_string(),
            });
        }

        if self.scenario_id.as_deref().is_some_and(|s| s.trim().is_empty()) {
            errors.push(Error::Config {
                field: "scenario_id".to_string(),
                message: "must not be empty when set".to_string(),
            });
        }

        let p = &self.proxies;
        match p.mode.as_str() {
            "none" | "auto" | "manual" => {}
            other => errors.push(Error::Config {
                field: "proxies.mode".to_string(),
                message: format!("must be \"none\", \"auto\", or \"manual\", got \"{other}\""),
            }),
        }
        if p.mode == "manual" && p.http.is_none() && p.https.is_none() {
            errors.push(Error::Config {
                field: "proxies.mode".to_string(),
                message: "\"manual\" requires proxies.http and/or proxies.https".to_string(),
            });
        }
        if p.mode != "manual" && (p.http.is_some() || p.https.is_some()) {
            errors.push(Error::Config {
                field: "proxies.http".to_string(),
                message: format!(
                    "explicit proxy URLs only apply to mode \"manual\", mode is \"{}\"",
                    p.mode
                ),
            });
        }

        errors
    }

    /// The proxy specification described by the `[proxies]` section.
    pub fn proxy_spec(&self) -> ProxySpec {
        match self.proxies.mode.as_str() {
            "auto" => ProxySpec::Auto,
            "manual" => ProxySpec::Explicit(ProxyMap {
                http: self.proxies.http.clone(),
                https: self.proxies.https.clone(),
            }),
            _ => ProxySpec::Direct,
        }
    }
}
