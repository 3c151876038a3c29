//! Application settings.
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! api_base_url = "https://api.linkdash.example"
//! session_key = "linkdash_session"
//!
//! [router]
//! mode = "history"
//! base = "/app"
//! fallback = "/404"
//! max_redirects = 16
//! ```

use linkdash_router::RouterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("invalid setting '{key}': {reason}")]
	Invalid { key: &'static str, reason: String },
}

fn default_api_base_url() -> String {
	"/api".to_string()
}

fn default_session_key() -> String {
	"linkdash_session".to_string()
}

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
	/// Router settings.
	#[serde(default)]
	pub router: RouterConfig,
	/// Base URL of the links API.
	#[serde(default = "default_api_base_url")]
	pub api_base_url: String,
	/// Storage key of the session token.
	#[serde(default = "default_session_key")]
	pub session_key: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			router: RouterConfig::default(),
			api_base_url: default_api_base_url(),
			session_key: default_session_key(),
		}
	}
}

impl AppConfig {
	/// Parses and validates settings from TOML text.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Toml`] for malformed input and
	/// [`ConfigError::Invalid`] for values the router cannot use.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
	/// same errors as [`AppConfig::from_toml_str`].
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&content)?;
		tracing::info!(path = %path.display(), mode = ?config.router.mode, "configuration loaded");
		Ok(config)
	}

	/// Checks values that deserialize fine but break routing.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Invalid`] naming the offending key.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.router.fallback.starts_with('/') {
			return Err(ConfigError::Invalid {
				key: "router.fallback",
				reason: format!("'{}' must start with '/'", self.router.fallback),
			});
		}
		if !self.router.base.is_empty() && !self.router.base.starts_with('/') {
			return Err(ConfigError::Invalid {
				key: "router.base",
				reason: format!("'{}' must be empty or start with '/'", self.router.base),
			});
		}
		if self.session_key.is_empty() {
			return Err(ConfigError::Invalid {
				key: "session_key",
				reason: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}
