//! # cic-config
//!
//! Layered configuration loading for the Catecismo search core using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CIC_*` prefix, `__` as separator)
//! 2. `GEMINI_API_KEY`, then `API_KEY` (bare credential variables)
//! 3. Project-level `.cic/config.toml`
//! 4. User-level `~/.config/cic/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CIC_GEMINI__API_KEY` -> `gemini.api_key`,
//! `CIC_SEARCH__MAX_RESULTS` -> `search.max_results`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! A missing API key is not a load error: the gateway reports it per search,
//! so a host can start, show the problem, and let the user configure and retry.
//!
//! # Usage
//!
//! ```no_run
//! use cic_config::CicConfig;
//!
//! let config = CicConfig::load_with_dotenv().expect("config");
//!
//! if !config.gemini.is_configured() {
//!     eprintln!("set API_KEY or CIC_GEMINI__API_KEY");
//! }
//! ```

mod error;
mod gemini;
mod search;

pub use error::ConfigError;
pub use gemini::GeminiConfig;
pub use search::{InvalidEntryPolicy, SearchConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CicConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl CicConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`CicConfig::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if the merged values are unusable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`CicConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`CicConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.search.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cic/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: bare credential variables
        figment = figment
            .merge(Env::raw().only(&["API_KEY"]).map(|_| "gemini.api_key".into()))
            .merge(
                Env::raw()
                    .only(&["GEMINI_API_KEY"])
                    .map(|_| "gemini.api_key".into()),
            );

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("CIC_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cic").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or falls back to the
    /// current dir. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
