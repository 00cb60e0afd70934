#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for VaultIQ
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/vaultiq/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod collaborators;
pub mod constants;
pub mod general;
pub mod verification;

pub use collaborators::{CollaboratorsConfig, CommandSpec};
pub use general::GeneralConfig;
pub use verification::VerificationConfig;

use constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DOCUMENT_PLACEHOLDER, ENV_APPROVAL_THRESHOLD, ENV_COLOR,
    ENV_OUTPUT, ENV_SCORE_POLICY,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use vaultiq_errors::{ConfigError, Error};
use vaultiq_types::{ColorChoice, OutputFormat, ScorePolicy};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub collaborators: CollaboratorsConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            debug!("no configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // VAULTIQ_OUTPUT
        if let Ok(output) = std::env::var(ENV_OUTPUT) {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_OUTPUT.to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // VAULTIQ_COLOR
        if let Ok(color) = std::env::var(ENV_COLOR) {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_COLOR.to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // VAULTIQ_APPROVAL_THRESHOLD
        if let Ok(threshold) = std::env::var(ENV_APPROVAL_THRESHOLD) {
            self.verification.approval_threshold =
                threshold.parse().map_err(|_| ConfigError::InvalidValue {
                    field: ENV_APPROVAL_THRESHOLD.to_string(),
                    value: threshold,
                })?;
        }

        // VAULTIQ_SCORE_POLICY
        if let Ok(policy) = std::env::var(ENV_SCORE_POLICY) {
            self.verification.score_policy =
                policy
                    .parse::<ScorePolicy>()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: ENV_SCORE_POLICY.to_string(),
                        value: policy,
                    })?;
        }

        Ok(())
    }

    /// Check values that the schema alone cannot enforce
    ///
    /// # Errors
    ///
    /// Returns an error if the approval threshold is not finite, a
    /// collaborator command has an empty program, or the market command
    /// references the document placeholder it never receives.
    pub fn validate(&self) -> Result<(), Error> {
        let threshold = self.verification.approval_threshold;
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "verification.approval_threshold".to_string(),
                value: threshold.to_string(),
            }
            .into());
        }

        for (name, spec) in [
            ("collaborators.ocr", &self.collaborators.ocr),
            ("collaborators.forgery", &self.collaborators.forgery),
            ("collaborators.market", &self.collaborators.market),
        ] {
            if let Some(spec) = spec {
                if spec.program.trim().is_empty() {
                    return Err(ConfigError::Invalid {
                        message: format!("{name}.program must not be empty"),
                    }
                    .into());
                }
            }
        }

        // The market check only sees metadata on stdin
        if let Some(market) = &self.collaborators.market {
            if market.args.iter().any(|arg| arg.contains(DOCUMENT_PLACEHOLDER)) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "collaborators.market.args must not contain {DOCUMENT_PLACEHOLDER}"
                    ),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Serialize the effective configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError {
                error: e.to_string(),
            })
            .map_err(Into::into)
    }
}
