//! # configs
//!
//! Layered configuration for the Hearth workspace. Settings come from an
//! optional `hearth.toml` next to the process, overridden by `HEARTH_*`
//! environment variables (double underscore for nesting, e.g.
//! `HEARTH_LIMITS__MAX_TITLE=120`). Every knob has a serde default, so a
//! bare environment boots fine.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while assembling the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Upper bounds for user-supplied text, in characters.
///
/// "Required" fields must also be non-empty after trimming; that rule
/// lives with the services, these are only the ceilings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentLimits {
    pub max_title: usize,
    pub max_name: usize,
    pub max_content: usize,
    pub max_message: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            max_title: 200,
            max_name: 100,
            max_content: 10_000,
            max_message: 4_000,
        }
    }
}

/// Where post attachments land when the local media adapter is in play.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub upload_dir: PathBuf,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("data/uploads"),
        }
    }
}

/// Top-level configuration consumed by the assembly binary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub limits: ContentLimits,
    pub media: MediaSettings,
}

/// Loads `.env`, then layers file and environment sources.
pub fn load() -> Result<PlatformConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("hearth").required(false))
        .add_source(config::Environment::with_prefix("HEARTH").separator("__"))
        .build()?
        .try_deserialize::<PlatformConfig>()?;

    tracing::debug!(?settings, "configuration loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = PlatformConfig::default();
        assert_eq!(cfg.limits.max_title, 200);
        assert_eq!(cfg.limits.max_message, 4_000);
        assert_eq!(cfg.media.upload_dir, PathBuf::from("data/uploads"));
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg: PlatformConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[limits]\nmax_title = 80\n\n[media]\nupload_dir = \"/tmp/hearth\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.limits.max_title, 80);
        // untouched knobs keep their defaults
        assert_eq!(cfg.limits.max_content, 10_000);
        assert_eq!(cfg.media.upload_dir, PathBuf::from("/tmp/hearth"));
    }
}
