use crate::{env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

/// Location of uploaded static files (category images)
#[derive(Clone, Debug)]
pub struct AssetsConfig {
    /// Directory on disk that is served under `/assets`
    pub dir: PathBuf,
}

impl AssetsConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl FromEnv for AssetsConfig {
    /// ASSETS_DIR: defaults to `assets` relative to the working directory
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env_or_default("ASSETS_DIR", "assets")))
    }
}
