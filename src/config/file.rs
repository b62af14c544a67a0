use crate::config::MissingKeyPolicy;
use crate::utils::error::{Result, SourceRefError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional TOML overlay for the command-line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub discovery: Option<DiscoverySection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverySection {
    pub bundle_dir: Option<PathBuf>,
    pub missing_key_policy: Option<MissingKeyPolicy>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| SourceRefError::Config {
            message: format!("cannot parse {}: {}", path.display(), e),
        })
    }
}
