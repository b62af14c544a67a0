use crate::config::file::FileConfig;
use crate::config::MissingKeyPolicy;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sourcerefs")]
#[command(about = "Serves Maven source references for a directory of bundle jars")]
pub struct CliConfig {
    /// Directory holding the bundle jars to report on
    #[arg(long)]
    pub bundle_dir: PathBuf,

    /// Listen address for the HTTP endpoint
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Handling of references with missing keys
    #[arg(long, value_enum, default_value = "null")]
    pub missing_key_policy: MissingKeyPolicy,

    /// Optional TOML file overriding the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Applies the values of a loaded config file on top of the flags.
    pub fn merge_file(&mut self, file: FileConfig) {
        if let Some(server) = file.server {
            if let Some(listen) = server.listen {
                self.listen = listen;
            }
        }
        if let Some(discovery) = file.discovery {
            if let Some(bundle_dir) = discovery.bundle_dir {
                self.bundle_dir = bundle_dir;
            }
            if let Some(policy) = discovery.missing_key_policy {
                self.missing_key_policy = policy;
            }
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_listen_addr("listen", &self.listen)?;
        validation::validate_directory("bundle-dir", &self.bundle_dir)?;
        Ok(())
    }
}
