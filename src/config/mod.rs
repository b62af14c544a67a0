#[cfg(feature = "server")]
pub mod cli;
pub mod file;

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
pub use cli::CliConfig;

/// Handling of coordinates whose property file lacks one of the three keys.
/// `Null` writes the absent value as-is, preserving the file's semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "server", derive(clap::ValueEnum))]
pub enum MissingKeyPolicy {
    #[default]
    Null,
    Discard,
    Reject,
}
