pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use crate::config::MissingKeyPolicy;
pub use crate::core::engine::SourceReferenceEngine;
pub use crate::core::finders::{FelixJettySourceReferenceFinder, FinderRegistry};
pub use crate::domain::model::{BundleKind, Coordinate, CoordinateScheme, SYSTEM_BUNDLE_ID};
pub use crate::domain::ports::{Bundle, BundleEntry, BundleSource, SourceReferenceFinder};
pub use crate::utils::error::{FinderError, Result, SourceRefError};
