pub mod archive;
pub mod engine;
pub mod finders;
pub mod inspector;
pub mod json;
pub mod properties;

pub use crate::domain::model::{BundleKind, Coordinate, CoordinateScheme};
pub use crate::domain::ports::{Bundle, BundleEntry, BundleSource, SourceReferenceFinder};
pub use crate::utils::error::Result;
