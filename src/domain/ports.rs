use crate::domain::model::{BundleKind, Coordinate};
use crate::utils::error::FinderError;
use std::collections::HashMap;
use std::io::Read;

/// Resource handle addressing a single entry inside a bundle.
pub trait BundleEntry {
    /// Entry path inside the bundle.
    fn path(&self) -> &str;

    /// Opens a fresh byte stream over the entry contents.
    fn open(&self) -> std::io::Result<Box<dyn Read + '_>>;
}

/// A self-describing deployable unit, borrowed from the container for the
/// duration of one discovery run.
pub trait Bundle {
    fn id(&self) -> u64;

    fn symbolic_name(&self) -> &str;

    fn version(&self) -> &str;

    fn kind(&self) -> BundleKind;

    fn headers(&self) -> &HashMap<String, String>;

    /// Header lookup by exact name.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).map(String::as_str)
    }

    /// Enumerates entries below `path` whose file name matches `pattern`, in
    /// container-defined order.
    fn find_entries(&self, path: &str, pattern: &str, recursive: bool)
        -> Vec<Box<dyn BundleEntry + '_>>;

    /// Looks up a single entry; `None` if the path does not resolve.
    fn get_entry(&self, path: &str) -> Option<Box<dyn BundleEntry + '_>>;
}

/// Source of bundles for one discovery run, in report order.
pub trait BundleSource: Send + Sync {
    fn bundles(&self) -> Vec<&dyn Bundle>;
}

/// Extension point producing coordinates via module-specific heuristics.
pub trait SourceReferenceFinder: Send + Sync {
    /// Short identity used in logs.
    fn name(&self) -> &str;

    fn find(&self, bundle: &dyn Bundle) -> std::result::Result<Vec<Coordinate>, FinderError>;
}
