use crate::domain::model::HEADER_BUNDLE_CLASSPATH;
use crate::domain::ports::{Bundle, BundleEntry};

pub(crate) const METADATA_ROOT: &str = "/META-INF/maven";
pub(crate) const METADATA_FILE: &str = "pom.properties";

/// Top-level build-metadata entries, in container enumeration order.
pub fn find_metadata_entries(bundle: &dyn Bundle) -> Vec<Box<dyn BundleEntry + '_>> {
    bundle.find_entries(METADATA_ROOT, METADATA_FILE, true)
}

/// Archives declared on the internal classpath header. The value is split on
/// the literal comma only, matching the container convention: no whitespace
/// trimming, no quote handling. Order and duplicates are preserved.
pub fn embedded_archives(bundle: &dyn Bundle) -> Vec<String> {
    match bundle.header(HEADER_BUNDLE_CLASSPATH) {
        None => Vec::new(),
        Some(classpath) => classpath
            .split(',')
            .filter(|entry| entry.ends_with(".jar"))
            .map(str::to_string)
            .collect(),
    }
}

/// Single-entry lookup; `None` means the declared path does not resolve and
/// the caller skips it.
pub fn open_entry<'a>(bundle: &'a dyn Bundle, path: &str) -> Option<Box<dyn BundleEntry + 'a>> {
    bundle.get_entry(path)
}
