use crate::config::MissingKeyPolicy;
use crate::core::archive::PomPropertiesScanner;
use crate::core::finders::FinderRegistry;
use crate::core::json::JsonSink;
use crate::core::{inspector, properties};
use crate::domain::model::{
    BundleKind, Coordinate, FELIX_FRAMEWORK_GROUP_ID, FELIX_FRAMEWORK_SYMBOLIC_NAME,
    SYSTEM_BUNDLE_ID,
};
use crate::domain::ports::Bundle;
use crate::utils::error::{Result, SourceRefError};
use std::io::Write;

/// Discovery orchestrator: fans every bundle through the inspector, the
/// archive scanner and the finder registry, streaming each produced
/// coordinate into the JSON sink as it appears.
pub struct SourceReferenceEngine {
    finders: FinderRegistry,
    policy: MissingKeyPolicy,
    system_bundle_id: u64,
}

impl SourceReferenceEngine {
    pub fn new(finders: FinderRegistry) -> Self {
        Self {
            finders,
            policy: MissingKeyPolicy::Null,
            system_bundle_id: SYSTEM_BUNDLE_ID,
        }
    }

    pub fn with_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Writes the full report for `bundles`, in input order, fragments
    /// excluded. Emission order within one bundle is a public guarantee:
    /// synthetic special case, then top-level metadata in container
    /// enumeration order, then embedded archives in declaration order, then
    /// finders in registration order. Callers compare the output verbatim,
    /// so nothing is re-sorted or deduplicated.
    pub fn write_source_references<W: Write>(
        &self,
        out: W,
        bundles: &[&dyn Bundle],
    ) -> Result<()> {
        let mut sink = JsonSink::new(out);
        sink.begin_document()?;
        for bundle in bundles {
            self.write_bundle(&mut sink, *bundle)?;
        }
        sink.end_document()
    }

    fn write_bundle<W: Write>(&self, sink: &mut JsonSink<W>, bundle: &dyn Bundle) -> Result<()> {
        // source references are listed with the host bundle
        if bundle.kind() == BundleKind::Fragment {
            tracing::debug!(bundle = bundle.symbolic_name(), "Skipping fragment");
            return Ok(());
        }

        sink.begin_bundle(bundle.symbolic_name(), bundle.version())?;

        // the framework bundle is embedded by the launcher, so its build
        // metadata is not inside the bundle itself
        if bundle.id() == self.system_bundle_id
            && bundle.symbolic_name() == FELIX_FRAMEWORK_SYMBOLIC_NAME
        {
            self.emit(
                sink,
                Coordinate::maven(
                    FELIX_FRAMEWORK_GROUP_ID,
                    FELIX_FRAMEWORK_SYMBOLIC_NAME,
                    bundle.version(),
                ),
            )?;
        }

        for entry in inspector::find_metadata_entries(bundle) {
            let mut stream = entry.open()?;
            let coordinate = properties::read_coordinate(&mut stream)?;
            self.emit(sink, coordinate)?;
        }

        for archive_path in inspector::embedded_archives(bundle) {
            let Some(entry) = inspector::open_entry(bundle, &archive_path) else {
                tracing::debug!(
                    bundle = bundle.symbolic_name(),
                    entry = %archive_path,
                    "Declared classpath entry not found"
                );
                continue;
            };
            let stream = entry.open()?;
            PomPropertiesScanner::new(stream).scan(|_path, contents| {
                let coordinate = properties::read_coordinate(contents)?;
                self.emit(sink, coordinate)
            })?;
        }

        self.finders
            .run_all(bundle, |coordinate| self.emit(sink, coordinate))?;

        sink.end_bundle()
    }

    fn emit<W: Write>(&self, sink: &mut JsonSink<W>, coordinate: Coordinate) -> Result<()> {
        if !coordinate.is_complete() {
            match self.policy {
                MissingKeyPolicy::Null => {}
                MissingKeyPolicy::Discard => {
                    tracing::debug!(?coordinate, "Dropping incomplete reference");
                    return Ok(());
                }
                MissingKeyPolicy::Reject => {
                    return Err(SourceRefError::MissingReferenceKey {
                        key: coordinate.first_missing_key(),
                    });
                }
            }
        }
        sink.reference(&coordinate)
    }
}
