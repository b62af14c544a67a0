use crate::domain::model::Coordinate;
use crate::domain::ports::{Bundle, SourceReferenceFinder};
use crate::utils::error::{FinderError, Result};
use regex::Regex;
use std::error::Error;
use std::io::Read;
use std::sync::OnceLock;

/// Ordered set of pluggable finders. Registration happens at construction
/// time; afterwards the registry is read-only and safe to share across
/// concurrent requests.
pub struct FinderRegistry {
    finders: Vec<Box<dyn SourceReferenceFinder>>,
}

impl FinderRegistry {
    pub fn new() -> Self {
        Self {
            finders: Vec::new(),
        }
    }

    /// Registry preloaded with the built-in finders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FelixJettySourceReferenceFinder);
        registry
    }

    pub fn register(&mut self, finder: impl SourceReferenceFinder + 'static) {
        self.finders.push(Box::new(finder));
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    /// Runs every finder against `bundle` in registration order. A declared
    /// finder failure is logged at warning level and the remaining finders
    /// still run; errors from `emit` abort the run.
    pub fn run_all(
        &self,
        bundle: &dyn Bundle,
        mut emit: impl FnMut(Coordinate) -> Result<()>,
    ) -> Result<()> {
        for finder in &self.finders {
            match finder.find(bundle) {
                Ok(references) => {
                    for reference in references {
                        tracing::debug!(
                            finder = finder.name(),
                            bundle = bundle.symbolic_name(),
                            "Found reference {}:{}:{}",
                            reference.group_id().unwrap_or("?"),
                            reference.artifact_id().unwrap_or("?"),
                            reference.version().unwrap_or("?"),
                        );
                        emit(reference)?;
                    }
                }
                Err(error) => {
                    let cause = error
                        .source()
                        .map(|cause| cause.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::warn!(
                        finder = finder.name(),
                        bundle = bundle.symbolic_name(),
                        cause = %cause,
                        "Finder execution did not complete normally: {error}",
                    );
                }
            }
        }
        Ok(())
    }
}

impl Default for FinderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

const FELIX_JETTY_SYMBOLIC_NAME: &str = "org.apache.felix.http.jetty";
const JETTY_GROUP_ID: &str = "org.eclipse.jetty";
const JETTY_ARTIFACT_ID: &str = "jetty-project";

fn jetty_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<jetty\.version>\s*([^<\s]+)\s*</jetty\.version>").expect("valid pattern")
    })
}

/// Built-in finder for embedded HTTP-server distributions: the felix-jetty
/// bundle repackages Jetty without its own build metadata, but declares the
/// embedded version as a property in its pom.
pub struct FelixJettySourceReferenceFinder;

impl SourceReferenceFinder for FelixJettySourceReferenceFinder {
    fn name(&self) -> &str {
        "felix-jetty"
    }

    fn find(&self, bundle: &dyn Bundle) -> std::result::Result<Vec<Coordinate>, FinderError> {
        if bundle.symbolic_name() != FELIX_JETTY_SYMBOLIC_NAME {
            return Ok(Vec::new());
        }

        for entry in bundle.find_entries("/META-INF/maven", "pom.xml", true) {
            let mut stream = entry
                .open()
                .map_err(|e| FinderError::with_source("cannot open pom.xml", e))?;
            let mut raw = Vec::new();
            stream
                .read_to_end(&mut raw)
                .map_err(|e| FinderError::with_source("cannot read pom.xml", e))?;
            let text = String::from_utf8_lossy(&raw);
            if let Some(captures) = jetty_version_pattern().captures(&text) {
                return Ok(vec![Coordinate::maven(
                    JETTY_GROUP_ID,
                    JETTY_ARTIFACT_ID,
                    &captures[1],
                )]);
            }
        }
        Ok(Vec::new())
    }
}
