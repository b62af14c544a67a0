use serde::{Deserialize, Serialize};

pub const HEADER_BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
pub const HEADER_BUNDLE_VERSION: &str = "Bundle-Version";
pub const HEADER_BUNDLE_CLASSPATH: &str = "Bundle-ClassPath";
pub const HEADER_FRAGMENT_HOST: &str = "Fragment-Host";

/// Id the container assigns to its own framework bundle.
pub const SYSTEM_BUNDLE_ID: u64 = 0;

pub const KEY_GROUP_ID: &str = "groupId";
pub const KEY_ARTIFACT_ID: &str = "artifactId";
pub const KEY_VERSION: &str = "version";

pub(crate) const FELIX_FRAMEWORK_GROUP_ID: &str = "org.apache.felix";
pub(crate) const FELIX_FRAMEWORK_SYMBOLIC_NAME: &str = "org.apache.felix.framework";

/// Identifier scheme of a source reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateScheme {
    Maven,
}

/// A (group, artifact, version) triple locating a source artifact in a
/// repository. Fields read from a build-metadata file may be absent; absent
/// fields serialize as `null`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "__type__")]
    scheme: CoordinateScheme,
    #[serde(rename = "groupId")]
    group_id: Option<String>,
    #[serde(rename = "artifactId")]
    artifact_id: Option<String>,
    version: Option<String>,
}

impl Coordinate {
    pub fn new(
        scheme: CoordinateScheme,
        group_id: Option<String>,
        artifact_id: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            scheme,
            group_id,
            artifact_id,
            version,
        }
    }

    pub fn maven(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(
            CoordinateScheme::Maven,
            Some(group_id.into()),
            Some(artifact_id.into()),
            Some(version.into()),
        )
    }

    pub fn scheme(&self) -> CoordinateScheme {
        self.scheme
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.group_id.is_some() && self.artifact_id.is_some() && self.version.is_some()
    }

    pub(crate) fn first_missing_key(&self) -> &'static str {
        if self.group_id.is_none() {
            KEY_GROUP_ID
        } else if self.artifact_id.is_none() {
            KEY_ARTIFACT_ID
        } else {
            KEY_VERSION
        }
    }
}

/// Bundle kind as reported by the container. Fragments attach to a host
/// bundle and are never reported on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BundleKind {
    #[default]
    Primary,
    Fragment,
}
