use crate::domain::model::{
    BundleKind, HEADER_BUNDLE_SYMBOLIC_NAME, HEADER_BUNDLE_VERSION, HEADER_FRAGMENT_HOST,
};
use crate::domain::ports::{Bundle, BundleEntry, BundleSource};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Bundles loaded from a directory of jar files. Ids are assigned from 1 in
/// file-name order; id 0 stays reserved for a real framework bundle.
pub struct DirectoryContainer {
    bundles: Vec<JarBundle>,
}

impl DirectoryContainer {
    /// Loads every `*.jar` directly under `dir`. Jars without a readable
    /// manifest are skipped with a warning.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "jar").unwrap_or(false))
            .collect();
        paths.sort();

        let mut bundles = Vec::new();
        for path in paths {
            let id = bundles.len() as u64 + 1;
            match JarBundle::open(&path, id) {
                Ok(bundle) => bundles.push(bundle),
                Err(error) => {
                    tracing::warn!(jar = %path.display(), error = %error, "Skipping unreadable jar");
                }
            }
        }
        Ok(Self { bundles })
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl BundleSource for DirectoryContainer {
    fn bundles(&self) -> Vec<&dyn Bundle> {
        self.bundles.iter().map(|bundle| bundle as &dyn Bundle).collect()
    }
}

/// A bundle backed by a jar file on disk. Headers come from the manifest's
/// main section.
pub struct JarBundle {
    id: u64,
    path: PathBuf,
    symbolic_name: String,
    version: String,
    kind: BundleKind,
    headers: HashMap<String, String>,
}

impl JarBundle {
    pub fn open(path: &Path, id: u64) -> Result<Self> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut manifest = String::new();
        archive
            .by_name(MANIFEST_PATH)?
            .read_to_string(&mut manifest)?;
        let headers = parse_manifest(&manifest);

        // directives after ';' are not part of the name
        let symbolic_name = headers
            .get(HEADER_BUNDLE_SYMBOLIC_NAME)
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .unwrap_or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
        let version = headers
            .get(HEADER_BUNDLE_VERSION)
            .cloned()
            .unwrap_or_else(|| "0.0.0".to_string());
        let kind = if headers.contains_key(HEADER_FRAGMENT_HOST) {
            BundleKind::Fragment
        } else {
            BundleKind::Primary
        };

        Ok(Self {
            id,
            path: path.to_path_buf(),
            symbolic_name,
            version,
            kind,
            headers,
        })
    }

    fn open_archive(&self) -> io::Result<ZipArchive<File>> {
        let file = File::open(&self.path)?;
        ZipArchive::new(file).map_err(into_io)
    }
}

impl Bundle for JarBundle {
    fn id(&self) -> u64 {
        self.id
    }

    fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn kind(&self) -> BundleKind {
        self.kind
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn find_entries(
        &self,
        path: &str,
        pattern: &str,
        recursive: bool,
    ) -> Vec<Box<dyn BundleEntry + '_>> {
        let mut archive = match self.open_archive() {
            Ok(archive) => archive,
            Err(error) => {
                tracing::warn!(jar = %self.path.display(), error = %error, "Cannot enumerate entries");
                return Vec::new();
            }
        };

        let root = path.trim_start_matches('/');
        let prefix = if root.is_empty() || root.ends_with('/') {
            root.to_string()
        } else {
            format!("{root}/")
        };

        // central-directory order; stable for a given jar
        let mut entries: Vec<Box<dyn BundleEntry + '_>> = Vec::new();
        for index in 0..archive.len() {
            let Ok(entry) = archive.by_index(index) else {
                continue;
            };
            let name = entry.name().to_string();
            drop(entry);

            let Some(relative) = name.strip_prefix(&prefix) else {
                continue;
            };
            if relative.is_empty() || relative.ends_with('/') {
                continue;
            }
            if !recursive && relative.contains('/') {
                continue;
            }
            let file_name = relative.rsplit('/').next().unwrap_or(relative);
            if !matches_pattern(file_name, pattern) {
                continue;
            }
            entries.push(Box::new(JarEntry {
                jar: self.path.clone(),
                name,
            }));
        }
        entries
    }

    fn get_entry(&self, path: &str) -> Option<Box<dyn BundleEntry + '_>> {
        let name = path.trim_start_matches('/').to_string();
        let mut archive = self.open_archive().ok()?;
        if archive.by_name(&name).is_err() {
            return None;
        }
        Some(Box::new(JarEntry {
            jar: self.path.clone(),
            name,
        }))
    }
}

/// Exact file name, or `*suffix` for a trailing-match pattern.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    match pattern.strip_prefix('*') {
        Some(suffix) => name.ends_with(suffix),
        None => name == pattern,
    }
}

/// Main-section manifest parsing: continuation lines start with a single
/// space and are folded into the previous header; parsing stops at the first
/// blank line.
fn parse_manifest(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    let mut current: Option<(String, String)> = None;

    for line in raw.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(rest);
            }
            continue;
        }
        if let Some((name, value)) = current.take() {
            headers.insert(name, value);
        }
        if let Some((name, value)) = line.split_once(':') {
            current = Some((name.trim().to_string(), value.trim_start().to_string()));
        }
    }
    if let Some((name, value)) = current {
        headers.insert(name, value);
    }
    headers
}

struct JarEntry {
    jar: PathBuf,
    name: String,
}

impl BundleEntry for JarEntry {
    fn path(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(&self.jar)?;
        let mut archive = ZipArchive::new(file).map_err(into_io)?;
        let mut entry = archive.by_name(&self.name).map_err(into_io)?;
        // the zip entry borrows the archive and cannot be returned, so the
        // single selected entry is materialised
        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents)?;
        Ok(Box::new(Cursor::new(contents)))
    }
}

fn into_io(error: zip::result::ZipError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_jar(dir: &Path, file_name: &str, manifest: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.join(file_name);
        let file = File::create(&path).unwrap();
        let mut writer = ZipWriter::new(file);
        writer
            .start_file(MANIFEST_PATH, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(manifest.as_bytes()).unwrap();
        for (name, contents) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    const PLAIN_MANIFEST: &str =
        "Manifest-Version: 1.0\r\nBundle-SymbolicName: com.example.demo\r\nBundle-Version: 1.2.3\r\n\r\n";

    #[test]
    fn test_reads_headers_from_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_jar(dir.path(), "demo.jar", PLAIN_MANIFEST, &[]);

        let bundle = JarBundle::open(&path, 7).unwrap();

        assert_eq!(bundle.id(), 7);
        assert_eq!(bundle.symbolic_name(), "com.example.demo");
        assert_eq!(bundle.version(), "1.2.3");
        assert_eq!(bundle.kind(), BundleKind::Primary);
        assert_eq!(
            bundle.header("Manifest-Version"),
            Some("1.0")
        );
    }

    #[test]
    fn test_symbolic_name_directives_are_stripped() {
        let dir = TempDir::new().unwrap();
        let manifest =
            "Bundle-SymbolicName: com.example.demo;singleton:=true\nBundle-Version: 1.0.0\n";
        let path = write_jar(dir.path(), "demo.jar", manifest, &[]);

        let bundle = JarBundle::open(&path, 1).unwrap();

        assert_eq!(bundle.symbolic_name(), "com.example.demo");
    }

    #[test]
    fn test_manifest_continuation_lines_fold() {
        let dir = TempDir::new().unwrap();
        let manifest = "Bundle-SymbolicName: com.example.demo\nBundle-ClassPath: lib/first\n .jar,lib/second.jar\n";
        let path = write_jar(dir.path(), "demo.jar", manifest, &[]);

        let bundle = JarBundle::open(&path, 1).unwrap();

        assert_eq!(
            bundle.header("Bundle-ClassPath"),
            Some("lib/first.jar,lib/second.jar")
        );
    }

    #[test]
    fn test_fragment_host_marks_fragment() {
        let dir = TempDir::new().unwrap();
        let manifest = "Bundle-SymbolicName: com.example.frag\nFragment-Host: com.example.demo\n";
        let path = write_jar(dir.path(), "frag.jar", manifest, &[]);

        let bundle = JarBundle::open(&path, 1).unwrap();

        assert_eq!(bundle.kind(), BundleKind::Fragment);
    }

    #[test]
    fn test_find_entries_recursive() {
        let dir = TempDir::new().unwrap();
        let path = write_jar(
            dir.path(),
            "demo.jar",
            PLAIN_MANIFEST,
            &[
                ("META-INF/maven/g/a/pom.properties", b"groupId=g\n"),
                ("META-INF/maven/g/a/pom.xml", b"<project/>"),
                ("META-INF/maven/g/b/pom.properties", b"groupId=h\n"),
                ("com/example/Demo.class", b"\x00"),
            ],
        );
        let bundle = JarBundle::open(&path, 1).unwrap();

        let entries = bundle.find_entries("/META-INF/maven", "pom.properties", true);
        let paths: Vec<&str> = entries.iter().map(|entry| entry.path()).collect();

        assert_eq!(
            paths,
            vec![
                "META-INF/maven/g/a/pom.properties",
                "META-INF/maven/g/b/pom.properties"
            ]
        );
    }

    #[test]
    fn test_find_entries_non_recursive_stays_at_root() {
        let dir = TempDir::new().unwrap();
        let path = write_jar(
            dir.path(),
            "demo.jar",
            PLAIN_MANIFEST,
            &[
                ("META-INF/maven/pom.properties", b"groupId=g\n"),
                ("META-INF/maven/g/a/pom.properties", b"groupId=h\n"),
            ],
        );
        let bundle = JarBundle::open(&path, 1).unwrap();

        let entries = bundle.find_entries("/META-INF/maven", "pom.properties", false);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path(), "META-INF/maven/pom.properties");
    }

    #[test]
    fn test_entry_contents_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = write_jar(
            dir.path(),
            "demo.jar",
            PLAIN_MANIFEST,
            &[("lib/inner.jar", b"fake archive bytes")],
        );
        let bundle = JarBundle::open(&path, 1).unwrap();

        let entry = bundle.get_entry("lib/inner.jar").unwrap();
        let mut contents = Vec::new();
        entry.open().unwrap().read_to_end(&mut contents).unwrap();

        assert_eq!(contents, b"fake archive bytes");
    }

    #[test]
    fn test_missing_entry_is_none() {
        let dir = TempDir::new().unwrap();
        let path = write_jar(dir.path(), "demo.jar", PLAIN_MANIFEST, &[]);
        let bundle = JarBundle::open(&path, 1).unwrap();

        assert!(bundle.get_entry("missing.jar").is_none());
    }

    #[test]
    fn test_directory_container_sorts_and_numbers() {
        let dir = TempDir::new().unwrap();
        write_jar(
            dir.path(),
            "b.jar",
            "Bundle-SymbolicName: com.example.b\n",
            &[],
        );
        write_jar(
            dir.path(),
            "a.jar",
            "Bundle-SymbolicName: com.example.a\n",
            &[],
        );
        std::fs::write(dir.path().join("notes.txt"), "not a jar").unwrap();

        let container = DirectoryContainer::open(dir.path()).unwrap();
        let bundles = container.bundles();

        assert_eq!(container.len(), 2);
        assert_eq!(bundles[0].symbolic_name(), "com.example.a");
        assert_eq!(bundles[0].id(), 1);
        assert_eq!(bundles[1].symbolic_name(), "com.example.b");
        assert_eq!(bundles[1].id(), 2);
    }

    #[test]
    fn test_unreadable_jar_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_jar(
            dir.path(),
            "good.jar",
            "Bundle-SymbolicName: com.example.good\n",
            &[],
        );
        std::fs::write(dir.path().join("bad.jar"), "not a zip at all").unwrap();

        let container = DirectoryContainer::open(dir.path()).unwrap();

        assert_eq!(container.len(), 1);
        assert_eq!(container.bundles()[0].symbolic_name(), "com.example.good");
    }
}
