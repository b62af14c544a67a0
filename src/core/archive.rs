use crate::utils::error::Result;
use std::io::Read;

const METADATA_PREFIX: &str = "META-INF/maven/";
const METADATA_SUFFIX: &str = "/pom.properties";

/// Streaming walk over a nested archive, restricted to build-metadata
/// entries. Entries are read sequentially from the local headers, so the
/// archive is never buffered; at most one entry stream is live at a time and
/// skipped entries are drained on drop.
pub struct PomPropertiesScanner<R: Read> {
    reader: R,
}

impl<R: Read> PomPropertiesScanner<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Visits every `META-INF/maven/**/pom.properties` entry in archive
    /// order. The entry stream passed to `visit` is only valid for that
    /// call.
    pub fn scan(
        mut self,
        mut visit: impl FnMut(&str, &mut dyn Read) -> Result<()>,
    ) -> Result<()> {
        loop {
            match zip::read::read_zipfile_from_stream(&mut self.reader)? {
                None => return Ok(()),
                Some(mut entry) => {
                    let path = entry.name().to_string();
                    if path.starts_with(METADATA_PREFIX) && path.ends_with(METADATA_SUFFIX) {
                        visit(&path, &mut entry)?;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn scan_all(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut seen = Vec::new();
        PomPropertiesScanner::new(Cursor::new(bytes))
            .scan(|path, entry| {
                let mut contents = String::new();
                entry.read_to_string(&mut contents).unwrap();
                seen.push((path.to_string(), contents));
                Ok(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn test_yields_only_build_metadata_entries() {
        let bytes = archive(&[
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
            ("META-INF/maven/g/a/pom.properties", "groupId=g\n"),
            ("META-INF/maven/g/a/pom.xml", "<project/>"),
            ("com/example/Example.class", "\u{0}"),
            ("META-INF/maven/g/b/pom.properties", "groupId=h\n"),
        ]);

        let seen = scan_all(bytes);

        assert_eq!(
            seen,
            vec![
                (
                    "META-INF/maven/g/a/pom.properties".to_string(),
                    "groupId=g\n".to_string()
                ),
                (
                    "META-INF/maven/g/b/pom.properties".to_string(),
                    "groupId=h\n".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_prefix_and_suffix_must_both_match() {
        let bytes = archive(&[
            ("META-INF/maven/pom.properties", "top level, no artifact dir"),
            ("other/META-INF/maven/g/a/pom.properties", "wrong prefix"),
            ("META-INF/maven/g/a/pom.properties.bak", "wrong suffix"),
        ]);

        assert!(scan_all(bytes).is_empty());
    }

    #[test]
    fn test_garbage_stream_fails() {
        let result = PomPropertiesScanner::new(Cursor::new(b"not a zip".to_vec()))
            .scan(|_, _| Ok(()));

        assert!(result.is_err());
    }

    #[test]
    fn test_visitor_error_aborts_scan() {
        let bytes = archive(&[
            ("META-INF/maven/g/a/pom.properties", "groupId=g\n"),
            ("META-INF/maven/g/b/pom.properties", "groupId=h\n"),
        ]);

        let mut visits = 0;
        let result = PomPropertiesScanner::new(Cursor::new(bytes)).scan(|_, _| {
            visits += 1;
            Err(crate::utils::error::SourceRefError::MalformedMetadata {
                reason: "stop".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(visits, 1);
    }
}
