use crate::domain::model::{Coordinate, HEADER_BUNDLE_SYMBOLIC_NAME, HEADER_BUNDLE_VERSION};
use crate::utils::error::Result;
use std::io::Write;

const KEY_SOURCE_REFERENCES: &str = "sourceReferences";

/// Incremental writer for the report document: a single top-level array of
/// per-bundle objects. Append-only; the document is written as produced and
/// never buffered whole, so an aborted run leaves a partial document.
pub struct JsonSink<W: Write> {
    out: W,
    bundles: usize,
    references: usize,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bundles: 0,
            references: 0,
        }
    }

    pub fn begin_document(&mut self) -> Result<()> {
        self.out.write_all(b"[")?;
        Ok(())
    }

    pub fn begin_bundle(&mut self, symbolic_name: &str, version: &str) -> Result<()> {
        if self.bundles > 0 {
            self.out.write_all(b",")?;
        }
        self.bundles += 1;
        self.references = 0;

        self.out.write_all(b"{")?;
        self.write_key(HEADER_BUNDLE_SYMBOLIC_NAME)?;
        serde_json::to_writer(&mut self.out, symbolic_name)?;
        self.out.write_all(b",")?;
        self.write_key(HEADER_BUNDLE_VERSION)?;
        serde_json::to_writer(&mut self.out, version)?;
        self.out.write_all(b",")?;
        self.write_key(KEY_SOURCE_REFERENCES)?;
        self.out.write_all(b"[")?;
        Ok(())
    }

    pub fn reference(&mut self, coordinate: &Coordinate) -> Result<()> {
        if self.references > 0 {
            self.out.write_all(b",")?;
        }
        self.references += 1;
        serde_json::to_writer(&mut self.out, coordinate)?;
        Ok(())
    }

    pub fn end_bundle(&mut self) -> Result<()> {
        self.out.write_all(b"]}")?;
        Ok(())
    }

    pub fn end_document(&mut self) -> Result<()> {
        self.out.write_all(b"]")?;
        self.out.flush()?;
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<()> {
        serde_json::to_writer(&mut self.out, key)?;
        self.out.write_all(b":")?;
        Ok(())
    }
}
