//! Flat ZIP archive writer

use crate::Result;
use std::fs::File;
use std::io::{self, BufReader, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// ZIP writer that stores every file under its bare file name
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    entries: Vec<String>,
}

impl ArchiveWriter<File> {
    /// Creates (or truncates) the archive at `path`
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Wraps a seekable writer.
    ///
    /// Entries are deflated and stamped with a fixed modification time so
    /// identical inputs produce identical archives.
    pub fn new(writer: W) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        Self {
            zip: ZipWriter::new(writer),
            options,
            entries: Vec::new(),
        }
    }

    /// Adds the file at `path` as an entry named after its file name
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

        let mut reader = BufReader::new(File::open(path)?);
        self.zip.start_file(name.as_str(), self.options)?;
        io::copy(&mut reader, &mut self.zip)?;
        self.entries.push(name);
        Ok(())
    }

    /// Writes the central directory and returns the entry names
    pub fn finish(self) -> Result<Vec<String>> {
        let mut writer = self.zip.finish()?;
        writer.flush()?;
        Ok(self.entries)
    }
}
