use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

/// A row type with a fixed column layout.
pub trait CsvRecord {
    const COLUMNS: &'static [&'static str];

    /// Cell values in `COLUMNS` order; absent values are empty strings.
    fn values(&self) -> Vec<String>;
}

/// Size and checksum of a written CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSummary {
    pub rows: u64,
    pub bytes: u64,
    pub sha256: String,
}

/// Write rows with a header line, skipping the `hidden` columns.
pub fn write_csv<R: CsvRecord>(
    path: &Path,
    rows: &[R],
    hidden: &[&str],
) -> Result<CsvSummary, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let hashing = HashingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(hashing);

    let visible: Vec<usize> = R::COLUMNS
        .iter()
        .enumerate()
        .filter(|(_, column)| !hidden.contains(column))
        .map(|(index, _)| index)
        .collect();

    let header: Vec<&str> = visible.iter().map(|index| R::COLUMNS[*index]).collect();
    writer.write_record(&header)?;

    for row in rows {
        let values = row.values();
        let record: Vec<&str> = visible
            .iter()
            .map(|index| values.get(*index).map(String::as_str).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let hashing = writer.into_inner().map_err(|err| err.into_error())?;
    let (bytes, sha256) = hashing.finish()?;
    Ok(CsvSummary {
        rows: rows.len() as u64,
        bytes,
        sha256,
    })
}

/// Hex SHA-256 of a file on disk.
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

pub(crate) fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

struct HashingWriter<W: Write> {
    inner: W,
    bytes: u64,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            hasher: Sha256::new(),
        }
    }

    fn finish(mut self) -> std::io::Result<(u64, String)> {
        self.inner.flush()?;
        Ok((self.bytes, hex::encode(self.hasher.finalize())))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.hasher.update(&buf[..size]);
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
