//! Feature table writer
//!
//! Schema: `Length,Pitch_0..Pitch_9,RMS_0..RMS_9,Type`. `Length` is integer
//! milliseconds, the 20 feature columns are fixed six-decimal floats and
//! `Type` is the category label. Rows are written in arrival order.

use crate::error::TableError;
use crate::models::{FeatureRecord, CHUNK_COUNT};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tokio::sync::mpsc;

/// Column count: length + pitch + rms + label
pub const COLUMN_COUNT: usize = 2 + 2 * CHUNK_COUNT;

/// Header row of the feature table
pub fn table_header() -> Vec<String> {
    let mut header = Vec::with_capacity(COLUMN_COUNT);
    header.push("Length".to_string());
    header.extend((0..CHUNK_COUNT).map(|i| format!("Pitch_{}", i)));
    header.extend((0..CHUNK_COUNT).map(|i| format!("RMS_{}", i)));
    header.push("Type".to_string());
    header
}

/// Render one record as table fields
pub fn record_fields(record: &FeatureRecord) -> Vec<String> {
    let mut fields = Vec::with_capacity(COLUMN_COUNT);
    fields.push(record.length_ms.to_string());
    fields.extend(record.pitch.iter().map(|v| format!("{:.6}", v)));
    fields.extend(record.rms.iter().map(|v| format!("{:.6}", v)));
    fields.push(record.label.clone());
    fields
}

/// Streaming table writer over any byte sink
pub struct TableWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl TableWriter<BufWriter<File>> {
    /// Create (or truncate) the table file at `path` and write the header
    pub fn create(path: &Path) -> Result<Self, TableError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> TableWriter<W> {
    /// Wrap `inner` and write the header row
    pub fn new(inner: W) -> Result<Self, TableError> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(table_header())?;
        Ok(Self { writer, rows: 0 })
    }

    /// Append one record
    pub fn write_record(&mut self, record: &FeatureRecord) -> Result<(), TableError> {
        self.writer.write_record(record_fields(record))?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying sink
    pub fn finish(self) -> Result<W, TableError> {
        let mut inner = self
            .writer
            .into_inner()
            .map_err(|e| TableError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
        inner.flush()?;
        Ok(inner)
    }
}

/// Write every record received on `rx` until the queue closes
///
/// Blocking; run on a blocking thread. Returns the writer so the caller
/// decides when to finish it.
pub fn drain_into<W: Write>(
    mut rx: mpsc::Receiver<FeatureRecord>,
    mut table: TableWriter<W>,
) -> Result<TableWriter<W>, TableError> {
    while let Some(record) = rx.blocking_recv() {
        table.write_record(&record)?;
    }
    Ok(table)
}
