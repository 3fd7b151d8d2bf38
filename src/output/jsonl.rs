//! JSON-lines sink
//!
//! One serialized [`ItemRecord`] per line, written to any `Write`. The line is
//! serialized into a buffer first so a failed serialization never leaves half
//! a record in the output.

use crate::item::ItemRecord;
use crate::output::traits::{CrawlSummary, ItemSink, OutputResult};
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

/// Writes item records as JSON lines
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    written: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) a file at `path`
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl JsonLinesSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ItemSink for JsonLinesSink<W> {
    fn write_item(&mut self, item: &ItemRecord) -> OutputResult<()> {
        let mut line = serde_json::to_vec(item)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.written += 1;
        Ok(())
    }

    fn finalize(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn abort(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
