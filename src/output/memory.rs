//! In-memory and fan-out sinks

use crate::item::ItemRecord;
use crate::output::traits::{CrawlSummary, ItemSink, OutputResult, TaskFailure};

/// Collects everything in memory, for library use and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    pub items: Vec<ItemRecord>,
    pub failures: Vec<TaskFailure>,

    /// Set by `finalize` or `abort`
    pub summary: Option<CrawlSummary>,

    /// Whether the crawl ended through `abort`
    pub aborted: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemSink for MemorySink {
    fn write_item(&mut self, item: &ItemRecord) -> OutputResult<()> {
        self.items.push(item.clone());
        Ok(())
    }

    fn record_failure(&mut self, failure: &TaskFailure) -> OutputResult<()> {
        self.failures.push(failure.clone());
        Ok(())
    }

    fn finalize(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }

    fn abort(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        self.summary = Some(summary.clone());
        self.aborted = true;
        Ok(())
    }
}

/// Forwards every call to each inner sink in order
///
/// Stops at the first sink that errors, except for `abort`, which reaches
/// every sink and reports the first error.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Box<dyn ItemSink>>,
}

impl FanOutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn ItemSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ItemSink for FanOutSink {
    fn write_item(&mut self, item: &ItemRecord) -> OutputResult<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.write_item(item))
    }

    fn record_failure(&mut self, failure: &TaskFailure) -> OutputResult<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.record_failure(failure))
    }

    fn finalize(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.finalize(summary))
    }

    fn abort(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.abort(summary) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
