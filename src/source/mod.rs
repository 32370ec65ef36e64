//! Builder interface and lazy example production.
//!
//! Ownership model:
//! - `DatasetBuilder` is the loader-facing interface: it declares metadata and
//!   prepares one `SplitGenerator` per split.
//! - `IndexedExamples` exposes stable, index-based access to a split's examples.
//! - `ExampleProducer` turns an `IndexedExamples` into a restartable iterator.

use std::sync::Arc;

use crate::data::{ExampleId, ExampleRecord};
use crate::errors::DatasetError;
use crate::schema::DatasetInfo;
use crate::splits::SplitLabel;
use crate::transport::DownloadManager;

/// Concrete loaders.
pub mod datasets;

/// Loader interface implemented by every dataset.
///
/// `info` must be a pure function of the builder's config and must fail on
/// unsupported configuration before any download happens.
pub trait DatasetBuilder: Send + Sync {
    /// Registered dataset name.
    fn name(&self) -> &str;

    /// Metadata and feature schema for the active config.
    fn info(&self) -> Result<DatasetInfo, DatasetError>;

    /// Read manifests, fetch shared archives, and prepare one generator per split.
    ///
    /// A failure here fails every split; no partial output is produced.
    fn split_generators(
        &self,
        downloads: &dyn DownloadManager,
    ) -> Result<Vec<SplitGenerator>, DatasetError>;
}

/// Index-addressable example collection for one split.
///
/// `example_at(idx)` must return the same pair for the same index as long as
/// the manifest and asset directories are unchanged.
pub trait IndexedExamples: Send + Sync {
    /// Number of examples.
    fn len(&self) -> usize;
    /// Build the example at `idx` (`idx < len()`).
    fn example_at(&self, idx: usize) -> (ExampleId, ExampleRecord);

    /// True when there are no examples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pre-built examples held in memory.
pub struct VecExamples {
    examples: Vec<(ExampleId, ExampleRecord)>,
}

impl VecExamples {
    /// Wrap prepared examples.
    pub fn new(examples: Vec<(ExampleId, ExampleRecord)>) -> Self {
        Self { examples }
    }
}

impl IndexedExamples for VecExamples {
    fn len(&self) -> usize {
        self.examples.len()
    }

    fn example_at(&self, idx: usize) -> (ExampleId, ExampleRecord) {
        self.examples[idx].clone()
    }
}

/// Restartable producer of `(id, record)` pairs in manifest order.
///
/// Every call to `iter` starts from the first example; records are built on
/// pull and handed to the consumer by value.
#[derive(Clone)]
pub struct ExampleProducer {
    inner: Arc<dyn IndexedExamples>,
}

impl ExampleProducer {
    /// Producer over index-addressable examples.
    pub fn new(inner: impl IndexedExamples + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Producer over pre-built examples.
    pub fn from_examples(examples: Vec<(ExampleId, ExampleRecord)>) -> Self {
        Self::new(VecExamples::new(examples))
    }

    /// Number of examples per pass.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when a pass yields nothing.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Fresh pass over every example.
    pub fn iter(&self) -> Examples<'_> {
        Examples {
            inner: self.inner.as_ref(),
            next: 0,
            len: self.inner.len(),
        }
    }
}

/// Iterator returned by `ExampleProducer::iter`.
pub struct Examples<'a> {
    inner: &'a dyn IndexedExamples,
    next: usize,
    len: usize,
}

impl Iterator for Examples<'_> {
    type Item = (ExampleId, ExampleRecord);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let item = self.inner.example_at(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Examples<'_> {}

/// Prepared examples for one named split.
#[derive(Clone)]
pub struct SplitGenerator {
    /// Split being generated.
    pub split: SplitLabel,
    /// Examples of the split.
    pub examples: ExampleProducer,
}

impl SplitGenerator {
    /// Pair a split with its producer.
    pub fn new(split: SplitLabel, examples: ExampleProducer) -> Self {
        Self { split, examples }
    }
}
