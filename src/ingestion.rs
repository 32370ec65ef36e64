//! Consumption side of example generation.
//!
//! Pulls every example of a split, checks it against the declared schema,
//! and rejects duplicate identifiers. A failing split yields nothing.

use std::collections::HashSet;
use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::data::{ExampleId, ExampleRecord};
use crate::errors::DatasetError;
use crate::schema::DatasetInfo;
use crate::source::SplitGenerator;
use crate::splits::SplitLabel;

/// Fully validated examples of one split, in generation order.
#[derive(Clone, Debug)]
pub struct IngestedSplit {
    /// Split the examples belong to.
    pub split: SplitLabel,
    /// Validated `(id, record)` pairs.
    pub examples: Vec<(ExampleId, ExampleRecord)>,
}

impl IngestedSplit {
    /// Number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True when the split produced no examples.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Example ids in generation order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.examples.iter().map(|(id, _)| id.as_str())
    }
}

/// Pull, validate, and collect every example of `generator`.
pub fn ingest_split(
    info: &DatasetInfo,
    generator: &SplitGenerator,
) -> Result<IngestedSplit, DatasetError> {
    let mut seen = HashSet::with_capacity(generator.examples.len());
    let mut examples = Vec::with_capacity(generator.examples.len());
    for (id, record) in generator.examples.iter() {
        info.features.validate(&id, &record)?;
        if !seen.insert(id.clone()) {
            return Err(DatasetError::DuplicateId {
                split: generator.split,
                id,
            });
        }
        examples.push((id, record));
    }
    info!(
        "[sign_datasets:ingest] {} {}: {} examples",
        info.name,
        generator.split,
        examples.len()
    );
    Ok(IngestedSplit {
        split: generator.split,
        examples,
    })
}

#[derive(Serialize)]
struct JsonlLine<'a> {
    id: &'a str,
    split: SplitLabel,
    record: &'a ExampleRecord,
}

/// Write one JSON object per example: `{"id", "split", "record"}`.
pub fn write_jsonl<W: Write>(split: &IngestedSplit, mut writer: W) -> Result<usize, DatasetError> {
    for (id, record) in &split.examples {
        let line = JsonlLine {
            id,
            split: split.split,
            record,
        };
        serde_json::to_writer(&mut writer, &line).map_err(std::io::Error::from)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(split.examples.len())
}
