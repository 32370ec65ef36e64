use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::splits::SplitLabel;
use crate::types::{DatasetName, ExampleId};

/// Error type for configuration, asset, manifest, and ingestion failures.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A required archive or file could not be fetched.
    #[error("dataset '{dataset}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Dataset whose asset failed.
        dataset: DatasetName,
        /// Transport or filesystem detail.
        reason: String,
    },
    /// A manifest could not be opened or parsed.
    #[error("manifest {} could not be read: {reason}", path.display())]
    Manifest {
        /// Manifest location.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
    /// Underlying filesystem or stream failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Unsupported or inconsistent builder configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A generated record does not match the declared features.
    #[error("example '{id}' does not match the declared features: {details}")]
    SchemaViolation {
        /// Offending example.
        id: ExampleId,
        /// Mismatch description.
        details: String,
    },
    /// Two examples of one split share an identifier.
    #[error("duplicate example id '{id}' in split '{split}'")]
    DuplicateId {
        /// Split being ingested.
        split: SplitLabel,
        /// Repeated identifier.
        id: ExampleId,
    },
}
