#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner behind the `sign-datasets` binary.
pub mod cli;
/// Builder and download configuration types.
pub mod config;
/// Centralized constants: URLs, pose layouts, and cache defaults.
pub mod constants;
/// Example record and asset reference types.
pub mod data;
mod hash;
/// Schema validation and JSONL export of generated splits.
pub mod ingestion;
/// Header-prefixed manifest parsing.
pub mod manifest;
/// Asset naming conventions and per-run archive caching.
pub mod resolver;
/// Feature schemas, stride computation, and dataset metadata.
pub mod schema;
/// Builder interface, example producers, and concrete loaders.
pub mod source;
/// Split labels.
pub mod splits;
/// Download managers and filesystem helpers.
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Data-usage notices.
pub mod warning;

mod errors;

pub use config::{DatasetConfig, DownloadConfig, PoseLayout, PoseSource};
pub use data::{ExampleRecord, FeatureValue, PoseFormat, PoseRef, VideoRef};
pub use errors::DatasetError;
pub use ingestion::{IngestedSplit, ingest_split, write_jsonl};
pub use manifest::{Manifest, ManifestDiagnostic, ManifestReader, ManifestRow};
pub use schema::{DatasetInfo, Feature, FeatureSchema, PoseFeature, VideoFeature, stride};
pub use source::datasets::{AslCitizen, How2Sign, builder_for};
pub use source::{DatasetBuilder, ExampleProducer, IndexedExamples, SplitGenerator};
pub use splits::SplitLabel;
pub use transport::{DownloadManager, HttpDownloadManager, MirrorDownloadManager};
pub use types::{ClipId, DatasetName, ExampleId, FieldName, RemoteUrl};
