use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::PoseSource;

pub use crate::types::{ExampleId, FieldName};

/// How a referenced pose sequence is stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoseFormat {
    /// A serialized `.pose` artifact.
    PoseFile,
    /// A directory of per-frame OpenPose JSON files.
    OpenPoseDirectory {
        /// Capture frame rate.
        fps: u32,
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
    },
}

/// Non-owning reference to a pose sequence, resolved by the consumer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseRef {
    /// Location of the `.pose` file or keypoint directory.
    pub path: PathBuf,
    /// Pose estimation system that produced the sequence.
    pub source: PoseSource,
    /// On-disk layout of the sequence.
    pub format: PoseFormat,
}

/// Non-owning reference to a video clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    /// Location of the clip.
    pub path: PathBuf,
}

/// Value stored under one feature of an example record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Requested asset that is missing on disk.
    Null,
    /// Free text or identifier.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Pose sequence reference.
    Pose(PoseRef),
    /// Video clip reference.
    Video(VideoRef),
    /// Group of named sub-values (e.g. camera views).
    Nested(ExampleRecord),
}

impl FeatureValue {
    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    /// Wrap an optional pose reference, mapping `None` to `Null`.
    pub fn pose(pose: Option<PoseRef>) -> Self {
        pose.map(FeatureValue::Pose).unwrap_or(FeatureValue::Null)
    }

    /// Wrap an optional clip path, mapping `None` to `Null`.
    pub fn video(path: Option<PathBuf>) -> Self {
        path.map(|path| FeatureValue::Video(VideoRef { path }))
            .unwrap_or(FeatureValue::Null)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Int(value)
    }
}

/// Ordered field map produced for one example.
///
/// Field order follows insertion order, which loaders keep aligned with the
/// declared feature order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleRecord {
    fields: IndexMap<FieldName, FeatureValue>,
}

impl ExampleRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning `self` for chaining.
    pub fn with(mut self, name: impl Into<FieldName>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<FieldName>, value: impl Into<FeatureValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.get(name)
    }

    /// Text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FeatureValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FeatureValue)> {
        self.fields.iter()
    }
}

impl From<ExampleRecord> for FeatureValue {
    fn from(value: ExampleRecord) -> Self {
        FeatureValue::Nested(value)
    }
}
