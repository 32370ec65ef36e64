//! Feature schemas and dataset metadata.
//!
//! A schema is a pure function of the builder configuration: loaders declare
//! it once in `DatasetBuilder::info`, and ingestion validates every produced
//! record against it.

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{PoseLayout, PoseSource};
use crate::data::{ExampleRecord, FeatureValue};
use crate::errors::DatasetError;
use crate::types::{DatasetName, FieldName};

/// Frame-subsampling factor for a requested output rate.
///
/// `None` keeps every frame. Requests above the capture rate (stride below 1)
/// and non-positive rates are rejected rather than upsampled.
pub fn stride(source_fps: f32, requested_fps: Option<f32>) -> Result<f32, DatasetError> {
    let Some(fps) = requested_fps else {
        return Ok(1.0);
    };
    if !fps.is_finite() || fps <= 0.0 {
        return Err(DatasetError::Configuration(format!(
            "requested fps must be a positive number, got {fps}"
        )));
    }
    if fps > source_fps {
        return Err(DatasetError::Configuration(format!(
            "requested fps {fps} exceeds the capture rate {source_fps}; upsampling is not supported"
        )));
    }
    Ok(source_fps / fps)
}

/// Pose tensor declaration: `[frames, people, points, dims]` plus header and stride.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseFeature {
    /// Tensor shape; `None` marks a variable-length axis.
    pub shape: [Option<usize>; 4],
    /// Header file describing the pose components.
    pub header_path: PathBuf,
    /// Frame-subsampling factor applied when reading.
    pub stride: f32,
    /// Pose estimation system that produced the data.
    pub source: PoseSource,
}

impl PoseFeature {
    /// Declare a variable-length pose feature for `layout`.
    pub fn new(source: PoseSource, layout: PoseLayout, header_path: PathBuf, stride: f32) -> Self {
        Self {
            shape: [
                None,
                Some(layout.people),
                Some(layout.points),
                Some(layout.dims),
            ],
            header_path,
            stride,
            source,
        }
    }
}

/// Video declaration (clips are referenced by path, not decoded).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VideoFeature {
    /// Frame size `(width, height)` when known.
    pub frame_size: Option<(u32, u32)>,
}

/// Semantic type of one declared field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feature {
    /// UTF-8 text.
    Text,
    /// Integer that fits in 32 bits.
    Int32,
    /// Pose sequence reference; may be null.
    Pose(PoseFeature),
    /// Video clip reference; may be null.
    Video(VideoFeature),
    /// Group of named sub-features.
    Nested {
        /// Sub-feature declarations.
        fields: FeatureSchema,
    },
}

impl Feature {
    /// Asset-backed features may be null when the asset is missing.
    fn accepts_null(&self) -> bool {
        matches!(self, Feature::Pose(_) | Feature::Video(_))
    }

    fn check(&self, path: &str, value: &FeatureValue) -> Result<(), String> {
        match (self, value) {
            (feature, FeatureValue::Null) if feature.accepts_null() => Ok(()),
            (Feature::Text, FeatureValue::Text(_)) => Ok(()),
            (Feature::Int32, FeatureValue::Int(value)) => i32::try_from(*value)
                .map(|_| ())
                .map_err(|_| format!("field '{path}' value {value} does not fit in int32")),
            (Feature::Pose(_), FeatureValue::Pose(_)) => Ok(()),
            (Feature::Video(_), FeatureValue::Video(_)) => Ok(()),
            (Feature::Nested { fields }, FeatureValue::Nested(record)) => {
                fields.check_record(path, record)
            }
            (feature, value) => Err(format!(
                "field '{path}' expected {} but found {}",
                feature.type_name(),
                value_type_name(value)
            )),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Feature::Text => "text",
            Feature::Int32 => "int32",
            Feature::Pose(_) => "pose",
            Feature::Video(_) => "video",
            Feature::Nested { .. } => "nested",
        }
    }
}

fn value_type_name(value: &FeatureValue) -> &'static str {
    match value {
        FeatureValue::Null => "null",
        FeatureValue::Text(_) => "text",
        FeatureValue::Int(_) => "int",
        FeatureValue::Pose(_) => "pose",
        FeatureValue::Video(_) => "video",
        FeatureValue::Nested(_) => "nested",
    }
}

/// Ordered feature declarations.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    fields: IndexMap<FieldName, Feature>,
}

impl FeatureSchema {
    /// Empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field, returning `self` for chaining.
    pub fn with(mut self, name: impl Into<FieldName>, feature: Feature) -> Self {
        self.fields.insert(name.into(), feature);
        self
    }

    /// Declare or replace a field.
    pub fn insert(&mut self, name: impl Into<FieldName>, feature: Feature) {
        self.fields.insert(name.into(), feature);
    }

    /// Declaration of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.fields.get(name)
    }

    /// True when `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Check that `record` carries exactly the declared fields with compatible values.
    pub fn validate(&self, id: &str, record: &ExampleRecord) -> Result<(), DatasetError> {
        self.check_record("", record)
            .map_err(|details| DatasetError::SchemaViolation {
                id: id.to_string(),
                details,
            })
    }

    fn check_record(&self, prefix: &str, record: &ExampleRecord) -> Result<(), String> {
        for (name, feature) in &self.fields {
            let path = join_path(prefix, name);
            match record.get(name) {
                Some(value) => feature.check(&path, value)?,
                None => return Err(format!("missing field '{path}'")),
            }
        }
        for (name, _) in record.iter() {
            if !self.fields.contains_key(name) {
                return Err(format!(
                    "undeclared field '{}'",
                    join_path(prefix, name)
                ));
            }
        }
        Ok(())
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Static metadata describing a dataset and its feature schema.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetInfo {
    /// Registered dataset name.
    pub name: DatasetName,
    /// Name of the active builder config.
    pub config_name: String,
    /// Dataset version.
    pub version: &'static str,
    /// `(version, note)` pairs.
    pub release_notes: Vec<(&'static str, &'static str)>,
    /// Short description.
    pub description: &'static str,
    /// BibTeX citation.
    pub citation: &'static str,
    /// Project homepage.
    pub homepage: &'static str,
    /// Feature schema every example conforms to.
    pub features: FeatureSchema,
    /// `(input, target)` fields for supervised use, if any.
    pub supervised_keys: Option<(FieldName, FieldName)>,
}
