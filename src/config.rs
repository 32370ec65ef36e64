use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::download::{CACHE_DIR_ENV, DEFAULT_CACHE_DIR, EXTRACTED_SUBDIR};
use crate::constants::pose::{
    HOLISTIC_DIMS, HOLISTIC_HEADER, HOLISTIC_POINTS, OPENPOSE_DIMS, OPENPOSE_HEADER,
    OPENPOSE_POINTS, PEOPLE,
};
use crate::errors::DatasetError;

/// Pose-estimation system a pose pack was produced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoseSource {
    /// MediaPipe Holistic (`576 x 3` keypoints).
    Holistic,
    /// OpenPose (`137 x 2` keypoints).
    OpenPose,
}

impl PoseSource {
    /// Canonical lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PoseSource::Holistic => "holistic",
            PoseSource::OpenPose => "openpose",
        }
    }

    /// Fixed keypoint layout produced by this source.
    pub const fn layout(&self) -> PoseLayout {
        match self {
            PoseSource::Holistic => PoseLayout {
                people: PEOPLE,
                points: HOLISTIC_POINTS,
                dims: HOLISTIC_DIMS,
            },
            PoseSource::OpenPose => PoseLayout {
                people: PEOPLE,
                points: OPENPOSE_POINTS,
                dims: OPENPOSE_DIMS,
            },
        }
    }

    /// File name of the pose header describing this source's components.
    pub const fn header_file(&self) -> &'static str {
        match self {
            PoseSource::Holistic => HOLISTIC_HEADER,
            PoseSource::OpenPose => OPENPOSE_HEADER,
        }
    }

    /// Parse an optional pose source; `none`, `off`, and empty input disable poses.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, DatasetError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" | "false" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl fmt::Display for PoseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoseSource {
    type Err = DatasetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "holistic" => Ok(PoseSource::Holistic),
            "openpose" => Ok(PoseSource::OpenPose),
            other => Err(DatasetError::Configuration(format!(
                "unknown pose source '{other}' (expected holistic or openpose)"
            ))),
        }
    }
}

/// Per-frame keypoint layout: people x points x coordinate dims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseLayout {
    /// People per frame.
    pub people: usize,
    /// Keypoints per person.
    pub points: usize,
    /// Coordinate dimensions per keypoint.
    pub dims: usize,
}

/// Builder configuration shared by all loaders.
#[derive(Clone, Debug)]
pub struct DatasetConfig {
    /// Config name reported in dataset metadata.
    pub name: String,
    /// Attach clip paths to each example.
    pub include_video: bool,
    /// Pose pack to attach, or `None` to skip poses.
    pub include_pose: Option<PoseSource>,
    /// Requested output frame rate; `None` keeps the capture rate.
    pub fps: Option<f32>,
    /// Directory holding pose header files (`holistic.poseheader`, `openpose.header`).
    pub pose_header_dir: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            include_video: false,
            include_pose: None,
            fps: None,
            pose_header_dir: PathBuf::from("assets"),
        }
    }
}

impl DatasetConfig {
    /// Create a named config with default modalities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Toggle video paths.
    pub fn with_video(mut self, include_video: bool) -> Self {
        self.include_video = include_video;
        self
    }

    /// Select the pose pack.
    pub fn with_pose(mut self, include_pose: Option<PoseSource>) -> Self {
        self.include_pose = include_pose;
        self
    }

    /// Request a target frame rate.
    pub fn with_fps(mut self, fps: Option<f32>) -> Self {
        self.fps = fps;
        self
    }

    /// Override where pose header files are looked up.
    pub fn with_pose_header_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pose_header_dir = dir.into();
        self
    }

    /// Path to the header file for `source`.
    pub fn pose_header_path(&self, source: PoseSource) -> PathBuf {
        self.pose_header_dir.join(source.header_file())
    }
}

/// Download cache layout used by `HttpDownloadManager`.
#[derive(Clone, Debug)]
pub struct DownloadConfig {
    /// Directory receiving downloaded files.
    pub cache_dir: PathBuf,
    /// Directory receiving extracted archives.
    pub extract_dir: PathBuf,
}

impl DownloadConfig {
    /// Root all download state under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        let cache_dir = cache_dir.into();
        let extract_dir = cache_dir.join(EXTRACTED_SUBDIR);
        Self {
            cache_dir,
            extract_dir,
        }
    }

    /// Resolve the cache root from `SIGN_DATASETS_CACHE_DIR`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(CACHE_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_CACHE_DIR),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_source_parses_known_names_and_rejects_others() {
        assert_eq!("Holistic".parse::<PoseSource>().unwrap(), PoseSource::Holistic);
        assert_eq!("openpose".parse::<PoseSource>().unwrap(), PoseSource::OpenPose);
        assert!(matches!(
            "alphapose".parse::<PoseSource>(),
            Err(DatasetError::Configuration(_))
        ));
    }

    #[test]
    fn optional_pose_source_accepts_disabled_spellings() {
        assert_eq!(PoseSource::parse_optional("none").unwrap(), None);
        assert_eq!(PoseSource::parse_optional("").unwrap(), None);
        assert_eq!(
            PoseSource::parse_optional("holistic").unwrap(),
            Some(PoseSource::Holistic)
        );
        assert!(PoseSource::parse_optional("mediapipe").is_err());
    }

    #[test]
    fn layouts_match_pose_sources() {
        let holistic = PoseSource::Holistic.layout();
        assert_eq!((holistic.people, holistic.points, holistic.dims), (1, 576, 3));
        let openpose = PoseSource::OpenPose.layout();
        assert_eq!((openpose.people, openpose.points, openpose.dims), (1, 137, 2));
    }

    #[test]
    fn header_path_is_joined_under_configured_dir() {
        let config = DatasetConfig::new("default").with_pose_header_dir("/opt/headers");
        assert_eq!(
            config.pose_header_path(PoseSource::OpenPose),
            PathBuf::from("/opt/headers/openpose.header")
        );
    }

    #[test]
    fn download_config_places_extractions_under_cache() {
        let config = DownloadConfig::new("/tmp/cache");
        assert_eq!(config.extract_dir, PathBuf::from("/tmp/cache/extracted"));
    }
}
