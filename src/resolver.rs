//! Naming conventions that map manifest rows to asset paths.
//!
//! Missing optional assets resolve to `None`; only unreachable archives are errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{DatasetConfig, PoseSource};
use crate::constants::manifest::VIDEO_SUFFIX;
use crate::constants::pose::{POSE_EXTENSION, POSE_SUBDIR};
use crate::data::{PoseFormat, PoseRef};
use crate::errors::DatasetError;
use crate::transport::DownloadManager;
use crate::types::{ClipId, RemoteUrl};

/// Optional modalities requested by a builder config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Modalities {
    /// Pose pack to attach, if any.
    pub pose: Option<PoseSource>,
    /// Whether clip paths are attached.
    pub video: bool,
}

impl Modalities {
    /// Modalities requested by `config`.
    pub fn from_config(config: &DatasetConfig) -> Self {
        Self {
            pose: config.include_pose,
            video: config.include_video,
        }
    }

    /// True when neither poses nor videos are requested.
    pub fn is_metadata_only(&self) -> bool {
        self.pose.is_none() && !self.video
    }
}

/// Remove a trailing `.mp4` from a clip identifier.
pub fn strip_video_suffix(raw: &str) -> ClipId {
    raw.strip_suffix(VIDEO_SUFFIX).unwrap_or(raw).to_string()
}

/// `<pose_root>/poses/<clip>.pose`, whether or not it exists.
pub fn pose_file_path(pose_root: &Path, clip: &str) -> PathBuf {
    pose_root
        .join(POSE_SUBDIR)
        .join(format!("{clip}.{POSE_EXTENSION}"))
}

/// Existing `.pose` file for `clip`, or `None` when the pack lacks it.
pub fn resolve_pose_file(pose_root: &Path, clip: &str) -> Option<PathBuf> {
    let path = pose_file_path(pose_root, clip);
    if path.is_file() {
        Some(path)
    } else {
        debug!(
            "[sign_datasets:resolver] pose file missing for clip '{}': {}",
            clip,
            path.display()
        );
        None
    }
}

/// Reference to the `.pose` file for `clip`, or `None` when missing.
pub fn resolve_pose_ref(pose_root: &Path, clip: &str, source: PoseSource) -> Option<PoseRef> {
    resolve_pose_file(pose_root, clip).map(|path| PoseRef {
        path,
        source,
        format: PoseFormat::PoseFile,
    })
}

/// Existing file `<dir>/<name>`, or `None`.
pub fn resolve_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_file().then_some(path)
}

/// Existing directory `<dir>/<name>`, or `None`.
pub fn resolve_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_dir().then_some(path)
}

/// Clip id encoded in a file name before `marker` (e.g. `abc-5-rgb_front.mp4` -> `abc-5`).
pub fn clip_id_before_marker(path: &Path, marker: &str) -> Option<ClipId> {
    let name = path.file_name()?.to_str()?;
    let (id, _) = name.split_once(marker)?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Archive roots fetched during one generation run.
///
/// Each URL goes through the download manager at most once; later rows and
/// splits reuse the cached directory.
pub struct SplitAssets<'a> {
    downloads: &'a dyn DownloadManager,
    roots: HashMap<RemoteUrl, PathBuf>,
}

impl<'a> SplitAssets<'a> {
    /// Empty cache backed by `downloads`.
    pub fn new(downloads: &'a dyn DownloadManager) -> Self {
        Self {
            downloads,
            roots: HashMap::new(),
        }
    }

    /// Extracted root for `url`, fetching it on first use.
    pub fn root_for(&mut self, url: &str) -> Result<PathBuf, DatasetError> {
        if let Some(root) = self.roots.get(url) {
            return Ok(root.clone());
        }
        let root = self.downloads.download_and_extract(url)?;
        self.roots.insert(url.to_string(), root.clone());
        Ok(root)
    }

    /// Number of distinct archives resolved so far.
    pub fn resolved_count(&self) -> usize {
        self.roots.len()
    }
}
