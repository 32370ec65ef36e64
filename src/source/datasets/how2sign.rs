use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{DatasetConfig, PoseSource};
use crate::constants::how2sign::{
    FRAME_HEIGHT, FRAME_WIDTH, FRONT_MARKER, NAME, OPENPOSE_JSON_DIR, SIDE_MARKER, SOURCE_FPS,
    SPLIT_URLS,
};
use crate::data::{ExampleId, ExampleRecord, FeatureValue, PoseFormat, PoseRef};
use crate::errors::DatasetError;
use crate::resolver::{Modalities, SplitAssets, clip_id_before_marker, resolve_dir};
use crate::schema::{DatasetInfo, Feature, FeatureSchema, PoseFeature, VideoFeature, stride};
use crate::source::{DatasetBuilder, ExampleProducer, IndexedExamples, SplitGenerator};
use crate::transport::DownloadManager;
use crate::transport::fs::{has_extension, sorted_files};
use crate::types::ClipId;
use crate::warning::dataset_warning;

const DESCRIPTION: &str = "A multimodal and multiview continuous American Sign Language (ASL) dataset, \
consisting of a parallel corpus of more than 80 hours of sign language videos and a set of corresponding modalities \
including speech, English transcripts, and depth.";

const CITATION: &str = r#"@inproceedings{Duarte_CVPR2021,
    title={{How2Sign: A Large-scale Multimodal Dataset for Continuous American Sign Language}},
    author={Duarte, Amanda and Palaskar, Shruti and Ventura, Lucas and Ghadiyaram, Deepti and DeHaan, Kenneth and
                   Metze, Florian and Torres, Jordi and Giro-i-Nieto, Xavier},
    booktitle={Conference on Computer Vision and Pattern Recognition (CVPR)},
    year={2021}
}"#;

const HOMEPAGE: &str = "https://how2sign.github.io/";

/// Continuous ASL dataset with front/side clips and OpenPose keypoints.
pub struct How2Sign {
    config: DatasetConfig,
}

impl How2Sign {
    /// Builder for `config`.
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    /// The default config: videos and OpenPose keypoints.
    pub fn default_config() -> DatasetConfig {
        DatasetConfig::new("default")
            .with_video(true)
            .with_pose(Some(PoseSource::OpenPose))
    }

    fn modalities(&self) -> Result<Modalities, DatasetError> {
        let modalities = Modalities::from_config(&self.config);
        match modalities.pose {
            None | Some(PoseSource::OpenPose) => Ok(modalities),
            Some(other) => Err(DatasetError::Configuration(format!(
                "{NAME} has no '{other}' keypoints (available: openpose)"
            ))),
        }
    }
}

/// Front clips keyed by id, in file-name order.
fn front_clips(root: &Path) -> Vec<(ClipId, PathBuf)> {
    sorted_files(root, true, |path| has_extension(path, "mp4"))
        .into_iter()
        .filter_map(|path| match clip_id_before_marker(&path, FRONT_MARKER) {
            Some(id) => Some((id, path)),
            None => {
                debug!(
                    "[sign_datasets:{}] ignoring file without '{}' marker: {}",
                    NAME,
                    FRONT_MARKER,
                    path.display()
                );
                None
            }
        })
        .collect()
}

fn side_clips(root: &Path) -> HashMap<ClipId, PathBuf> {
    sorted_files(root, true, |path| has_extension(path, "mp4"))
        .into_iter()
        .filter_map(|path| clip_id_before_marker(&path, SIDE_MARKER).map(|id| (id, path)))
        .collect()
}

/// Lazily enriched examples for one split.
struct How2SignExamples {
    clips: Vec<(ClipId, PathBuf)>,
    side: HashMap<ClipId, PathBuf>,
    keypoints_root: Option<PathBuf>,
    modalities: Modalities,
}

impl How2SignExamples {
    fn openpose_dir(&self, id: &str) -> Option<PathBuf> {
        let root = self.keypoints_root.as_ref()?;
        let json_root = OPENPOSE_JSON_DIR
            .iter()
            .fold(root.clone(), |dir, segment| dir.join(segment));
        resolve_dir(&json_root, &format!("{id}{FRONT_MARKER}"))
    }
}

impl IndexedExamples for How2SignExamples {
    fn len(&self) -> usize {
        self.clips.len()
    }

    fn example_at(&self, idx: usize) -> (ExampleId, ExampleRecord) {
        let (id, front) = &self.clips[idx];
        let mut record = ExampleRecord::new()
            .with("id", id.as_str())
            .with("fps", SOURCE_FPS as i64);

        if self.modalities.video {
            let videos = ExampleRecord::new()
                .with("front", FeatureValue::video(Some(front.clone())))
                .with("side", FeatureValue::video(self.side.get(id).cloned()));
            record.insert("video", videos);
        }
        if self.modalities.pose.is_some() {
            let front_pose = self.openpose_dir(id).map(|path| PoseRef {
                path,
                source: PoseSource::OpenPose,
                format: PoseFormat::OpenPoseDirectory {
                    fps: SOURCE_FPS as u32,
                    width: FRAME_WIDTH,
                    height: FRAME_HEIGHT,
                },
            });
            record.insert(
                "pose",
                ExampleRecord::new().with("front", FeatureValue::pose(front_pose)),
            );
        }
        (id.clone(), record)
    }
}

impl DatasetBuilder for How2Sign {
    fn name(&self) -> &str {
        NAME
    }

    fn info(&self) -> Result<DatasetInfo, DatasetError> {
        let modalities = self.modalities()?;
        let mut features = FeatureSchema::new()
            .with("id", Feature::Text)
            .with("fps", Feature::Int32);

        if modalities.video {
            let video = || {
                Feature::Video(VideoFeature {
                    frame_size: Some((FRAME_WIDTH, FRAME_HEIGHT)),
                })
            };
            features.insert(
                "video",
                Feature::Nested {
                    fields: FeatureSchema::new()
                        .with("front", video())
                        .with("side", video()),
                },
            );
        }
        if let Some(source) = modalities.pose {
            let stride = stride(SOURCE_FPS, self.config.fps)?;
            let pose = PoseFeature::new(
                source,
                source.layout(),
                self.config.pose_header_path(source),
                stride,
            );
            features.insert(
                "pose",
                Feature::Nested {
                    fields: FeatureSchema::new().with("front", Feature::Pose(pose)),
                },
            );
        }

        Ok(DatasetInfo {
            name: NAME.to_string(),
            config_name: self.config.name.clone(),
            version: "1.0.0",
            release_notes: vec![("1.0.0", "Initial release.")],
            description: DESCRIPTION,
            citation: CITATION,
            homepage: HOMEPAGE,
            features,
            supervised_keys: None,
        })
    }

    fn split_generators(
        &self,
        downloads: &dyn DownloadManager,
    ) -> Result<Vec<SplitGenerator>, DatasetError> {
        let info = self.info()?;
        dataset_warning(&info);
        let modalities = self.modalities()?;
        let mut assets = SplitAssets::new(downloads);

        let mut generators = Vec::new();
        for (split, urls) in SPLIT_URLS {
            let front_root = assets.root_for(urls.rgb_clips_front)?;
            let clips = front_clips(&front_root);
            let side = if modalities.video {
                side_clips(&assets.root_for(urls.rgb_clips_side)?)
            } else {
                HashMap::new()
            };
            let keypoints_root = if modalities.pose.is_some() {
                Some(assets.root_for(urls.bfh_2d_front)?)
            } else {
                None
            };
            info!(
                "[sign_datasets:{}] {} split: {} front clips",
                NAME,
                split,
                clips.len()
            );
            generators.push(SplitGenerator::new(
                split,
                ExampleProducer::new(How2SignExamples {
                    clips,
                    side,
                    keypoints_root,
                    modalities,
                }),
            ));
        }
        Ok(generators)
    }
}
