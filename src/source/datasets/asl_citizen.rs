use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{DatasetConfig, PoseSource};
use crate::constants::asl_citizen::{
    ARCHIVE_ROOT, ARCHIVE_URL, HOLISTIC_POSES_URL, MIN_COLUMNS, NAME, SOURCE_FPS,
    SPLIT_MANIFESTS, SPLITS_DIR, VIDEOS_DIR,
};
use crate::data::{ExampleId, ExampleRecord, FeatureValue};
use crate::errors::DatasetError;
use crate::manifest::{Manifest, ManifestReader, ManifestRow};
use crate::resolver::{Modalities, SplitAssets, resolve_file, resolve_pose_ref, strip_video_suffix};
use crate::schema::{DatasetInfo, Feature, FeatureSchema, PoseFeature, VideoFeature, stride};
use crate::source::{DatasetBuilder, ExampleProducer, SplitGenerator};
use crate::splits::SplitLabel;
use crate::transport::DownloadManager;
use crate::warning::dataset_warning;

const DESCRIPTION: &str = "The dataset contains about 84k video recordings of 2.7k isolated signs from American Sign Language (ASL).";

const CITATION: &str = r#"@article{desai2023asl,
  title={ASL Citizen: A Community-Sourced Dataset for Advancing Isolated Sign Language Recognition},
  author={Desai, Aashaka and Berger, Lauren and Minakov, Fyodor O and Milan, Vanessa and Singh, Chinmay and Pumphrey, Kriston and Ladner, Richard E and Daum{\'e} III, Hal and Lu, Alex X and Caselli, Naomi and Bragg, Danielle},
  journal={arXiv preprint arXiv:2304.05934},
  year={2023}
}"#;

const HOMEPAGE: &str = "https://www.microsoft.com/en-us/research/project/asl-citizen/";

/// Manifest columns.
const COL_SIGNER: usize = 0;
const COL_VIDEO: usize = 1;
const COL_GLOSS: usize = 2;
const COL_ASL_LEX: usize = 3;

/// Isolated-sign ASL dataset with holistic pose packs.
///
/// Manifests are read from `manifest_dir` when set, otherwise from the
/// `splits/` directory of the official archive.
pub struct AslCitizen {
    config: DatasetConfig,
    manifest_dir: Option<PathBuf>,
}

impl AslCitizen {
    /// Builder for `config`, reading manifests from the official archive.
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            manifest_dir: None,
        }
    }

    /// Read `train.csv`/`val.csv`/`test.csv` from a local directory.
    pub fn with_manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = Some(dir.into());
        self
    }

    /// The default config: holistic poses, no videos.
    pub fn default_config() -> DatasetConfig {
        DatasetConfig::new("default").with_pose(Some(PoseSource::Holistic))
    }

    fn modalities(&self) -> Result<Modalities, DatasetError> {
        let modalities = Modalities::from_config(&self.config);
        if let Some(source) = modalities.pose {
            pose_pack_url(source)?;
        }
        Ok(modalities)
    }

    fn archive_root(assets: &mut SplitAssets<'_>) -> Result<PathBuf, DatasetError> {
        let extracted = assets.root_for(ARCHIVE_URL)?;
        let nested = extracted.join(ARCHIVE_ROOT);
        Ok(if nested.is_dir() { nested } else { extracted })
    }

    fn read_split_manifest(
        manifest_dir: &Path,
        split: SplitLabel,
        file_name: &str,
    ) -> Result<Option<Manifest>, DatasetError> {
        let path = manifest_dir.join(file_name);
        if !path.is_file() {
            if split == SplitLabel::Train {
                return Err(DatasetError::Manifest {
                    path,
                    reason: "train manifest not found".to_string(),
                });
            }
            warn!(
                "[sign_datasets:{}] no {} manifest at {}; skipping split",
                NAME,
                split,
                path.display()
            );
            return Ok(None);
        }
        ManifestReader::new(MIN_COLUMNS).read_path(&path).map(Some)
    }
}

fn pose_pack_url(source: PoseSource) -> Result<&'static str, DatasetError> {
    match source {
        PoseSource::Holistic => Ok(HOLISTIC_POSES_URL),
        other => Err(DatasetError::Configuration(format!(
            "{NAME} has no '{other}' pose pack (available: holistic)"
        ))),
    }
}

/// Per-generation asset roots resolved before rows are enriched.
struct ResolvedRoots {
    pose: Option<(PoseSource, PathBuf)>,
    videos: Option<PathBuf>,
}

fn build_example(
    row: &ManifestRow,
    modalities: Modalities,
    roots: &ResolvedRoots,
) -> (ExampleId, ExampleRecord) {
    let id = row.position.to_string();
    let video_code = strip_video_suffix(row.field(COL_VIDEO));
    let mut record = ExampleRecord::new()
        .with("id", id.as_str())
        .with("video_code", video_code.as_str())
        .with("text", row.field(COL_GLOSS))
        .with("signer_id", row.field(COL_SIGNER))
        .with("asl_lex_code", row.field(COL_ASL_LEX));

    if modalities.video {
        let clip = roots
            .videos
            .as_deref()
            .and_then(|dir| resolve_file(dir, &format!("{video_code}.mp4")));
        record.insert("video", FeatureValue::video(clip));
    }
    if modalities.pose.is_some() {
        let pose = roots
            .pose
            .as_ref()
            .and_then(|(source, root)| resolve_pose_ref(root, &video_code, *source));
        record.insert("pose", FeatureValue::pose(pose));
    }
    (id, record)
}

impl DatasetBuilder for AslCitizen {
    fn name(&self) -> &str {
        NAME
    }

    fn info(&self) -> Result<DatasetInfo, DatasetError> {
        let modalities = self.modalities()?;
        let mut features = FeatureSchema::new()
            .with("id", Feature::Text)
            .with("video_code", Feature::Text)
            .with("text", Feature::Text)
            .with("signer_id", Feature::Text)
            .with("asl_lex_code", Feature::Text);

        if modalities.video {
            features.insert("video", Feature::Video(VideoFeature { frame_size: None }));
        }
        if let Some(source) = modalities.pose {
            let stride = stride(SOURCE_FPS, self.config.fps)?;
            features.insert(
                "pose",
                Feature::Pose(PoseFeature::new(
                    source,
                    source.layout(),
                    self.config.pose_header_path(source),
                    stride,
                )),
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
        if modalities.is_metadata_only() {
            debug!("[sign_datasets:{}] metadata-only config; no asset packs requested", NAME);
        }

        let needs_archive = self.manifest_dir.is_none() || modalities.video;
        let archive_root = if needs_archive {
            Some(Self::archive_root(&mut assets)?)
        } else {
            None
        };
        let manifest_dir = match (&self.manifest_dir, &archive_root) {
            (Some(dir), _) => dir.clone(),
            (None, Some(root)) => root.join(SPLITS_DIR),
            (None, None) => {
                return Err(DatasetError::Configuration(
                    "no manifest directory available".to_string(),
                ));
            }
        };

        let roots = ResolvedRoots {
            pose: match modalities.pose {
                Some(source) => Some((source, assets.root_for(pose_pack_url(source)?)?)),
                None => None,
            },
            videos: if modalities.video {
                archive_root.as_ref().map(|root| root.join(VIDEOS_DIR))
            } else {
                None
            },
        };

        let mut generators = Vec::new();
        for (split, file_name) in SPLIT_MANIFESTS {
            let Some(manifest) = Self::read_split_manifest(&manifest_dir, split, file_name)? else {
                continue;
            };
            let examples: Vec<(ExampleId, ExampleRecord)> = manifest
                .rows
                .iter()
                .map(|row| build_example(row, modalities, &roots))
                .collect();
            info!(
                "[sign_datasets:{}] {} split: {} examples ({} malformed rows skipped)",
                NAME,
                split,
                examples.len(),
                manifest.diagnostics.len()
            );
            generators.push(SplitGenerator::new(
                split,
                ExampleProducer::from_examples(examples),
            ));
        }
        Ok(generators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn row(position: usize, fields: &[&str]) -> ManifestRow {
        ManifestRow {
            position,
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }

    #[test]
    fn info_declares_pose_with_holistic_shape_and_stride() {
        let builder = AslCitizen::new(AslCitizen::default_config().with_fps(Some(15.0)));
        let info = builder.info().unwrap();
        let names: Vec<&str> = info.features.names().collect();
        assert_eq!(
            names,
            vec!["id", "video_code", "text", "signer_id", "asl_lex_code", "pose"]
        );
        let Some(Feature::Pose(pose)) = info.features.get("pose") else {
            panic!("pose feature missing");
        };
        assert_eq!(pose.shape, [None, Some(1), Some(576), Some(3)]);
        assert_eq!(pose.stride, 2.0);
    }

    #[test]
    fn info_rejects_unsupported_pose_pack() {
        let builder =
            AslCitizen::new(DatasetConfig::new("openpose").with_pose(Some(PoseSource::OpenPose)));
        assert!(matches!(
            builder.info(),
            Err(DatasetError::Configuration(_))
        ));
    }

    #[test]
    fn metadata_only_config_has_no_asset_fields() {
        let builder = AslCitizen::new(DatasetConfig::default());
        let info = builder.info().unwrap();
        assert!(!info.features.contains("pose"));
        assert!(!info.features.contains("video"));
    }

    #[test]
    fn example_fields_follow_manifest_columns() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("poses")).unwrap();
        fs::write(temp.path().join("poses/111-HELLO.pose"), b"pose").unwrap();
        let roots = ResolvedRoots {
            pose: Some((PoseSource::Holistic, temp.path().to_path_buf())),
            videos: None,
        };
        let modalities = Modalities {
            pose: Some(PoseSource::Holistic),
            video: false,
        };

        let (id, record) = build_example(
            &row(4, &["P9", "111-HELLO.mp4", "HELLO", "A_01"]),
            modalities,
            &roots,
        );
        assert_eq!(id, "4");
        assert_eq!(record.text("video_code"), Some("111-HELLO"));
        assert_eq!(record.text("text"), Some("HELLO"));
        assert_eq!(record.text("signer_id"), Some("P9"));
        assert_eq!(record.text("asl_lex_code"), Some("A_01"));
        assert!(matches!(record.get("pose"), Some(FeatureValue::Pose(_))));

        let (_, missing) = build_example(
            &row(5, &["P9", "222-BYE.mp4", "BYE", "A_02"]),
            modalities,
            &roots,
        );
        assert_eq!(missing.get("pose"), Some(&FeatureValue::Null));
    }
}
