use std::fs;
use std::path::Path;

use sign_language_datasets::constants::how2sign::SPLIT_URLS;
use sign_language_datasets::{
    DatasetBuilder, DatasetConfig, DatasetError, FeatureValue, How2Sign, MirrorDownloadManager,
    PoseFormat, SplitLabel, ingest_split,
};
use tempfile::tempdir;

fn touch(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), b"").unwrap();
}

/// Mirror every split archive onto local directories under `root`.
///
/// Only the train split gets clips; validation and test stay empty.
fn mirrored_corpus(root: &Path) -> MirrorDownloadManager {
    let mut mirror = MirrorDownloadManager::new(root.join("extracted"));
    for (split, urls) in SPLIT_URLS {
        let base = root.join(split.as_str());
        let front = base.join("front");
        let side = base.join("side");
        let keypoints = base.join("keypoints");
        for dir in [&front, &side, &keypoints] {
            fs::create_dir_all(dir).unwrap();
        }
        if split == SplitLabel::Train {
            touch(&front, "g0-1-rgb_front.mp4");
            touch(&front, "a9-3-rgb_front.mp4");
            touch(&front, "notes.txt");
            touch(&side, "a9-3-rgb_side.mp4");
            fs::create_dir_all(keypoints.join("openpose_output/json/a9-3-rgb_front")).unwrap();
        }
        mirror.insert(urls.rgb_clips_front, front);
        mirror.insert(urls.rgb_clips_side, side);
        mirror.insert(urls.bfh_2d_front, keypoints);
    }
    mirror
}

#[test]
fn one_example_per_front_clip_with_nested_views() {
    let temp = tempdir().unwrap();
    let mirror = mirrored_corpus(temp.path());
    let builder = How2Sign::new(How2Sign::default_config());
    let info = builder.info().unwrap();
    let generators = builder.split_generators(&mirror).unwrap();

    let splits: Vec<SplitLabel> = generators.iter().map(|generator| generator.split).collect();
    assert_eq!(
        splits,
        vec![SplitLabel::Train, SplitLabel::Validation, SplitLabel::Test]
    );
    assert!(generators[1].examples.is_empty());
    assert!(generators[2].examples.is_empty());

    let train = ingest_split(&info, &generators[0]).unwrap();
    assert_eq!(train.ids().collect::<Vec<_>>(), vec!["a9-3", "g0-1"]);

    let (_, a9) = &train.examples[0];
    assert_eq!(a9.get("fps"), Some(&FeatureValue::Int(24)));
    let Some(FeatureValue::Nested(video)) = a9.get("video") else {
        panic!("video should be nested");
    };
    assert!(matches!(video.get("side"), Some(FeatureValue::Video(_))));
    let Some(FeatureValue::Nested(pose)) = a9.get("pose") else {
        panic!("pose should be nested");
    };
    let Some(FeatureValue::Pose(front)) = pose.get("front") else {
        panic!("a9-3 has keypoints");
    };
    assert_eq!(
        front.format,
        PoseFormat::OpenPoseDirectory {
            fps: 24,
            width: 1280,
            height: 720
        }
    );

    let (_, g0) = &train.examples[1];
    let Some(FeatureValue::Nested(video)) = g0.get("video") else {
        panic!("video should be nested");
    };
    assert_eq!(video.get("side"), Some(&FeatureValue::Null));
    let Some(FeatureValue::Nested(pose)) = g0.get("pose") else {
        panic!("pose should be nested");
    };
    assert_eq!(pose.get("front"), Some(&FeatureValue::Null));
}

#[test]
fn metadata_only_config_fetches_front_clips_only() {
    let temp = tempdir().unwrap();
    let mut mirror = MirrorDownloadManager::new(temp.path().join("extracted"));
    for (split, urls) in SPLIT_URLS {
        let front = temp.path().join(split.as_str());
        touch(&front, &format!("{split}-0-rgb_front.mp4"));
        mirror.insert(urls.rgb_clips_front, front);
    }

    let builder = How2Sign::new(DatasetConfig::new("metadata"));
    let info = builder.info().unwrap();
    assert!(!info.features.contains("video"));
    assert!(!info.features.contains("pose"));

    let generators = builder.split_generators(&mirror).unwrap();
    for generator in &generators {
        let split = ingest_split(&info, generator).unwrap();
        assert_eq!(
            split.ids().collect::<Vec<_>>(),
            vec![format!("{}-0", generator.split)]
        );
    }
}

#[test]
fn missing_front_archive_fails_generation() {
    let temp = tempdir().unwrap();
    let mirror = MirrorDownloadManager::new(temp.path().join("extracted"));
    let builder = How2Sign::new(DatasetConfig::new("metadata"));
    assert!(matches!(
        builder.split_generators(&mirror),
        Err(DatasetError::SourceUnavailable { .. })
    ));
}
