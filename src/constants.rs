use crate::splits::SplitLabel;

/// Constants used by split enumeration.
pub mod splits {
    use super::SplitLabel;

    /// All split labels in canonical generation order.
    pub const ALL_SPLITS: [SplitLabel; 3] =
        [SplitLabel::Train, SplitLabel::Validation, SplitLabel::Test];
}

/// Constants used by manifest parsing.
pub mod manifest {
    /// Default field delimiter for manifest files.
    pub const DEFAULT_DELIMITER: u8 = b',';
    /// Quote character honoured inside manifest fields.
    pub const QUOTE: u8 = b'"';
    /// Container suffix stripped from clip identifiers.
    pub const VIDEO_SUFFIX: &str = ".mp4";
}

/// Keypoint layouts and header files for supported pose sources.
pub mod pose {
    /// File extension of serialized pose artifacts.
    pub const POSE_EXTENSION: &str = "pose";
    /// Sub-directory of an extracted pose pack holding `.pose` files.
    pub const POSE_SUBDIR: &str = "poses";

    /// MediaPipe Holistic: face, body, and both hands.
    pub const HOLISTIC_POINTS: usize = 576;
    /// Holistic keypoints are `(x, y, z)`.
    pub const HOLISTIC_DIMS: usize = 3;
    /// Header file describing the Holistic component layout.
    pub const HOLISTIC_HEADER: &str = "holistic.poseheader";

    /// OpenPose BODY_25 + face + hands.
    pub const OPENPOSE_POINTS: usize = 137;
    /// OpenPose keypoints are `(x, y)`.
    pub const OPENPOSE_DIMS: usize = 2;
    /// Header file describing the OpenPose component layout.
    pub const OPENPOSE_HEADER: &str = "openpose.header";

    /// Single signer per clip.
    pub const PEOPLE: usize = 1;
}

/// Download cache defaults.
pub mod download {
    /// Environment variable overriding the download cache directory.
    pub const CACHE_DIR_ENV: &str = "SIGN_DATASETS_CACHE_DIR";
    /// Default cache directory (relative to the working directory).
    pub const DEFAULT_CACHE_DIR: &str = ".sign_datasets_cache";
    /// Sub-directory of the cache holding extracted archives.
    pub const EXTRACTED_SUBDIR: &str = "extracted";
    /// Suffix of in-progress downloads.
    pub const PARTIAL_SUFFIX: &str = "part";
    /// Copy buffer for streamed downloads.
    pub const DOWNLOAD_BUFFER_BYTES: usize = 8 * 1024 * 1024;
    /// Minimum seconds between progress log lines.
    pub const PROGRESS_INTERVAL_SECS: u64 = 2;
    /// Query parameter that skips the Google Drive virus-scan interstitial.
    pub const GOOGLE_DRIVE_CONFIRM: &str = "confirm=t";
    /// Host marker for Google Drive links.
    pub const GOOGLE_DRIVE_HOST: &str = "drive.google.com";
}

/// ASL Citizen remote assets and manifest layout.
pub mod asl_citizen {
    use crate::splits::SplitLabel;

    /// Registered dataset name.
    pub const NAME: &str = "asl_citizen";
    /// Official video archive (also contains the split manifests).
    pub const ARCHIVE_URL: &str = "https://download.microsoft.com/download/b/8/8/b88c0bae-e6c1-43e1-8726-98cf5af36ca4/ASL_Citizen.zip";
    /// Holistic pose pack.
    pub const HOLISTIC_POSES_URL: &str =
        "https://storage.googleapis.com/sign-language-datasets/poses/holistic/ASLCitizen.zip";
    /// Root directory inside the extracted archive.
    pub const ARCHIVE_ROOT: &str = "ASL_Citizen";
    /// Manifest directory inside the archive root.
    pub const SPLITS_DIR: &str = "splits";
    /// Clip directory inside the archive root.
    pub const VIDEOS_DIR: &str = "videos";
    /// Manifest columns: signer, clip file, gloss, ASL-LEX code.
    pub const MIN_COLUMNS: usize = 4;
    /// Capture rate of the recordings.
    pub const SOURCE_FPS: f32 = 30.0;
    /// Manifest file per split.
    pub const SPLIT_MANIFESTS: [(SplitLabel, &str); 3] = [
        (SplitLabel::Train, "train.csv"),
        (SplitLabel::Validation, "val.csv"),
        (SplitLabel::Test, "test.csv"),
    ];
}

/// How2Sign remote assets.
pub mod how2sign {
    use crate::splits::SplitLabel;

    /// Registered dataset name.
    pub const NAME: &str = "how2sign";
    /// Capture rate of the recordings.
    pub const SOURCE_FPS: f32 = 24.0;
    /// Frame width of the front/side clips.
    pub const FRAME_WIDTH: u32 = 1280;
    /// Frame height of the front/side clips.
    pub const FRAME_HEIGHT: u32 = 720;
    /// File-name marker of front-view clips.
    pub const FRONT_MARKER: &str = "-rgb_front";
    /// File-name marker of side-view clips.
    pub const SIDE_MARKER: &str = "-rgb_side";
    /// Path of per-clip OpenPose JSON directories inside a keypoint pack.
    pub const OPENPOSE_JSON_DIR: [&str; 2] = ["openpose_output", "json"];

    /// Remote archives for one split.
    #[derive(Clone, Copy, Debug)]
    pub struct SplitUrls {
        /// Front-camera RGB clips.
        pub rgb_clips_front: &'static str,
        /// Side-camera RGB clips.
        pub rgb_clips_side: &'static str,
        /// Front-camera body/face/hands 2D keypoints.
        pub bfh_2d_front: &'static str,
    }

    /// Archive table keyed by split.
    pub const SPLIT_URLS: [(SplitLabel, SplitUrls); 3] = [
        (
            SplitLabel::Train,
            SplitUrls {
                rgb_clips_front: "https://drive.google.com/uc?id=1VX7n0jjW0pW3GEdgOks3z8nqE6iI6EnW&export=download",
                rgb_clips_side: "https://drive.google.com/uc?id=1oiw861NGp4CKKFO3iuHGSCgTyQ-DXHW7&export=download",
                bfh_2d_front: "https://drive.google.com/uc?id=1TBX7hLraMiiLucknM1mhblNVomO9-Y0r&export=download",
            },
        ),
        (
            SplitLabel::Validation,
            SplitUrls {
                rgb_clips_front: "https://drive.google.com/uc?id=1DhLH8tIBn9HsTzUJUfsEOGcP4l9EvOiO&export=download",
                rgb_clips_side: "https://drive.google.com/uc?id=1mxL7kJPNUzJ6zoaqJyxF1Krnjo4F-eQG&export=download",
                bfh_2d_front: "https://drive.google.com/uc?id=1JmEsU0GYUD5iVdefMOZpeWa_iYnmK_7w&export=download",
            },
        ),
        (
            SplitLabel::Test,
            SplitUrls {
                rgb_clips_front: "https://drive.google.com/uc?id=1qTIXFsu8M55HrCiaGv7vZ7GkdB3ubjaG&export=download",
                rgb_clips_side: "https://drive.google.com/uc?id=1j9v9P7UdMJ0_FVWg8H95cqx4DMSsrdbH&export=download",
                bfh_2d_front: "https://drive.google.com/uc?id=1g8tzzW5BNPzHXlamuMQOvdwlHRa-29Vp&export=download",
            },
        ),
    ];
}
