/// Download managers for remote dataset assets.
pub mod download;
/// Filesystem helpers: sorted walks and archive extraction.
pub mod fs;

pub use download::{
    DownloadManager, HttpDownloadManager, MirrorDownloadManager, google_drive_download_url,
};
