//! Fetching and unpacking of remote dataset assets.
//!
//! Loaders never talk to the network directly; they ask a `DownloadManager`
//! for a local path. Caching, retries, and deduplication belong to the
//! manager implementation.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::DownloadConfig;
use crate::constants::download::{
    DOWNLOAD_BUFFER_BYTES, GOOGLE_DRIVE_CONFIRM, GOOGLE_DRIVE_HOST, PARTIAL_SUFFIX,
    PROGRESS_INTERVAL_SECS,
};
use crate::errors::DatasetError;
use crate::hash::url_cache_name;
use crate::types::RemoteUrl;
use crate::transport::fs::{extract_zip, is_zip_archive, with_suffix};

/// Fetch/extract collaborator used by dataset builders.
pub trait DownloadManager: Send + Sync {
    /// Local path of the downloaded file for `url`.
    fn download(&self, url: &str) -> Result<PathBuf, DatasetError>;
    /// Local directory of the extracted archive for `url`.
    ///
    /// Non-archive downloads and already-extracted directories are returned as-is.
    fn download_and_extract(&self, url: &str) -> Result<PathBuf, DatasetError>;
}

/// Rewrite Google Drive links so large files skip the confirmation page.
pub fn google_drive_download_url(url: &str) -> String {
    if !url.contains(GOOGLE_DRIVE_HOST) || url.contains("confirm=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{GOOGLE_DRIVE_CONFIRM}")
}

fn unavailable(url: &str, reason: String) -> DatasetError {
    DatasetError::SourceUnavailable {
        dataset: url.to_string(),
        reason,
    }
}

/// HTTP-backed manager with an on-disk cache.
pub struct HttpDownloadManager {
    config: DownloadConfig,
}

impl HttpDownloadManager {
    /// Manager caching under `config`.
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Cache path a given URL downloads to.
    pub fn cached_path(&self, url: &str) -> PathBuf {
        self.config.cache_dir.join(url_cache_name(url))
    }

    fn fetch_to(&self, url: &str, target: &Path) -> Result<(), DatasetError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_target = with_suffix(target, PARTIAL_SUFFIX);
        if temp_target.exists() {
            warn!(
                "[sign_datasets:download] discarding stale partial download {}",
                temp_target.display()
            );
            let _ = fs::remove_file(&temp_target);
        }

        let remote_url = google_drive_download_url(url);
        let response = ureq::get(&remote_url)
            .call()
            .map_err(|err| unavailable(url, format!("request failed: {err}")))?;
        let mut reader = response.into_body().into_reader();
        let mut file = File::create(&temp_target)?;

        info!(
            "[sign_datasets:download] downloading {} -> {}",
            url,
            target.display()
        );
        let started = Instant::now();
        let mut last_report = Instant::now();
        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; DOWNLOAD_BUFFER_BYTES];
        loop {
            let read = reader
                .read(&mut buffer)
                .map_err(|err| unavailable(url, format!("failed reading response: {err}")))?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])?;
            total_bytes = total_bytes.saturating_add(read as u64);
            if last_report.elapsed() >= Duration::from_secs(PROGRESS_INTERVAL_SECS) {
                info!(
                    "[sign_datasets:download] progress {}: {:.1} MiB ({:.1}s)",
                    target.display(),
                    total_bytes as f64 / (1024.0 * 1024.0),
                    started.elapsed().as_secs_f64()
                );
                last_report = Instant::now();
            }
        }
        file.flush()?;
        info!(
            "[sign_datasets:download] complete {}: {:.1} MiB in {:.1}s",
            target.display(),
            total_bytes as f64 / (1024.0 * 1024.0),
            started.elapsed().as_secs_f64()
        );
        fs::rename(&temp_target, target)?;
        Ok(())
    }
}

impl DownloadManager for HttpDownloadManager {
    fn download(&self, url: &str) -> Result<PathBuf, DatasetError> {
        let target = self.cached_path(url);
        if target.is_file() {
            debug!(
                "[sign_datasets:download] cache hit {} -> {}",
                url,
                target.display()
            );
            return Ok(target);
        }
        self.fetch_to(url, &target)?;
        Ok(target)
    }

    fn download_and_extract(&self, url: &str) -> Result<PathBuf, DatasetError> {
        let archive = self.download(url)?;
        if !is_zip_archive(&archive) {
            return Ok(archive);
        }
        extract_zip(&archive, &self.config.extract_dir.join(url_cache_name(url)))
    }
}

/// Manager that serves URLs from pre-downloaded local files or directories.
///
/// Used for manual downloads, offline runs, and tests.
pub struct MirrorDownloadManager {
    entries: HashMap<RemoteUrl, PathBuf>,
    extract_dir: PathBuf,
}

impl MirrorDownloadManager {
    /// Create an empty mirror; zip entries are extracted under `extract_dir`.
    pub fn new(extract_dir: impl Into<PathBuf>) -> Self {
        Self {
            entries: HashMap::new(),
            extract_dir: extract_dir.into(),
        }
    }

    /// Map `url` to a local path.
    pub fn with(mut self, url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(url, path);
        self
    }

    /// Map `url` to a local path in place.
    pub fn insert(&mut self, url: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(url.into(), path.into());
    }

    fn lookup(&self, url: &str) -> Result<&PathBuf, DatasetError> {
        let path = self
            .entries
            .get(url)
            .ok_or_else(|| unavailable(url, "no local mirror configured".to_string()))?;
        if !path.exists() {
            return Err(unavailable(
                url,
                format!("mirror path {} does not exist", path.display()),
            ));
        }
        Ok(path)
    }
}

impl DownloadManager for MirrorDownloadManager {
    fn download(&self, url: &str) -> Result<PathBuf, DatasetError> {
        self.lookup(url).cloned()
    }

    fn download_and_extract(&self, url: &str) -> Result<PathBuf, DatasetError> {
        let path = self.lookup(url)?;
        if path.is_dir() || !is_zip_archive(path) {
            return Ok(path.clone());
        }
        extract_zip(path, &self.extract_dir.join(url_cache_name(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn drive_links_gain_confirm_token_once() {
        let url = "https://drive.google.com/uc?id=abc&export=download";
        let rewritten = google_drive_download_url(url);
        assert_eq!(rewritten, format!("{url}&confirm=t"));
        assert_eq!(google_drive_download_url(&rewritten), rewritten);
        assert_eq!(
            google_drive_download_url("https://example.org/a.zip"),
            "https://example.org/a.zip"
        );
    }

    #[test]
    fn mirror_serves_mapped_directories() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("pack");
        fs::create_dir_all(&dir).unwrap();
        let mirror = MirrorDownloadManager::new(temp.path().join("extracted"))
            .with("https://example.org/pack.zip", &dir);
        assert_eq!(
            mirror
                .download_and_extract("https://example.org/pack.zip")
                .unwrap(),
            dir
        );
    }

    #[test]
    fn mirror_reports_unmapped_and_missing_paths() {
        let temp = tempdir().unwrap();
        let mirror = MirrorDownloadManager::new(temp.path())
            .with("https://example.org/gone.zip", temp.path().join("gone"));
        assert!(matches!(
            mirror.download("https://example.org/other.zip"),
            Err(DatasetError::SourceUnavailable { .. })
        ));
        assert!(matches!(
            mirror.download("https://example.org/gone.zip"),
            Err(DatasetError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn http_manager_reuses_cached_files_without_network() {
        let temp = tempdir().unwrap();
        let manager = HttpDownloadManager::new(DownloadConfig::new(temp.path()));
        let url = "https://example.invalid/manifest.csv";
        let cached = manager.cached_path(url);
        fs::write(&cached, b"a,b,c,d\n").unwrap();
        assert_eq!(manager.download(url).unwrap(), cached);
        assert_eq!(manager.download_and_extract(url).unwrap(), cached);
    }
}
