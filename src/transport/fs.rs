use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::errors::DatasetError;

/// True if the path has extension `ext` (case-insensitive).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .map(|value| value.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// All regular files under `root` whose name satisfies `keep`, sorted by path.
///
/// Sorting keeps generation order identical across runs and platforms.
pub fn sorted_files(
    root: &Path,
    follow_links: bool,
    keep: impl Fn(&Path) -> bool,
) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(follow_links)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| keep(path))
        .collect();
    files.sort();
    files
}

/// `path` with `.suffix` appended to its full file name.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Whether `dir` exists and holds at least one entry.
pub fn is_populated_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Extract a zip archive into `target`, staging through a sibling directory.
///
/// A populated `target` is reused as-is. The staging directory is renamed into
/// place only after every entry has been written.
pub fn extract_zip(archive: &Path, target: &Path) -> Result<PathBuf, DatasetError> {
    if is_populated_dir(target) {
        return Ok(target.to_path_buf());
    }
    let staging = with_suffix(target, "extracting");
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    info!(
        "[sign_datasets:download] extracting {} -> {}",
        archive.display(),
        target.display()
    );
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|err| DatasetError::SourceUnavailable {
        dataset: archive.display().to_string(),
        reason: format!("failed opening zip archive: {err}"),
    })?;
    zip.extract(&staging)
        .map_err(|err| DatasetError::SourceUnavailable {
            dataset: archive.display().to_string(),
            reason: format!("failed extracting zip archive: {err}"),
        })?;

    if target.exists() {
        fs::remove_dir_all(target)?;
    }
    fs::rename(&staging, target)?;
    Ok(target.to_path_buf())
}

/// True if `path` looks like a zip archive (by extension or magic bytes).
pub fn is_zip_archive(path: &Path) -> bool {
    if has_extension(path, "zip") {
        return true;
    }
    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .map(|_| &magic == b"PK\x03\x04")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn has_extension_is_case_insensitive() {
        assert!(has_extension(Path::new("a/b/C.POSE"), "pose"));
        assert!(!has_extension(Path::new("a/b/c"), "pose"));
    }

    #[test]
    fn suffix_is_appended_after_existing_extension() {
        assert_eq!(
            with_suffix(Path::new("cache/pack.zip-00ff"), "part"),
            PathBuf::from("cache/pack.zip-00ff.part")
        );
    }

    #[test]
    fn sorted_files_filters_and_orders() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("b.mp4"), b"").unwrap();
        fs::write(temp.path().join("nested/a.mp4"), b"").unwrap();
        fs::write(temp.path().join("notes.txt"), b"").unwrap();

        let files = sorted_files(temp.path(), false, |path| has_extension(path, "mp4"));
        assert_eq!(
            files,
            vec![temp.path().join("b.mp4"), temp.path().join("nested/a.mp4")]
        );
    }

    #[test]
    fn extract_zip_populates_target_and_is_reused() {
        let temp = tempdir().unwrap();
        let archive = temp.path().join("pack.zip");
        write_zip(&archive, &[("poses/a.pose", "A"), ("poses/b.pose", "B")]);
        let target = temp.path().join("out");

        let root = extract_zip(&archive, &target).unwrap();
        assert_eq!(fs::read_to_string(root.join("poses/a.pose")).unwrap(), "A");
        assert!(!with_suffix(&target, "extracting").exists());

        fs::remove_file(&archive).unwrap();
        let again = extract_zip(&archive, &target).unwrap();
        assert_eq!(again, target);
    }

    #[test]
    fn zip_detection_uses_magic_bytes() {
        let temp = tempdir().unwrap();
        let archive = temp.path().join("download");
        write_zip(&archive, &[("x.txt", "x")]);
        assert!(is_zip_archive(&archive));

        let plain = temp.path().join("plain");
        fs::write(&plain, b"hello").unwrap();
        assert!(!is_zip_archive(&plain));
    }
}
