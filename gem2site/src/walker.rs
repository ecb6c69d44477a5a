//! Source tree discovery and per-file conversion decisions

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::gemtext::{OUTPUT_EXTENSION, SOURCE_EXTENSION};

/// Errors that stop a walk before any file is processed
#[derive(Error, Debug)]
pub enum WalkerError {
    #[error("Cannot read source directory {path}: {source}", path = .0.display(), source = .1)]
    Root(PathBuf, #[source] io::Error),

    #[error("Source path is not a directory: {path}", path = .0.display())]
    NotADirectory(PathBuf),
}

/// What to do with one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDecision {
    /// Render the gemtext document to HTML
    Convert,
    /// Copy the file verbatim
    Copy,
    /// Destination is newer than the source, leave it alone
    Skip,
}

/// Regular files found under a source root
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files to process, sorted by path
    pub files: Vec<PathBuf>,
    /// Entries that could not be read, with the walk error
    pub unreadable: Vec<(PathBuf, walkdir::Error)>,
}

/// Walk the source root and collect every regular file
///
/// Directories are recursed but not reported. Symlinks to files are
/// returned like regular files and read through the link; symlinks to
/// directories are not followed. Entries below the root that cannot be read
/// are collected rather than aborting the walk.
///
/// # Parameters
/// * `root` - Source directory
///
/// # Returns
/// * `Ok(Discovery)` - Files in sorted order plus unreadable entries
/// * `Err(WalkerError)` - The root itself is missing or not a directory
pub fn discover_files(root: &Path) -> Result<Discovery, WalkerError> {
    let metadata = fs::metadata(root).map_err(|e| WalkerError::Root(root.to_path_buf(), e))?;
    if !metadata.is_dir() {
        return Err(WalkerError::NotADirectory(root.to_path_buf()));
    }

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                discovery.files.push(entry.into_path());
            }
            Ok(entry) if entry.file_type().is_symlink() => {
                // broken links are kept so that processing reports them
                let target_is_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
                if target_is_dir {
                    log::warn!("Not following directory symlink {}", entry.path().display());
                } else {
                    discovery.files.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                log::warn!("Unable to read {}: {}", path.display(), e);
                discovery.unreadable.push((path, e));
            }
        }
    }

    Ok(discovery)
}

/// Whether a path names a gemtext document
pub fn is_document(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(SOURCE_EXTENSION)
}

/// Mirror a source path under the destination root
///
/// Gemtext documents get the HTML extension.
///
/// # Returns
/// * `Some(PathBuf)` - The destination path
/// * `None` - `source` does not lie under `source_root`
pub fn destination_for(source_root: &Path, dest_root: &Path, source: &Path) -> Option<PathBuf> {
    let relative = source.strip_prefix(source_root).ok()?;
    let mut destination = dest_root.join(relative);
    if is_document(source) {
        destination.set_extension(OUTPUT_EXTENSION);
    }
    Some(destination)
}

/// Decide how to handle a source file
///
/// The file is skipped only when the destination exists and was modified
/// strictly after the source. Only metadata is inspected.
///
/// # Parameters
/// * `source` - Source file path
/// * `source_metadata` - Metadata of the source file
/// * `destination` - Mirrored destination path
///
/// # Returns
/// * `Ok(ConversionDecision)` - The decision for this file
/// * `Err(io::Error)` - The destination or a modification time could not be read
pub fn decide(
    source: &Path,
    source_metadata: &Metadata,
    destination: &Path,
) -> io::Result<ConversionDecision> {
    match fs::metadata(destination) {
        Ok(dest_metadata) => {
            if dest_metadata.modified()? > source_metadata.modified()? {
                return Ok(ConversionDecision::Skip);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if is_document(source) {
        Ok(ConversionDecision::Convert)
    } else {
        Ok(ConversionDecision::Copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_destination_for_document() {
        let dest = destination_for(
            Path::new("src"),
            Path::new("out"),
            Path::new("src/en/posts/entry.gmi"),
        );
        assert_eq!(dest, Some(PathBuf::from("out/en/posts/entry.html")));
    }

    #[test]
    fn test_destination_for_other_file() {
        let dest = destination_for(
            Path::new("src"),
            Path::new("out"),
            Path::new("src/img/cat.png"),
        );
        assert_eq!(dest, Some(PathBuf::from("out/img/cat.png")));
    }

    #[test]
    fn test_destination_for_outside_root() {
        let dest = destination_for(Path::new("src"), Path::new("out"), Path::new("elsewhere/a.gmi"));
        assert_eq!(dest, None);
    }

    #[test]
    fn test_is_document() {
        assert!(is_document(Path::new("index.gmi")));
        assert!(!is_document(Path::new("index.gmi.bak")));
        assert!(!is_document(Path::new("gmi")));
        assert!(!is_document(Path::new("style.css")));
    }

    #[test]
    fn test_discover_files_recurses_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/deep.gmi"), "").unwrap();
        fs::write(dir.path().join("a.gmi"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let discovery = discover_files(dir.path()).unwrap();
        let relative: Vec<_> = discovery
            .files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.gmi"),
                PathBuf::from("b/nested/deep.gmi"),
                PathBuf::from("c.txt"),
            ]
        );
        assert!(discovery.unreadable.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_files_keeps_file_symlinks() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("real.gmi"), "").unwrap();
        fs::create_dir_all(outside.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.gmi"), dir.path().join("a.gmi"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("sub"), dir.path().join("linked"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("gone.gmi"), dir.path().join("z.gmi"))
            .unwrap();

        let discovery = discover_files(dir.path()).unwrap();
        assert_eq!(
            discovery.files,
            vec![dir.path().join("a.gmi"), dir.path().join("z.gmi")]
        );
    }

    #[test]
    fn test_discover_files_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = discover_files(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, WalkerError::Root(..)));
    }

    #[test]
    fn test_discover_files_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.gmi");
        fs::write(&file, "").unwrap();
        let err = discover_files(&file).unwrap_err();
        assert!(matches!(err, WalkerError::NotADirectory(_)));
    }

    #[test]
    fn test_decide_without_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.gmi");
        fs::write(&source, "").unwrap();
        let metadata = fs::metadata(&source).unwrap();

        let decision = decide(&source, &metadata, &dir.path().join("a.html")).unwrap();
        assert_eq!(decision, ConversionDecision::Convert);

        let other = dir.path().join("a.png");
        fs::write(&other, "").unwrap();
        let metadata = fs::metadata(&other).unwrap();
        let decision = decide(&other, &metadata, &dir.path().join("out.png")).unwrap();
        assert_eq!(decision, ConversionDecision::Copy);
    }

    #[test]
    fn test_decide_skips_newer_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.gmi");
        let destination = dir.path().join("a.html");
        fs::write(&source, "").unwrap();
        fs::write(&destination, "").unwrap();

        let now = SystemTime::now();
        set_mtime(&source, now - Duration::from_secs(60));
        set_mtime(&destination, now);

        let metadata = fs::metadata(&source).unwrap();
        assert_eq!(
            decide(&source, &metadata, &destination).unwrap(),
            ConversionDecision::Skip
        );
    }

    #[test]
    fn test_decide_converts_when_times_are_equal() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.gmi");
        let destination = dir.path().join("a.html");
        fs::write(&source, "").unwrap();
        fs::write(&destination, "").unwrap();

        let time = SystemTime::now() - Duration::from_secs(30);
        set_mtime(&source, time);
        set_mtime(&destination, time);

        let metadata = fs::metadata(&source).unwrap();
        assert_eq!(
            decide(&source, &metadata, &destination).unwrap(),
            ConversionDecision::Convert
        );
    }

    #[test]
    fn test_decide_converts_older_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.gmi");
        let destination = dir.path().join("a.html");
        fs::write(&source, "").unwrap();
        fs::write(&destination, "").unwrap();

        let now = SystemTime::now();
        set_mtime(&source, now);
        set_mtime(&destination, now - Duration::from_secs(60));

        let metadata = fs::metadata(&source).unwrap();
        assert_eq!(
            decide(&source, &metadata, &destination).unwrap(),
            ConversionDecision::Convert
        );
    }
}
