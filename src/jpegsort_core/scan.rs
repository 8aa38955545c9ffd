use crate::jpegsort_core::error::{Result, SortError};
use crate::jpegsort_core::media::is_jpeg;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check that the working directory exists and is a directory.
pub fn validate_working_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(SortError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(SortError::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// Collect the JPEG files to sort, ordered by path.
///
/// Only the top level of `working_dir` is listed unless `recursive` is set.
/// A recursive walk never descends into `output_dir`.
pub fn collect_candidates(
    working_dir: &Path,
    output_dir: &Path,
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    validate_working_dir(working_dir)?;

    let mut files = if recursive {
        walk_tree(working_dir, output_dir)
    } else {
        list_top_level(working_dir)?
    };

    files.sort();
    Ok(files)
}

fn list_top_level(working_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(working_dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                log::warn!("Failed to read entry in {}: {}", working_dir.display(), e);
                continue;
            }
        };
        if path.is_file() && is_jpeg(&path) {
            files.push(path);
        } else {
            log::debug!("Ignoring {}", path.display());
        }
    }
    Ok(files)
}

fn walk_tree(working_dir: &Path, output_dir: &Path) -> Vec<PathBuf> {
    // The output directory may not exist yet, in which case nothing needs pruning.
    let output_canonical = fs::canonicalize(output_dir).ok();

    WalkDir::new(working_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| match &output_canonical {
            Some(output) if entry.file_type().is_dir() => {
                fs::canonicalize(entry.path()).ok().as_ref() != Some(output)
            }
            _ => true,
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", SortError::from(e));
                None
            }
        })
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_jpeg(path))
        .collect()
}
