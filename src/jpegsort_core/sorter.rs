use crate::jpegsort_core::cli::ConflictPolicy;
use crate::jpegsort_core::error::{Result, SortError};
use crate::jpegsort_core::exif::{CaptureYear, extract_year};
use crate::jpegsort_core::media::file_name_of;
use crate::jpegsort_core::scan::collect_candidates;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Output directory created under the working directory when none is given.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "Output";

/// Folder for photos without a usable capture date.
pub const DEFAULT_FALLBACK_LABEL: &str = "Unknown";

/// Settings for a single sort run.
#[derive(Debug, Clone)]
pub struct SortOptions {
    pub working_dir: PathBuf,
    pub output_dir: PathBuf,
    pub recursive: bool,
    pub on_conflict: ConflictPolicy,
    pub fallback_label: String,
    pub dry_run: bool,
    pub jobs: usize,
    pub show_progress: bool,
}

impl SortOptions {
    /// Options with every setting at its default for `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        SortOptions {
            output_dir: working_dir.join(DEFAULT_OUTPUT_DIR_NAME),
            working_dir,
            recursive: false,
            on_conflict: ConflictPolicy::Overwrite,
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            dry_run: false,
            jobs: 1,
            show_progress: false,
        }
    }
}

/// A copy decided on during planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub label: String,
}

/// What happened to a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Copied { source: PathBuf, destination: PathBuf },
    /// Dry run only.
    Planned { source: PathBuf, destination: PathBuf },
    Skipped { source: PathBuf, reason: String },
    Failed { source: PathBuf, reason: String },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Copied { source, .. }
            | FileOutcome::Planned { source, .. }
            | FileOutcome::Skipped { source, .. }
            | FileOutcome::Failed { source, .. } => source,
        }
    }
}

/// Counts of per-file outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortSummary {
    pub processed: usize,
    pub copied: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SortSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        outcomes
            .iter()
            .fold(SortSummary::default(), |mut summary, outcome| {
                summary.processed += 1;
                match outcome {
                    FileOutcome::Copied { .. } => summary.copied += 1,
                    FileOutcome::Planned { .. } => summary.planned += 1,
                    FileOutcome::Skipped { .. } => summary.skipped += 1,
                    FileOutcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }
}

impl std::fmt::Display for SortSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Processed {} files: ", self.processed)?;
        if self.planned > 0 {
            write!(f, "{} to copy, ", self.planned)?;
        }
        write!(
            f,
            "{} copied, {} skipped, {} failed",
            self.copied, self.skipped, self.failed
        )
    }
}

/// Result of a sort run.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    pub working_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub summary: SortSummary,
    /// Ordered by source path.
    pub outcomes: Vec<FileOutcome>,
}

/// Sort the JPEG files of `options.working_dir` into year folders.
///
/// Only a missing or unreadable working directory (or invalid options) is
/// an error; per-file problems are reported as outcomes.
pub fn run(options: &SortOptions) -> Result<SortReport> {
    validate_label(&options.fallback_label)?;

    log::info!(
        "Phase 1: Scanning {} for JPEG files",
        options.working_dir.display()
    );
    let candidates = collect_candidates(
        &options.working_dir,
        &options.output_dir,
        options.recursive,
    )?;
    log::info!("Found {} JPEG files", candidates.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.max(1))
        .build()?;

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?;
    let new_bar = |len: usize, message: &'static str| {
        let bar = if options.show_progress {
            ProgressBar::new(len as u64).with_style(bar_style.clone())
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message);
        bar
    };

    let scan_bar = new_bar(candidates.len(), "Reading capture dates");
    let years: Vec<(PathBuf, CaptureYear)> = pool.install(|| {
        candidates
            .into_par_iter()
            .map(|path| {
                let year = extract_year(&path);
                scan_bar.inc(1);
                (path, year)
            })
            .collect()
    });
    scan_bar.finish_with_message("Scan complete");

    log::info!("Phase 2: Planning destinations");
    let (copies, mut outcomes) = plan_copies(&years, options);

    if options.dry_run {
        outcomes.extend(copies.into_iter().map(|copy| FileOutcome::Planned {
            source: copy.source,
            destination: copy.destination,
        }));
    } else {
        log::info!("Phase 3: Copying {} files", copies.len());
        let copy_bar = new_bar(copies.len(), "Copying files");
        let copied: Vec<FileOutcome> = pool.install(|| {
            copies
                .par_iter()
                .map(|copy| {
                    let outcome = perform_copy(copy);
                    copy_bar.inc(1);
                    outcome
                })
                .collect()
        });
        copy_bar.finish_with_message("Copy complete");
        outcomes.extend(copied);
    }

    outcomes.sort_by(|a, b| a.source().cmp(b.source()));
    let summary = SortSummary::from_outcomes(&outcomes);
    log::info!("{}", summary);

    Ok(SortReport {
        working_dir: options.working_dir.clone(),
        output_dir: options.output_dir.clone(),
        dry_run: options.dry_run,
        summary,
        outcomes,
    })
}

/// The fallback label becomes a folder name, so it must be a single plain
/// path component.
fn validate_label(label: &str) -> Result<()> {
    let mut components = Path::new(label).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SortError::Argument(format!(
            "fallback label '{}' is not a valid folder name",
            label
        ))),
    }
}

/// Decide the destination of every file, applying the collision policy.
///
/// Returns the copies to perform and the outcomes of files that are skipped.
/// Destinations claimed earlier in `years` take precedence over later ones.
/// No destination ever resolves to one of the source files.
pub fn plan_copies(
    years: &[(PathBuf, CaptureYear)],
    options: &SortOptions,
) -> (Vec<PlannedCopy>, Vec<FileOutcome>) {
    let sources: HashSet<PathBuf> = years
        .iter()
        .filter_map(|(source, _)| fs::canonicalize(source).ok())
        .collect();
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut copies = Vec::new();
    let mut skipped = Vec::new();

    for (source, year) in years {
        let label = year.label(&options.fallback_label);
        let dest_dir = options.output_dir.join(&label);
        let filename = file_name_of(source);

        match resolve_destination(
            source,
            &dest_dir,
            &filename,
            options.on_conflict,
            &claimed,
            &sources,
        ) {
            Placement::Copy(destination) => {
                log::debug!("{} -> {}", source.display(), destination.display());
                claimed.insert(destination.clone());
                copies.push(PlannedCopy {
                    source: source.clone(),
                    destination,
                    label,
                });
            }
            Placement::Skip { at, reason } => {
                log::info!("Skipping {}: {}", source.display(), reason);
                claimed.insert(at);
                skipped.push(FileOutcome::Skipped {
                    source: source.clone(),
                    reason,
                });
            }
        }
    }

    (copies, skipped)
}

/// Where a source file goes, or why it stays put.
enum Placement {
    Copy(PathBuf),
    Skip { at: PathBuf, reason: String },
}

fn resolve_destination(
    source: &Path,
    dest_dir: &Path,
    filename: &OsStr,
    policy: ConflictPolicy,
    claimed: &HashSet<PathBuf>,
    sources: &HashSet<PathBuf>,
) -> Placement {
    let destination = dest_dir.join(filename);
    let skip = |at: PathBuf, reason: String| Placement::Skip { at, reason };

    // Happens when the output tree overlaps the working directory.
    if let Ok(existing) = fs::canonicalize(&destination) {
        if sources.contains(&existing) {
            if fs::canonicalize(source).ok().as_ref() == Some(&existing) {
                return skip(destination, "already in place".to_string());
            }
            if policy == ConflictPolicy::Overwrite {
                let reason = format!(
                    "{} is itself a file being sorted",
                    destination.display()
                );
                return skip(destination, reason);
            }
        }
    }

    match policy {
        ConflictPolicy::Overwrite => {
            if claimed.contains(&destination) {
                let reason = format!(
                    "another file in this run is already placed at {}",
                    destination.display()
                );
                skip(destination, reason)
            } else {
                Placement::Copy(destination)
            }
        }
        ConflictPolicy::Skip => {
            if claimed.contains(&destination) || destination.exists() {
                let reason = format!("{} already exists", destination.display());
                skip(destination, reason)
            } else {
                Placement::Copy(destination)
            }
        }
        ConflictPolicy::Rename => {
            let mut n = 0u32;
            loop {
                let candidate = if n == 0 {
                    destination.clone()
                } else {
                    dest_dir.join(numbered_name(filename, n))
                };
                n += 1;

                if claimed.contains(&candidate) {
                    continue;
                }
                if !candidate.exists() {
                    return Placement::Copy(candidate);
                }
                if same_contents(source, &candidate) {
                    let reason = format!(
                        "identical file already present at {}",
                        candidate.display()
                    );
                    return skip(candidate, reason);
                }
            }
        }
    }
}

/// `photo.jpg` -> `photo_<n>.jpg`, keeping non-UTF-8 names intact.
fn numbered_name(filename: &OsStr, n: u32) -> OsString {
    let path = Path::new(filename);
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Calculate the SHA256 digest of a file.
fn hash_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_vec())
}

fn same_contents(a: &Path, b: &Path) -> bool {
    let sizes = fs::metadata(a).and_then(|ma| fs::metadata(b).map(|mb| (ma.len(), mb.len())));
    match sizes {
        Ok((len_a, len_b)) if len_a != len_b => return false,
        Ok(_) => {}
        Err(e) => {
            log::warn!("Failed to compare {} with {}: {}", a.display(), b.display(), e);
            return false;
        }
    }

    match (hash_file(a), hash_file(b)) {
        (Ok(hash_a), Ok(hash_b)) => hash_a == hash_b,
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("Failed to hash {} or {}: {}", a.display(), b.display(), e);
            false
        }
    }
}

/// Copy one planned file, creating its year folder if needed.
fn perform_copy(copy: &PlannedCopy) -> FileOutcome {
    match place_file(&copy.source, &copy.destination) {
        Ok(bytes) => {
            log::debug!(
                "Copied {} -> {} ({}, {} bytes)",
                copy.source.display(),
                copy.destination.display(),
                copy.label,
                bytes
            );
            FileOutcome::Copied {
                source: copy.source.clone(),
                destination: copy.destination.clone(),
            }
        }
        Err(e) => {
            log::error!("{}", e);
            FileOutcome::Failed {
                source: copy.source.clone(),
                reason: e.to_string(),
            }
        }
    }
}

fn place_file(source: &Path, destination: &Path) -> Result<u64> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| SortError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::copy(source, destination).map_err(|e| SortError::Copy {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    })
}
