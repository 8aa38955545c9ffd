use crate::jpegsort_core::sorter::{DEFAULT_FALLBACK_LABEL, DEFAULT_OUTPUT_DIR_NAME, SortOptions};
use clap::{Parser, ValueEnum};
use simplelog::LevelFilter;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Copy JPEG photos into per-year folders based on their EXIF capture date"
)]
pub struct Cli {
    /// Directory to scan for JPEG files
    #[arg(default_value = ".")]
    pub working_dir: PathBuf,

    /// Destination root for the year folders [default: <WORKING_DIR>/Output]
    pub output_dir: Option<PathBuf>,

    /// Also sort JPEG files found in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// What to do when a file with the same name already exists in the year folder
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Overwrite)]
    pub on_conflict: ConflictPolicy,

    /// Folder name for photos without a usable capture date
    #[arg(long, default_value = DEFAULT_FALLBACK_LABEL)]
    pub fallback_label: String,

    /// Show what would be copied without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Number of worker threads [default: number of CPUs]
    #[arg(short, long)]
    pub jobs: Option<NonZeroUsize>,

    /// Output format of the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Enable file logging to jpegsort.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Resolve command line arguments into sorter options.
    pub fn sort_options(&self) -> SortOptions {
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| self.working_dir.join(DEFAULT_OUTPUT_DIR_NAME));

        SortOptions {
            working_dir: self.working_dir.clone(),
            output_dir,
            recursive: self.recursive,
            on_conflict: self.on_conflict,
            fallback_label: self.fallback_label.clone(),
            dry_run: self.dry_run,
            jobs: self.jobs.map_or_else(num_cpus::get, NonZeroUsize::get),
            show_progress: !self.no_progress && self.format == OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictPolicy {
    /// Replace the existing file
    Overwrite,
    /// Keep both, adding a numeric suffix to the new copy
    Rename,
    /// Leave the existing file and skip the new one
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}
