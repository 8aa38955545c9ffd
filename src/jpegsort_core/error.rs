use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SortError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from} -> {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    // Metadata errors
    #[error("Failed to read EXIF data from {path}: {reason}")]
    MetadataExtraction { path: PathBuf, reason: String },

    #[error("Date parsing error: {0}")]
    InvalidDateFormat(String),

    // Progress display
    #[error("Progress bar template error: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),

    // Worker pool
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Argument error: {0}")]
    Argument(String),
}

/// Result type for jpegsort operations.
pub type Result<T> = std::result::Result<T, SortError>;
