pub mod cli;
pub mod error;
pub mod exif;
pub mod media;
pub mod report;
pub mod scan;
pub mod sorter;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, ConflictPolicy, OutputFormat};
pub use error::SortError;
pub use self::exif::{CaptureYear, extract_year, read_capture_year};
pub use sorter::{FileOutcome, SortOptions, SortReport, SortSummary, run};
