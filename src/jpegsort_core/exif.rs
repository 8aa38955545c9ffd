use crate::jpegsort_core::error::{Result, SortError};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use time::{Date, PrimitiveDateTime};

/// Date format used in EXIF data.
const EXIF_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// Date-only prefix of an EXIF date, for values with a malformed time part.
const EXIF_DAY_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day]");

/// Capture date tags in order of preference.
const DATE_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Outcome of looking up a file's capture year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureYear {
    Found(i32),
    /// No usable capture date; carries the reason for diagnostics.
    Fallback(String),
}

impl CaptureYear {
    /// Directory name for this year, or `fallback` when no year was found.
    pub fn label(&self, fallback: &str) -> String {
        match self {
            CaptureYear::Found(year) => format!("{:04}", year),
            CaptureYear::Fallback(_) => fallback.to_string(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            CaptureYear::Found(year) => Some(*year),
            CaptureYear::Fallback(_) => None,
        }
    }
}

/// Read the capture year of an image from its EXIF date tags.
///
/// Returns `Ok(None)` when the file has no EXIF block or none of the date
/// tags hold a parseable value.
pub fn read_capture_year(path: &Path) -> Result<Option<i32>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(e) => {
            return Err(SortError::MetadataExtraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    for tag in DATE_TAGS {
        let Some(field) = exif.get_field(*tag, In::PRIMARY) else {
            continue;
        };
        let Some(raw) = ascii_value(&field.value) else {
            log::debug!("{} in {} is not an ASCII value", tag, path.display());
            continue;
        };
        match parse_exif_year(raw) {
            Ok(year) => return Ok(Some(year)),
            Err(e) => log::debug!("Ignoring {} in {}: {}", tag, path.display(), e),
        }
    }

    Ok(None)
}

/// Determine the capture year of a file, folding every failure into
/// `CaptureYear::Fallback`.
pub fn extract_year(path: &Path) -> CaptureYear {
    match read_capture_year(path) {
        Ok(Some(year)) => CaptureYear::Found(year),
        Ok(None) => {
            log::debug!("No EXIF capture date in {}", path.display());
            CaptureYear::Fallback("no EXIF capture date".to_string())
        }
        Err(e) => {
            log::warn!("Failed to read metadata for {}: {}", path.display(), e);
            CaptureYear::Fallback(e.to_string())
        }
    }
}

fn ascii_value(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(parts) => parts.first().and_then(|p| std::str::from_utf8(p).ok()),
        _ => None,
    }
}

/// Parse the year out of an EXIF date string (`YYYY:MM:DD HH:MM:SS`).
pub fn parse_exif_year(date_str: &str) -> Result<i32> {
    let trimmed = date_str.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return Err(SortError::InvalidDateFormat("empty date".to_string()));
    }

    let year = match PrimitiveDateTime::parse(trimmed, EXIF_DATE_FORMAT) {
        Ok(date_time) => date_time.year(),
        Err(e) => trimmed
            .get(..10)
            .and_then(|day| Date::parse(day, EXIF_DAY_FORMAT).ok())
            .map(|date| date.year())
            .ok_or_else(|| SortError::InvalidDateFormat(format!("{:?}: {}", trimmed, e)))?,
    };

    if !(1..=9999).contains(&year) {
        return Err(SortError::InvalidDateFormat(format!(
            "year {} out of range",
            year
        )));
    }

    Ok(year)
}
