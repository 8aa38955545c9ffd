use std::ffi::OsString;
use std::path::Path;

/// JPEG file extensions (lowercase).
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Check if a path names a JPEG file based on its extension.
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| JPEG_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// File name of a path, byte for byte.
pub fn file_name_of(path: &Path) -> OsString {
    path.file_name().unwrap_or_default().to_os_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_jpeg_extensions() {
        assert!(is_jpeg(Path::new("photo.jpg")));
        assert!(is_jpeg(Path::new("photo.JPG")));
        assert!(is_jpeg(Path::new("photo.jpeg")));
        assert!(is_jpeg(Path::new("photo.JpEg")));
        assert!(is_jpeg(Path::new("dir/nested/photo.jpg")));
    }

    #[test]
    fn test_reject_other_extensions() {
        assert!(!is_jpeg(Path::new("photo.png")));
        assert!(!is_jpeg(Path::new("photo.heic")));
        assert!(!is_jpeg(Path::new("photo.jpg.xmp")));
        assert!(!is_jpeg(Path::new("jpg")));
        assert!(!is_jpeg(Path::new("README")));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of(Path::new("in/a.jpg")), "a.jpg");
        assert_eq!(file_name_of(Path::new("")), "");
    }
}
