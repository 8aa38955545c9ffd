use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

// Same fixture builder the unit tests use; it is `#[cfg(test)]` inside the
// library, so it is compiled in here directly.
#[allow(dead_code)]
#[path = "../../src/jpegsort_core/test_support.rs"]
mod test_support;

pub use test_support::{jpeg_taken_at, jpeg_without_exif};

pub fn jpegsort() -> Command {
    Command::cargo_bin("jpegsort").unwrap()
}

/// A working directory holding `a.jpg` (taken 2015-06-01), `b.jpg` (no Exif)
/// and a text file.
pub fn setup_photo_dir(temp_dir: &TempDir) -> ChildPath {
    let photo_dir = temp_dir.child("in");
    photo_dir
        .child("a.jpg")
        .write_binary(&jpeg_taken_at("2015:06:01 09:30:00"))
        .unwrap();
    photo_dir.child("b.jpg").write_binary(&jpeg_without_exif()).unwrap();
    photo_dir.child("notes.txt").write_str("not a photo").unwrap();
    photo_dir
}
