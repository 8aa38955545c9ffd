//! Synthesized JPEG fixtures for unit tests.

const TAG_DATE_TIME: u16 = 0x0132;
const TAG_EXIF_POINTER: u16 = 0x8769;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const TAG_DATE_TIME_DIGITIZED: u16 = 0x9004;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

fn push_entry(ifd: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: [u8; 4]) {
    ifd.extend_from_slice(&tag.to_le_bytes());
    ifd.extend_from_slice(&typ.to_le_bytes());
    ifd.extend_from_slice(&count.to_le_bytes());
    ifd.extend_from_slice(&value);
}

fn push_ascii(ifd: &mut Vec<u8>, data: &mut Vec<u8>, data_offset: &mut usize, tag: u16, s: &str) {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    let count = bytes.len() as u32;
    if bytes.len() <= 4 {
        let mut inline = [0u8; 4];
        inline[..bytes.len()].copy_from_slice(&bytes);
        push_entry(ifd, tag, TYPE_ASCII, count, inline);
        return;
    }
    push_entry(ifd, tag, TYPE_ASCII, count, (*data_offset as u32).to_le_bytes());
    *data_offset += bytes.len();
    data.extend_from_slice(&bytes);
    if bytes.len() % 2 == 1 {
        data.push(0);
        *data_offset += 1;
    }
}

/// Build a little-endian TIFF block with an optional IFD0 `DateTime` and a set
/// of Exif IFD date tags.
fn tiff_block(ifd0_date: Option<&str>, exif_dates: &[(u16, &str)]) -> Vec<u8> {
    let ifd0_count = usize::from(ifd0_date.is_some()) + usize::from(!exif_dates.is_empty());
    let exif_ifd_offset = 8 + 2 + 12 * ifd0_count + 4;
    let mut data_offset = if exif_dates.is_empty() {
        exif_ifd_offset
    } else {
        exif_ifd_offset + 2 + 12 * exif_dates.len() + 4
    };

    let mut data = Vec::new();
    let mut ifd0 = Vec::new();
    if let Some(date) = ifd0_date {
        push_ascii(&mut ifd0, &mut data, &mut data_offset, TAG_DATE_TIME, date);
    }
    if !exif_dates.is_empty() {
        push_entry(
            &mut ifd0,
            TAG_EXIF_POINTER,
            TYPE_LONG,
            1,
            (exif_ifd_offset as u32).to_le_bytes(),
        );
    }
    let mut exif_ifd = Vec::new();
    for (tag, date) in exif_dates {
        push_ascii(&mut exif_ifd, &mut data, &mut data_offset, *tag, date);
    }

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&(ifd0_count as u16).to_le_bytes());
    tiff.extend_from_slice(&ifd0);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    if !exif_dates.is_empty() {
        tiff.extend_from_slice(&(exif_dates.len() as u16).to_le_bytes());
        tiff.extend_from_slice(&exif_ifd);
        tiff.extend_from_slice(&0u32.to_le_bytes());
    }
    tiff.extend_from_slice(&data);
    tiff
}

/// A minimal JPEG carrying an APP1 Exif segment.
pub fn jpeg_with_exif(ifd0_date: Option<&str>, exif_dates: &[(u16, &str)]) -> Vec<u8> {
    let tiff = tiff_block(ifd0_date, exif_dates);
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// A JPEG whose original capture date is `date`.
pub fn jpeg_taken_at(date: &str) -> Vec<u8> {
    jpeg_with_exif(None, &[(TAG_DATE_TIME_ORIGINAL, date)])
}

/// A minimal JFIF JPEG with no Exif segment.
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    jpeg.extend_from_slice(b"JFIF\0");
    jpeg.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
