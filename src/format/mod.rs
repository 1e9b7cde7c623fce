//! Container formats that carry EXIF data.
//!
//! - [`detect`] finds the EXIF block in JPEG, bare EXIF and TIFF input,
//!   incrementally or over a whole buffer
//! - [`jpeg`] holds the JPEG marker vocabulary the scanner needs
//! - [`tiff`] parses the TIFF structure of the block and walks its
//!   directories

pub mod detect;
pub mod jpeg;
pub mod tiff;

pub use detect::{
    locate_exif, sniff_container, Container, ExifScanner, ScanStatus, Sniff, EXIF_HEADER,
};
pub use tiff::{is_tiff_header, ByteOrder, DirectoryWalk, ExifDirectory, WalkOptions};
