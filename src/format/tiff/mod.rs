//! TIFF structure inside EXIF blocks.
//!
//! An EXIF block is a small classic TIFF stream. This module parses its
//! header and walks its directories, producing raw entries for the tag
//! decoder.
//!
//! # Key Concepts
//!
//! - **Byte order**: the block declares its endianness (II = little-endian,
//!   MM = big-endian) in the header. All multi-byte values must be read
//!   respecting this order.
//!
//! - **IFD (Image File Directory)**: a list of 12-byte entries. EXIF uses
//!   IFD0 for the primary image, IFD1 for the thumbnail, and private IFDs
//!   for camera settings, GPS and interoperability data.
//!
//! - **Inline vs offset values**: small values are stored inline in the IFD
//!   entry, larger values are stored at an offset pointed to by the entry.

mod ifd;
mod parser;
mod tags;
mod values;

pub use ifd::{DirectoryWalk, ExifDirectory, WalkOptions};
pub use parser::{
    is_tiff_header, ByteOrder, TiffHeader, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE, VALUE_OFFSET_SIZE,
};
pub use tags::{
    is_ifd_pointer, tag_name, FieldType, IfdKind, EXIF_IFD_POINTER, GPS_IFD_POINTER,
    INTEROP_IFD_POINTER,
};
pub use values::format_value;
