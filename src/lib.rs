//! # EXIF Stream
//!
//! Decodes the EXIF metadata embedded in images into typed, queryable tags.
//!
//! Input can be fed incrementally: a [`StreamingLoader`] accepts chunks of a
//! JPEG, TIFF or bare EXIF stream, keeps only the EXIF block, and tells the
//! caller when it has everything it needs. Nothing past the metadata is ever
//! read.
//!
//! ## Features
//!
//! - **Streaming**: chunk boundaries can fall anywhere; the result is the same
//!   as decoding the whole file at once
//! - **Typed values**: integer tags carry an `i64`, rational tags keep their
//!   exact numerator and denominator
//! - **GPS coordinates**: degree/minute/second rationals are folded into a
//!   single fraction
//! - **Both byte orders**: little- and big-endian EXIF blocks
//!
//! ## Architecture
//!
//! - [`exif`] - Tags, the tag decoder, the tag store and the streaming loader
//! - [`mod@format`] - Locating the EXIF block and walking its directories
//! - [`io`] - Byte-order helpers and file readers
//! - [`config`] - CLI configuration for the `exif-dump` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_stream::{constants, StreamingLoader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("photo.jpg")?;
//!
//! let mut loader = StreamingLoader::new();
//! for chunk in data.chunks(4096) {
//!     if loader.write(chunk)?.is_header_found() {
//!         break;
//!     }
//! }
//! let tags = loader.finalize()?;
//!
//! if let Some(orientation) = tags.get(constants::ORIENTATION) {
//!     println!("{}", orientation);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod exif;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use error::{ExifError, IoError, LoaderError, TiffError};
pub use exif::{
    constants, decode_source, FoldScope, FormatCode, LoaderOptions, RawEntry, RawEntrySource,
    StreamingLoader, Tag, TagDecoder, TagStore, TagValue, WriteOutcome, DEFAULT_MAX_BUFFER_SIZE,
};
pub use format::tiff::{ByteOrder, DirectoryWalk, ExifDirectory, IfdKind, WalkOptions};
pub use io::{read, read_async, read_bytes, DEFAULT_CHUNK_SIZE};
