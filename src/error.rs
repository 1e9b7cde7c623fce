use thiserror::Error;

/// I/O errors that can occur while reading an image from disk
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The file could not be opened or read
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

impl IoError {
    pub(crate) fn read(path: &std::path::Path, err: std::io::Error) -> Self {
        IoError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Errors that can occur when parsing the TIFF structure inside an EXIF block
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42, got {0}")]
    InvalidVersion(u16),

    /// Block is too small to contain a valid TIFF header
    #[error("EXIF block too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// Invalid IFD offset (points outside the block)
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u64),
}

/// Misuse of the streaming loader protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// `write` was called with a zero-length chunk
    #[error("Cannot write an empty chunk")]
    EmptyChunk,

    /// `write` or `finalize` was called after `finalize`
    #[error("Loader already finalized")]
    AlreadyFinalized,
}

/// Top-level error returned by `read`, `write` and `finalize`
#[derive(Debug, Clone, Error)]
pub enum ExifError {
    /// The input has no recognizable EXIF header
    #[error("No EXIF data found")]
    NoExifData,

    /// TIFF parsing error inside an EXIF block
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),

    /// I/O error while reading the input
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Streaming protocol misuse
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
}

impl ExifError {
    /// Whether this is the recoverable "image has no metadata" condition.
    pub fn is_no_exif_data(&self) -> bool {
        matches!(self, ExifError::NoExifData)
    }
}
