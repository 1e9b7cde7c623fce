//! Reading EXIF from files and byte buffers.
//!
//! Every entry point drives a [`StreamingLoader`] with fixed-size chunks and
//! stops reading as soon as the loader reports that the EXIF block is
//! complete, so only the head of a large JPEG is ever read. The file handle
//! is dropped on every exit path.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::{ExifError, IoError};
use crate::exif::{LoaderOptions, StreamingLoader, TagStore};

/// Chunk size used by [`read`] and [`read_async`].
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Decode the EXIF tags of the file at `path`.
///
/// # Errors
/// - `NoExifData` if the file has no EXIF block
/// - `Io` if the file cannot be opened or read
/// - `Tiff` if the EXIF block is malformed
pub fn read(path: impl AsRef<Path>) -> Result<TagStore, ExifError> {
    read_with_options(path, LoaderOptions::default(), DEFAULT_CHUNK_SIZE)
}

/// [`read`] with explicit loader options and chunk size.
pub fn read_with_options(
    path: impl AsRef<Path>,
    options: LoaderOptions,
    chunk_size: usize,
) -> Result<TagStore, ExifError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::read(path, e))?;
    debug!(path = %path.display(), chunk_size, "Reading EXIF");
    load(file, options, chunk_size).map_err(|e| with_path(e, path))
}

/// Decode the EXIF tags of an in-memory image.
pub fn read_bytes(data: &[u8]) -> Result<TagStore, ExifError> {
    let mut loader = StreamingLoader::new();
    if !data.is_empty() {
        loader.write(data)?;
    }
    loader.finalize()
}

/// Asynchronous [`read`].
pub async fn read_async(path: impl AsRef<Path>) -> Result<TagStore, ExifError> {
    read_async_with_options(path, LoaderOptions::default(), DEFAULT_CHUNK_SIZE).await
}

/// Asynchronous [`read_with_options`].
pub async fn read_async_with_options(
    path: impl AsRef<Path>,
    options: LoaderOptions,
    chunk_size: usize,
) -> Result<TagStore, ExifError> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| IoError::read(path, e))?;
    debug!(path = %path.display(), chunk_size, "Reading EXIF");
    load_async(file, options, chunk_size)
        .await
        .map_err(|e| with_path(e, path))
}

/// Feed `reader` to a loader until the EXIF block is complete or the input
/// ends.
pub fn load<R: Read>(
    mut reader: R,
    options: LoaderOptions,
    chunk_size: usize,
) -> Result<TagStore, ExifError> {
    let mut loader = StreamingLoader::with_options(options);
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(stream_error(e).into()),
        };
        if loader.write(&chunk[..n])?.is_header_found() {
            break;
        }
    }

    loader.finalize()
}

/// Asynchronous [`load`].
pub async fn load_async<R: AsyncRead + Unpin>(
    mut reader: R,
    options: LoaderOptions,
    chunk_size: usize,
) -> Result<TagStore, ExifError> {
    let mut loader = StreamingLoader::with_options(options);
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(stream_error(e).into()),
        };
        if loader.write(&chunk[..n])?.is_header_found() {
            break;
        }
    }

    loader.finalize()
}

fn stream_error(err: std::io::Error) -> IoError {
    IoError::Read {
        path: "<stream>".to_string(),
        message: err.to_string(),
    }
}

/// Attach the file path to read errors raised while streaming it.
fn with_path(err: ExifError, path: &Path) -> ExifError {
    match err {
        ExifError::Io(IoError::Read { message, .. }) => ExifError::Io(IoError::Read {
            path: path.display().to_string(),
            message,
        }),
        other => other,
    }
}
