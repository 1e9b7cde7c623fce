//! Incremental EXIF ingestion.
//!
//! [`StreamingLoader`] accepts a file in chunks, keeps only the bytes of the
//! EXIF block, and defers the directory walk until [`finalize`] is called.
//!
//! ```text
//! Idle ──write──▶ Accumulating ──write──▶ HeaderFound
//!                      │                       │
//!                      └──────finalize─────────┴──▶ Finalized
//! ```
//!
//! For JPEG input the loader knows where the EXIF segment ends and reports
//! [`WriteOutcome::HeaderFound`] as soon as it has the whole block; the
//! caller should stop reading and finalize. Bare EXIF and TIFF streams have
//! no known end, so the loader keeps accumulating until finalize, or until
//! [`LoaderOptions::max_buffer_size`] bytes are buffered, which also reports
//! `HeaderFound`.
//!
//! [`finalize`]: StreamingLoader::finalize

use bytes::BytesMut;
use tracing::{debug, warn};

use super::decode_source;
use super::decoder::{FoldScope, TagDecoder};
use super::store::TagStore;
use crate::error::{ExifError, LoaderError};
use crate::format::detect::{ExifScanner, ScanStatus};
use crate::format::tiff::{ExifDirectory, WalkOptions};

/// Default cap on buffered EXIF bytes (16 MiB).
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// Options
// =============================================================================

/// Settings for a decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Largest EXIF block the loader will buffer
    pub max_buffer_size: usize,

    /// Walk the thumbnail directory (IFD1) too
    pub include_thumbnail: bool,

    /// Which multi-component rationals are folded
    pub fold_scope: FoldScope,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            include_thumbnail: false,
            fold_scope: FoldScope::default(),
        }
    }
}

impl LoaderOptions {
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    pub fn with_thumbnail(mut self, include_thumbnail: bool) -> Self {
        self.include_thumbnail = include_thumbnail;
        self
    }

    pub fn with_fold_scope(mut self, fold_scope: FoldScope) -> Self {
        self.fold_scope = fold_scope;
        self
    }

    fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            include_thumbnail: self.include_thumbnail,
        }
    }
}

// =============================================================================
// WriteOutcome
// =============================================================================

/// Result of a successful [`StreamingLoader::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Keep writing; the whole chunk was used.
    Continue { consumed: usize },

    /// The EXIF block is buffered, in full or up to the buffer limit: stop
    /// writing and call `finalize`. `consumed` may be less than the chunk
    /// length; the rest of the chunk was not used.
    HeaderFound { consumed: usize },
}

impl WriteOutcome {
    pub fn consumed(&self) -> usize {
        match *self {
            WriteOutcome::Continue { consumed } | WriteOutcome::HeaderFound { consumed } => {
                consumed
            }
        }
    }

    pub fn is_header_found(&self) -> bool {
        matches!(self, WriteOutcome::HeaderFound { .. })
    }
}

// =============================================================================
// StreamingLoader
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoaderState {
    Idle,
    Accumulating,
    HeaderFound,
    Finalized,
}

/// Scanner and buffer, allocated on the first write and dropped by finalize.
#[derive(Debug)]
struct Accumulation {
    scanner: ExifScanner,
    buffer: BytesMut,
}

impl Accumulation {
    fn new() -> Self {
        Self {
            scanner: ExifScanner::new(),
            buffer: BytesMut::new(),
        }
    }
}

/// Two-phase EXIF decoder: [`write`](Self::write) chunks, then
/// [`finalize`](Self::finalize) once.
///
/// A loader has a single owner; feeding it from several tasks requires
/// external serialization.
#[derive(Debug)]
pub struct StreamingLoader {
    options: LoaderOptions,
    state: LoaderState,
    acc: Option<Accumulation>,
}

impl Default for StreamingLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingLoader {
    pub fn new() -> Self {
        Self::with_options(LoaderOptions::default())
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self {
            options,
            state: LoaderState::Idle,
            acc: None,
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Number of EXIF bytes buffered so far.
    pub fn buffered(&self) -> usize {
        self.acc.as_ref().map_or(0, |acc| acc.buffer.len())
    }

    /// Feed the next chunk of the input.
    ///
    /// At most [`LoaderOptions::max_buffer_size`] EXIF bytes are buffered.
    /// A block that reaches the limit is treated as complete: the outcome is
    /// `HeaderFound`, `consumed` stops at the last byte that fit, and
    /// finalize decodes the buffered prefix. Entries whose values lie past
    /// the limit are skipped by the walk.
    ///
    /// # Errors
    /// - `Loader(EmptyChunk)` for a zero-length chunk
    /// - `Loader(AlreadyFinalized)` after [`finalize`](Self::finalize)
    /// - `NoExifData` once the input is known to carry no EXIF block
    pub fn write(&mut self, chunk: &[u8]) -> Result<WriteOutcome, ExifError> {
        if chunk.is_empty() {
            return Err(LoaderError::EmptyChunk.into());
        }
        match self.state {
            LoaderState::Finalized => return Err(LoaderError::AlreadyFinalized.into()),
            LoaderState::HeaderFound => return Ok(WriteOutcome::HeaderFound { consumed: 0 }),
            LoaderState::Idle | LoaderState::Accumulating => {}
        }

        let limit = self.options.max_buffer_size;
        let Accumulation { scanner, buffer } = self.acc.get_or_insert_with(Accumulation::new);
        self.state = LoaderState::Accumulating;

        // Emitted bytes form one run at the end of what the scanner used, so
        // the bytes that did not fit are the last `overflow` of `consumed`
        let mut overflow = 0usize;
        let (consumed, status) = scanner.feed(chunk, &mut |tiff: &[u8]| {
            let room = limit.saturating_sub(buffer.len());
            let take = tiff.len().min(room);
            buffer.extend_from_slice(&tiff[..take]);
            overflow += tiff.len() - take;
        });

        if overflow > 0 {
            warn!(
                limit,
                container = ?scanner.container(),
                "EXIF block reached the buffer limit, decoding the buffered prefix"
            );
            self.state = LoaderState::HeaderFound;
            return Ok(WriteOutcome::HeaderFound {
                consumed: consumed.saturating_sub(overflow),
            });
        }

        match status {
            ScanStatus::Complete => {
                debug!(exif_bytes = buffer.len(), "EXIF block complete");
                self.state = LoaderState::HeaderFound;
                Ok(WriteOutcome::HeaderFound { consumed })
            }
            ScanStatus::NoExif => Err(ExifError::NoExifData),
            ScanStatus::NeedMore => Ok(WriteOutcome::Continue { consumed }),
        }
    }

    /// Walk and decode the buffered EXIF block.
    ///
    /// The buffer is released whatever the outcome, and the loader cannot be
    /// used afterwards.
    ///
    /// # Errors
    /// - `NoExifData` if nothing was written or no EXIF header was seen
    /// - `Tiff` if the EXIF block's TIFF header is malformed
    /// - `Loader(AlreadyFinalized)` on a second call
    pub fn finalize(&mut self) -> Result<TagStore, ExifError> {
        if self.state == LoaderState::Finalized {
            return Err(LoaderError::AlreadyFinalized.into());
        }
        self.state = LoaderState::Finalized;

        let acc = self.acc.take().ok_or(ExifError::NoExifData)?;
        if !acc.scanner.found_exif() {
            debug!(container = ?acc.scanner.container(), "Finalized without EXIF header");
            return Err(ExifError::NoExifData);
        }

        let directory = ExifDirectory::from_tiff(acc.buffer.freeze())?
            .with_options(self.options.walk_options());
        let decoder = TagDecoder::with_fold_scope(self.options.fold_scope);
        Ok(decode_source(&directory, &decoder))
    }
}

// =============================================================================
// Tests
// =============================================================================
