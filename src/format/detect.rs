//! Locating the EXIF block inside a byte stream.
//!
//! Three kinds of input are recognized by their first bytes:
//!
//! - **JPEG**: `FF D8`, EXIF in an APP1 segment starting with `Exif\0\0`
//! - **EXIF block**: `Exif\0\0` followed directly by a TIFF header
//! - **TIFF**: `II*\0` or `MM\0*`, the stream is the EXIF block itself
//!
//! [`ExifScanner`] does the work incrementally so that a streaming loader can
//! feed it arbitrary chunks. Whole buffers go through the same scanner via
//! [`locate_exif`].

use std::ops::Range;

use tracing::debug;

use crate::error::ExifError;

use super::jpeg::{is_app1, marker_kind, MarkerKind, MARKER_PREFIX, SOI};

// =============================================================================
// Container
// =============================================================================

/// Header that prefixes an EXIF block in JPEG APP1 segments.
pub const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// Detected input container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// JPEG file; EXIF lives in an APP1 segment
    Jpeg,

    /// Bare EXIF block (`Exif\0\0` + TIFF)
    ExifBlock,

    /// Bare TIFF stream
    Tiff,
}

impl Container {
    /// Get a human-readable name for the container.
    pub const fn name(&self) -> &'static str {
        match self {
            Container::Jpeg => "JPEG",
            Container::ExifBlock => "EXIF block",
            Container::Tiff => "TIFF",
        }
    }
}

/// Result of looking at the first bytes of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniff {
    /// The prefix identifies a container
    Detected(Container),

    /// The prefix is consistent with a container but too short to tell
    NeedMore,

    /// No supported container starts like this
    Unrecognized,
}

const SIGNATURES: [(&[u8], Container); 4] = [
    (&SOI, Container::Jpeg),
    (EXIF_HEADER, Container::ExifBlock),
    (b"II*\0", Container::Tiff),
    (b"MM\0*", Container::Tiff),
];

/// Identify the container from a stream prefix.
pub fn sniff_container(prefix: &[u8]) -> Sniff {
    let mut possible = false;

    for (signature, container) in SIGNATURES {
        if prefix.len() >= signature.len() {
            if prefix.starts_with(signature) {
                return Sniff::Detected(container);
            }
        } else if signature.starts_with(prefix) {
            possible = true;
        }
    }

    if possible {
        Sniff::NeedMore
    } else {
        Sniff::Unrecognized
    }
}

// =============================================================================
// ExifScanner
// =============================================================================

/// Outcome of one [`ExifScanner::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// More input is needed
    NeedMore,

    /// The complete EXIF block has been emitted; further input is not used
    Complete,

    /// The stream cannot contain EXIF data
    NoExif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Collecting the first bytes into `pending`
    Sniff,
    /// Expecting the 0xFF that starts a marker
    MarkerStart,
    /// After 0xFF, expecting the marker code
    MarkerCode,
    /// Collecting the two length bytes into `pending`
    SegmentLength { marker: u8 },
    /// Collecting up to six APP1 payload bytes into `pending`
    App1Probe { remaining: usize },
    /// Discarding a segment that is not EXIF
    Skip { remaining: usize },
    /// Emitting the TIFF part of the EXIF segment
    Exif { remaining: usize },
    /// Bare EXIF/TIFF stream: everything is emitted
    Raw,
    Complete,
    NoExif,
}

/// Incremental EXIF locator.
///
/// Bytes are pushed with [`feed`](Self::feed); the TIFF part of the EXIF
/// block (without the `Exif\0\0` prefix) is handed to the sink as it is
/// found. Chunk boundaries can fall anywhere, including inside markers and
/// length fields.
#[derive(Debug, Clone)]
pub struct ExifScanner {
    state: ScanState,
    container: Option<Container>,
    pending: Vec<u8>,
    /// Stream offset of the first byte of the next `feed` call
    offset: usize,
    /// Stream offset where the TIFF block starts
    tiff_start: Option<usize>,
}

impl Default for ExifScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ExifScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Sniff,
            container: None,
            pending: Vec::with_capacity(EXIF_HEADER.len()),
            offset: 0,
            tiff_start: None,
        }
    }

    /// The container detected so far.
    pub fn container(&self) -> Option<Container> {
        self.container
    }

    /// Stream offset of the first TIFF byte, once an EXIF header is found.
    pub fn tiff_start(&self) -> Option<usize> {
        self.tiff_start
    }

    /// Whether the stream has no known end (bare EXIF/TIFF).
    pub fn is_raw(&self) -> bool {
        self.state == ScanState::Raw
    }

    /// Whether an EXIF header has been recognized, complete or not.
    pub fn found_exif(&self) -> bool {
        matches!(
            self.state,
            ScanState::Exif { .. } | ScanState::Raw | ScanState::Complete
        )
    }

    /// Push `input` through the scanner.
    ///
    /// Returns how many bytes of `input` were used and the resulting status.
    /// Once the status is `Complete`, the remaining input is left unused.
    pub fn feed(&mut self, input: &[u8], sink: &mut dyn FnMut(&[u8])) -> (usize, ScanStatus) {
        let mut pos = 0;

        while pos < input.len() {
            match self.state {
                ScanState::Complete | ScanState::NoExif => break,
                ScanState::Sniff => {
                    self.pending.push(input[pos]);
                    pos += 1;
                    self.sniff(self.offset + pos, sink);
                }
                ScanState::MarkerStart => {
                    self.state = if input[pos] == MARKER_PREFIX {
                        ScanState::MarkerCode
                    } else {
                        debug!(byte = input[pos], "Expected JPEG marker, found data");
                        ScanState::NoExif
                    };
                    pos += 1;
                }
                ScanState::MarkerCode => {
                    let code = input[pos];
                    pos += 1;
                    if code == MARKER_PREFIX {
                        // Fill byte
                        continue;
                    }
                    self.state = match marker_kind(code) {
                        MarkerKind::Standalone => ScanState::MarkerStart,
                        MarkerKind::EndOfMetadata | MarkerKind::Invalid => {
                            debug!(marker = code, "Reached end of JPEG metadata without EXIF");
                            ScanState::NoExif
                        }
                        MarkerKind::Segment => {
                            self.pending.clear();
                            ScanState::SegmentLength { marker: code }
                        }
                    };
                }
                ScanState::SegmentLength { marker } => {
                    self.pending.push(input[pos]);
                    pos += 1;
                    if self.pending.len() == 2 {
                        let length = u16::from_be_bytes([self.pending[0], self.pending[1]]);
                        self.pending.clear();
                        self.state = Self::segment_body(marker, length);
                    }
                }
                ScanState::App1Probe { remaining } => {
                    let wanted = (EXIF_HEADER.len() - self.pending.len()).min(remaining);
                    let n = wanted.min(input.len() - pos);
                    self.pending.extend_from_slice(&input[pos..pos + n]);
                    pos += n;
                    self.state = self.probe_app1(remaining - n, self.offset + pos);
                }
                ScanState::Skip { remaining } => {
                    let n = remaining.min(input.len() - pos);
                    pos += n;
                    self.state = if remaining == n {
                        ScanState::MarkerStart
                    } else {
                        ScanState::Skip {
                            remaining: remaining - n,
                        }
                    };
                }
                ScanState::Exif { remaining } => {
                    let n = remaining.min(input.len() - pos);
                    sink(&input[pos..pos + n]);
                    pos += n;
                    self.state = if remaining == n {
                        ScanState::Complete
                    } else {
                        ScanState::Exif {
                            remaining: remaining - n,
                        }
                    };
                }
                ScanState::Raw => {
                    sink(&input[pos..]);
                    pos = input.len();
                }
            }
        }

        self.offset += pos;

        let status = match self.state {
            ScanState::Complete => ScanStatus::Complete,
            ScanState::NoExif => ScanStatus::NoExif,
            _ => ScanStatus::NeedMore,
        };
        (pos, status)
    }

    fn sniff(&mut self, stream_pos: usize, sink: &mut dyn FnMut(&[u8])) {
        match sniff_container(&self.pending) {
            Sniff::NeedMore => {}
            Sniff::Unrecognized => {
                debug!("Input is not JPEG, TIFF or an EXIF block");
                self.state = ScanState::NoExif;
            }
            Sniff::Detected(container) => {
                debug!(container = container.name(), "Detected container");
                self.container = Some(container);
                self.state = match container {
                    Container::Jpeg => ScanState::MarkerStart,
                    // The Exif\0\0 prefix is not part of the TIFF block
                    Container::ExifBlock => {
                        self.tiff_start = Some(stream_pos);
                        ScanState::Raw
                    }
                    Container::Tiff => {
                        self.tiff_start = Some(stream_pos - self.pending.len());
                        sink(&self.pending);
                        ScanState::Raw
                    }
                };
                self.pending.clear();
            }
        }
    }

    fn segment_body(marker: u8, length: u16) -> ScanState {
        // The length counts its own two bytes
        let Some(body) = (length as usize).checked_sub(2) else {
            debug!(marker, length, "Invalid JPEG segment length");
            return ScanState::NoExif;
        };

        if body == 0 {
            ScanState::MarkerStart
        } else if is_app1(marker) {
            ScanState::App1Probe { remaining: body }
        } else {
            ScanState::Skip { remaining: body }
        }
    }

    fn probe_app1(&mut self, remaining: usize, stream_pos: usize) -> ScanState {
        if !EXIF_HEADER.starts_with(&self.pending) {
            // XMP or another APP1 payload
            self.pending.clear();
            return if remaining == 0 {
                ScanState::MarkerStart
            } else {
                ScanState::Skip { remaining }
            };
        }

        if self.pending.len() == EXIF_HEADER.len() {
            self.pending.clear();
            self.tiff_start = Some(stream_pos);
            debug!(tiff_bytes = remaining, "Found EXIF APP1 segment");
            return if remaining == 0 {
                ScanState::Complete
            } else {
                ScanState::Exif { remaining }
            };
        }

        if remaining == 0 {
            // Segment ended inside the probe
            self.pending.clear();
            ScanState::MarkerStart
        } else {
            ScanState::App1Probe { remaining }
        }
    }
}

// =============================================================================
// Whole-buffer location
// =============================================================================

/// Find the TIFF block of the EXIF data in a complete buffer.
///
/// Returns the byte range of the TIFF block within `data`.
///
/// # Errors
/// `NoExifData` if the buffer is not a supported container or holds no EXIF
/// segment.
pub fn locate_exif(data: &[u8]) -> Result<Range<usize>, ExifError> {
    let mut scanner = ExifScanner::new();
    let (consumed, status) = scanner.feed(data, &mut |_: &[u8]| {});

    match (status, scanner.tiff_start()) {
        (ScanStatus::NoExif, _) | (_, None) => Err(ExifError::NoExifData),
        (_, Some(start)) => Ok(start..consumed),
    }
}

// =============================================================================
// Tests
// =============================================================================
