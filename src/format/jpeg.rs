//! JPEG marker vocabulary.
//!
//! EXIF data in a JPEG file lives in an APP1 segment whose payload starts
//! with `Exif\0\0`. Finding it only requires walking the marker segments that
//! precede the image data; nothing here decodes pixels.
//!
//! # Segment Layout
//!
//! ```text
//! FF xx            marker (any number of FF fill bytes may precede xx)
//! LL LL            big-endian length, counting itself but not the marker
//! ...              LL LL - 2 bytes of payload
//! ```
//!
//! Standalone markers (SOI, TEM, RSTn) carry no length. Metadata segments
//! always come before SOS, so reaching SOS or EOI means there is no EXIF.

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker, which is also the JPEG file signature
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// Fill byte that may repeat before a marker code
pub const MARKER_PREFIX: u8 = 0xFF;

/// End Of Image marker code
pub const EOI: u8 = 0xD9;

/// Start Of Scan marker code
pub const SOS: u8 = 0xDA;

/// Application segment 1 (EXIF, XMP) marker code
pub const APP1: u8 = 0xE1;

/// Marker code of temporary private use (standalone)
const TEM: u8 = 0x01;

/// Restart marker codes (standalone)
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;

// =============================================================================
// Marker Classification
// =============================================================================

/// How the scanner must treat a marker code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// No length field follows (SOI, TEM, RST0-RST7)
    Standalone,

    /// Image data or end of file: no metadata segment can follow
    EndOfMetadata,

    /// A length-prefixed segment
    Segment,

    /// 0x00 is a stuffed byte, never a marker code
    Invalid,
}

/// Classify a marker code (the byte after `0xFF`).
pub fn marker_kind(code: u8) -> MarkerKind {
    match code {
        0x00 => MarkerKind::Invalid,
        TEM | RST0..=RST7 => MarkerKind::Standalone,
        SOS | EOI => MarkerKind::EndOfMetadata,
        c if c == SOI[1] => MarkerKind::Standalone,
        _ => MarkerKind::Segment,
    }
}

/// Whether `code` starts an APP1 segment.
#[inline]
pub fn is_app1(code: u8) -> bool {
    code == APP1
}

// =============================================================================
// Tests
// =============================================================================
