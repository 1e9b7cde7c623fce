//! Raw directory entries and the sources that produce them.

use crate::format::tiff::{ByteOrder, FieldType, IfdKind};

// =============================================================================
// FormatCode
// =============================================================================

/// How the decoder treats an entry's payload.
///
/// Only formats with special numeric handling get their own variant; every
/// other TIFF type travels as `Other` with its raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCode {
    /// Unsigned 8-bit integer
    Byte,

    /// Unsigned 16-bit integer
    Short,

    /// Unsigned 32-bit integer
    Long,

    /// Numerator/denominator pairs of 32-bit integers
    Rational { signed: bool },

    /// Any other TIFF type code
    Other(u16),
}

impl FormatCode {
    /// Classify a raw TIFF type code.
    pub fn from_raw(code: u16) -> Self {
        match FieldType::from_u16(code) {
            Some(FieldType::Byte) => FormatCode::Byte,
            Some(FieldType::Short) => FormatCode::Short,
            Some(FieldType::Long) => FormatCode::Long,
            Some(FieldType::Rational) => FormatCode::Rational { signed: false },
            Some(FieldType::SRational) => FormatCode::Rational { signed: true },
            _ => FormatCode::Other(code),
        }
    }

    /// The raw TIFF type code.
    pub fn as_u16(self) -> u16 {
        match self {
            FormatCode::Byte => FieldType::Byte.as_u16(),
            FormatCode::Short => FieldType::Short.as_u16(),
            FormatCode::Long => FieldType::Long.as_u16(),
            FormatCode::Rational { signed: false } => FieldType::Rational.as_u16(),
            FormatCode::Rational { signed: true } => FieldType::SRational.as_u16(),
            FormatCode::Other(code) => code,
        }
    }
}

impl From<FieldType> for FormatCode {
    fn from(field_type: FieldType) -> Self {
        FormatCode::from_raw(field_type.as_u16())
    }
}

// =============================================================================
// RawEntry
// =============================================================================

/// One directory entry as produced by a [`RawEntrySource`].
///
/// `payload` borrows from the source's buffer and is only valid for the
/// duration of one decode call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry<'a> {
    /// Tag identifier
    pub tag_id: u32,

    /// Format of the payload
    pub format: FormatCode,

    /// Number of values of `format` in the payload
    pub component_count: u32,

    /// Byte order of the owning EXIF block
    pub byte_order: ByteOrder,

    /// Raw payload bytes
    pub payload: &'a [u8],

    /// Human-readable tag name, possibly space padded
    pub label: String,

    /// Text rendering of the payload, possibly space padded
    pub preformatted_value: String,

    /// Directory the entry was read from
    pub ifd: IfdKind,
}

// =============================================================================
// RawEntrySource
// =============================================================================

/// Something that can walk an EXIF structure and yield its entries.
///
/// The walk is lazy and single-pass; calling [`entries`](Self::entries)
/// again starts a fresh walk over the same data.
pub trait RawEntrySource {
    /// Iterator over the entries of one walk.
    type Entries<'a>: Iterator<Item = RawEntry<'a>>
    where
        Self: 'a;

    /// Start walking the directory structure.
    fn entries(&self) -> Self::Entries<'_>;
}
