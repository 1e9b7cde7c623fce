//! Walking the directories of an EXIF block.
//!
//! # IFD Structure
//!
//! ```text
//! Bytes 0-1:   Number of entries (N)
//! Bytes 2-...: N entries, 12 bytes each
//! Last 4:      Offset to the next IFD (0 = none)
//! ```
//!
//! Each entry is `tag (2) | type (2) | count (4) | value or offset (4)`.
//! Values of at most 4 bytes are stored inline, anything larger lives at the
//! offset, relative to the start of the TIFF header.
//!
//! IFD0 links to the thumbnail IFD through its next-IFD offset, and to the
//! Exif and GPS IFDs through pointer tags. The Exif IFD in turn points to the
//! Interoperability IFD.

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::error::{ExifError, TiffError};
use crate::exif::{FormatCode, RawEntry, RawEntrySource};
use crate::format::detect::locate_exif;

use super::parser::{ByteOrder, TiffHeader, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE, VALUE_OFFSET_SIZE};
use super::tags::{is_ifd_pointer, tag_name, FieldType, IfdKind};
use super::values::format_value;

/// Size of the entry count that starts every IFD
const ENTRY_COUNT_SIZE: usize = 2;

// =============================================================================
// ExifDirectory
// =============================================================================

/// Which optional directories the walk visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    /// Also walk IFD1, the thumbnail directory. Its tags come first in the
    /// walk, so the primary image's tags win on shared ids.
    pub include_thumbnail: bool,
}

/// A validated EXIF block, ready to be walked.
///
/// Holds the TIFF bytes (without the `Exif\0\0` prefix) and the parsed
/// header. Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone)]
pub struct ExifDirectory {
    data: Bytes,
    header: TiffHeader,
    options: WalkOptions,
}

impl ExifDirectory {
    /// Locate and validate the EXIF block in a complete file image.
    ///
    /// Accepts the same inputs as the streaming loader: JPEG, a bare EXIF
    /// block, or TIFF.
    ///
    /// # Errors
    /// - `NoExifData` if no EXIF header is found
    /// - `Tiff` if the block's TIFF header is malformed
    pub fn open(data: impl Into<Bytes>) -> Result<Self, ExifError> {
        let data = data.into();
        let range = locate_exif(&data)?;
        Ok(Self::from_tiff(data.slice(range))?)
    }

    /// Validate a buffer that starts with the TIFF header of an EXIF block.
    pub fn from_tiff(data: Bytes) -> Result<Self, TiffError> {
        let header = TiffHeader::parse(&data)?;
        debug!(
            byte_order = ?header.byte_order,
            first_ifd_offset = header.first_ifd_offset,
            len = data.len(),
            "Opened EXIF block"
        );
        Ok(Self {
            data,
            header,
            options: WalkOptions::default(),
        })
    }

    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    /// Size of the TIFF block in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Start a walk over every directory.
    pub fn walk(&self) -> DirectoryWalk<'_> {
        DirectoryWalk::new(&self.data, &self.header, self.options)
    }
}

impl RawEntrySource for ExifDirectory {
    type Entries<'a> = DirectoryWalk<'a>;

    fn entries(&self) -> Self::Entries<'_> {
        self.walk()
    }
}

// =============================================================================
// DirectoryWalk
// =============================================================================

/// Position inside the directory being walked.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    kind: IfdKind,
    offset: usize,
    index: usize,
    count: usize,
}

/// Lazy, single-pass iterator over the entries of an EXIF block.
///
/// Directories are visited in [`IfdKind`] order, each at most once, so a
/// block whose pointers form a cycle still terminates. Pointer tags are
/// followed rather than yielded. Entries whose values lie outside the block
/// are skipped.
#[derive(Debug)]
pub struct DirectoryWalk<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
    pending: Vec<(IfdKind, usize)>,
    visited: Vec<IfdKind>,
    current: Option<Cursor>,
}

impl<'a> DirectoryWalk<'a> {
    fn new(data: &'a [u8], header: &TiffHeader, options: WalkOptions) -> Self {
        let mut walk = Self {
            data,
            byte_order: header.byte_order,
            pending: Vec::with_capacity(4),
            visited: Vec::with_capacity(5),
            current: None,
        };

        let ifd0 = header.first_ifd_offset as usize;
        walk.schedule(IfdKind::Primary, ifd0);

        if options.include_thumbnail {
            match walk.next_ifd_offset(ifd0) {
                Some(0) | None => trace!("No thumbnail IFD"),
                Some(ifd1) => walk.schedule(IfdKind::Thumbnail, ifd1),
            }
        }

        walk
    }

    /// Read the next-IFD link that follows the entries of the IFD at `offset`.
    fn next_ifd_offset(&self, offset: usize) -> Option<usize> {
        let count = self.read_u16(offset)? as usize;
        let link = offset + ENTRY_COUNT_SIZE + count * IFD_ENTRY_SIZE;
        self.read_u32(link).map(|v| v as usize)
    }

    fn read_u16(&self, offset: usize) -> Option<u16> {
        let bytes = self.data.get(offset..offset.checked_add(2)?)?;
        Some(self.byte_order.read_u16(bytes))
    }

    fn read_u32(&self, offset: usize) -> Option<u32> {
        let bytes = self.data.get(offset..offset.checked_add(4)?)?;
        Some(self.byte_order.read_u32(bytes))
    }

    /// Queue a directory. The first pointer to each kind wins.
    fn schedule(&mut self, kind: IfdKind, offset: usize) {
        let seen = self.visited.contains(&kind) || self.pending.iter().any(|(k, _)| *k == kind);
        if seen {
            trace!(ifd = kind.name(), "Directory already scheduled");
            return;
        }

        let in_range = offset >= TIFF_HEADER_SIZE
            && offset
                .checked_add(ENTRY_COUNT_SIZE)
                .is_some_and(|end| end <= self.data.len());
        if !in_range {
            warn!(ifd = kind.name(), offset, "Directory offset outside EXIF block");
            return;
        }

        self.pending.push((kind, offset));
    }

    /// Take the pending directory that comes first in walk order.
    fn open_next_directory(&mut self) -> Option<()> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (kind, _))| *kind)
            .map(|(index, _)| index)?;
        let (kind, offset) = self.pending.swap_remove(index);
        self.visited.push(kind);

        let declared = self.read_u16(offset).unwrap_or(0) as usize;
        let room = (self.data.len() - offset - ENTRY_COUNT_SIZE) / IFD_ENTRY_SIZE;
        if declared > room {
            warn!(
                ifd = kind.name(),
                declared,
                available = room,
                "IFD entry count runs past the EXIF block"
            );
        }

        let count = declared.min(room);
        trace!(ifd = kind.name(), offset, entries = count, "Walking directory");
        self.current = Some(Cursor {
            kind,
            offset,
            index: 0,
            count,
        });
        Some(())
    }

    /// Turn the 12-byte entry at `offset` into a raw entry.
    ///
    /// Returns `None` for pointer tags (which schedule their directory
    /// instead) and for entries whose value cannot be located.
    fn read_entry(&mut self, kind: IfdKind, offset: usize) -> Option<RawEntry<'a>> {
        let data = self.data;
        let order = self.byte_order;
        let bytes = &data[offset..offset + IFD_ENTRY_SIZE];

        let tag = order.read_u16(&bytes[0..2]);
        let type_code = order.read_u16(&bytes[2..4]);
        let count = order.read_u32(&bytes[4..8]);
        let value_field = offset + 8;

        if let Some(sub) = kind.sub_directory(tag) {
            let target = order.read_u32(&bytes[8..12]) as usize;
            self.schedule(sub, target);
            return None;
        }
        if is_ifd_pointer(tag) {
            trace!(tag, ifd = kind.name(), "Ignoring misplaced directory pointer");
            return None;
        }

        let field_type = FieldType::from_u16(type_code);
        let payload = match field_type {
            // Unknown types have no size; the raw value field is all there is
            None => &data[value_field..value_field + VALUE_OFFSET_SIZE],
            Some(field_type) => {
                let Some(size) = field_type.payload_size(count) else {
                    warn!(tag, count, "Entry value size overflows");
                    return None;
                };
                if size <= VALUE_OFFSET_SIZE {
                    &data[value_field..value_field + size]
                } else {
                    let start = order.read_u32(&bytes[8..12]) as usize;
                    match start.checked_add(size).and_then(|end| data.get(start..end)) {
                        Some(payload) => payload,
                        None => {
                            warn!(
                                tag,
                                ifd = kind.name(),
                                offset = start,
                                size,
                                "Entry value lies outside EXIF block, skipping"
                            );
                            return None;
                        }
                    }
                }
            }
        };

        let label = match tag_name(kind, tag) {
            Some(name) => name.to_string(),
            None => format!("Tag 0x{tag:04X}"),
        };

        Some(RawEntry {
            tag_id: u32::from(tag),
            format: FormatCode::from_raw(type_code),
            component_count: count,
            byte_order: order,
            payload,
            label,
            preformatted_value: format_value(field_type, payload, order),
            ifd: kind,
        })
    }
}

impl<'a> Iterator for DirectoryWalk<'a> {
    type Item = RawEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next_entry = match self.current.as_mut() {
                Some(cursor) if cursor.index < cursor.count => {
                    let entry_offset =
                        cursor.offset + ENTRY_COUNT_SIZE + cursor.index * IFD_ENTRY_SIZE;
                    cursor.index += 1;
                    Some((cursor.kind, entry_offset))
                }
                _ => None,
            };

            match next_entry {
                Some((kind, entry_offset)) => {
                    if let Some(entry) = self.read_entry(kind, entry_offset) {
                        return Some(entry);
                    }
                }
                None => {
                    self.current = None;
                    self.open_next_directory()?;
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
