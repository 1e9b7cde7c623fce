//! Test utilities for integration tests.
//!
//! This module provides builders for synthetic EXIF blocks and the JPEG
//! files that carry them, in either byte order.

use std::io::Write;

use tempfile::NamedTempFile;

// =============================================================================
// TIFF Builders
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

/// Builder for the TIFF part of an EXIF block.
///
/// IFDs are laid out in the order they are added, each followed by its
/// out-of-line values. The first IFD added is IFD0.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    ifds: Vec<IfdBuilder>,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            ifds: Vec::new(),
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    /// Add an IFD and return its index, for use with pointers.
    pub fn add_ifd(&mut self, ifd: IfdBuilder) -> usize {
        self.ifds.push(ifd);
        self.ifds.len() - 1
    }

    /// Build the TIFF data.
    pub fn build(&self) -> Vec<u8> {
        let order = self.byte_order;

        // First pass: where each IFD starts
        let mut offsets = Vec::with_capacity(self.ifds.len());
        let mut pos = 8usize;
        for ifd in &self.ifds {
            offsets.push(pos);
            pos += ifd.size(order);
        }

        let mut data = Vec::with_capacity(pos);
        match order {
            ByteOrderType::LittleEndian => data.extend_from_slice(b"II"),
            ByteOrderType::BigEndian => data.extend_from_slice(b"MM"),
        }
        write_u16(&mut data, order, 42);
        write_u32(&mut data, order, 8);

        for (ifd, &offset) in self.ifds.iter().zip(&offsets) {
            ifd.write_to(&mut data, order, offset, &offsets);
        }

        data
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed values, encoded in the TIFF's byte order at build time.
#[derive(Clone, Debug)]
enum Value {
    Raw(Vec<u8>),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    SRationals(Vec<(i32, i32)>),
    /// Offset of another IFD, by index
    Pointer(usize),
    /// A value/offset field written verbatim
    Offset(u32),
}

struct IfdEntryBuilder {
    tag: u16,
    field_type: u16,
    count: u32,
    value: Value,
}

/// Builder for one IFD.
pub struct IfdBuilder {
    entries: Vec<IfdEntryBuilder>,
    next: Option<usize>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next: None,
        }
    }

    fn push(&mut self, tag: u16, field_type: u16, count: u32, value: Value) -> &mut Self {
        self.entries.push(IfdEntryBuilder {
            tag,
            field_type,
            count,
            value,
        });
        self
    }

    pub fn add_byte(&mut self, tag: u16, value: u8) -> &mut Self {
        self.push(tag, 1, 1, Value::Raw(vec![value]))
    }

    pub fn add_ascii(&mut self, tag: u16, text: &str) -> &mut Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let count = bytes.len() as u32;
        self.push(tag, 2, count, Value::Raw(bytes))
    }

    pub fn add_short(&mut self, tag: u16, value: u16) -> &mut Self {
        self.push(tag, 3, 1, Value::Shorts(vec![value]))
    }

    pub fn add_long(&mut self, tag: u16, value: u32) -> &mut Self {
        self.push(tag, 4, 1, Value::Longs(vec![value]))
    }

    pub fn add_rationals(&mut self, tag: u16, values: &[(u32, u32)]) -> &mut Self {
        self.push(tag, 5, values.len() as u32, Value::Rationals(values.to_vec()))
    }

    pub fn add_srational(&mut self, tag: u16, numerator: i32, denominator: i32) -> &mut Self {
        self.push(tag, 10, 1, Value::SRationals(vec![(numerator, denominator)]))
    }

    pub fn add_undefined(&mut self, tag: u16, bytes: &[u8]) -> &mut Self {
        self.push(tag, 7, bytes.len() as u32, Value::Raw(bytes.to_vec()))
    }

    /// Add an entry whose value/offset field is written as-is.
    pub fn add_raw_entry(&mut self, tag: u16, field_type: u16, count: u32, offset: u32) -> &mut Self {
        self.push(tag, field_type, count, Value::Offset(offset))
    }

    /// Add a pointer tag (Exif, GPS, Interop) to the IFD at `target`.
    pub fn add_pointer(&mut self, tag: u16, target: usize) -> &mut Self {
        self.push(tag, 4, 1, Value::Pointer(target))
    }

    /// Link to the IFD at `target` through the next-IFD offset.
    pub fn with_next(&mut self, target: usize) -> &mut Self {
        self.next = Some(target);
        self
    }

    fn size(&self, order: ByteOrderType) -> usize {
        let extra: usize = self
            .entries
            .iter()
            .map(|e| out_of_line_len(&encode(&e.value, order)))
            .sum();
        2 + self.entries.len() * 12 + 4 + extra
    }

    fn write_to(&self, data: &mut Vec<u8>, order: ByteOrderType, start: usize, offsets: &[usize]) {
        let mut data_offset = start + 2 + self.entries.len() * 12 + 4;
        let mut external = Vec::new();

        write_u16(data, order, self.entries.len() as u16);
        for entry in &self.entries {
            write_u16(data, order, entry.tag);
            write_u16(data, order, entry.field_type);
            write_u32(data, order, entry.count);

            match &entry.value {
                Value::Pointer(target) => write_u32(data, order, offsets[*target] as u32),
                Value::Offset(offset) => write_u32(data, order, *offset),
                value => {
                    let bytes = encode(value, order);
                    if bytes.len() <= 4 {
                        let mut inline = bytes;
                        inline.resize(4, 0);
                        data.extend_from_slice(&inline);
                    } else {
                        write_u32(data, order, data_offset as u32);
                        data_offset += out_of_line_len(&bytes);
                        external.extend_from_slice(&bytes);
                        // Values start on word boundaries
                        if bytes.len() % 2 == 1 {
                            external.push(0);
                        }
                    }
                }
            }
        }

        write_u32(data, order, self.next.map_or(0, |n| offsets[n] as u32));
        data.extend_from_slice(&external);
    }
}

impl Default for IfdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(value: &Value, order: ByteOrderType) -> Vec<u8> {
    let mut out = Vec::new();
    match value {
        Value::Raw(bytes) => out.extend_from_slice(bytes),
        Value::Shorts(values) => values.iter().for_each(|&v| write_u16(&mut out, order, v)),
        Value::Longs(values) => values.iter().for_each(|&v| write_u32(&mut out, order, v)),
        Value::Rationals(values) => {
            for &(n, d) in values {
                write_u32(&mut out, order, n);
                write_u32(&mut out, order, d);
            }
        }
        Value::SRationals(values) => {
            for &(n, d) in values {
                write_u32(&mut out, order, n as u32);
                write_u32(&mut out, order, d as u32);
            }
        }
        Value::Pointer(_) | Value::Offset(_) => {}
    }
    out
}

fn out_of_line_len(bytes: &[u8]) -> usize {
    if bytes.len() <= 4 {
        0
    } else {
        bytes.len() + bytes.len() % 2
    }
}

fn write_u16(data: &mut Vec<u8>, order: ByteOrderType, value: u16) {
    match order {
        ByteOrderType::LittleEndian => data.extend(&value.to_le_bytes()),
        ByteOrderType::BigEndian => data.extend(&value.to_be_bytes()),
    }
}

fn write_u32(data: &mut Vec<u8>, order: ByteOrderType, value: u32) {
    match order {
        ByteOrderType::LittleEndian => data.extend(&value.to_le_bytes()),
        ByteOrderType::BigEndian => data.extend(&value.to_be_bytes()),
    }
}

// =============================================================================
// JPEG Builders
// =============================================================================

/// Builder for a JPEG file made only of metadata segments and a token scan.
pub struct JpegBuilder {
    segments: Vec<(u8, Vec<u8>)>,
    fill_bytes: usize,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            fill_bytes: 0,
        }
    }

    /// Add a JFIF APP0 segment.
    pub fn with_jfif(mut self) -> Self {
        self.segments
            .push((0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0".to_vec()));
        self
    }

    /// Add an XMP APP1 segment, which must not be mistaken for EXIF.
    pub fn with_xmp(mut self) -> Self {
        let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
        payload.extend_from_slice(b"<x:xmpmeta xmlns:x='adobe:ns:meta/'/>");
        self.segments.push((0xE1, payload));
        self
    }

    /// Add an EXIF APP1 segment holding `tiff`.
    pub fn with_exif(mut self, tiff: &[u8]) -> Self {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(tiff);
        self.segments.push((0xE1, payload));
        self
    }

    /// Add a quantization table segment.
    pub fn with_dqt(mut self) -> Self {
        self.segments.push((0xDB, vec![0u8; 65]));
        self
    }

    /// Pad every marker with extra 0xFF fill bytes.
    pub fn with_fill_bytes(mut self, count: usize) -> Self {
        self.fill_bytes = count;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        for (marker, payload) in &self.segments {
            data.extend(std::iter::repeat(0xFF).take(self.fill_bytes));
            data.extend_from_slice(&[0xFF, *marker]);
            data.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
            data.extend_from_slice(payload);
        }
        // SOS with a token scan, then EOI
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        data.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56, 0x78]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Sample Images
// =============================================================================

pub const MAKE: &str = "Canon";
pub const MODEL: &str = "Canon EOS 5D Mark IV";
pub const DATE_TIME_ORIGINAL: &str = "2023:06:15 14:30:00";

/// An EXIF block with IFD0, IFD1, Exif, Interop and GPS directories.
///
/// - IFD0: Make, Model (space padded), Orientation 6, XResolution 72/1
/// - IFD1: Orientation 1, Compression 6
/// - Exif: ExposureTime 1/250, FNumber 28/10, ISO 400, DateTimeOriginal,
///   ExposureBiasValue -1/3, ExifVersion "0230"
/// - Interop: InteroperabilityIndex "R98"
/// - GPS: 10 deg 30' N, 122 deg 15' W, 1234/10 m below sea level
pub fn sample_exif(order: ByteOrderType) -> Vec<u8> {
    let mut tiff = TiffBuilder::new().with_byte_order(order);

    // Indices are assigned in insertion order
    let (ifd1, exif, interop, gps) = (1, 2, 3, 4);

    let mut ifd0 = IfdBuilder::new();
    ifd0.add_ascii(0x010F, MAKE)
        .add_ascii(0x0110, &format!("{MODEL}   "))
        .add_short(0x0112, 6)
        .add_rationals(0x011A, &[(72, 1)])
        .add_pointer(0x8769, exif)
        .add_pointer(0x8825, gps)
        .with_next(ifd1);
    tiff.add_ifd(ifd0);

    let mut thumbnail = IfdBuilder::new();
    thumbnail.add_short(0x0112, 1).add_short(0x0103, 6);
    tiff.add_ifd(thumbnail);

    let mut exif_ifd = IfdBuilder::new();
    exif_ifd
        .add_rationals(0x829A, &[(1, 250)])
        .add_rationals(0x829D, &[(28, 10)])
        .add_short(0x8827, 400)
        .add_ascii(0x9003, DATE_TIME_ORIGINAL)
        .add_srational(0x9204, -1, 3)
        .add_undefined(0x9000, b"0230")
        .add_pointer(0xA005, interop);
    tiff.add_ifd(exif_ifd);

    let mut interop_ifd = IfdBuilder::new();
    interop_ifd.add_ascii(0x0001, "R98");
    tiff.add_ifd(interop_ifd);

    let mut gps_ifd = IfdBuilder::new();
    gps_ifd
        .add_ascii(0x0001, "N")
        .add_rationals(0x0002, &[(10, 1), (30, 1), (0, 1)])
        .add_ascii(0x0003, "W")
        .add_rationals(0x0004, &[(122, 1), (15, 1), (0, 1)])
        .add_byte(0x0005, 1)
        .add_rationals(0x0006, &[(1234, 10)]);
    tiff.add_ifd(gps_ifd);

    tiff.build()
}

/// A JPEG with JFIF, XMP and EXIF segments ahead of the image data.
pub fn sample_jpeg(order: ByteOrderType) -> Vec<u8> {
    JpegBuilder::new()
        .with_jfif()
        .with_xmp()
        .with_exif(&sample_exif(order))
        .with_dqt()
        .build()
}

/// A JPEG with no EXIF segment.
pub fn jpeg_without_exif() -> Vec<u8> {
    JpegBuilder::new().with_jfif().with_xmp().with_dqt().build()
}

/// Write `data` to a temporary file that lives as long as the handle.
pub fn temp_file(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

pub fn is_tiff_magic(data: &[u8]) -> bool {
    data.len() >= 4
        && ((data[0] == b'I' && data[1] == b'I' && data[2] == 42 && data[3] == 0)
            || (data[0] == b'M' && data[1] == b'M' && data[2] == 0 && data[3] == 42))
}
