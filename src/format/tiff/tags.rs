//! TIFF field types, EXIF directory kinds and tag names.
//!
//! This module defines the vocabulary the directory walker needs:
//! - Field types that determine how entry payloads are encoded
//! - Which directory (IFD) an entry was found in
//! - Human-readable labels for the tags commonly found in camera files

use serde::Serialize;

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Each field type has a fixed size in bytes, which decides whether an
/// entry's payload is stored inline or at an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two unsigned 32-bit integers: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two signed 32-bit integers: numerator, denominator
    SRational = 10,

    /// IEEE single precision float
    Float = 11,

    /// IEEE double precision float
    Double = 12,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Get the numeric type code.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Total payload size for `count` values, or `None` on overflow.
    #[inline]
    pub fn payload_size(self, count: u32) -> Option<usize> {
        (count as usize).checked_mul(self.size_in_bytes())
    }
}

// =============================================================================
// Directory Kinds
// =============================================================================

/// The directory an entry was read from.
///
/// The ordering of the variants is the walk order: later directories win
/// when two of them use the same tag id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IfdKind {
    /// IFD1, the thumbnail image
    Thumbnail,

    /// IFD0, the primary image
    Primary,

    /// Exif private IFD (camera settings, timestamps)
    Exif,

    /// Interoperability IFD
    Interop,

    /// GPS IFD
    Gps,
}

impl IfdKind {
    /// Get a human-readable name for the directory.
    pub const fn name(self) -> &'static str {
        match self {
            IfdKind::Thumbnail => "IFD1",
            IfdKind::Primary => "IFD0",
            IfdKind::Exif => "Exif",
            IfdKind::Interop => "Interoperability",
            IfdKind::Gps => "GPS",
        }
    }

    /// The directory a pointer tag in this directory leads to, if any.
    pub fn sub_directory(self, tag_id: u16) -> Option<IfdKind> {
        match (self, tag_id) {
            (IfdKind::Primary, EXIF_IFD_POINTER) => Some(IfdKind::Exif),
            (IfdKind::Primary, GPS_IFD_POINTER) => Some(IfdKind::Gps),
            (IfdKind::Exif, INTEROP_IFD_POINTER) => Some(IfdKind::Interop),
            _ => None,
        }
    }
}

/// Pointer to the Exif private IFD (in IFD0)
pub const EXIF_IFD_POINTER: u16 = 0x8769;

/// Pointer to the GPS IFD (in IFD0)
pub const GPS_IFD_POINTER: u16 = 0x8825;

/// Pointer to the Interoperability IFD (in the Exif IFD)
pub const INTEROP_IFD_POINTER: u16 = 0xA005;

/// Whether `tag_id` is one of the sub-directory pointer tags.
pub fn is_ifd_pointer(tag_id: u16) -> bool {
    matches!(
        tag_id,
        EXIF_IFD_POINTER | GPS_IFD_POINTER | INTEROP_IFD_POINTER
    )
}

// =============================================================================
// Tag Names
// =============================================================================

/// Label for a tag found in the given directory.
///
/// GPS and Interoperability tags reuse small ids, so the directory decides
/// the name.
pub fn tag_name(ifd: IfdKind, tag_id: u16) -> Option<&'static str> {
    match ifd {
        IfdKind::Gps => gps_tag_name(tag_id),
        IfdKind::Interop => interop_tag_name(tag_id),
        _ => image_tag_name(tag_id),
    }
}

fn gps_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        0x0000 => "GPSVersionID",
        0x0001 => "GPSLatitudeRef",
        0x0002 => "GPSLatitude",
        0x0003 => "GPSLongitudeRef",
        0x0004 => "GPSLongitude",
        0x0005 => "GPSAltitudeRef",
        0x0006 => "GPSAltitude",
        0x0007 => "GPSTimeStamp",
        0x0008 => "GPSSatellites",
        0x0009 => "GPSStatus",
        0x000A => "GPSMeasureMode",
        0x000B => "GPSDOP",
        0x000C => "GPSSpeedRef",
        0x000D => "GPSSpeed",
        0x000E => "GPSTrackRef",
        0x000F => "GPSTrack",
        0x0010 => "GPSImgDirectionRef",
        0x0011 => "GPSImgDirection",
        0x0012 => "GPSMapDatum",
        0x0013 => "GPSDestLatitudeRef",
        0x0014 => "GPSDestLatitude",
        0x0015 => "GPSDestLongitudeRef",
        0x0016 => "GPSDestLongitude",
        0x0017 => "GPSDestBearingRef",
        0x0018 => "GPSDestBearing",
        0x0019 => "GPSDestDistanceRef",
        0x001A => "GPSDestDistance",
        0x001B => "GPSProcessingMethod",
        0x001C => "GPSAreaInformation",
        0x001D => "GPSDateStamp",
        0x001E => "GPSDifferential",
        _ => return None,
    };
    Some(name)
}

fn interop_tag_name(tag_id: u16) -> Option<&'static str> {
    match tag_id {
        0x0001 => Some("InteroperabilityIndex"),
        0x0002 => Some("InteroperabilityVersion"),
        0x1000 => Some("RelatedImageFileFormat"),
        0x1001 => Some("RelatedImageWidth"),
        0x1002 => Some("RelatedImageLength"),
        _ => None,
    }
}

fn image_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        // IFD0 / IFD1
        0x0100 => "ImageWidth",
        0x0101 => "ImageLength",
        0x0102 => "BitsPerSample",
        0x0103 => "Compression",
        0x0106 => "PhotometricInterpretation",
        0x010E => "ImageDescription",
        0x010F => "Make",
        0x0110 => "Model",
        0x0111 => "StripOffsets",
        0x0112 => "Orientation",
        0x0115 => "SamplesPerPixel",
        0x0116 => "RowsPerStrip",
        0x0117 => "StripByteCounts",
        0x011A => "XResolution",
        0x011B => "YResolution",
        0x011C => "PlanarConfiguration",
        0x0128 => "ResolutionUnit",
        0x0131 => "Software",
        0x0132 => "DateTime",
        0x013B => "Artist",
        0x013E => "WhitePoint",
        0x013F => "PrimaryChromaticities",
        0x0201 => "JPEGInterchangeFormat",
        0x0202 => "JPEGInterchangeFormatLength",
        0x0211 => "YCbCrCoefficients",
        0x0212 => "YCbCrSubSampling",
        0x0213 => "YCbCrPositioning",
        0x0214 => "ReferenceBlackWhite",
        0x8298 => "Copyright",

        // Exif private IFD
        0x829A => "ExposureTime",
        0x829D => "FNumber",
        0x8822 => "ExposureProgram",
        0x8824 => "SpectralSensitivity",
        0x8827 => "ISOSpeedRatings",
        0x8830 => "SensitivityType",
        0x9000 => "ExifVersion",
        0x9003 => "DateTimeOriginal",
        0x9004 => "DateTimeDigitized",
        0x9010 => "OffsetTime",
        0x9011 => "OffsetTimeOriginal",
        0x9012 => "OffsetTimeDigitized",
        0x9101 => "ComponentsConfiguration",
        0x9102 => "CompressedBitsPerPixel",
        0x9201 => "ShutterSpeedValue",
        0x9202 => "ApertureValue",
        0x9203 => "BrightnessValue",
        0x9204 => "ExposureBiasValue",
        0x9205 => "MaxApertureValue",
        0x9206 => "SubjectDistance",
        0x9207 => "MeteringMode",
        0x9208 => "LightSource",
        0x9209 => "Flash",
        0x920A => "FocalLength",
        0x9214 => "SubjectArea",
        0x927C => "MakerNote",
        0x9286 => "UserComment",
        0x9290 => "SubSecTime",
        0x9291 => "SubSecTimeOriginal",
        0x9292 => "SubSecTimeDigitized",
        0xA000 => "FlashpixVersion",
        0xA001 => "ColorSpace",
        0xA002 => "PixelXDimension",
        0xA003 => "PixelYDimension",
        0xA20E => "FocalPlaneXResolution",
        0xA20F => "FocalPlaneYResolution",
        0xA210 => "FocalPlaneResolutionUnit",
        0xA215 => "ExposureIndex",
        0xA217 => "SensingMethod",
        0xA300 => "FileSource",
        0xA301 => "SceneType",
        0xA401 => "CustomRendered",
        0xA402 => "ExposureMode",
        0xA403 => "WhiteBalance",
        0xA404 => "DigitalZoomRatio",
        0xA405 => "FocalLengthIn35mmFilm",
        0xA406 => "SceneCaptureType",
        0xA407 => "GainControl",
        0xA408 => "Contrast",
        0xA409 => "Saturation",
        0xA40A => "Sharpness",
        0xA40C => "SubjectDistanceRange",
        0xA420 => "ImageUniqueID",
        0xA430 => "CameraOwnerName",
        0xA431 => "BodySerialNumber",
        0xA432 => "LensSpecification",
        0xA433 => "LensMake",
        0xA434 => "LensModel",
        0xA435 => "LensSerialNumber",
        _ => return None,
    };
    Some(name)
}

// =============================================================================
// Tests
// =============================================================================
