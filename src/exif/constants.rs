//! Well-known tag identifiers and the values they are documented to take.
//!
//! These are conveniences for callers looking tags up in a [`TagStore`].
//! The decoder never interprets them.
//!
//! [`TagStore`]: super::TagStore

use std::ops::RangeInclusive;

// =============================================================================
// Image Tags (IFD0 / Exif IFD)
// =============================================================================

pub const IMAGE_DESCRIPTION: u16 = 0x010E;
pub const MAKE: u16 = 0x010F;
pub const MODEL: u16 = 0x0110;
pub const ORIENTATION: u16 = 0x0112;
pub const X_RESOLUTION: u16 = 0x011A;
pub const Y_RESOLUTION: u16 = 0x011B;
pub const RESOLUTION_UNIT: u16 = 0x0128;
pub const SOFTWARE: u16 = 0x0131;
pub const DATE_TIME: u16 = 0x0132;
pub const ARTIST: u16 = 0x013B;
pub const COPYRIGHT: u16 = 0x8298;

pub const EXPOSURE_TIME: u16 = 0x829A;
pub const F_NUMBER: u16 = 0x829D;
pub const ISO_SPEED_RATINGS: u16 = 0x8827;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const DATE_TIME_DIGITIZED: u16 = 0x9004;
pub const FOCAL_LENGTH: u16 = 0x920A;
pub const PIXEL_X_DIMENSION: u16 = 0xA002;
pub const PIXEL_Y_DIMENSION: u16 = 0xA003;

// =============================================================================
// GPS Tags
// =============================================================================

pub const GPS_VERSION_ID: u16 = 0x0000;
pub const GPS_LATITUDE_REF: u16 = 0x0001;
pub const GPS_LATITUDE: u16 = 0x0002;
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
pub const GPS_LONGITUDE: u16 = 0x0004;
pub const GPS_ALTITUDE_REF: u16 = 0x0005;
pub const GPS_ALTITUDE: u16 = 0x0006;
pub const GPS_TIME_STAMP: u16 = 0x0007;
pub const GPS_DEST_LATITUDE: u16 = 0x0014;
pub const GPS_DEST_LONGITUDE: u16 = 0x0016;
pub const GPS_DATE_STAMP: u16 = 0x001D;

/// GPS tags stored as degrees/minutes/seconds (or hours/minutes/seconds).
pub const GPS_SEXAGESIMAL_TAGS: [u16; 5] = [
    GPS_LATITUDE,
    GPS_TIME_STAMP,
    GPS_LONGITUDE,
    GPS_DEST_LATITUDE,
    GPS_DEST_LONGITUDE,
];

// =============================================================================
// Orientation Values
// =============================================================================

/// Orientation is missing or unspecified
pub const ORIENTATION_UNSPECIFIED: i64 = 0;
pub const ORIENTATION_NORMAL: i64 = 1;
pub const ORIENTATION_FLIP_HORIZONTAL: i64 = 2;
pub const ORIENTATION_ROTATE_180: i64 = 3;
pub const ORIENTATION_FLIP_VERTICAL: i64 = 4;
pub const ORIENTATION_TRANSPOSE: i64 = 5;
pub const ORIENTATION_ROTATE_90: i64 = 6;
pub const ORIENTATION_TRANSVERSE: i64 = 7;
pub const ORIENTATION_ROTATE_270: i64 = 8;

/// Values a well-formed Orientation tag can take.
pub const ORIENTATION_VALUES: RangeInclusive<i64> = ORIENTATION_NORMAL..=ORIENTATION_ROTATE_270;

// =============================================================================
// GPS Reference Values
// =============================================================================

/// Altitude is above sea level
pub const GPS_ALTITUDE_ABOVE_SEA_LEVEL: i64 = 0;

/// Altitude is below sea level
pub const GPS_ALTITUDE_BELOW_SEA_LEVEL: i64 = 1;

pub const GPS_LATITUDE_NORTH: &str = "N";
pub const GPS_LATITUDE_SOUTH: &str = "S";
pub const GPS_LONGITUDE_EAST: &str = "E";
pub const GPS_LONGITUDE_WEST: &str = "W";

/// Whether `tag_id` is one of the GPS coordinate tags stored as
/// degrees/minutes/seconds.
#[inline]
pub fn is_gps_sexagesimal(tag_id: u32) -> bool {
    GPS_SEXAGESIMAL_TAGS
        .iter()
        .any(|&id| u32::from(id) == tag_id)
}
