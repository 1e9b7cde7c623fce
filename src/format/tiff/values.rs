//! Text rendering of entry payloads.
//!
//! Every raw entry carries a pre-formatted text value next to its bytes. The
//! rendering is purely numeric: integers are listed, rationals are shown as
//! `n/d`, strings are cut at their NUL terminator. Nothing here knows what a
//! tag means.

use super::parser::ByteOrder;
use super::tags::FieldType;

/// Longest undefined payload rendered as text before falling back to a size
/// summary.
const MAX_UNDEFINED_TEXT: usize = 64;

/// Render a payload as text.
///
/// `field_type` is `None` for type codes this crate does not know; those are
/// summarized by size. Trailing elements that the payload is too short to
/// hold are omitted.
pub fn format_value(
    field_type: Option<FieldType>,
    payload: &[u8],
    byte_order: ByteOrder,
) -> String {
    let Some(field_type) = field_type else {
        return format!("{} bytes unknown data", payload.len());
    };

    match field_type {
        FieldType::Ascii => format_ascii(payload),
        FieldType::Byte => join(payload.iter().map(|b| b.to_string())),
        FieldType::SByte => join(payload.iter().map(|&b| (b as i8).to_string())),
        FieldType::Undefined => format_undefined(payload),
        FieldType::Short => join(
            payload
                .chunks_exact(2)
                .map(|c| byte_order.read_u16(c).to_string()),
        ),
        FieldType::SShort => join(
            payload
                .chunks_exact(2)
                .map(|c| (byte_order.read_u16(c) as i16).to_string()),
        ),
        FieldType::Long => join(
            payload
                .chunks_exact(4)
                .map(|c| byte_order.read_u32(c).to_string()),
        ),
        FieldType::SLong => join(
            payload
                .chunks_exact(4)
                .map(|c| byte_order.read_i32(c).to_string()),
        ),
        FieldType::Rational => join(payload.chunks_exact(8).map(|c| {
            format!(
                "{}/{}",
                byte_order.read_u32(&c[..4]),
                byte_order.read_u32(&c[4..])
            )
        })),
        FieldType::SRational => join(payload.chunks_exact(8).map(|c| {
            format!(
                "{}/{}",
                byte_order.read_i32(&c[..4]),
                byte_order.read_i32(&c[4..])
            )
        })),
        FieldType::Float => join(
            payload
                .chunks_exact(4)
                .map(|c| f32::from_bits(byte_order.read_u32(c)).to_string()),
        ),
        FieldType::Double => join(payload.chunks_exact(8).map(|c| {
            let bits = match byte_order {
                ByteOrder::LittleEndian => u64::from_le_bytes(c.try_into().unwrap_or([0; 8])),
                ByteOrder::BigEndian => u64::from_be_bytes(c.try_into().unwrap_or([0; 8])),
            };
            f64::from_bits(bits).to_string()
        })),
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

/// ASCII values end at the first NUL; anything after it is padding.
fn format_ascii(payload: &[u8]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

/// Undefined data is shown verbatim when it is short printable ASCII (e.g.
/// ExifVersion "0230"), otherwise summarized by size.
fn format_undefined(payload: &[u8]) -> String {
    let printable = !payload.is_empty()
        && payload.len() <= MAX_UNDEFINED_TEXT
        && payload
            .iter()
            .all(|&b| b.is_ascii_graphic() || b == b' ' || b == 0);

    if printable {
        format_ascii(payload)
    } else {
        format!("{} bytes undefined data", payload.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
