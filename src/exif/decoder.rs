//! Raw entry to [`Tag`] conversion.
//!
//! # Sexagesimal Folding
//!
//! GPS coordinates are stored as several rationals: degrees, minutes and
//! seconds. A multi-component rational is folded into a single fraction,
//! component by component in payload order:
//!
//! ```text
//! numerator   = 60 * numerator * den_i + num_i * denominator
//! denominator = denominator * den_i * 60
//! ```
//!
//! so `10/1, 30/1, 0/1` becomes `37800/3600`, i.e. 10.5 degrees. Each step
//! adds the next component divided by 60 to the running value; the weight
//! does not compound across levels. The fold only makes sense for
//! degree/minute style values; see [`FoldScope`] for restricting it to the
//! GPS tags that are.

use tracing::warn;

use super::constants::is_gps_sexagesimal;
use super::entry::{FormatCode, RawEntry};
use super::tag::Tag;
use crate::format::tiff::IfdKind;
use crate::io::padded;

/// Bytes per rational component (numerator + denominator)
const RATIONAL_SIZE: usize = 8;

/// Weight of each sexagesimal level
const SEXAGESIMAL_BASE: i128 = 60;

// =============================================================================
// FoldScope
// =============================================================================

/// Which multi-component rationals get folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoldScope {
    /// Fold every rational with more than one component.
    #[default]
    AllRationals,

    /// Fold only the GPS coordinate and time stamp tags of the GPS IFD.
    /// Any other multi-component rational keeps its first component.
    GpsCoordinates,
}

impl FoldScope {
    fn folds(self, entry: &RawEntry<'_>) -> bool {
        match self {
            FoldScope::AllRationals => true,
            FoldScope::GpsCoordinates => {
                entry.ifd == IfdKind::Gps && is_gps_sexagesimal(entry.tag_id)
            }
        }
    }
}

// =============================================================================
// TagDecoder
// =============================================================================

/// Turns raw directory entries into typed tags.
///
/// Decoding is total: every entry produces a tag. Payloads shorter than
/// their format requires are read as if padded with zero bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagDecoder {
    fold_scope: FoldScope,
}

impl TagDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fold_scope(fold_scope: FoldScope) -> Self {
        Self { fold_scope }
    }

    pub fn fold_scope(&self) -> FoldScope {
        self.fold_scope
    }

    /// Decode one entry.
    pub fn decode(&self, entry: &RawEntry<'_>) -> Tag {
        let tag_id = i64::from(entry.tag_id);
        let label = entry.label.trim_matches(' ');
        let text_value = entry.preformatted_value.trim_matches(' ');

        match entry.format {
            FormatCode::Byte => {
                check_length(entry, 1);
                let value = entry.payload.first().copied().unwrap_or(0);
                Tag::integer(tag_id, label, text_value, i64::from(value))
            }
            FormatCode::Short => {
                check_length(entry, 2);
                let value = entry.byte_order.read_u16(&padded::<2>(entry.payload, 0));
                Tag::integer(tag_id, label, text_value, i64::from(value))
            }
            FormatCode::Long => {
                check_length(entry, 4);
                let value = entry.byte_order.read_u32(&padded::<4>(entry.payload, 0));
                Tag::integer(tag_id, label, text_value, i64::from(value))
            }
            FormatCode::Rational { signed } => {
                let (numerator, denominator) = self.decode_rational(entry, signed);
                Tag::float(tag_id, label, text_value, numerator, denominator)
            }
            FormatCode::Other(_) => Tag::basic(tag_id, label, text_value),
        }
    }

    fn decode_rational(&self, entry: &RawEntry<'_>, signed: bool) -> (i64, i64) {
        let count = entry.component_count as usize;
        if count <= 1 || !self.fold_scope.folds(entry) {
            check_length(entry, RATIONAL_SIZE);
            return fit_i64(read_pair(entry, 0, signed));
        }

        if entry.payload.len() / RATIONAL_SIZE < count {
            warn!(
                tag_id = entry.tag_id,
                components = count,
                payload_len = entry.payload.len(),
                "Rational payload is truncated"
            );
        }
        // A zero-filled component would zero the denominator, so only
        // components with at least some payload bytes take part
        let available = entry.payload.len().div_ceil(RATIONAL_SIZE).max(1);
        let components = count.min(available);

        let (mut numerator, mut denominator) = read_pair(entry, 0, signed);
        for index in 1..components {
            let (num_i, den_i) = read_pair(entry, index, signed);
            let folded_num = SEXAGESIMAL_BASE * numerator * den_i + num_i * denominator;
            let folded_den = denominator * den_i * SEXAGESIMAL_BASE;
            // Keeping the running fraction within i64 bounds every product
            // above well inside i128
            let (n, d) = fit_i64((folded_num, folded_den));
            numerator = i128::from(n);
            denominator = i128::from(d);
        }

        fit_i64((numerator, denominator))
    }
}

fn read_pair(entry: &RawEntry<'_>, index: usize, signed: bool) -> (i128, i128) {
    let offset = index * RATIONAL_SIZE;
    let bytes = padded::<RATIONAL_SIZE>(entry.payload, offset);
    let order = entry.byte_order;
    if signed {
        (
            i128::from(order.read_i32(&bytes[..4])),
            i128::from(order.read_i32(&bytes[4..])),
        )
    } else {
        (
            i128::from(order.read_u32(&bytes[..4])),
            i128::from(order.read_u32(&bytes[4..])),
        )
    }
}

fn check_length(entry: &RawEntry<'_>, required: usize) {
    if entry.payload.len() < required {
        warn!(
            tag_id = entry.tag_id,
            required,
            payload_len = entry.payload.len(),
            "Payload shorter than its format, missing bytes read as zero"
        );
    }
}

/// Narrow a fraction to `i64` halves.
///
/// Fractions that already fit are returned unchanged. Otherwise the fraction
/// is reduced by its gcd, then both halves are halved until they fit. That
/// last step loses precision, and a denominator much smaller than its
/// numerator can reach zero.
fn fit_i64((mut numerator, mut denominator): (i128, i128)) -> (i64, i64) {
    if let (Ok(n), Ok(d)) = (i64::try_from(numerator), i64::try_from(denominator)) {
        return (n, d);
    }

    let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs());
    if let Ok(divisor) = i128::try_from(divisor) {
        if divisor > 1 {
            numerator /= divisor;
            denominator /= divisor;
        }
    }

    loop {
        match (i64::try_from(numerator), i64::try_from(denominator)) {
            (Ok(n), Ok(d)) => return (n, d),
            _ => {
                numerator >>= 1;
                denominator >>= 1;
            }
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

// =============================================================================
// Tests
// =============================================================================
