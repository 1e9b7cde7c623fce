//! Decoded tags.
//!
//! A [`Tag`] is a shared base record (id, label, text value) plus a
//! [`TagValue`] whose variant is fixed when the tag is built. There are no
//! setters; a decoded tag never changes shape.

use std::fmt;

use serde::Serialize;

/// Numeric payload of a decoded tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagValue {
    /// Text only
    Basic,

    /// Integer formats (BYTE, SHORT, LONG)
    Integer { int_value: i64 },

    /// Rational formats, possibly folded from several components
    Float { numerator: i64, denominator: i64 },
}

/// A decoded EXIF tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    tag_id: i64,
    label: String,
    text_value: String,
    #[serde(flatten)]
    value: TagValue,
}

impl Tag {
    fn new(tag_id: i64, label: impl Into<String>, text_value: impl Into<String>, value: TagValue) -> Self {
        Self {
            tag_id,
            label: label.into(),
            text_value: text_value.into(),
            value,
        }
    }

    /// A tag with no numeric payload.
    pub fn basic(tag_id: i64, label: impl Into<String>, text_value: impl Into<String>) -> Self {
        Self::new(tag_id, label, text_value, TagValue::Basic)
    }

    /// A tag carrying an integer.
    pub fn integer(
        tag_id: i64,
        label: impl Into<String>,
        text_value: impl Into<String>,
        int_value: i64,
    ) -> Self {
        Self::new(tag_id, label, text_value, TagValue::Integer { int_value })
    }

    /// A tag carrying a fraction.
    pub fn float(
        tag_id: i64,
        label: impl Into<String>,
        text_value: impl Into<String>,
        numerator: i64,
        denominator: i64,
    ) -> Self {
        Self::new(
            tag_id,
            label,
            text_value,
            TagValue::Float {
                numerator,
                denominator,
            },
        )
    }

    #[inline]
    pub fn tag_id(&self) -> i64 {
        self.tag_id
    }

    #[inline]
    pub fn text_label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn text_value(&self) -> &str {
        &self.text_value
    }

    #[inline]
    pub fn value(&self) -> TagValue {
        self.value
    }

    /// The integer value, for tags decoded from BYTE, SHORT or LONG.
    pub fn int_value(&self) -> Option<i64> {
        match self.value {
            TagValue::Integer { int_value } => Some(int_value),
            _ => None,
        }
    }

    /// The raw fraction, for tags decoded from RATIONAL or SRATIONAL.
    pub fn rational(&self) -> Option<(i64, i64)> {
        match self.value {
            TagValue::Float {
                numerator,
                denominator,
            } => Some((numerator, denominator)),
            _ => None,
        }
    }

    /// `numerator / denominator` as a float.
    ///
    /// A zero denominator is not an error here: the result is infinite (or
    /// NaN for 0/0), exactly as IEEE division gives it. Use
    /// [`checked_float_value`](Self::checked_float_value) to reject those.
    pub fn float_value(&self) -> Option<f64> {
        self.rational()
            .map(|(numerator, denominator)| numerator as f64 / denominator as f64)
    }

    /// Like [`float_value`](Self::float_value), but `None` when the
    /// denominator is zero.
    pub fn checked_float_value(&self) -> Option<f64> {
        match self.rational()? {
            (_, 0) => None,
            (numerator, denominator) => Some(numerator as f64 / denominator as f64),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.text_value)
    }
}
