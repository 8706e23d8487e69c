//! Length values, units and four-sided edge values.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// User agent default font size, and the size of one `em`.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
/// "1pt = 1/72th of 1in", "1px = 1/96th of 1in"
pub const PIXELS_PER_POINT: f32 = 1.3333;

/// Measurement unit of a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Unit {
    /// `px`
    #[default]
    #[strum(serialize = "px")]
    Pixel,
    /// `pt`
    #[strum(serialize = "pt")]
    Point,
    /// `em`
    #[strum(serialize = "em")]
    Em,
    /// `%`
    #[strum(serialize = "%")]
    Percent,
}

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
/// A number paired with its unit, unresolved until layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Length {
    /// The numeric part.
    pub value: f32,
    /// The unit suffix.
    pub unit: Unit,
}

impl Length {
    /// A length in pixels.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Pixel,
        }
    }

    /// A length with an explicit unit.
    #[must_use]
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Parse `12px`, `10pt`, `1.5em`, `50%` or a bare number (pixels).
    ///
    /// Font-size keywords (`small`, `medium`, `x-large`, ...) are accepted
    /// and map to pixel sizes.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        if let Some(px) = keyword_size(&text) {
            return Some(Self::px(px));
        }
        let (number, unit) = if let Some(n) = text.strip_suffix("px") {
            (n, Unit::Pixel)
        } else if let Some(n) = text.strip_suffix("pt") {
            (n, Unit::Point)
        } else if let Some(n) = text.strip_suffix("em") {
            (n, Unit::Em)
        } else if let Some(n) = text.strip_suffix('%') {
            (n, Unit::Percent)
        } else {
            (text.as_str(), Unit::Pixel)
        };
        let value: f32 = number.trim().parse().ok()?;
        value.is_finite().then_some(Self { value, unit })
    }

    /// Resolve to pixels.
    ///
    /// `reference_px` is what a percentage is relative to: the current text
    /// height during layout.
    #[must_use]
    pub fn to_px(self, reference_px: f32) -> f32 {
        match self.unit {
            Unit::Pixel => self.value,
            Unit::Point => self.value * PIXELS_PER_POINT,
            Unit::Em => self.value * DEFAULT_FONT_SIZE_PX,
            Unit::Percent => self.value * reference_px / 100.0,
        }
    }
}

/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
/// "<absolute-size>" keywords.
fn keyword_size(word: &str) -> Option<f32> {
    Some(match word {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => 16.0,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        _ => return None,
    })
}

/// Four per-side values in CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Copy> Edges<T> {
    /// The same value on every side.
    #[must_use]
    pub const fn uniform(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// [§ 1.2 Shorthand properties](https://www.w3.org/TR/css-cascade-4/#shorthand)
    ///
    /// 1 value: all sides; 2: vertical, horizontal; 3: top, horizontal,
    /// bottom; 4: top, right, bottom, left. Any other count is rejected.
    #[must_use]
    pub fn from_shorthand(values: &[T]) -> Option<Self> {
        match *values {
            [all] => Some(Self::uniform(all)),
            [vertical, horizontal] => Some(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Some(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Some(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => None,
        }
    }

    /// Apply `f` to every side.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Edges<U> {
        Edges {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

impl Edges<Length> {
    /// Resolve every side to pixels.
    #[must_use]
    pub fn to_px(self, reference_px: f32) -> Edges<f32> {
        self.map(|l| l.to_px(reference_px))
    }
}

impl Edges<f32> {
    /// Sum of left and right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Side-wise sum.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversion_table() {
        assert_eq!(Length::parse("12px").unwrap().to_px(10.0), 12.0);
        assert!((Length::parse("3pt").unwrap().to_px(10.0) - 3.9999).abs() < 1e-3);
        assert_eq!(Length::parse("2em").unwrap().to_px(10.0), 32.0);
        assert_eq!(Length::parse("50%").unwrap().to_px(20.0), 10.0);
        assert_eq!(Length::parse("7").unwrap(), Length::px(7.0));
        assert_eq!(Length::parse("large").unwrap(), Length::px(18.0));
        assert_eq!(Length::parse("wide"), None);
    }

    #[test]
    fn shorthand_expansion() {
        let e = Edges::from_shorthand(&[1, 2, 3]).unwrap();
        assert_eq!((e.top, e.right, e.bottom, e.left), (1, 2, 3, 2));
        assert!(Edges::<i32>::from_shorthand(&[]).is_none());
        assert!(Edges::from_shorthand(&[1, 2, 3, 4, 5]).is_none());
    }
}
