//! Color handling for reconstructed diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, adding the conversions the reconstruction engine
//! needs: building colours from the hex digits of an in-diagram colour code
//! and deciding whether a fill is dark enough to need light text on top.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#ff0000",
    /// "rgb(255, 0, 0)" or "red".
    ///
    /// # Examples
    ///
    /// ```
    /// use scrawl_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Builds an opaque colour from 8-bit RGB components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(&format!("#{r:02x}{g:02x}{b:02x}")).expect("hex triplets are valid CSS colors")
    }

    /// Builds a colour from the hex digits of a diagram colour code.
    ///
    /// Three digits expand by doubling (`E32` is `#EE3322`); six digits are
    /// taken as-is. Any other input is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrawl_core::color::Color;
    ///
    /// assert_eq!(Color::from_hex_digits("E32"), Color::from_hex_digits("EE3322"));
    /// assert!(Color::from_hex_digits("E3").is_none());
    /// ```
    pub fn from_hex_digits(digits: &str) -> Option<Self> {
        let channel = |hex: &str| u8::from_str_radix(hex, 16).ok();
        match digits.len() {
            3 if digits.is_ascii() => {
                let mut values = digits.chars().map(|c| channel(&format!("{c}{c}")));
                Some(Self::from_rgb8(
                    values.next()??,
                    values.next()??,
                    values.next()??,
                ))
            }
            6 if digits.is_ascii() => Some(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Whether the brightest RGB channel stays below 200, i.e. dark text
    /// would be hard to read on this colour.
    pub fn is_dark(&self) -> bool {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        rgba.r.max(rgba.g).max(rgba.b) < 200
    }

    pub fn black() -> Self {
        Self::from_rgb8(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::from_rgb8(255, 255, 255)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
