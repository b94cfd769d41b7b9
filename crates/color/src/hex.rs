use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;
use crate::space::Rgb;

/// An opaque 8-bit-per-channel color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl HexColor {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	pub fn to_rgb(self) -> Rgb {
		Rgb::new(
			f64::from(self.r) / 255.0,
			f64::from(self.g) / 255.0,
			f64::from(self.b) / 255.0,
		)
	}

	/// Quantizes a color to the nearest 8-bit channels, clipping out-of-gamut
	/// channels first. Every `HexColor` survives `to_rgb` then `from_rgb`.
	pub fn from_rgb(rgb: Rgb) -> Self {
		let rgb = rgb.clip();
		let quantize = |c: f64| (255.0 * c).round() as u8;
		Self::new(quantize(rgb.r), quantize(rgb.g), quantize(rgb.b))
	}

	/// Formats as `#RRGGBBAA`.
	pub fn with_alpha(self, alpha: u8) -> String {
		format!("{self}{alpha:02X}")
	}
}

impl fmt::Display for HexColor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
	}
}

impl FromStr for HexColor {
	type Err = ColorError;

	/// Accepts `#RRGGBB` and the short `#RGB` form.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || ColorError::InvalidFormat(s.to_string());
		let digits = s.strip_prefix('#').ok_or_else(invalid)?;
		if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(invalid());
		}
		let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
		match digits.len() {
			3 => {
				let short = |i: usize| channel(i..i + 1).map(|v| v * 0x11);
				Ok(Self::new(
					short(0).map_err(|_| invalid())?,
					short(1).map_err(|_| invalid())?,
					short(2).map_err(|_| invalid())?,
				))
			}
			6 => Ok(Self::new(
				channel(0..2).map_err(|_| invalid())?,
				channel(2..4).map_err(|_| invalid())?,
				channel(4..6).map_err(|_| invalid())?,
			)),
			_ => Err(invalid()),
		}
	}
}
