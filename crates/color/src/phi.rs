use std::f64::consts::TAU;

use crate::hex::HexColor;
use crate::space::Hsl;

/// The golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Hue rotation per index: one full turn divided by [`PHI`].
pub const HUE_STEP: f64 = TAU / PHI;

/// Rotates `base` by `hue_index` golden-ratio steps and brings the result back
/// into gamut.
pub fn generate(base: Hsl, hue_index: u32) -> Hsl {
	Hsl {
		h: base.h + HUE_STEP * f64::from(hue_index),
		..base
	}
	.regulate()
}

/// [`generate`] on a quantized color.
pub fn tint(base: HexColor, hue_index: u32) -> HexColor {
	HexColor::from_rgb(generate(base.to_rgb().to_hsl(), hue_index).to_rgb())
}
