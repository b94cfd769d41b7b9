use std::f64::consts::{PI, TAU};

/// Linear RGB with channels nominally in `0.0..=1.0`.
///
/// Intermediate values may leave that range; [`Rgb::clip`] brings them back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
	pub r: f64,
	pub g: f64,
	pub b: f64,
}

/// HSL measured directly in the RGB cube.
///
/// - `h`: angle around the gray diagonal, in `-PI..PI` once regulated.
/// - `s`: distance from the gray diagonal, scaled so pure red is [`Hsl::S_MAX`].
/// - `l`: mean of the three channels.
///
/// This is not the textbook cylindrical HSL; it is chosen because rotating
/// `h` keeps lightness exactly constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
	pub h: f64,
	pub s: f64,
	pub l: f64,
}

const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);

impl Rgb {
	pub const fn new(r: f64, g: f64, b: f64) -> Self {
		Self { r, g, b }
	}

	pub fn lightness(self) -> f64 {
		(self.r + self.g + self.b) / 3.0
	}

	pub fn hue(self) -> f64 {
		let x = self.r - (self.g / 2.0 + self.b / 2.0);
		let y = (self.g - self.b) * 3.0_f64.sqrt() / 2.0;
		y.atan2(x)
	}

	fn gray_distance(self) -> f64 {
		let l = self.lightness();
		((self.r - l).powi(2) + (self.g - l).powi(2) + (self.b - l).powi(2)).sqrt()
	}

	pub fn to_hsl(self) -> Hsl {
		Hsl {
			h: self.hue(),
			s: self.gray_distance() * RED.gray_distance(),
			l: self.lightness(),
		}
	}

	pub fn clip(self) -> Self {
		Self::new(
			self.r.clamp(0.0, 1.0),
			self.g.clamp(0.0, 1.0),
			self.b.clamp(0.0, 1.0),
		)
	}
}

impl Hsl {
	pub const S_MAX: f64 = 2.0 / 3.0;

	fn channel(self, phase: f64) -> f64 {
		self.l + self.s * (self.h - TAU / 3.0 * phase).cos()
	}

	pub fn to_rgb(self) -> Rgb {
		Rgb::new(self.channel(0.0), self.channel(1.0), self.channel(2.0))
	}

	/// Wraps `h` into `-PI..PI`.
	pub fn regulate_hue(self) -> Self {
		Self {
			h: (self.h + PI).rem_euclid(TAU) - PI,
			..self
		}
	}

	pub fn clip_lightness(self) -> Self {
		Self {
			l: self.l.clamp(0.0, 1.0),
			..self
		}
	}

	/// Shrinks `s` until every channel of [`Hsl::to_rgb`] fits in `0.0..=1.0`.
	///
	/// Saturation is divided by the worst channel's overshoot ratio, measured
	/// from the lightness toward the violated bound. At `l == 0` or `l == 1`
	/// any overshoot is infinite and the color collapses to gray.
	pub fn clip_saturation(self) -> Self {
		let rgb = self.to_rgb();
		let l = self.l;
		let overshoot = |c: f64| {
			if c < 0.0 {
				(l - c) / l
			} else if c > 1.0 {
				(c - l) / (1.0 - l)
			} else {
				1.0
			}
		};
		let over = overshoot(rgb.r).max(overshoot(rgb.g)).max(overshoot(rgb.b));
		Self {
			s: self.s / over,
			..self
		}
	}

	pub fn regulate(self) -> Self {
		self.regulate_hue().clip_lightness().clip_saturation()
	}
}
