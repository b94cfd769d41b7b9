//! Deterministic background colors.
//!
//! Colors are handled in a cube-space HSL model (hue is an angle around the
//! gray diagonal of the RGB cube), rotated by a golden-ratio step per index so
//! that neighbouring indices land far apart on the hue circle.

/// Error types for color parsing.
pub mod error;
/// Token hashing tuned to the rotation period.
pub mod hash;
/// `#RRGGBB` colors.
pub mod hex;
/// Golden-ratio hue rotation.
pub mod phi;
/// Cube-space RGB and HSL.
pub mod space;

pub use error::ColorError;
pub use hash::{HASH_MODULUS, hash};
pub use hex::HexColor;
pub use phi::{HUE_STEP, PHI, generate, tint};
pub use space::{Hsl, Rgb};
