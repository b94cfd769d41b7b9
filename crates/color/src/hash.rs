/// Range of [`hash`] results.
///
/// Deliberately not prime: similar hues come back around with a period close
/// to the Fibonacci steps (8, 13, 21, 34) of the golden-ratio rotation, and 34
/// keeps the colliding indices as far apart as the rotation allows.
pub const HASH_MODULUS: u32 = 34;

/// Maps a token to a stable hue index in `0..HASH_MODULUS`.
///
/// Folds the UTF-16 code units of `token` with a polynomial step plus a small
/// bit-mixing term, masked to 13 bits. A single-unit token folds to itself.
/// The empty string maps to 0.
pub fn hash(token: &str) -> u32 {
	let mut units = token.encode_utf16().map(u32::from);
	let Some(first) = units.next() else {
		return 0;
	};
	let folded = units.fold(first, |acc, unit| {
		(acc * 173 + unit + ((acc & 0x5555) >> 5)) & 8191
	});
	folded % HASH_MODULUS
}
