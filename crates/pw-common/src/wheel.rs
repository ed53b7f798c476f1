//! Wheel-mod-60 layout.
//!
//! Every prime greater than 5 is congruent modulo 60 to one of sixteen
//! residues coprime to 60. Archives store only those residues, as offsets
//! inside 60-wide buckets that start at `reference * 60 + 10`.

/// Width of one wheel bucket.
pub const WHEEL_MODULUS: u128 = 60;

/// Offset added to `reference * 60` to obtain the first bucket's base.
pub const WHEEL_BASE_OFFSET: u128 = 10;

/// The residues coprime to 60, ascending.
pub const WHEEL_RESIDUES: [u8; 16] = [
    1, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 49, 53, 59,
];

/// Position of `residue` inside [`WHEEL_RESIDUES`], if it is one of them.
pub fn residue_index(residue: u128) -> Option<usize> {
    let residue = u8::try_from(residue).ok()?;
    WHEEL_RESIDUES.binary_search(&residue).ok()
}

/// Residue of `value` modulo 60.
pub fn residue_of(value: u128) -> u8 {
    // Always < 60, so the narrowing is lossless.
    (value % WHEEL_MODULUS) as u8
}
