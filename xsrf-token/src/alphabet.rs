//! URL-safe token alphabet.
//!
//! Every token character is drawn from [`ALPHABET`], 66 printable ASCII
//! symbols that survive unescaped in URLs, form fields and headers.

use rand::Rng;

/// Token symbols, sorted ascending for binary search.
pub static ALPHABET: [u8; 66] = [
    b'-', b'.', //
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', //
    b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', //
    b'N', b'O', b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', //
    b'_', //
    b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l', b'm', //
    b'n', b'o', b'p', b'q', b'r', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', //
    b'~',
];

/// Number of symbols, the radix of the digest encoding.
pub const RADIX: u32 = ALPHABET.len() as u32;

/// Entropy carried by one uniformly chosen symbol: log2(66).
pub const BITS_PER_SYMBOL: f64 = 6.044_394_119_358_453;

/// Check whether `byte` is a token symbol.
#[inline]
pub fn contains(byte: u8) -> bool {
    ALPHABET.binary_search(&byte).is_ok()
}

/// Symbol for a base-66 digit. `index` must be below [`RADIX`].
#[inline]
pub(crate) fn symbol(index: usize) -> u8 {
    ALPHABET[index]
}

/// Draw `len` symbols independently and uniformly.
pub fn random_salt<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}
