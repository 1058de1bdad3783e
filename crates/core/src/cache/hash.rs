//! 32-bit rolling string hash.
//!
//! `acc = acc * 31 + unit` over the UTF-16 code units of the input, wrapping in
//! two's-complement 32-bit arithmetic. Keys and fingerprints written by other
//! implementations of the same routine stay addressable because the result
//! matches bit-for-bit.

/// Compute the signed 32-bit rolling hash of `text`.
pub fn hash_code(text: &str) -> i32 {
    hash_units(text.encode_utf16())
}

/// Compute the rolling hash over an arbitrary sequence of UTF-16 code units.
pub fn hash_units(units: impl IntoIterator<Item = u16>) -> i32 {
    units
        .into_iter()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Absolute hash value in lowercase base 36, used to shorten long cache keys.
pub fn short_hash(text: &str) -> String {
    to_base36(hash_code(text).unsigned_abs())
}

/// Signed hash value in decimal, used for content fingerprints.
pub fn fingerprint_hash(text: &str) -> String {
    hash_code(text).to_string()
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(7);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}
