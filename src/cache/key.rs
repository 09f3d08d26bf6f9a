//! Cache key derivation.
//!
//! Keys come from a 31-multiplier rolling hash folded into a signed 32-bit
//! accumulator and rendered in base 36. The space is narrow on purpose: it
//! matches keys produced by earlier browser sessions, and distinct texts
//! can share a key (`"Aa"` and `"BB"` both map to `"1mo"`). Aliased texts
//! share one cache slot and the later write wins.

use std::fmt;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Key under which a conversion is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// The rendered base-36 key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for `text`.
///
/// Deterministic and total: `h = h * 31 + c` over each `char` with 32-bit
/// two's-complement wrap-around, starting from zero.
pub fn hash_text(text: &str) -> CacheKey {
    let h = text
        .chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32));
    CacheKey(to_base36(h))
}

fn to_base36(n: i32) -> String {
    // i64 so that i32::MIN has a magnitude
    let mut magnitude = i64::from(n).unsigned_abs();
    if magnitude == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(8);
    while magnitude > 0 {
        digits.push(BASE36_DIGITS[(magnitude % 36) as usize] as char);
        magnitude /= 36;
    }
    if n < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}
