//! Seed text codec for shareable games.
//! Seeds travel as base-36 text, e.g. `?seed=k3x9q1`; purely numeric text is
//! read as base-10 so hand-typed seeds keep working.

use std::time::{SystemTime, UNIX_EPOCH};

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return String::from("0");
    }
    let mut out = Vec::with_capacity(7);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Parse seed text: base-36 when it contains letters, base-10 otherwise.
///
/// Returns `None` for blank, malformed, or out-of-range text.
#[must_use]
pub fn parse_seed(text: &str) -> Option<u32> {
    let s = text.trim();
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        u32::from_str_radix(s, 36).ok()
    } else {
        s.parse().ok()
    }
}

/// Encode a seed so that [`parse_seed`] reads it back unchanged.
///
/// Base-36 is used whenever that form contains a letter; otherwise the plain
/// decimal form is emitted, since an all-digit base-36 string would be read
/// back as base-10.
#[must_use]
pub fn encode_seed(seed: u32) -> String {
    let compact = to_base36(seed);
    if compact.chars().any(|c| c.is_ascii_alphabetic()) {
        compact
    } else {
        seed.to_string()
    }
}

/// Fold wall-clock time and an entropy word into a 32-bit seed.
#[must_use]
pub fn seed_from_entropy(clock_nanos: u128, entropy: u64) -> u32 {
    let mut buf = [0u8; 32];
    buf[..16].copy_from_slice(&clock_nanos.to_le_bytes());
    buf[16..24].copy_from_slice(&entropy.to_le_bytes());
    buf[24..].copy_from_slice(b"SANDLOT!");
    let h = fnv1a64(&buf);
    ((h >> 32) ^ (h & 0xFFFF_FFFF)) as u32
}

/// Generate a fresh seed from the clock and the OS entropy source.
///
/// Only called at game creation; never mid-game.
#[must_use]
pub fn fresh_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    seed_from_entropy(nanos, rand::random::<u64>())
}

/// Resolve optional seed text, falling back to a fresh seed.
#[must_use]
pub fn resolve_seed(text: Option<&str>) -> u32 {
    match text.and_then(parse_seed) {
        Some(seed) => seed,
        None => {
            let seed = fresh_seed();
            if let Some(raw) = text.filter(|t| !t.trim().is_empty()) {
                log::debug!("ignoring malformed seed {raw:?}; generated {seed}");
            }
            seed
        }
    }
}
