//! Identity hashing and class name generation.
//!
//! Every style is identified by a short digest of its serialized form. The
//! digest is a 32-bit rolling hash (`h = h * 31 + unit`, wrapped to `i32`)
//! over UTF-16 code units, rendered as the base-36 form of its absolute
//! value. It is deterministic and order-sensitive, and makes no attempt to
//! resist collisions.

/// Prefix for every generated class name.
pub const CLASS_PREFIX: &str = "zc-";

/// Compute the identity digest of `input`.
///
/// The empty string hashes to `"0"`.
pub fn hash(input: &str) -> String {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    to_base36(h.unsigned_abs())
}

/// Checksum of final CSS text.
///
/// Currently the same digest as [`hash`]; kept separate so the identity and
/// checksum can diverge if the hash changes.
pub fn compute_checksum(css_text: &str) -> String {
    hash(css_text)
}

/// Class name for a piece of CSS or serialized style: `zc-<hash>`.
pub fn generate_class_name(input: &str) -> String {
    format!("{CLASS_PREFIX}{}", hash(input))
}

/// Class name for an already computed identity.
pub fn class_name_for_id(id: &str) -> String {
    format!("{CLASS_PREFIX}{id}")
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
    // Only ASCII digits were pushed.
    String::from_utf8(buf).unwrap_or_default()
}
