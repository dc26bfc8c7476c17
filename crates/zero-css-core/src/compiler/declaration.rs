//! Flat property declarations.

use crate::style::StyleValue;

/// Convert a camelCase property name to kebab-case.
///
/// Every uppercase ASCII letter gains a leading `-`, then the whole name is
/// lowercased, so vendor prefixes such as `WebkitTransition` become
/// `-webkit-transition`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// CSS property name for a style key. Custom properties pass through.
pub fn property_name(key: &str) -> String {
    if key.starts_with("--") {
        key.to_string()
    } else {
        kebab_case(key)
    }
}

/// Render a single `property: value;` declaration.
pub fn declaration(key: &str, value: &StyleValue) -> String {
    format!("{}: {};", property_name(key), value)
}
