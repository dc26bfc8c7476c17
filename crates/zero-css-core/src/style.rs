//! Style descriptions: nested objects of properties and selectors.
//!
//! A [`StyleObject`] is an ordered list of entries. Each key is either a
//! camelCase CSS property (or a `--custom-property`) mapped to a primitive
//! value, or a selector/at-rule key mapped to a nested object. Authored key
//! order is preserved everywhere: in compiled output and in the serialized
//! form that feeds the identity hash.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// A single value inside a style description.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// A string value, passed through to CSS verbatim.
    Str(String),
    /// A numeric value, rendered without a unit.
    Number(f64),
    /// A nested rule block (pseudo-class, at-rule, nested selector, ...).
    Nested(StyleObject),
}

impl StyleValue {
    /// Whether this value is a nested rule block.
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// The nested block, if any.
    pub fn as_nested(&self) -> Option<&StyleObject> {
        match self {
            Self::Nested(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Nested(obj) => f.write_str(&obj.to_json_string()),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for StyleValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<StyleObject> for StyleValue {
    fn from(value: StyleObject) -> Self {
        Self::Nested(value)
    }
}

/// An ordered style description.
///
/// # Example
///
/// ```ignore
/// let button = StyleObject::new()
///     .set("backgroundColor", "royalblue")
///     .set("padding", "8px 16px")
///     .nest(":hover", StyleObject::new().set("opacity", 0.9))
///     .nest("@media (max-width: 768px)", StyleObject::new().set("padding", "4px"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleObject {
    entries: Vec<(String, StyleValue)>,
}

impl StyleObject {
    /// Create an empty style description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property or nested block, builder style.
    ///
    /// Setting an existing key replaces its value in place, keeping the
    /// key's original position.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a nested rule block, builder style.
    pub fn nest(self, key: impl Into<String>, block: StyleObject) -> Self {
        self.set(key, StyleValue::Nested(block))
    }

    /// Insert a property or nested block.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over entries in authored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the description has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry is a nested rule block.
    pub fn has_nested(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_nested())
    }

    /// Deterministic compact JSON form, used as the hashing input.
    pub fn to_json_string(&self) -> String {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, HostNumberFormatter);
        // Serializing strings, finite numbers and maps into a Vec cannot fail.
        if self.serialize(&mut serializer).is_err() {
            return String::new();
        }
        String::from_utf8(out).unwrap_or_default()
    }

    /// Build a style description from a JSON value.
    ///
    /// The top level must be an object. Strings and numbers become
    /// primitive values, objects become nested blocks, booleans and `null`
    /// are passed through as their JSON text. Arrays are rejected.
    ///
    /// Key order follows the map's iteration order, which is only the
    /// authored order when `serde_json` is built with `preserve_order`.
    /// Prefer [`StyleObject::from_json_str`] when order matters.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut obj = Self::new();
                for (key, value) in map {
                    obj.entries.push((key.clone(), json_to_value(key, value)?));
                }
                Ok(obj)
            }
            other => Err(Error::invalid_style(
                "<root>",
                format!("expected an object, found {}", json_kind(other)),
            )),
        }
    }

    /// Parse a style description from JSON text, keeping key order.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut obj = Self::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

fn json_to_value(key: &str, value: &serde_json::Value) -> Result<StyleValue> {
    use serde_json::Value;

    match value {
        Value::String(s) => Ok(StyleValue::Str(s.clone())),
        Value::Number(n) => n
            .as_f64()
            .map(StyleValue::Number)
            .ok_or_else(|| Error::invalid_style(key, "number out of range")),
        Value::Bool(b) => Ok(StyleValue::Str(b.to_string())),
        Value::Null => Ok(StyleValue::Str("null".to_string())),
        Value::Object(_) => StyleObject::from_json(value).map(StyleValue::Nested),
        Value::Array(_) => Err(Error::invalid_style(key, "arrays are not valid style values")),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render a number following the ECMAScript number-to-string rules.
///
/// Shortest round-trip digits, in fixed notation for magnitudes in
/// `[1e-6, 1e21)` and in exponent notation (`1e+21`, `1.5e-7`) outside that
/// range. `-0` renders as `0`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits as `d.ddde<exp>`.
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let point = exponent + 1;
    let sign = if n < 0.0 { "-" } else { "" };

    let body = if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{exp_sign}{}", exponent.abs())
        } else {
            format!("{lead}.{rest}e{exp_sign}{}", exponent.abs())
        }
    };

    format!("{sign}{body}")
}

/// JSON formatter writing numbers with [`format_number`], so the hashed
/// form of a description is stable across hosts.
struct HostNumberFormatter;

impl serde_json::ser::Formatter for HostNumberFormatter {
    fn write_f64<W: ?Sized + std::io::Write>(&mut self, writer: &mut W, value: f64) -> std::io::Result<()> {
        writer.write_all(format_number(value).as_bytes())
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            // Non-finite numbers serialize as null, like JSON.stringify.
            Self::Number(_) => serializer.serialize_unit(),
            Self::Nested(obj) => obj.serialize(serializer),
        }
    }
}

impl Serialize for StyleObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(StyleObjectVisitor)
    }
}

struct StyleObjectVisitor;

impl<'de> Visitor<'de> for StyleObjectVisitor {
    type Value = StyleObject;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a style object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<StyleObject, A::Error> {
        let mut obj = StyleObject::new();
        while let Some((key, value)) = access.next_entry::<String, StyleValue>()? {
            obj.insert(key, value);
        }
        Ok(obj)
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(StyleValueVisitor)
    }
}

struct StyleValueVisitor;

impl<'de> Visitor<'de> for StyleValueVisitor {
    type Value = StyleValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or nested style object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Str(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Number(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Str(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<StyleValue, E> {
        Ok(StyleValue::Str("null".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<StyleValue, A::Error> {
        StyleObjectVisitor.visit_map(access).map(StyleValue::Nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_authored_order() {
        let obj = StyleObject::new()
            .set("color", "red")
            .set("backgroundColor", "blue")
            .nest(":hover", StyleObject::new().set("color", "green"));

        let keys: Vec<_> = obj.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["color", "backgroundColor", ":hover"]);
        assert!(obj.has_nested());
    }

    #[test]
    fn replacing_a_key_keeps_position() {
        let obj = StyleObject::new()
            .set("color", "red")
            .set("margin", 0)
            .set("color", "blue");

        assert_eq!(obj.len(), 2);
        assert_eq!(obj.iter().next(), Some(("color", &StyleValue::from("blue"))));
    }

    #[test]
    fn json_form_matches_authored_order() {
        let obj = StyleObject::new()
            .set("zIndex", 10)
            .set("color", "red")
            .set("opacity", 0.5)
            .nest(":hover", StyleObject::new().set("color", "blue"));

        assert_eq!(
            obj.to_json_string(),
            r#"{"zIndex":10,"color":"red","opacity":0.5,":hover":{"color":"blue"}}"#
        );
    }

    #[test]
    fn from_json_str_preserves_order() {
        let obj = StyleObject::from_json_str(r#"{"padding":"4px","color":"red","margin":2}"#).unwrap();
        let keys: Vec<_> = obj.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["padding", "color", "margin"]);
        assert_eq!(obj.get("margin"), Some(&StyleValue::Number(2.0)));
    }

    #[test]
    fn from_json_value_nested() {
        let value = serde_json::json!({
            "color": "red",
            ":hover": { "color": "blue" },
            "visible": true
        });
        let obj = StyleObject::from_json(&value).unwrap();

        assert!(obj.get(":hover").unwrap().is_nested());
        assert_eq!(obj.get("visible"), Some(&StyleValue::from("true")));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            StyleObject::from_json(&serde_json::json!("color: red")),
            Err(Error::InvalidStyle { .. })
        ));
        assert!(matches!(
            StyleObject::from_json(&serde_json::json!({ "margin": [1, 2] })),
            Err(Error::InvalidStyle { key, .. }) if key == "margin"
        ));
    }

    #[test]
    fn numbers_render_without_trailing_fraction() {
        assert_eq!(StyleValue::from(14).to_string(), "14");
        assert_eq!(StyleValue::from(1.5).to_string(), "1.5");
        assert_eq!(StyleValue::from(-3.0).to_string(), "-3");
        assert_eq!(StyleValue::from(-0.0).to_string(), "0");
        assert_eq!(StyleValue::from(0.000001).to_string(), "0.000001");
        assert_eq!(StyleValue::from(123456.789).to_string(), "123456.789");
    }

    #[test]
    fn extreme_numbers_switch_to_exponent_form() {
        assert_eq!(StyleValue::from(1e21).to_string(), "1e+21");
        assert_eq!(StyleValue::from(1.5e21).to_string(), "1.5e+21");
        assert_eq!(StyleValue::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(StyleValue::from(1e-7).to_string(), "1e-7");
        assert_eq!(StyleValue::from(-2.5e-8).to_string(), "-2.5e-8");
        assert_eq!(StyleValue::from(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn json_form_uses_host_number_text() {
        let obj = StyleObject::new()
            .set("a", 1e16)
            .set("b", 1e21)
            .set("c", 1e-7)
            .set("d", 0.1)
            .set("e", f64::NAN);

        assert_eq!(
            obj.to_json_string(),
            r#"{"a":10000000000000000,"b":1e+21,"c":1e-7,"d":0.1,"e":null}"#
        );
    }
}
