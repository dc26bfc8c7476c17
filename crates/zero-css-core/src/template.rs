//! Template-literal style input.
//!
//! A [`Template`] holds the literal segments of a template and the values
//! substituted between them, in the shape a template literal has: one more
//! segment than there are values. The `css!` and `template!` macros build
//! these from `"...${expr}..."` strings.

use std::fmt::Display;

/// Literal segments plus substituted values of a CSS template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<String>,
    values: Vec<String>,
}

impl Template {
    /// Create a template from literal segments and already stringified values.
    ///
    /// Values beyond `segments.len() - 1` are ignored during interpolation,
    /// and missing values render as empty strings.
    pub fn new(segments: Vec<String>, values: Vec<String>) -> Self {
        Self { segments, values }
    }

    /// Create a template from borrowed segments and any displayable values.
    pub fn from_parts<V: Display>(segments: &[&str], values: &[V]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// A template with a single literal segment and no substitutions.
    pub fn raw(css: impl Into<String>) -> Self {
        Self {
            segments: vec![css.into()],
            values: vec![],
        }
    }

    /// Literal segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Substituted values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The interpolated CSS text.
    pub fn css_text(&self) -> String {
        interpolate(&self.segments, &self.values)
    }
}

impl From<&str> for Template {
    fn from(css: &str) -> Self {
        Self::raw(css)
    }
}

impl From<String> for Template {
    fn from(css: String) -> Self {
        Self::raw(css)
    }
}

/// Merge literal segments and substitutions into one string.
///
/// Segment 0, then for each following segment `i`, value `i - 1` and segment
/// `i`. Nothing is escaped: a value containing braces ends up in the CSS as-is.
pub fn interpolate<S: AsRef<str>, V: AsRef<str>>(segments: &[S], values: &[V]) -> String {
    let Some((first, rest)) = segments.split_first() else {
        return String::new();
    };

    let mut out = String::from(first.as_ref());
    for (i, segment) in rest.iter().enumerate() {
        if let Some(value) = values.get(i) {
            out.push_str(value.as_ref());
        }
        out.push_str(segment.as_ref());
    }
    out
}
