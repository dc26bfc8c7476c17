//! Tracing targets used by Zero CSS.
//!
//! Zero CSS reports through the `tracing` crate. Injection failures are
//! emitted at `warn`, compile events in development mode at `debug`. To see
//! them, install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("zero_css_core::manager=debug")
//!     .init();
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Style manager: registration, injection, clearing.
    pub const MANAGER: &str = "zero_css_core::manager";
    /// Compile pipeline.
    pub const COMPILER: &str = "zero_css_core::compiler";
    /// Streaming head injection.
    pub const STREAM: &str = "zero_css_core::stream";
    /// Build-time extraction.
    pub const EXTRACT: &str = "zero_css_core::extract";
}

/// Truncate CSS text for log output, appending `...` when cut.
pub(crate) fn preview(css_text: &str, max_chars: usize) -> String {
    let mut chars = css_text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview(".a { color: red; }", 100), ".a { color: red; }");
    }

    #[test]
    fn preview_truncates_long_text() {
        let css = "x".repeat(120);
        let out = preview(&css, 100);
        assert_eq!(out.len(), 103);
        assert!(out.ends_with("..."));
    }
}
