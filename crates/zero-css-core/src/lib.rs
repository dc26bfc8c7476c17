//! Style compiler and universal style manager for Zero CSS.
//!
//! This crate turns style descriptions into scoped CSS and gets that CSS
//! into a document:
//!
//! - **Compilation**: nested style objects with pseudo-classes, nested
//!   selectors, at-rules and custom properties become complete CSS rules
//! - **Identity**: every style is named by a deterministic digest of its
//!   content (`zc-<hash>`), so identical input is injected once
//! - **Injection**: a constructable stylesheet or a `<style>` element in the
//!   browser (feature `web`), or a collection for server-side rendering
//! - **SSR**: collected CSS can be read per response and streamed into the
//!   document head
//!
//! # Example
//!
//! ```ignore
//! use zero_css_core::prelude::*;
//!
//! let card = css(
//!     StyleObject::new()
//!         .set("padding", "16px")
//!         .nest(":hover", StyleObject::new().set("boxShadow", "0 2px 8px #0003"))
//!         .nest("@media (max-width: 768px)", StyleObject::new().set("padding", "8px")),
//! );
//!
//! // Server side, once per response:
//! let head_css = ssr_styles();
//! clear_ssr_styles();
//! ```

pub mod api;
pub mod compiler;
pub mod config;
pub mod hash;
pub mod input;
pub mod logging;
pub mod manager;
pub mod stream;
pub mod style;
pub mod template;

#[cfg(feature = "web")]
pub mod web;

mod error;

pub use error::{Error, Result};

pub use api::{
    all_debug_info, all_styles, apply_styles, clear_ssr_styles, clear_styles, css, debug_info,
    initialize, injected_css, reset, ssr_styles, styled, styles_report, with_manager,
};
pub use config::{StyleMode, StyleOptions, TargetOverride};
pub use hash::{compute_checksum, generate_class_name, hash};
pub use input::{CompiledInput, StyleInput};
pub use manager::debug::{StyleDebugInfo, StylesReport};
pub use manager::ssr::SsrCollection;
pub use manager::{CompiledStyle, StyleManager};
pub use style::{StyleObject, StyleValue};
pub use template::{Template, interpolate};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::api::{apply_styles, clear_ssr_styles, css, ssr_styles, styled};
    pub use crate::config::{StyleMode, StyleOptions};
    pub use crate::manager::memory::{MemoryStyleElement, MemoryStyleSheet};
    pub use crate::manager::ssr::SsrCollection;
    pub use crate::manager::target::TargetKind;
    pub use crate::manager::StyleManager;
    pub use crate::stream::{HeadInjector, inject_styles};
    pub use crate::style::{StyleObject, StyleValue};
    pub use crate::template::Template;
}
