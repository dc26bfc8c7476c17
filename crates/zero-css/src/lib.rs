//! Zero CSS: compile style objects and templates into scoped class names.
//!
//! This is the umbrella crate that re-exports the style compiler, the
//! style manager and the template macros.
//!
//! # Example
//!
//! ```no_run
//! use zero_css::{css, StyleObject};
//!
//! let button = css(
//!     StyleObject::new()
//!         .set("backgroundColor", "royalblue")
//!         .set("color", "white")
//!         .nest(":hover", StyleObject::new().set("opacity", 0.9)),
//! );
//!
//! let accent = "tomato";
//! let badge = zero_css::css!("color: ${accent}; font-weight: bold;");
//!
//! println!("<button class=\"{button}\">Go <span class=\"{badge}\">new</span></button>");
//! println!("<style>{}</style>", zero_css::ssr_styles());
//! zero_css::clear_ssr_styles();
//! ```

pub use zero_css_core::*;
pub use zero_css_macros::{css, template};
