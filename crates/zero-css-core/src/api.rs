//! Free-function entry points backed by a default manager.
//!
//! Call sites that cannot thread a [`StyleManager`] through use these. The
//! default manager is created lazily from [`StyleOptions::from_env`] the
//! first time it is needed. It is per thread, since browser handles cannot
//! cross threads, while SSR collection stays process-wide unless the
//! manager is configured with its own [`SsrCollection`].
//!
//! Applications that own their manager should call its methods directly.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::config::StyleOptions;
use crate::input::StyleInput;
use crate::logging::targets;
use crate::manager::debug::{StyleDebugInfo, StylesReport};
use crate::manager::ssr::SsrCollection;
use crate::manager::{CompiledStyle, StyleManager};
use crate::style::StyleObject;

thread_local! {
    static DEFAULT_MANAGER: RefCell<Option<StyleManager>> = const { RefCell::new(None) };
}

/// Replace the default manager with one built from `options`.
pub fn initialize(options: StyleOptions) {
    let manager = StyleManager::new(options);
    DEFAULT_MANAGER.with(|slot| *slot.borrow_mut() = Some(manager));
}

/// Drop the default manager; the next call recreates it from the environment.
pub fn reset() {
    DEFAULT_MANAGER.with(|slot| *slot.borrow_mut() = None);
}

/// Run `f` with the default manager, creating it if needed.
pub fn with_manager<R>(f: impl FnOnce(&mut StyleManager) -> R) -> R {
    DEFAULT_MANAGER.with(|slot| {
        let mut slot = slot.borrow_mut();
        let manager = slot.get_or_insert_with(|| StyleManager::new(StyleOptions::from_env()));
        f(manager)
    })
}

/// Compile a style object or template and register it.
///
/// Returns the class name, or the bare id in build-time extraction mode.
pub fn css(input: impl Into<StyleInput>) -> String {
    let input = input.into();
    with_manager(|manager| manager.css(input))
}

/// Register raw CSS as-is, returning the class name derived from it.
pub fn apply_styles(css_text: &str, metadata: Option<serde_json::Value>) -> String {
    with_manager(|manager| manager.apply_styles(css_text, metadata))
}

/// Compile and register a style object.
pub fn styled(styles: &StyleObject) -> String {
    with_manager(|manager| manager.styled(styles))
}

/// Debug snapshot for one style; `None` outside development mode.
pub fn debug_info(id: &str) -> Option<StyleDebugInfo> {
    with_manager(|manager| {
        if !manager.options().mode.is_development() {
            tracing::warn!(target: targets::MANAGER, "debug info is only available in development mode");
            return None;
        }
        manager.debug_info(id).cloned()
    })
}

/// Every debug snapshot; `None` outside development mode.
pub fn all_debug_info() -> Option<Vec<(String, StyleDebugInfo)>> {
    with_manager(|manager| {
        if !manager.options().mode.is_development() {
            tracing::warn!(target: targets::MANAGER, "debug info is only available in development mode");
        }
        manager.all_debug_info()
    })
}

/// Copy of every registered style.
pub fn all_styles() -> IndexMap<String, CompiledStyle> {
    with_manager(|manager| manager.all_styles())
}

/// CSS currently live in the default manager's target.
pub fn injected_css() -> String {
    with_manager(|manager| manager.all_injected_css())
}

/// Table of every registered style.
pub fn styles_report() -> StylesReport {
    with_manager(|manager| manager.report())
}

/// Clear the default manager.
pub fn clear_styles() {
    with_manager(StyleManager::clear);
}

/// Everything collected in the process-wide SSR scope.
pub fn ssr_styles() -> String {
    SsrCollection::global().styles()
}

/// Empty the process-wide SSR scope. Call once per served response.
pub fn clear_ssr_styles() {
    SsrCollection::global().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleMode;
    use crate::template::Template;

    fn init_scoped() -> SsrCollection {
        let collection = SsrCollection::new();
        initialize(StyleOptions::development().collection(collection.clone()));
        collection
    }

    #[test]
    fn css_uses_default_manager() {
        let collection = init_scoped();

        let class = css(StyleObject::new().set("color", "red"));
        let again = css(StyleObject::new().set("color", "red"));

        assert_eq!(class, again);
        assert_eq!(collection.styles(), format!(".{class} {{ color: red; }}"));
        assert_eq!(all_styles().len(), 1);
        reset();
    }

    #[test]
    fn template_and_object_paths_are_independent() {
        init_scoped();

        let from_template = css(Template::raw("color: red;"));
        let from_object = css(StyleObject::new().set("color", "red"));

        assert_eq!(from_template, css(Template::raw("color: red;")));
        assert_eq!(from_object, styled(&StyleObject::new().set("color", "red")));
        assert_eq!(all_styles().len(), 2);
        reset();
    }

    #[test]
    fn build_time_mode_returns_identity() {
        let collection = SsrCollection::new();
        initialize(StyleOptions::new().build_time(true).collection(collection.clone()));

        let id = css(StyleObject::new().set("color", "red"));

        assert_eq!(id, crate::hash::hash(r#"{"color":"red"}"#));
        assert!(collection.is_empty());
        reset();
    }

    #[test]
    fn debug_helpers_follow_mode() {
        init_scoped();
        let class = css(Template::raw("margin: 0;"));
        let id = class.trim_start_matches(crate::hash::CLASS_PREFIX).to_string();

        assert!(debug_info(&id).is_some());
        assert_eq!(all_debug_info().unwrap().len(), 1);

        initialize(
            StyleOptions::new()
                .mode(StyleMode::Production)
                .collection(SsrCollection::new()),
        );
        css(Template::raw("margin: 0;"));
        assert!(debug_info(&id).is_none());
        assert!(all_debug_info().is_none());
        reset();
    }

    #[test]
    fn clear_styles_makes_ids_novel_again() {
        let collection = init_scoped();
        let class = css(Template::raw("padding: 1px;"));

        clear_styles();
        assert!(all_styles().is_empty());

        collection.clear();
        assert_eq!(css(Template::raw("padding: 1px;")), class);
        assert_eq!(collection.len(), 1);
        reset();
    }

    #[test]
    fn apply_styles_and_report() {
        init_scoped();
        let class = apply_styles(".raw { color: red; }", Some(serde_json::json!({ "source": "test" })));

        assert_eq!(class, crate::hash::generate_class_name(".raw { color: red; }"));
        let report = styles_report();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(injected_css(), "");
        reset();
    }
}
