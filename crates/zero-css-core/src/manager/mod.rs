//! The universal style manager.
//!
//! [`StyleManager`] owns every compiled style of a session, deduplicates by
//! identity and hands new CSS to the injection target bound at construction:
//!
//! 1. an explicit target from [`StyleOptions::target`]
//! 2. in a browser (feature `web`), a constructable stylesheet adopted by the
//!    document, or a `<style>` element in `<head>` as fallback
//! 3. otherwise a [`CollectingSink`] writing to an [`SsrCollection`]
//!
//! # Example
//!
//! ```ignore
//! let collection = SsrCollection::new();
//! let mut manager = StyleManager::new(StyleOptions::new().collection(collection.clone()));
//!
//! let class = manager.css(StyleObject::new().set("color", "red"));
//! let head_css = collection.take();
//! ```

pub mod debug;
pub mod memory;
pub mod ssr;
pub mod target;

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{StyleOptions, TargetOverride};
use crate::hash::{compute_checksum, generate_class_name, hash};
use crate::input::StyleInput;
use crate::logging::{preview, targets};
use crate::style::StyleObject;
use crate::{Error, Result};

use debug::{StyleDebugInfo, StylesReport};
use ssr::SsrCollection;
use target::{CollectingSink, InjectionTarget, LiveElement, LiveStylesheet, TargetKind};

/// A registered style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStyle {
    /// Content-derived identity.
    pub id: String,
    /// Complete CSS as injected.
    pub css_text: String,
    /// Checksum of `css_text`.
    pub checksum: String,
    /// Caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
}

/// Registry of compiled styles bound to one injection target.
pub struct StyleManager {
    options: StyleOptions,
    styles: IndexMap<String, CompiledStyle>,
    injected: HashSet<String>,
    debug_styles: IndexMap<String, StyleDebugInfo>,
    extracted: IndexMap<String, String>,
    target: Box<dyn InjectionTarget>,
}

impl StyleManager {
    /// Create a manager, binding its injection target.
    pub fn new(mut options: StyleOptions) -> Self {
        let target = bind_target(options.target.take(), options.collection.clone());
        Self::from_parts(options, target)
    }

    /// Create a manager bound to an already constructed target.
    ///
    /// `options.target` and `options.collection` are ignored.
    pub fn with_target(options: StyleOptions, target: Box<dyn InjectionTarget>) -> Self {
        Self::from_parts(options, target)
    }

    fn from_parts(mut options: StyleOptions, target: Box<dyn InjectionTarget>) -> Self {
        options.target = None;

        tracing::debug!(
            target: targets::MANAGER,
            kind = ?target.kind(),
            mode = ?options.mode,
            build_time = options.build_time,
            "style manager initialized"
        );

        Self {
            options,
            styles: IndexMap::new(),
            injected: HashSet::new(),
            debug_styles: IndexMap::new(),
            extracted: IndexMap::new(),
            target,
        }
    }

    /// Options this manager was built with (the target is consumed).
    pub fn options(&self) -> &StyleOptions {
        &self.options
    }

    /// The integrity key, if configured.
    pub fn integrity_key(&self) -> Option<&str> {
        self.options.integrity_key.as_deref()
    }

    /// The kind of target this manager is bound to.
    pub fn target_kind(&self) -> TargetKind {
        self.target.kind()
    }

    /// Register a style and inject it, unless `id` was injected already.
    ///
    /// Always returns `id`. Injection failures are logged and do not
    /// prevent the id from being marked injected.
    pub fn add_style(
        &mut self,
        id: &str,
        css_text: &str,
        metadata: Option<serde_json::Value>,
    ) -> String {
        if self.injected.contains(id) {
            tracing::trace!(target: targets::MANAGER, id, "style already injected");
            return id.to_string();
        }

        if self.options.captures_debug() {
            self.debug_styles
                .insert(id.to_string(), StyleDebugInfo::capture(css_text, metadata.clone()));
        }

        self.styles.insert(
            id.to_string(),
            CompiledStyle {
                id: id.to_string(),
                css_text: css_text.to_string(),
                checksum: compute_checksum(css_text),
                metadata,
            },
        );

        if let Err(err) = self.target.inject(id, css_text) {
            tracing::warn!(target: targets::MANAGER, id, error = %err, "failed to inject style");
        }

        self.injected.insert(id.to_string());
        id.to_string()
    }

    /// Compile an input and register it.
    ///
    /// Returns the class name, or the bare id in build-time extraction
    /// mode, where the CSS is kept for [`StyleManager::extracted_css`]
    /// instead of being injected.
    pub fn css(&mut self, input: impl Into<StyleInput>) -> String {
        let compiled = input.into().compile();

        if self.options.mode.is_development() {
            tracing::debug!(
                target: targets::COMPILER,
                id = %compiled.id,
                class_name = %compiled.class_name,
                css = %preview(&compiled.css_text, 100),
                "generated css"
            );
        }

        if self.options.build_time {
            self.extracted
                .entry(compiled.id.clone())
                .or_insert(compiled.css_text);
            return compiled.id;
        }

        self.add_style(&compiled.id, &compiled.css_text, None);
        compiled.class_name
    }

    /// Register raw CSS as-is, returning the class name derived from it.
    pub fn apply_styles(&mut self, css_text: &str, metadata: Option<serde_json::Value>) -> String {
        self.add_style(&hash(css_text), css_text, metadata);
        generate_class_name(css_text)
    }

    /// Compile and register a style object.
    pub fn styled(&mut self, styles: &StyleObject) -> String {
        self.css(styles)
    }

    /// Whether `id` has been injected.
    pub fn is_injected(&self, id: &str) -> bool {
        self.injected.contains(id)
    }

    /// Look up a registered style.
    pub fn style(&self, id: &str) -> Option<&CompiledStyle> {
        self.styles.get(id)
    }

    /// Copy of every registered style, in registration order.
    pub fn all_styles(&self) -> IndexMap<String, CompiledStyle> {
        self.styles.clone()
    }

    /// CSS of one registered style.
    pub fn style_css(&self, id: &str) -> Option<&str> {
        self.styles
            .get(id)
            .map(|style| style.css_text.as_str())
            .filter(|css| !css.is_empty())
    }

    /// Debug snapshot for one style. Always `None` outside development mode.
    pub fn debug_info(&self, id: &str) -> Option<&StyleDebugInfo> {
        if !self.options.mode.is_development() {
            return None;
        }
        self.debug_styles.get(id)
    }

    /// Every debug snapshot. `None` outside development mode.
    pub fn all_debug_info(&self) -> Option<Vec<(String, StyleDebugInfo)>> {
        if !self.options.mode.is_development() {
            return None;
        }
        Some(
            self.debug_styles
                .iter()
                .map(|(id, info)| (id.clone(), info.clone()))
                .collect(),
        )
    }

    /// CSS currently live in the bound target. Empty when nothing is bound.
    pub fn all_injected_css(&self) -> String {
        self.target.injected_css()
    }

    /// Table of every registered style.
    pub fn report(&self) -> StylesReport {
        StylesReport::from_styles(self.styles.values())
    }

    /// Forget every style and remove what was injected into a live target.
    pub fn clear(&mut self) {
        self.styles.clear();
        self.injected.clear();
        self.debug_styles.clear();
        self.target.clear();
        tracing::info!(target: targets::MANAGER, "styles cleared");
    }

    /// CSS kept by build-time extraction, one style per line.
    pub fn extracted_css(&self) -> String {
        self.extracted
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the extracted CSS to a file for a build step to ship.
    pub fn write_extracted(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut css = self.extracted_css();
        if !css.is_empty() {
            css.push('\n');
        }
        std::fs::write(path, css).map_err(|e| Error::io(path, e))?;

        tracing::info!(
            target: targets::EXTRACT,
            path = %path.display(),
            styles = self.extracted.len(),
            "wrote extracted css"
        );
        Ok(())
    }

    /// Everything collected in the process-wide SSR scope.
    pub fn ssr_styles() -> String {
        SsrCollection::global().styles()
    }

    /// Empty the process-wide SSR scope.
    pub fn clear_ssr_styles() {
        SsrCollection::global().clear();
    }
}

impl Default for StyleManager {
    fn default() -> Self {
        Self::new(StyleOptions::default())
    }
}

impl std::fmt::Debug for StyleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleManager")
            .field("mode", &self.options.mode)
            .field("target", &self.target.kind())
            .field("styles", &self.styles.len())
            .field("injected", &self.injected.len())
            .finish()
    }
}

fn bind_target(
    target: Option<TargetOverride>,
    collection: Option<SsrCollection>,
) -> Box<dyn InjectionTarget> {
    match target {
        Some(TargetOverride::Sheet(sheet)) => Box::new(LiveStylesheet::new(sheet)),
        Some(TargetOverride::Element(element)) => Box::new(LiveElement::new(element)),
        None => {
            #[cfg(feature = "web")]
            if let Some(target) = crate::web::detect_browser_target() {
                return target;
            }

            Box::new(CollectingSink::new(collection.unwrap_or_else(SsrCollection::global)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleMode;
    use crate::hash::class_name_for_id;
    use crate::manager::memory::{MemoryStyleElement, MemoryStyleSheet};
    use crate::manager::target::SheetHandle;
    use crate::template::Template;

    fn server_manager() -> (StyleManager, SsrCollection) {
        let collection = SsrCollection::new();
        let manager = StyleManager::new(StyleOptions::new().collection(collection.clone()));
        (manager, collection)
    }

    #[test]
    fn server_binding_collects() {
        let (mut manager, collection) = server_manager();

        manager.add_style("a", ".zc-a { color: red; }", None);
        manager.add_style("b", ".zc-b { color: blue; }", None);

        assert_eq!(manager.target_kind(), TargetKind::Collecting);
        assert_eq!(collection.styles(), ".zc-a { color: red; }\n.zc-b { color: blue; }");
        assert_eq!(manager.all_injected_css(), "");

        collection.clear();
        assert_eq!(collection.styles(), "");
    }

    #[test]
    fn add_style_is_idempotent() {
        let sheet = MemoryStyleSheet::new();
        let mut manager = StyleManager::new(StyleOptions::new().target(sheet.clone()));

        assert_eq!(manager.add_style("x", ".zc-x { color: red; }", None), "x");
        assert_eq!(manager.add_style("x", ".zc-x { color: red; }", None), "x");

        assert_eq!(sheet.rules(), vec![".zc-x { color: red; }"]);
        assert_eq!(manager.all_styles().len(), 1);
    }

    #[test]
    fn colliding_id_is_silently_skipped() {
        let (mut manager, collection) = server_manager();

        manager.add_style("same", ".first { }", None);
        manager.add_style("same", ".second { }", None);

        assert_eq!(manager.style_css("same"), Some(".first { }"));
        assert_eq!(collection.styles(), ".first { }");
    }

    #[test]
    fn compiled_style_fields() {
        let (mut manager, _) = server_manager();
        let meta = serde_json::json!({ "component": "Card" });

        manager.add_style("c", ".zc-c { margin: 0; }", Some(meta.clone()));
        let style = manager.style("c").unwrap();

        assert_eq!(style.id, "c");
        assert_eq!(style.checksum, hash(".zc-c { margin: 0; }"));
        assert_eq!(style.metadata, Some(meta));
        assert!(manager.style("missing").is_none());
        assert!(manager.style_css("missing").is_none());
    }

    #[test]
    fn stylesheet_binding_splits_rules() {
        let sheet = MemoryStyleSheet::new();
        let mut manager = StyleManager::new(StyleOptions::new().target(sheet.clone()));

        let class = manager.css(
            StyleObject::new()
                .set("fontSize", "18px")
                .nest("@media (max-width: 768px)", StyleObject::new().set("fontSize", "14px")),
        );

        assert_eq!(manager.target_kind(), TargetKind::Stylesheet);
        assert_eq!(
            sheet.rules(),
            vec![
                format!(".{class} {{ font-size: 18px; }}"),
                format!("@media (max-width: 768px) {{ .{class} {{ font-size: 14px; }} }}"),
            ]
        );
    }

    #[test]
    fn element_binding_appends_text() {
        let element = MemoryStyleElement::new();
        let mut manager = StyleManager::new(StyleOptions::new().target(element.clone()));

        let class = manager.css(Template::raw("color: red;"));

        assert_eq!(manager.target_kind(), TargetKind::Element);
        assert_eq!(manager.all_injected_css(), format!(".{class} {{ color: red; }}\n"));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn injection_failure_does_not_block_later_styles() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let sheet = MemoryStyleSheet::new();
        let mut manager = StyleManager::new(StyleOptions::new().target(sheet.clone()));

        tracing::subscriber::with_default(subscriber, || {
            manager.add_style("bad", "{ color: red; }", None);
            manager.add_style("good", ".good { color: blue; }", None);
        });

        assert!(manager.is_injected("bad"));
        assert_eq!(sheet.rules(), vec![".good { color: blue; }"]);

        let output = logs.contents();
        let warnings: Vec<_> = output.lines().filter(|line| line.contains("WARN")).collect();
        assert_eq!(warnings.len(), 1, "{output}");
        assert!(warnings[0].contains(targets::MANAGER));
        assert!(warnings[0].contains("id=\"bad\""));
    }

    #[test]
    fn commented_css_keeps_every_rule() {
        let sheet = MemoryStyleSheet::new();
        let mut manager = StyleManager::new(StyleOptions::new().target(sheet.clone()));

        manager.apply_styles(".a { color: red; } /* it's fine */ .b { color: blue; }", None);

        assert_eq!(sheet.rules(), vec![".a { color: red; }", ".b { color: blue; }"]);
    }

    #[test]
    fn clear_resets_state_and_target() {
        let sheet = MemoryStyleSheet::new();
        let mut manager = StyleManager::new(StyleOptions::development().target(sheet.clone()));

        manager.add_style("a", ".a { color: red; }", None);
        manager.clear();

        assert!(manager.all_styles().is_empty());
        assert!(manager.all_debug_info().unwrap().is_empty());
        assert_eq!(sheet.rule_count(), 0);
        assert!(!manager.is_injected("a"));

        manager.add_style("a", ".a { color: red; }", None);
        assert_eq!(sheet.rules(), vec![".a { color: red; }"]);

        manager.clear();
        manager.clear();
        assert!(manager.all_styles().is_empty());
    }

    #[test]
    fn debug_info_only_in_development() {
        let (mut production, _) = server_manager();
        production.add_style("a", ".a { }", None);
        assert!(production.debug_info("a").is_none());
        assert!(production.all_debug_info().is_none());

        let mut development = StyleManager::new(
            StyleOptions::development().collection(SsrCollection::new()),
        );
        development.add_style("a", ".a { }", Some(serde_json::json!("meta")));

        let info = development.debug_info("a").unwrap();
        assert_eq!(info.css, ".a { }");
        assert_eq!(info.metadata, Some(serde_json::json!("meta")));
        assert!(development.debug_info("missing").is_none());
        assert_eq!(development.all_debug_info().unwrap().len(), 1);
    }

    #[test]
    fn development_without_debugger_records_nothing() {
        let mut manager = StyleManager::new(
            StyleOptions::new()
                .mode(StyleMode::Development)
                .enable_debugger(false)
                .collection(SsrCollection::new()),
        );
        manager.add_style("a", ".a { }", None);

        assert!(manager.all_debug_info().unwrap().is_empty());
    }

    #[test]
    fn css_returns_class_name_and_dedupes() {
        let (mut manager, collection) = server_manager();
        let style = StyleObject::new().set("color", "red");

        let first = manager.css(&style);
        let second = manager.css(&style);

        assert_eq!(first, second);
        assert!(first.starts_with("zc-"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn build_time_returns_bare_id_without_injecting() {
        let collection = SsrCollection::new();
        let mut manager = StyleManager::new(
            StyleOptions::new().build_time(true).collection(collection.clone()),
        );

        let id = manager.css(StyleObject::new().set("color", "red"));

        assert!(!id.starts_with("zc-"));
        assert!(collection.is_empty());
        assert!(manager.all_styles().is_empty());
        assert_eq!(
            manager.extracted_css(),
            format!(".{} {{ color: red; }}", class_name_for_id(&id))
        );
    }

    #[test]
    fn write_extracted_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.css");
        let mut manager = StyleManager::new(
            StyleOptions::new().build_time(true).collection(SsrCollection::new()),
        );
        manager.css(Template::raw("color: red;"));
        manager.css(Template::raw("color: blue;"));

        manager.write_extracted(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("color: red;"));
    }

    #[test]
    fn write_extracted_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("zero.css");
        let manager = StyleManager::new(StyleOptions::new().collection(SsrCollection::new()));

        assert!(matches!(manager.write_extracted(&path), Err(Error::Io { .. })));
    }

    #[test]
    fn apply_styles_registers_raw_css() {
        let (mut manager, collection) = server_manager();
        let css = ".custom { display: none; }";

        let class = manager.apply_styles(css, None);

        assert_eq!(class, generate_class_name(css));
        assert_eq!(manager.style_css(&hash(css)), Some(css));
        assert_eq!(collection.styles(), css);
    }

    #[test]
    fn report_lists_styles() {
        let (mut manager, _) = server_manager();
        let class = manager.css(Template::raw("color: red;"));

        let report = manager.report();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].class_name, class);
    }

    #[test]
    fn with_target_uses_custom_target() {
        let collection = SsrCollection::new();
        let mut manager = StyleManager::with_target(
            StyleOptions::new(),
            Box::new(CollectingSink::new(collection.clone())),
        );
        manager.add_style("a", ".a { }", None);
        assert_eq!(collection.styles(), ".a { }");
    }
}
