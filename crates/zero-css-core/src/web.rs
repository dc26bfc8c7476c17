//! Browser host handles via `web-sys`.
//!
//! Only available with the `web` feature.

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleSheet, Document, HtmlStyleElement};

use crate::config::TargetOverride;
use crate::manager::target::{ElementHandle, InjectionTarget, LiveElement, LiveStylesheet, SheetHandle};
use crate::{Error, Result};

/// Marker attribute set on style elements created by Zero CSS.
pub const STYLE_ELEMENT_MARKER: &str = "data-zero-css";

/// A constructable `CSSStyleSheet`.
#[derive(Debug, Clone)]
pub struct WebStyleSheet {
    sheet: CssStyleSheet,
}

impl WebStyleSheet {
    /// Wrap an existing sheet.
    pub fn new(sheet: CssStyleSheet) -> Self {
        Self { sheet }
    }

    /// Construct a sheet and append it to `document.adoptedStyleSheets`.
    pub fn adopted(document: &Document) -> Option<Self> {
        let sheet = CssStyleSheet::new().ok()?;
        let adopted = document.adopted_style_sheets();
        adopted.push(&sheet);
        document.set_adopted_style_sheets(&adopted);
        Some(Self { sheet })
    }

    /// The underlying sheet.
    pub fn sheet(&self) -> &CssStyleSheet {
        &self.sheet
    }
}

impl SheetHandle for WebStyleSheet {
    fn rule_count(&self) -> usize {
        self.sheet
            .css_rules()
            .map(|rules| rules.length() as usize)
            .unwrap_or(0)
    }

    fn insert_rule(&mut self, rule: &str, index: usize) -> Result<()> {
        self.sheet
            .insert_rule_with_index(rule, index as u32)
            .map(|_| ())
            .map_err(|err| Error::rule_rejected(rule, describe(&err)))
    }

    fn delete_rule(&mut self, index: usize) -> Result<()> {
        self.sheet
            .delete_rule(index as u32)
            .map_err(|err| Error::rule_rejected("", describe(&err)))
    }

    fn rule_text(&self, index: usize) -> Option<String> {
        self.sheet
            .css_rules()
            .ok()?
            .item(index as u32)
            .map(|rule| rule.css_text())
    }
}

impl From<WebStyleSheet> for TargetOverride {
    fn from(sheet: WebStyleSheet) -> Self {
        Self::sheet(sheet)
    }
}

/// A `<style>` element.
#[derive(Debug, Clone)]
pub struct WebStyleElement {
    element: HtmlStyleElement,
}

impl WebStyleElement {
    /// Wrap an existing style element.
    pub fn new(element: HtmlStyleElement) -> Self {
        Self { element }
    }

    /// Create a marked `<style>` element and mount it in `<head>`.
    pub fn mounted(document: &Document) -> Option<Self> {
        let element = document
            .create_element("style")
            .ok()?
            .dyn_into::<HtmlStyleElement>()
            .ok()?;
        element.set_attribute(STYLE_ELEMENT_MARKER, "true").ok()?;
        document.head()?.append_child(&element).ok()?;
        Some(Self { element })
    }
}

impl ElementHandle for WebStyleElement {
    fn text_content(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn set_text_content(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

impl From<WebStyleElement> for TargetOverride {
    fn from(element: WebStyleElement) -> Self {
        Self::element(element)
    }
}

/// Whether the document supports constructable, adoptable stylesheets.
pub fn supports_constructable_sheets(document: &Document) -> bool {
    Reflect::has(document, &JsValue::from_str("adoptedStyleSheets")).unwrap_or(false)
}

/// Bind a live target if a document exists: an adopted stylesheet when
/// supported, otherwise a style element in `<head>`.
pub fn detect_browser_target() -> Option<Box<dyn InjectionTarget>> {
    let document = web_sys::window()?.document()?;

    if supports_constructable_sheets(&document) {
        if let Some(sheet) = WebStyleSheet::adopted(&document) {
            return Some(Box::new(LiveStylesheet::new(Box::new(sheet))));
        }
    }

    WebStyleElement::mounted(&document)
        .map(|element| Box::new(LiveElement::new(Box::new(element))) as Box<dyn InjectionTarget>)
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
