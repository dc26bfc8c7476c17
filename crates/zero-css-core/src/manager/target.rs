//! Injection targets.
//!
//! A [`StyleManager`](super::StyleManager) binds exactly one target at
//! construction:
//!
//! - [`LiveStylesheet`]: a stylesheet accepting one rule at a time
//! - [`LiveElement`]: a style element holding raw CSS text
//! - [`CollectingSink`]: no document; CSS goes to an [`SsrCollection`]
//!
//! The host objects behind the live targets are abstracted by
//! [`SheetHandle`] and [`ElementHandle`], so the same targets drive a real
//! browser (feature `web`) or the in-memory handles in
//! [`memory`](super::memory).

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};

use crate::manager::ssr::SsrCollection;
use crate::{Error, Result};

/// Which kind of target a manager is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Constructable stylesheet.
    Stylesheet,
    /// Style element.
    Element,
    /// Server-side collection.
    Collecting,
}

/// A stylesheet-like host object (CSSOM `CSSStyleSheet`).
pub trait SheetHandle {
    /// Number of rules currently in the sheet.
    fn rule_count(&self) -> usize;

    /// Insert a single complete rule at `index`.
    fn insert_rule(&mut self, rule: &str, index: usize) -> Result<()>;

    /// Delete the rule at `index`.
    fn delete_rule(&mut self, index: usize) -> Result<()>;

    /// Serialized text of the rule at `index`.
    fn rule_text(&self, index: usize) -> Option<String>;
}

/// A style-element-like host object holding raw CSS text.
pub trait ElementHandle {
    /// Current text content.
    fn text_content(&self) -> String;

    /// Replace the text content.
    fn set_text_content(&mut self, text: &str);

    /// Append to the text content.
    fn append_text(&mut self, text: &str) {
        let mut content = self.text_content();
        content.push_str(text);
        self.set_text_content(&content);
    }
}

/// Common capability of all targets: take compiled CSS somewhere.
pub trait InjectionTarget {
    /// The kind of this target.
    fn kind(&self) -> TargetKind;

    /// Inject (or collect) the CSS for style `id`.
    fn inject(&mut self, id: &str, css_text: &str) -> Result<()>;

    /// Everything currently injected, read back from the target.
    fn injected_css(&self) -> String;

    /// Remove everything this target injected.
    fn clear(&mut self);
}

/// Target backed by a stylesheet handle. Multi-rule CSS is split into
/// complete rules which are appended in order.
pub struct LiveStylesheet<H: ?Sized = dyn SheetHandle> {
    sheet: Box<H>,
}

impl<H: SheetHandle + ?Sized> LiveStylesheet<H> {
    /// Bind to a stylesheet handle.
    pub fn new(sheet: Box<H>) -> Self {
        Self { sheet }
    }
}

impl<H: SheetHandle + ?Sized> InjectionTarget for LiveStylesheet<H> {
    fn kind(&self) -> TargetKind {
        TargetKind::Stylesheet
    }

    fn inject(&mut self, id: &str, css_text: &str) -> Result<()> {
        let mut failures = vec![];

        for rule in split_rules(css_text) {
            let index = self.sheet.rule_count();
            if let Err(err) = self.sheet.insert_rule(&rule, index) {
                failures.push(err.to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::injection(id, failures.join("; ")))
        }
    }

    fn injected_css(&self) -> String {
        (0..self.sheet.rule_count())
            .filter_map(|i| self.sheet.rule_text(i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn clear(&mut self) {
        while let Some(last) = self.sheet.rule_count().checked_sub(1) {
            if let Err(err) = self.sheet.delete_rule(last) {
                tracing::warn!(
                    target: crate::logging::targets::MANAGER,
                    error = %err,
                    "failed to delete rule while clearing stylesheet"
                );
                break;
            }
        }
    }
}

/// Target backed by a style element. CSS is appended as text, one style
/// per line.
pub struct LiveElement<H: ?Sized = dyn ElementHandle> {
    element: Box<H>,
}

impl<H: ElementHandle + ?Sized> LiveElement<H> {
    /// Bind to a style element handle.
    pub fn new(element: Box<H>) -> Self {
        Self { element }
    }
}

impl<H: ElementHandle + ?Sized> InjectionTarget for LiveElement<H> {
    fn kind(&self) -> TargetKind {
        TargetKind::Element
    }

    fn inject(&mut self, _id: &str, css_text: &str) -> Result<()> {
        self.element.append_text(&format!("{css_text}\n"));
        Ok(())
    }

    fn injected_css(&self) -> String {
        self.element.text_content()
    }

    fn clear(&mut self) {
        self.element.set_text_content("");
    }
}

/// Server-side target: nothing is rendered, CSS is collected by id.
pub struct CollectingSink {
    collection: SsrCollection,
}

impl CollectingSink {
    /// Collect into the given scope.
    pub fn new(collection: SsrCollection) -> Self {
        Self { collection }
    }

    /// The collection this sink writes to.
    pub fn collection(&self) -> &SsrCollection {
        &self.collection
    }
}

impl InjectionTarget for CollectingSink {
    fn kind(&self) -> TargetKind {
        TargetKind::Collecting
    }

    fn inject(&mut self, id: &str, css_text: &str) -> Result<()> {
        self.collection.insert(id, css_text);
        Ok(())
    }

    fn injected_css(&self) -> String {
        String::new()
    }

    // The collection is drained per response via `SsrCollection::clear`.
    fn clear(&mut self) {}
}

/// Split CSS text into complete top-level rules.
///
/// The text is tokenized with `cssparser`, so braces inside strings,
/// comments and nested blocks never end a rule early and at-rule blocks
/// stay whole. Comments between rules are dropped. Fragments that are too
/// short or lack braces are dropped; if no complete rule is found, the
/// trimmed text is returned as a single rule (subject to the same filter).
pub fn split_rules(css_text: &str) -> Vec<String> {
    let mut input = ParserInput::new(css_text);
    let mut parser = Parser::new(&mut input);
    let mut rules = vec![];
    let mut start: Option<SourcePosition> = None;

    loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => {}
            // Stray closing brace: discard the prelude gathered so far.
            Token::CloseCurlyBracket => start = None,
            Token::CurlyBracketBlock => {
                let begin = start.take().unwrap_or(before);
                let _ = parser.parse_nested_block(skip_block);
                rules.push(parser.slice_from(begin).trim().to_string());
            }
            _ => {
                if start.is_none() {
                    start = Some(before);
                }
            }
        }
    }

    if rules.is_empty() {
        let trimmed = css_text.trim();
        if !trimmed.is_empty() {
            rules.push(trimmed.to_string());
        }
    }

    rules.retain(|rule| rule.len() > 3 && rule.contains('{') && rule.contains('}'));
    rules
}

fn skip_block<'i>(block: &mut Parser<'i, '_>) -> std::result::Result<(), ParseError<'i, ()>> {
    while block.next_including_whitespace_and_comments().is_ok() {}
    Ok(())
}
