//! In-memory host handles.
//!
//! These stand in for a document's stylesheet and style element where no
//! browser is available: headless rendering, snapshot tests, or any host
//! that wants to read injected CSS back. Handles are cheap to clone and
//! clones share state, so a caller can keep one clone for inspection while
//! the manager owns another.

use std::cell::RefCell;
use std::rc::Rc;

use crate::manager::target::{ElementHandle, SheetHandle};
use crate::{Error, Result};

/// A stylesheet that stores rule text.
///
/// Like a live CSSOM, it rejects rules it cannot make sense of: an empty
/// selector, unbalanced braces, or an out-of-range index.
#[derive(Debug, Clone, Default)]
pub struct MemoryStyleSheet {
    rules: Rc<RefCell<Vec<String>>>,
}

impl MemoryStyleSheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current rules.
    pub fn rules(&self) -> Vec<String> {
        self.rules.borrow().clone()
    }
}

impl SheetHandle for MemoryStyleSheet {
    fn rule_count(&self) -> usize {
        self.rules.borrow().len()
    }

    fn insert_rule(&mut self, rule: &str, index: usize) -> Result<()> {
        let rule = rule.trim();
        let Some(open) = rule.find('{') else {
            return Err(Error::rule_rejected(rule, "missing block"));
        };
        if rule[..open].trim().is_empty() {
            return Err(Error::rule_rejected(rule, "missing selector"));
        }
        if !braces_balanced(rule) || !rule.ends_with('}') {
            return Err(Error::rule_rejected(rule, "unbalanced braces"));
        }

        let mut rules = self.rules.borrow_mut();
        if index > rules.len() {
            return Err(Error::rule_rejected(
                rule,
                format!("index {index} out of range for {} rules", rules.len()),
            ));
        }
        rules.insert(index, rule.to_string());
        Ok(())
    }

    fn delete_rule(&mut self, index: usize) -> Result<()> {
        let mut rules = self.rules.borrow_mut();
        if index >= rules.len() {
            return Err(Error::rule_rejected(
                "",
                format!("index {index} out of range for {} rules", rules.len()),
            ));
        }
        rules.remove(index);
        Ok(())
    }

    fn rule_text(&self, index: usize) -> Option<String> {
        self.rules.borrow().get(index).cloned()
    }
}

/// A style element that stores its text content.
#[derive(Debug, Clone, Default)]
pub struct MemoryStyleElement {
    text: Rc<RefCell<String>>,
}

impl MemoryStyleElement {
    /// Create an empty element.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementHandle for MemoryStyleElement {
    fn text_content(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text_content(&mut self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn append_text(&mut self, text: &str) {
        self.text.borrow_mut().push_str(text);
    }
}

fn braces_balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for ch in text.chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
