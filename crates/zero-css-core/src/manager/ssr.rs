//! Server-side style collection.
//!
//! Without a document, added styles are collected by id so the server can
//! embed them in a `<style>` tag. [`SsrCollection::global`] is the
//! process-wide default scope. Servers handling concurrent requests should
//! create one [`SsrCollection`] per request and pass it through
//! [`StyleOptions::collection`](crate::config::StyleOptions::collection),
//! so one response never picks up another's styles.
//!
//! Whoever owns a scope must read it with [`SsrCollection::styles`] and
//! then [`SsrCollection::clear`] it once per response.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::Mutex;

static GLOBAL_COLLECTION: OnceLock<SsrCollection> = OnceLock::new();

/// A handle to a collection of server-rendered CSS, keyed by style id.
///
/// Clones share the same underlying collection. Insertion order is kept;
/// re-inserting an id replaces its CSS in place.
#[derive(Debug, Clone, Default)]
pub struct SsrCollection {
    styles: Arc<Mutex<IndexMap<String, String>>>,
}

impl SsrCollection {
    /// Create a new, empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide scope.
    pub fn global() -> Self {
        GLOBAL_COLLECTION.get_or_init(Self::new).clone()
    }

    /// Record the CSS for a style id.
    pub fn insert(&self, id: impl Into<String>, css_text: impl Into<String>) {
        self.styles.lock().insert(id.into(), css_text.into());
    }

    /// All collected CSS in insertion order, one style per line.
    pub fn styles(&self) -> String {
        self.styles
            .lock()
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// CSS collected for one id.
    pub fn get(&self, id: &str) -> Option<String> {
        self.styles.lock().get(id).cloned()
    }

    /// Collected ids in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.styles.lock().keys().cloned().collect()
    }

    /// Number of collected styles.
    pub fn len(&self) -> usize {
        self.styles.lock().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.styles.lock().is_empty()
    }

    /// Drop everything collected so far.
    pub fn clear(&self) {
        self.styles.lock().clear();
    }

    /// Read everything collected and clear the scope in one step.
    pub fn take(&self) -> String {
        let mut styles = self.styles.lock();
        let css = styles.values().map(String::as_str).collect::<Vec<_>>().join("\n");
        styles.clear();
        css
    }
}
