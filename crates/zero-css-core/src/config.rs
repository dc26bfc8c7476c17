//! Style manager configuration.

use std::fmt;

use crate::manager::memory::{MemoryStyleElement, MemoryStyleSheet};
use crate::manager::ssr::SsrCollection;
use crate::manager::target::{ElementHandle, SheetHandle};

/// Environment variable selecting [`StyleMode`].
pub const ENV_MODE: &str = "ZERO_CSS_MODE";
/// Environment variable enabling debug capture.
pub const ENV_DEBUG: &str = "ZERO_CSS_DEBUG";
/// Environment variable enabling build-time extraction mode.
pub const ENV_BUILD_TIME: &str = "ZERO_CSS_BUILD_TIME";
/// Environment variable carrying the integrity key.
pub const ENV_INTEGRITY_KEY: &str = "ZERO_CSS_INTEGRITY_KEY";

/// Execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleMode {
    /// Debug capture and introspection available.
    Development,
    /// No debug capture.
    #[default]
    Production,
}

impl StyleMode {
    /// Parse a mode name. Anything other than `development`/`dev` is production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }

    /// Whether this is development mode.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// An explicit injection target supplied at construction.
pub enum TargetOverride {
    /// A stylesheet-like handle accepting individual rules.
    Sheet(Box<dyn SheetHandle>),
    /// An element-like handle holding raw text.
    Element(Box<dyn ElementHandle>),
}

impl TargetOverride {
    /// Override with any stylesheet handle.
    pub fn sheet(handle: impl SheetHandle + 'static) -> Self {
        Self::Sheet(Box::new(handle))
    }

    /// Override with any element handle.
    pub fn element(handle: impl ElementHandle + 'static) -> Self {
        Self::Element(Box::new(handle))
    }
}

impl From<MemoryStyleSheet> for TargetOverride {
    fn from(sheet: MemoryStyleSheet) -> Self {
        Self::sheet(sheet)
    }
}

impl From<MemoryStyleElement> for TargetOverride {
    fn from(element: MemoryStyleElement) -> Self {
        Self::element(element)
    }
}

impl fmt::Debug for TargetOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sheet(_) => f.write_str("TargetOverride::Sheet(..)"),
            Self::Element(_) => f.write_str("TargetOverride::Element(..)"),
        }
    }
}

/// Options for constructing a [`StyleManager`](crate::manager::StyleManager).
///
/// # Example
///
/// ```ignore
/// let options = StyleOptions::new()
///     .mode(StyleMode::Development)
///     .enable_debugger(true)
///     .collection(SsrCollection::new());
/// let manager = StyleManager::new(options);
/// ```
#[derive(Debug, Default)]
pub struct StyleOptions {
    /// Execution mode.
    pub mode: StyleMode,
    /// Record debug snapshots for each added style (development only).
    pub enable_debugger: bool,
    /// Reserved for signing/verification; not used by compilation.
    pub integrity_key: Option<String>,
    /// Explicit injection target; otherwise detected from the environment.
    pub target: Option<TargetOverride>,
    /// SSR collection scope; defaults to the process-wide collection.
    pub collection: Option<SsrCollection>,
    /// Build-time extraction: compile calls return bare ids and skip injection.
    pub build_time: bool,
}

impl StyleOptions {
    /// Production defaults with no explicit target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Development defaults: debug capture on.
    pub fn development() -> Self {
        Self {
            mode: StyleMode::Development,
            enable_debugger: true,
            ..Self::default()
        }
    }

    /// Read options from the `ZERO_CSS_*` environment variables.
    ///
    /// Without `ZERO_CSS_MODE`, debug builds run in development mode.
    /// Without `ZERO_CSS_DEBUG`, debug capture follows the mode.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mode = match lookup(ENV_MODE) {
            Some(value) => StyleMode::parse(&value),
            None if cfg!(debug_assertions) => StyleMode::Development,
            None => StyleMode::Production,
        };
        let enable_debugger = lookup(ENV_DEBUG)
            .map(|value| is_truthy(&value))
            .unwrap_or(mode.is_development());
        let build_time = lookup(ENV_BUILD_TIME).is_some_and(|value| is_truthy(&value));

        Self {
            mode,
            enable_debugger,
            integrity_key: lookup(ENV_INTEGRITY_KEY),
            target: None,
            collection: None,
            build_time,
        }
    }

    /// Set the execution mode.
    pub fn mode(mut self, mode: StyleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable debug capture.
    pub fn enable_debugger(mut self, enabled: bool) -> Self {
        self.enable_debugger = enabled;
        self
    }

    /// Set the integrity key.
    pub fn integrity_key(mut self, key: impl Into<String>) -> Self {
        self.integrity_key = Some(key.into());
        self
    }

    /// Bind an explicit injection target.
    pub fn target(mut self, target: impl Into<TargetOverride>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Collect server-side styles into the given scope.
    pub fn collection(mut self, collection: SsrCollection) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Enable or disable build-time extraction mode.
    pub fn build_time(mut self, enabled: bool) -> Self {
        self.build_time = enabled;
        self
    }

    /// Whether debug snapshots should be recorded.
    pub fn captures_debug(&self) -> bool {
        self.mode.is_development() && self.enable_debugger
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
