//! Classification and resolution of nested rule keys.

/// The role a nested key plays, decided by its leading sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedKey {
    /// `:hover`, `::before`, `:nth-child(2n)`: appended to the scope selector.
    Pseudo,
    /// `&.active`, `& h2`, `&:focus`: `&` stands for the scope selector.
    Parent,
    /// `[disabled]`: attribute selector on the scope selector.
    Attribute,
    /// `> span`, `+ p`, `~ li`: combinator relative to the scope selector.
    Combinator,
    /// `@media`, `@container`, `@supports`: wraps a block scoped to the selector.
    ConditionalAt,
    /// Anything else, emitted as a literal selector.
    Literal,
}

const CONDITIONAL_AT_RULES: [&str; 3] = ["@media", "@container", "@supports"];

impl NestedKey {
    /// Classify a nested key.
    pub fn classify(key: &str) -> Self {
        if key.starts_with(':') {
            Self::Pseudo
        } else if key.starts_with('&') {
            Self::Parent
        } else if key.starts_with('[') && key.ends_with(']') {
            Self::Attribute
        } else if key.starts_with(['>', '+', '~']) {
            Self::Combinator
        } else if CONDITIONAL_AT_RULES.iter().any(|at| key.starts_with(at)) {
            Self::ConditionalAt
        } else {
            Self::Literal
        }
    }

    /// Resolve the selector a nested block applies to.
    ///
    /// `scope` is the enclosing selector (for top-level keys, `.<class>`).
    /// With an empty scope every key resolves to itself. Conditional
    /// at-rules keep the scope, since their block is re-scoped inside.
    pub fn resolve(self, key: &str, scope: &str) -> String {
        if scope.is_empty() {
            return key.to_string();
        }

        match self {
            Self::Pseudo | Self::Attribute => format!("{scope}{key}"),
            Self::Parent => key.replacen('&', scope, 1),
            Self::Combinator => format!("{scope} {key}"),
            Self::ConditionalAt => scope.to_string(),
            Self::Literal => key.to_string(),
        }
    }
}
