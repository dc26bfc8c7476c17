//! Style object to CSS compilation.
//!
//! [`compile`] turns a [`StyleObject`] into one or more complete CSS rules
//! scoped to a generated class name:
//!
//! - flat entries become declarations in a `.<class> { ... }` block
//! - nested entries become their own rules, keyed by sigil (see [`NestedKey`])
//! - `@media`, `@container` and `@supports` wrap a re-scoped `.<class>` block
//!
//! Values are not validated; whatever the caller wrote ends up in the CSS.

mod declaration;
mod selector;

pub use declaration::{declaration, kebab_case, property_name};
pub use selector::NestedKey;

use crate::style::{StyleObject, StyleValue};

/// Compile a style object into complete CSS scoped to `class_name`.
///
/// When the object has only nested rules, no bare `.<class>` block is
/// emitted. An object with no nested rules always yields exactly one rule,
/// even when empty.
pub fn compile(style: &StyleObject, class_name: &str) -> String {
    let scope = format!(".{class_name}");

    if !style.has_nested() {
        return rule(&scope, &compile_block(style, &scope));
    }

    let mut declarations = vec![];
    let mut nested_rules = vec![];

    for (key, value) in style.iter() {
        match value {
            StyleValue::Nested(block) => nested_rules.push(nested_rule(key, block, &scope)),
            _ => declarations.push(declaration(key, value)),
        }
    }

    let mut parts = Vec::with_capacity(nested_rules.len() + 1);
    if !declarations.is_empty() {
        parts.push(rule(&scope, &declarations.join(" ")));
    }
    parts.extend(nested_rules);
    parts.join(" ")
}

/// Compile the body of a block: declarations first, then nested rules
/// resolved against `scope`.
///
/// This is also the recursion step for nesting below the top level, where
/// nested rules end up inside their parent block.
pub fn compile_block(style: &StyleObject, scope: &str) -> String {
    let mut declarations = vec![];
    let mut nested_rules = vec![];

    for (key, value) in style.iter() {
        match value {
            StyleValue::Nested(block) => nested_rules.push(nested_rule(key, block, scope)),
            _ => declarations.push(declaration(key, value)),
        }
    }

    declarations.extend(nested_rules);
    declarations.join(" ")
}

fn nested_rule(key: &str, block: &StyleObject, scope: &str) -> String {
    let kind = NestedKey::classify(key);

    match kind {
        NestedKey::ConditionalAt if !scope.is_empty() => {
            let inner = rule(scope, &compile_block(block, scope));
            format!("{key} {{ {inner} }}")
        }
        NestedKey::ConditionalAt => rule(key, &compile_block(block, scope)),
        _ => {
            let selector = kind.resolve(key, scope);
            rule(&selector, &compile_block(block, &selector))
        }
    }
}

fn rule(selector: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{selector} {{ }}")
    } else {
        format!("{selector} {{ {body} }}")
    }
}
