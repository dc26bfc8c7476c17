//! Template-literal style macros for Zero CSS.
//!
//! Rust has no tagged template literals, so these macros take a string
//! literal with `${expr}` placeholders instead:
//!
//! ```ignore
//! let accent = "tomato";
//! let gap = 8;
//!
//! // A `Template` value:
//! let t = template!("color: ${accent}; gap: ${gap}px;");
//!
//! // Compiled and registered through the default manager:
//! let class = css!("color: ${accent}; gap: ${gap}px;");
//! ```
//!
//! Placeholders accept any expression implementing `Display`. Braces inside
//! a placeholder are balanced, so `${format!("{}px", n)}` works.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Expr, LitStr, parse_macro_input};

/// Build a `zero_css::Template` from a `${expr}` string literal.
#[proc_macro]
pub fn template(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);

    match expand_template(&lit) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Compile a `${expr}` string literal with `zero_css::css` and return the
/// class name (or the bare id in build-time extraction mode).
#[proc_macro]
pub fn css(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);

    match expand_template(&lit) {
        Ok(template) => quote! { ::zero_css::css(#template) }.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// A parsed template: literal segments around placeholder sources.
#[derive(Debug, PartialEq)]
struct Parts {
    segments: Vec<String>,
    placeholders: Vec<String>,
}

fn expand_template(lit: &LitStr) -> syn::Result<TokenStream2> {
    let parts = split_placeholders(&lit.value()).map_err(|msg| syn::Error::new(lit.span(), msg))?;

    let segments = &parts.segments;
    let values = parts
        .placeholders
        .iter()
        .map(|src| {
            syn::parse_str::<Expr>(src).map_err(|err| {
                syn::Error::new(lit.span(), format!("invalid placeholder `${{{src}}}`: {err}"))
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        ::zero_css::Template::new(
            ::std::vec![#(::std::string::String::from(#segments)),*],
            ::std::vec![#(::std::string::ToString::to_string(&(#values))),*],
        )
    })
}

fn split_placeholders(source: &str) -> Result<Parts, String> {
    let mut segments = vec![];
    let mut placeholders = vec![];
    let mut current = String::new();
    let mut rest = source;

    while let Some(start) = rest.find("${") {
        current.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let mut depth = 0usize;
        let mut end = None;
        for (i, ch) in after.char_indices() {
            match ch {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    end = Some(i);
                    break;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }

        let end = end.ok_or_else(|| "unterminated `${` placeholder".to_string())?;
        let expr = after[..end].trim();
        if expr.is_empty() {
            return Err("empty `${}` placeholder".to_string());
        }

        segments.push(std::mem::take(&mut current));
        placeholders.push(expr.to_string());
        rest = &after[end + 1..];
    }

    current.push_str(rest);
    segments.push(current);

    Ok(Parts {
        segments,
        placeholders,
    })
}
