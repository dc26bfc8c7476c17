//! Streaming injection of collected CSS into server-rendered HTML.
//!
//! [`HeadInjector`] watches response chunks for `</head>` and, the first
//! time it appears, splices a `<style>` element with the given CSS in front
//! of it. Every other chunk passes through untouched. The marker is only
//! matched within a single chunk.
//!
//! ```ignore
//! let css = collection.take();
//! let body = inject_styles(html_stream, HeadInjector::new(css).with_nonce(nonce));
//! ```

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

use crate::logging::targets;

/// Marker before which the style element is inserted.
pub const HEAD_CLOSE: &[u8] = b"</head>";

/// Id attribute of the injected style element.
pub const SSR_STYLE_ID: &str = "zero-css-ssr";

/// One-shot splicer of a `<style>` element before `</head>`.
#[derive(Debug, Clone)]
pub struct HeadInjector {
    css: String,
    nonce: Option<String>,
    done: bool,
}

impl HeadInjector {
    /// Inject `css` into the first chunk containing `</head>`.
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            nonce: None,
            done: false,
        }
    }

    /// Carry a content-security-policy nonce on the style element.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Whether the style element has been spliced in.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The `<style>` element that will be injected.
    pub fn style_tag(&self) -> String {
        match &self.nonce {
            Some(nonce) => format!(
                "<style id=\"{SSR_STYLE_ID}\" nonce=\"{}\">{}</style>",
                escape_attribute(nonce),
                self.css
            ),
            None => format!("<style id=\"{SSR_STYLE_ID}\">{}</style>", self.css),
        }
    }

    /// Process one chunk.
    pub fn transform(&mut self, chunk: Bytes) -> Bytes {
        if self.done {
            return chunk;
        }

        let Some(pos) = find(&chunk, HEAD_CLOSE) else {
            return chunk;
        };

        self.done = true;
        let tag = self.style_tag();

        tracing::debug!(
            target: targets::STREAM,
            bytes = self.css.len(),
            nonce = self.nonce.is_some(),
            "injected ssr styles before </head>"
        );

        let mut out = BytesMut::with_capacity(chunk.len() + tag.len());
        out.extend_from_slice(&chunk[..pos]);
        out.extend_from_slice(tag.as_bytes());
        out.extend_from_slice(&chunk[pos..]);
        out.freeze()
    }
}

/// Wrap a byte stream so the first chunk containing `</head>` gets the
/// injector's style element. Errors pass through unchanged.
pub fn inject_styles<S, E>(stream: S, mut injector: HeadInjector) -> impl Stream<Item = Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    stream.map(move |chunk| chunk.map(|bytes| injector.transform(bytes)))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[test]
    fn injects_before_head_close() {
        let mut injector = HeadInjector::new(".a { color: red; }");
        let out = injector.transform(Bytes::from_static(b"<html><head><title>x</title></head><body>"));

        assert_eq!(
            out,
            Bytes::from_static(
                b"<html><head><title>x</title><style id=\"zero-css-ssr\">.a { color: red; }</style></head><body>"
            )
        );
        assert!(injector.is_done());
    }

    #[test]
    fn only_first_match_is_injected() {
        let mut injector = HeadInjector::new("x");
        injector.transform(Bytes::from_static(b"</head>"));

        let later = Bytes::from_static(b"<template></head></template>");
        assert_eq!(injector.transform(later.clone()), later);
    }

    #[test]
    fn chunks_without_marker_pass_through() {
        let mut injector = HeadInjector::new("x");
        let chunk = Bytes::from_static(b"<html><head>");

        assert_eq!(injector.transform(chunk.clone()), chunk);
        assert!(!injector.is_done());
    }

    #[test]
    fn nonce_is_escaped() {
        let injector = HeadInjector::new("").with_nonce("a\"b<c");
        assert_eq!(
            injector.style_tag(),
            "<style id=\"zero-css-ssr\" nonce=\"a&quot;b&lt;c\"></style>"
        );
    }

    #[test]
    fn short_chunks() {
        let mut injector = HeadInjector::new("x");
        let chunk = Bytes::from_static(b"</he");
        assert_eq!(injector.transform(chunk.clone()), chunk);
        assert_eq!(injector.transform(Bytes::new()), Bytes::new());
    }

    #[tokio::test]
    async fn stream_adapter_injects_once() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"<html><head>")),
            Ok(Bytes::from_static(b"</head><body>")),
            Ok(Bytes::from_static(b"</head>")),
        ];

        let out: Vec<_> = inject_styles(stream::iter(chunks), HeadInjector::new(".a{}").with_nonce("n1"))
            .collect()
            .await;

        let out: Vec<Bytes> = out.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(out[0], Bytes::from_static(b"<html><head>"));
        assert_eq!(
            out[1],
            Bytes::from_static(b"<style id=\"zero-css-ssr\" nonce=\"n1\">.a{}</style></head><body>")
        );
        assert_eq!(out[2], Bytes::from_static(b"</head>"));
    }

    #[tokio::test]
    async fn stream_adapter_passes_errors() {
        let chunks: Vec<Result<Bytes, &str>> = vec![Err("boom"), Ok(Bytes::from_static(b"</head>"))];
        let out: Vec<_> = inject_styles(stream::iter(chunks), HeadInjector::new("x")).collect().await;

        assert_eq!(out[0], Err("boom"));
        assert!(out[1].as_ref().unwrap().starts_with(b"<style"));
    }
}
