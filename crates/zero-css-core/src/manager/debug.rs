//! Development-time introspection.

use std::backtrace::Backtrace;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::hash::class_name_for_id;
use crate::manager::CompiledStyle;

/// Snapshot recorded for each added style when debug capture is enabled.
#[derive(Debug, Clone, Serialize)]
pub struct StyleDebugInfo {
    /// CSS as passed to `add_style`.
    pub css: String,
    /// Caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// When the style was first added.
    pub added_at: DateTime<Utc>,
    /// Call stack at the time the style was added.
    pub stack_trace: String,
}

impl StyleDebugInfo {
    /// Capture a snapshot, including the current call stack.
    pub fn capture(css: &str, metadata: Option<serde_json::Value>) -> Self {
        Self {
            css: css.to_string(),
            metadata,
            added_at: Utc::now(),
            stack_trace: Backtrace::force_capture().to_string(),
        }
    }
}

/// One row of a [`StylesReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRow {
    /// Style id.
    pub id: String,
    /// Class name derived from the id.
    pub class_name: String,
    /// CSS, cut to 100 characters.
    pub preview: String,
    /// Full CSS.
    pub css: String,
}

/// Tabular view of every known style, for manual inspection.
///
/// `Display` renders a plain-text table:
///
/// ```text
/// ID       CLASS       CSS
/// 1xk2f9   zc-1xk2f9   .zc-1xk2f9 { color: red; }
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct StylesReport {
    /// Rows in registration order.
    pub rows: Vec<StyleRow>,
}

impl StylesReport {
    const PREVIEW_CHARS: usize = 100;

    /// Build a report from compiled styles.
    pub fn from_styles<'a>(styles: impl IntoIterator<Item = &'a CompiledStyle>) -> Self {
        let rows = styles
            .into_iter()
            .map(|style| StyleRow {
                id: style.id.clone(),
                class_name: class_name_for_id(&style.id),
                preview: crate::logging::preview(&style.css_text, Self::PREVIEW_CHARS),
                css: style.css_text.clone(),
            })
            .collect();
        Self { rows }
    }

    /// Whether the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for StylesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No styles found");
        }

        let id_width = self.rows.iter().map(|r| r.id.len()).max().unwrap_or(0).max(2);
        let class_width = self
            .rows
            .iter()
            .map(|r| r.class_name.len())
            .max()
            .unwrap_or(0)
            .max(5);

        writeln!(f, "{:<id_width$}   {:<class_width$}   CSS", "ID", "CLASS")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<id_width$}   {:<class_width$}   {}",
                row.id, row.class_name, row.preview
            )?;
        }
        Ok(())
    }
}
