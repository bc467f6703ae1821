// kiz-vm - Traceback rendering
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Rendering of uncaught-error tracebacks: for every captured frame, the
//! file header, the offending source line and a caret underline, then
//! the error name and message.

use kiz_core::{Object, magic};
use kiz_parser::Span;

use crate::sources::SourceCache;

/// ANSI escape codes used by the reporter.
mod color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const WHITE: &str = "\x1b[37m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
}

/// An uncaught error: name, message, and the captured traceback.
#[derive(Debug, Clone)]
pub struct Uncaught {
    pub name: String,
    pub message: String,
    pub positions: Vec<(String, Span)>,
}

impl Uncaught {
    /// Extract name, message and positions from an error object.
    pub fn from_error(error: &Object) -> Self {
        let name = error
            .get_attr_local(magic::ERR_NAME)
            .map(|name| name.display_string())
            .unwrap_or_else(|| "Error".to_string());
        let message = error
            .get_attr_local(magic::ERR_MSG)
            .map(|message| message.display_string())
            .unwrap_or_default();
        Uncaught {
            name,
            message,
            positions: error.error_positions().unwrap_or_default(),
        }
    }

    /// An internal failure with no source positions.
    pub fn internal(message: impl Into<String>) -> Self {
        Uncaught {
            name: "InternalError".to_string(),
            message: message.into(),
            positions: Vec::new(),
        }
    }
}

/// Render the full colored traceback.
pub fn render_traceback(sources: &SourceCache, uncaught: &Uncaught) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{}Trace Back: {}\n",
        color::BRIGHT_RED,
        color::RESET
    ));
    for (path, span) in &uncaught.positions {
        out.push_str(&render_context(sources, path, *span));
    }
    out.push_str(&format!(
        "{}{}{}{}{} : {}{}\n",
        color::BOLD,
        color::BRIGHT_RED,
        uncaught.name,
        color::RESET,
        color::WHITE,
        uncaught.message,
        color::RESET
    ));
    out
}

/// One frame's context: file header, source line, caret underline.
fn render_context(sources: &SourceCache, path: &str, span: Span) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}File \"{}\"{}\n",
        color::BRIGHT_BLUE,
        path,
        color::RESET
    ));

    let line = match sources.line(path, span.line_start) {
        Some(line) => line.to_string(),
        None => format!(
            "[Can't slice the source file with {},{},{},{}]",
            span.line_start, span.line_end, span.col_start, span.col_end
        ),
    };
    let prefix = format!("{} | ", span.line_start);
    out.push_str(&format!("{}{}{}{}\n", color::WHITE, prefix, line, color::RESET));

    let caret_offset = prefix.chars().count() + span.col_start.saturating_sub(1);
    let caret_len = if span.line_end == span.line_start {
        span.col_end.saturating_sub(span.col_start) + 1
    } else {
        1
    };
    out.push_str(&format!(
        "{}{}{}{}\n",
        " ".repeat(caret_offset),
        color::BRIGHT_RED,
        "^".repeat(caret_len.max(1)),
        color::RESET
    ));
    out
}
