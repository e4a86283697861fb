// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded log envelope.
//!
//! A structured record with a depth-capped exception chain, rendered as a
//! pure function into a fixed-width, word-wrapped box. Included because the
//! daemon calls it on error paths; any equivalent structured logger could
//! stand in for it — see `wyrmhold-adapters::console` for the one wire-up
//! this crate actually uses.

use chrono::{DateTime, Utc};

/// Maximum depth of the `cause` chain `render()` will walk.
pub const MAX_EXCEPTION_DEPTH: usize = 10;

/// Default wrap width used by [`LogEnvelope::render`].
pub const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// Source file/line/member the record was emitted from.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub member: String,
}

/// One link in the exception chain: a message plus an optional cause.
#[derive(Debug, Clone)]
pub struct ExceptionInfo {
    pub message: String,
    pub cause: Option<Box<ExceptionInfo>>,
}

impl ExceptionInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn caused_by(mut self, cause: ExceptionInfo) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// A single structured log record.
#[derive(Debug, Clone)]
pub struct LogEnvelope {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
    pub exception: Option<ExceptionInfo>,
    pub source: SourceLocation,
}

impl LogEnvelope {
    pub fn new(
        timestamp: DateTime<Utc>,
        severity: Severity,
        message: impl Into<String>,
        source: SourceLocation,
    ) -> Self {
        Self {
            timestamp,
            severity,
            message: message.into(),
            exception: None,
            source,
        }
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Render this record as a fixed-width, word-wrapped box. Pure function
    /// of the record's fields (and `width`) — no I/O, no clock reads.
    pub fn render(&self, width: usize) -> String {
        let inner_width = width.saturating_sub(4).max(1); // "| " + " |"
        let mut lines = Vec::new();

        let header = format!(
            "{} [{}] {}:{} ({})",
            self.timestamp.to_rfc3339(),
            self.severity.label(),
            self.source.file,
            self.source.line,
            self.source.member
        );
        lines.extend(wrap(&header, inner_width));
        lines.extend(wrap(&self.message, inner_width));

        if let Some(exception) = &self.exception {
            lines.push("cause chain:".to_string());
            let mut current = Some(exception);
            let mut depth = 0;
            while let Some(exc) = current {
                if depth >= MAX_EXCEPTION_DEPTH {
                    lines.push(format!("... truncated at depth {}", MAX_EXCEPTION_DEPTH));
                    break;
                }
                lines.extend(wrap(&format!("{}: {}", depth, exc.message), inner_width));
                current = exc.cause.as_deref();
                depth += 1;
            }
        }

        render_box(&lines, width)
    }
}

/// Greedy word-wrap: never splits a word, always keeps each line within
/// `width` unless a single word alone exceeds it (then the word stands
/// alone on its own, overflowing, line).
fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn render_box(lines: &[String], width: usize) -> String {
    let border = format!("+{}+", "-".repeat(width.saturating_sub(2).max(1)));
    let mut out = String::with_capacity(border.len() * 2 + lines.len() * width);

    out.push_str(&border);
    out.push('\n');
    for line in lines {
        let content_width = width.saturating_sub(4).max(1);
        out.push_str(&format!("| {:<width$} |\n", line, width = content_width));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
#[path = "log_envelope_tests.rs"]
mod tests;
