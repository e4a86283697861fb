// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wyrmhold_core::log_envelope::SourceLocation;
use wyrmhold_core::Severity;

fn envelope() -> LogEnvelope {
    LogEnvelope::new(
        chrono::Utc::now(),
        Severity::Error,
        "flush write failed",
        SourceLocation {
            file: "flush_queue.rs".to_string(),
            line: 42,
            member: "run_flush".to_string(),
        },
    )
}

#[test]
fn noop_log_sink_never_panics() {
    NoOpLogSink.emit(&envelope());
}

#[test]
fn console_log_sink_default_width_matches_envelope_default() {
    let sink = ConsoleLogSink::default();
    assert_eq!(sink.width, wyrmhold_core::log_envelope::DEFAULT_WIDTH);
}

#[test]
fn console_log_sink_with_width_overrides_default() {
    let sink = ConsoleLogSink::with_width(40);
    assert_eq!(sink.width, 40);
}
