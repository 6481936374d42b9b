//! Operator-facing diagnostics emitted by the comparator.
//!
//! The comparator never logs through a global; it is handed a
//! [`Diagnostics`] implementation. Production code uses
//! [`TracingDiagnostics`], tests use [`RecordingDiagnostics`] to assert on
//! exactly what an operator would see.

use std::sync::Mutex;

use crate::schema::{EVENT_COMPARING_KEY, EVENT_REGENERATE_HINT};

/// Sink for comparator diagnostics.
pub trait Diagnostics: Send + Sync {
    /// Emitted before a check asserts: how to regenerate the baseline if the
    /// check fails.
    fn regenerate_hint(&self, check: &str, hint: &str);

    /// Emitted before each shared key is compared.
    fn comparing_key(&self, key: &str);
}

/// Sends diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn regenerate_hint(&self, check: &str, hint: &str) {
        tracing::error!(
            component = module_path!(),
            event = EVENT_REGENERATE_HINT,
            check = check,
            "If {} fails, regenerate the baseline with: {}",
            check,
            hint
        );
    }

    fn comparing_key(&self, key: &str) {
        tracing::debug!(
            component = module_path!(),
            event = EVENT_COMPARING_KEY,
            key = key,
            "comparing shared key"
        );
    }
}

/// Discards every diagnostic. Used when a comparison only feeds a report.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn regenerate_hint(&self, _check: &str, _hint: &str) {}

    fn comparing_key(&self, _key: &str) {}
}

/// A diagnostic as recorded by [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    RegenerateHint { check: String, hint: String },
    ComparingKey { key: String },
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Keys reported via `comparing_key`, in order.
    pub fn compared_keys(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DiagnosticEvent::ComparingKey { key } => Some(key),
                DiagnosticEvent::RegenerateHint { .. } => None,
            })
            .collect()
    }

    fn push(&self, event: DiagnosticEvent) {
        self.events.lock().map(|mut e| e.push(event)).ok();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn regenerate_hint(&self, check: &str, hint: &str) {
        self.push(DiagnosticEvent::RegenerateHint {
            check: check.to_string(),
            hint: hint.to_string(),
        });
    }

    fn comparing_key(&self, key: &str) {
        self.push(DiagnosticEvent::ComparingKey {
            key: key.to_string(),
        });
    }
}
