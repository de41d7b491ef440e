//! At most one AI operation per editor session
//!
//! [`ProcessingGate::begin`] hands out a [`ProcessingTicket`] while the gate
//! is idle and refuses with [`EditorError::Busy`] otherwise. Dropping the
//! ticket reopens the gate, so every exit path (success, error or a dropped
//! future) releases it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{EditorError, Result};

/// Shared processing flag with a human-readable label
#[derive(Clone, Debug, Default)]
pub struct ProcessingGate {
    label: Arc<Mutex<Option<String>>>,
}

impl ProcessingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the processing state
    pub fn begin(&self, label: impl Into<String>) -> Result<ProcessingTicket> {
        let mut current = self.label.lock();
        if let Some(active) = current.as_ref() {
            return Err(EditorError::Busy(active.clone()));
        }
        let label = label.into();
        tracing::debug!("Processing: {}", label);
        *current = Some(label);
        Ok(ProcessingTicket {
            label: Arc::clone(&self.label),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.label.lock().is_some()
    }

    /// Label of the operation in flight
    pub fn label(&self) -> Option<String> {
        self.label.lock().clone()
    }
}

/// Proof of holding the gate; releases it on drop
#[derive(Debug)]
pub struct ProcessingTicket {
    label: Arc<Mutex<Option<String>>>,
}

impl ProcessingTicket {
    /// Update the label between steps of a multi-step operation
    pub fn relabel(&self, label: impl Into<String>) {
        let label = label.into();
        tracing::debug!("Processing: {}", label);
        *self.label.lock() = Some(label);
    }
}

impl Drop for ProcessingTicket {
    fn drop(&mut self) {
        *self.label.lock() = None;
    }
}
