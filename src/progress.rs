//! Operation progress reporting
//!
//! A synchronous state machine that export and import walk through while
//! they run. Observers receive a [`ProgressEvent`] for every accepted
//! transition. Nothing in the orchestrators reads the state back, so a
//! rejected transition is logged and otherwise ignored.
//!
//! ```text
//! export: idle -> reading -> validating -> encrypting -> writing -> completed
//! import: idle -> reading -> decrypting -> validating -> writing -> completed
//! any non-idle state -> error
//! any state -> idle (cancel)
//! completed | error -> idle (reset)
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Phase of an export or import
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Idle,
    Reading,
    Decrypting,
    Validating,
    Encrypting,
    Writing,
    Completed,
    Error,
}

impl OperationStatus {
    /// Check if this status ends an operation
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Whether `next` may directly follow this status
    pub fn can_transition_to(self, next: OperationStatus) -> bool {
        match (self, next) {
            (Self::Idle, Self::Error) => false,
            (Self::Completed | Self::Error, _) => false,
            (_, Self::Error) => true,
            (Self::Idle, Self::Completed) => false,
            // Forward along the pipeline; intermediate phases may be skipped
            (current, next) => next > current,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Decrypting => "decrypting",
            Self::Validating => "validating",
            Self::Encrypting => "encrypting",
            Self::Writing => "writing",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// One notification sent to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub status: OperationStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A transition the state machine refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid progress transition from {from} to {to}")]
pub struct ProgressError {
    pub from: OperationStatus,
    pub to: OperationStatus,
}

type Observer = Box<dyn FnMut(&ProgressEvent)>;

/// Observable state machine for one operation at a time
pub struct ProgressReporter {
    status: OperationStatus,
    observers: Vec<Observer>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("status", &self.status)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            status: OperationStatus::Idle,
            observers: Vec::new(),
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// Register an observer called on every accepted transition and note
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&ProgressEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Move to `next`, notifying observers
    pub fn transition(
        &mut self,
        next: OperationStatus,
        message: impl Into<String>,
    ) -> Result<(), ProgressError> {
        self.apply(next, message.into(), None)
    }

    /// Move to the error state with a detail string
    pub fn fail(
        &mut self,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<(), ProgressError> {
        self.apply(OperationStatus::Error, message.into(), Some(detail.into()))
    }

    /// Emit a message without changing state
    pub fn note(&mut self, message: impl Into<String>) {
        let event = ProgressEvent {
            status: self.status,
            message: message.into(),
            error: None,
        };
        self.emit(&event);
    }

    /// Abandon the current operation at the user's request
    ///
    /// Goes straight back to idle and tells observers why, with no error
    /// detail, so a cancel is never mistaken for a failure.
    pub fn cancel(&mut self, message: impl Into<String>) {
        self.status = OperationStatus::Idle;
        let event = ProgressEvent {
            status: OperationStatus::Idle,
            message: message.into(),
            error: None,
        };
        self.emit(&event);
    }

    /// Return to idle after an operation ended
    pub fn reset(&mut self) -> Result<(), ProgressError> {
        if self.status == OperationStatus::Idle {
            return Ok(());
        }
        if !self.status.is_terminal() {
            return Err(ProgressError {
                from: self.status,
                to: OperationStatus::Idle,
            });
        }

        self.status = OperationStatus::Idle;
        let event = ProgressEvent {
            status: OperationStatus::Idle,
            message: String::new(),
            error: None,
        };
        self.emit(&event);
        Ok(())
    }

    fn apply(
        &mut self,
        next: OperationStatus,
        message: String,
        error: Option<String>,
    ) -> Result<(), ProgressError> {
        if !self.status.can_transition_to(next) {
            return Err(ProgressError {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        let event = ProgressEvent {
            status: next,
            message,
            error,
        };
        self.emit(&event);
        Ok(())
    }

    fn emit(&mut self, event: &ProgressEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }
}
