// Dispatch Events
// Progress reporting for engines dispatching combinations

use crate::matrix::Combination;

use std::time::Duration;
use tokio::sync::mpsc;

/// Sender for dispatch progress events
pub type ProgressSender = mpsc::UnboundedSender<DispatchEvent>;

/// Receiver for dispatch progress events
pub type ProgressReceiver = mpsc::UnboundedReceiver<DispatchEvent>;

/// Create a new progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Events emitted while an engine dispatches combinations
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    /// Dispatch started
    RunStarted { target: String, total: usize },

    /// A single invocation started
    CombinationStarted {
        index: usize,
        combination: Combination,
    },

    /// A single invocation returned successfully
    CombinationCompleted { index: usize, duration: Duration },

    /// A single invocation failed; no further combinations are dispatched
    CombinationFailed { index: usize, duration: Duration },

    /// Dispatch finished
    RunCompleted {
        target: String,
        completed: usize,
        success: bool,
        duration: Duration,
    },
}

impl DispatchEvent {
    /// Create a run started event
    pub fn run_started(target: impl Into<String>, total: usize) -> Self {
        Self::RunStarted {
            target: target.into(),
            total,
        }
    }

    /// Create a combination started event
    pub fn combination_started(index: usize, combination: &Combination) -> Self {
        Self::CombinationStarted {
            index,
            combination: combination.clone(),
        }
    }

    /// Create a combination finished event
    pub fn combination_finished(index: usize, success: bool, duration: Duration) -> Self {
        if success {
            Self::CombinationCompleted { index, duration }
        } else {
            Self::CombinationFailed { index, duration }
        }
    }

    /// Create a run completed event
    pub fn run_completed(
        target: impl Into<String>,
        completed: usize,
        success: bool,
        duration: Duration,
    ) -> Self {
        Self::RunCompleted {
            target: target.into(),
            completed,
            success,
            duration,
        }
    }

    /// Check if this is a terminal event (run finished)
    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchEvent::RunCompleted { .. })
    }

    /// Index of the combination this event refers to, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            DispatchEvent::CombinationStarted { index, .. }
            | DispatchEvent::CombinationCompleted { index, .. }
            | DispatchEvent::CombinationFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Helper trait for sending events, ignoring errors (fire-and-forget)
pub trait EventSender {
    fn send_event(&self, event: DispatchEvent);
}

impl EventSender for ProgressSender {
    fn send_event(&self, event: DispatchEvent) {
        let _ = self.send(event);
    }
}

impl EventSender for Option<ProgressSender> {
    fn send_event(&self, event: DispatchEvent) {
        if let Some(sender) = self {
            let _ = sender.send(event);
        }
    }
}
