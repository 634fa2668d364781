//! Progress reporting types for actions.

use std::path::PathBuf;

use serde::Serialize;

use crate::{ActionKind, OperationError};

/// Progress information for an ongoing action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionProgress {
    /// The kind of action.
    pub action: ActionKind,
    /// Number of entries processed, successfully or not.
    pub completed: usize,
    /// Total number of entries to process.
    pub total: usize,
    /// The entry currently being processed.
    pub current: Option<PathBuf>,
    /// Errors encountered so far.
    pub errors: Vec<OperationError>,
}

impl ActionProgress {
    /// Create a new progress tracker.
    pub fn new(action: ActionKind, total: usize) -> Self {
        Self {
            action,
            completed: 0,
            total,
            current: None,
            errors: Vec::new(),
        }
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.completed as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Check if the action has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of a finished action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionComplete {
    /// The kind of action.
    pub action: ActionKind,
    /// Number of entries successfully processed.
    pub succeeded: usize,
    /// Number of entries that failed.
    pub failed: usize,
    /// Errors that occurred.
    pub errors: Vec<OperationError>,
}

impl ActionComplete {
    /// Check if the action was fully successful.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        let verb = match self.action {
            ActionKind::Delete => "Deleted",
            ActionKind::Move => "Moved",
        };

        if self.failed == 0 {
            format!("{verb} {} items", self.succeeded)
        } else {
            format!("{verb} {} items, {} failed", self.succeeded, self.failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut progress = ActionProgress::new(ActionKind::Delete, 4);
        assert_eq!(progress.percentage(), 0.0);
        progress.completed = 1;
        assert_eq!(progress.percentage(), 25.0);
        assert_eq!(ActionProgress::new(ActionKind::Move, 0).percentage(), 0.0);
    }

    #[test]
    fn test_summary() {
        let complete = ActionComplete {
            action: ActionKind::Move,
            succeeded: 3,
            failed: 1,
            errors: vec![OperationError::new("/a", "exists")],
        };
        assert!(!complete.is_success());
        assert_eq!(complete.summary(), "Moved 3 items, 1 failed");
    }
}
