//! Actions on classified file system entries.
//!
//! Entries selected by the classifier can be deleted or moved into a target
//! directory. Actions run asynchronously on the blocking pool and report
//! progress via a channel, one entry at a time.
//!
//! ```rust,no_run
//! use timesieve_ops::{Action, ActionResult, start_action};
//! # use timesieve_core::FsEntry;
//!
//! # async fn run(entries: Vec<FsEntry>) {
//! let mut rx = start_action(entries, Action::Delete { recursive: false });
//! while let Some(result) = rx.recv().await {
//!     if let ActionResult::Complete(complete) = result {
//!         println!("{}", complete.summary());
//!     }
//! }
//! # }
//! ```

mod executor;
mod operation;
mod progress;

pub use executor::{ActionResult, apply, start_action};
pub use operation::{Action, ActionConfig, ActionConfigBuilder, ActionKind, OperationError};
pub use progress::{ActionComplete, ActionProgress};

/// Default channel buffer size for action progress updates.
pub const ACTION_CHANNEL_SIZE: usize = 100;
