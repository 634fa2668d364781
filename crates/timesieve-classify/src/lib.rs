//! Retention classification for timesieve.
//!
//! Given a [`Policy`] such as "keep one entry for each of the last 12 hours,
//! 5 days and 4 weeks", the [`RetentionClassifier`] splits a batch of timed
//! entries into the ones to keep (accepted) and the ones to discard
//! (rejected).
//!
//! # Algorithm
//!
//! 1. Compute every entry's age in hours, days, weeks, months and years
//! 2. Entries younger than one hour go to the `recent` group
//! 3. Other entries go to the youngest unit whose bucket index is requested
//!    by the policy, e.g. a 9 day old entry lands in `(days, 9)` when at
//!    least 9 days are kept, otherwise in `(weeks, 1)` when weeks are kept
//! 4. The newest entry of every bucket, and the newest `recent` entries, are
//!    accepted; everything else is rejected
//!
//! ```rust
//! use timesieve_classify::{Policy, RetentionClassifier, TextItem};
//!
//! let now = 1_700_000_000.0;
//! let policy: Policy = "days10,weeks2".parse().unwrap();
//! let classifier = RetentionClassifier::new(policy, now);
//!
//! let items: Vec<TextItem> = (1..=15)
//!     .map(|d| TextItem::new(format!("day-{d}"), now - (d as f64) * 86_400.0 - 1.0))
//!     .collect();
//!
//! let result = classifier.classify(items).unwrap();
//! assert_eq!(result.accepted.len(), 12);
//! assert_eq!(result.rejected.len(), 3);
//! ```

mod classifier;

pub use classifier::{
    Classification, ClassifierConfig, ClassifierConfigBuilder, Placement, Rejected,
    RetentionClassifier,
};

// Re-export core types
pub use timesieve_core::{
    AgeError, AgeRecord, FsEntry, Item, Policy, PolicyError, TextItem, TimeUnit, TimedEntry,
};
