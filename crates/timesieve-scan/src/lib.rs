//! Item collection for timesieve.
//!
//! Items are either file system entries, validated with lstat, or plain
//! strings. Their timestamps come from the inode or are parsed out of the
//! basename or string with a strftime format, optionally after extracting
//! the time part with a regex.
//!
//! ```rust
//! use timesieve_scan::{CollectConfig, ItemCollector, TimeSource};
//!
//! let config = CollectConfig::builder()
//!     .time_source(TimeSource::Text("%Y-%m-%d".to_string()))
//!     .build()
//!     .unwrap();
//! let collector = ItemCollector::new(config).unwrap();
//!
//! let items = collector.collect(["2024-01-01", "2024-02-01"]).unwrap();
//! assert_eq!(items.len(), 2);
//! ```

mod collector;
mod entry;
mod timeparse;

pub use collector::ItemCollector;
pub use entry::{stat_entry, system_time_to_secs};
pub use timeparse::{epoch_seconds, extract_time_part, parse_local_time};

// Re-export core types for convenience
pub use timesieve_core::{
    CollectConfig, CollectConfigBuilder, CollectError, EntryKind, FsEntry, Item, Separator,
    TextItem, TimeSource,
};
