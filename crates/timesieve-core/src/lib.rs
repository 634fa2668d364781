//! Core types and traits for timesieve.
//!
//! This crate provides the vocabulary shared by the whole workspace: time
//! units, retention policies, entry ages, the [`TimedEntry`] capability and
//! the concrete item types built from the file system or from strings.

mod age;
mod config;
mod error;
mod item;
mod policy;
mod unit;

pub use age::{AgeRecord, format_age, now_timestamp};
pub use config::{CollectConfig, CollectConfigBuilder, Separator, TimeSource};
pub use error::{AgeError, CollectError, PolicyError, RulesParseError};
pub use item::{EntryKind, FsEntry, Item, TextItem, TimedEntry};
pub use policy::Policy;
pub use unit::TimeUnit;
