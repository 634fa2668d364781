//! Timed items: the things that get classified.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;

/// Anything carrying a last-modified timestamp.
///
/// The timestamp is expressed in seconds since the Unix epoch and may be
/// fractional.
pub trait TimedEntry {
    /// Last-modified time in seconds since the Unix epoch.
    fn timestamp(&self) -> f64;
}

impl<T: TimedEntry + ?Sized> TimedEntry for &T {
    fn timestamp(&self) -> f64 {
        (**self).timestamp()
    }
}

impl<T: TimedEntry + ?Sized> TimedEntry for Box<T> {
    fn timestamp(&self) -> f64 {
        (**self).timestamp()
    }
}

/// Type of a file system entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    #[strum(serialize = "dir")]
    Directory,
    /// Symbolic link (never followed).
    Symlink,
}

/// A validated file system entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsEntry {
    /// Path exactly as given by the user.
    pub path: PathBuf,
    /// Entry type as reported by lstat.
    pub kind: EntryKind,
    /// Modification time, seconds since epoch.
    pub modified: f64,
}

impl FsEntry {
    /// Create a new entry.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, modified: f64) -> Self {
        Self {
            path: path.into(),
            kind,
            modified,
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl TimedEntry for FsEntry {
    fn timestamp(&self) -> f64 {
        self.modified
    }
}

/// A plain string with a timestamp parsed out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub modified: f64,
}

impl TextItem {
    /// Create a new text item.
    pub fn new(text: impl Into<String>, modified: f64) -> Self {
        Self {
            text: text.into(),
            modified,
        }
    }
}

impl TimedEntry for TextItem {
    fn timestamp(&self) -> f64 {
        self.modified
    }
}

/// An item collected from the command line or stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    /// Interpreted as a path.
    Fs(FsEntry),
    /// Interpreted as a string.
    Text(TextItem),
}

impl Item {
    /// The text to print for this item: the path or the original string.
    pub fn label(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Item::Fs(entry) => entry.path.to_string_lossy(),
            Item::Text(item) => std::borrow::Cow::Borrowed(item.text.as_str()),
        }
    }

    /// The path of a file system item.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Item::Fs(entry) => Some(&entry.path),
            Item::Text(_) => None,
        }
    }

    /// Get the file system entry, if this is one.
    pub fn as_fs(&self) -> Option<&FsEntry> {
        match self {
            Item::Fs(entry) => Some(entry),
            Item::Text(_) => None,
        }
    }
}

impl TimedEntry for Item {
    fn timestamp(&self) -> f64 {
        match self {
            Item::Fs(entry) => entry.timestamp(),
            Item::Text(item) => item.timestamp(),
        }
    }
}

impl From<FsEntry> for Item {
    fn from(entry: FsEntry) -> Self {
        Item::Fs(entry)
    }
}

impl From<TextItem> for Item {
    fn from(item: TextItem) -> Self {
        Item::Text(item)
    }
}
