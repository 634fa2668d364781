//! lstat-based file system entry validation.

use std::fs::{self, Metadata};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use timesieve_core::{CollectError, EntryKind, FsEntry};

/// Validate `path` and build an [`FsEntry`] from it.
///
/// Symbolic links are not followed: a link is an entry of its own, with its
/// own modification time. The modification time is taken from the inode
/// unless `modified` overrides it.
pub fn stat_entry(path: impl AsRef<Path>, modified: Option<f64>) -> Result<FsEntry, CollectError> {
    let path = path.as_ref();
    let metadata = fs::symlink_metadata(path).map_err(|e| CollectError::io(path, e))?;

    let kind = entry_kind(&metadata).ok_or_else(|| CollectError::UnsupportedType {
        path: path.to_path_buf(),
    })?;

    let modified = match modified {
        Some(ts) => ts,
        None => {
            let mtime = metadata.modified().map_err(|e| CollectError::io(path, e))?;
            system_time_to_secs(mtime)
        }
    };

    Ok(FsEntry::new(path, kind, modified))
}

/// Map lstat metadata to an entry kind. Sockets, FIFOs and devices have none.
fn entry_kind(metadata: &Metadata) -> Option<EntryKind> {
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        Some(EntryKind::Symlink)
    } else if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else if file_type.is_file() {
        Some(EntryKind::File)
    } else {
        None
    }
}

/// Seconds since the Unix epoch, negative before it.
pub fn system_time_to_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}
