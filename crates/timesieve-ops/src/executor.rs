//! Async action execution with progress reporting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{error, info};

use timesieve_core::{EntryKind, FsEntry};

use crate::progress::{ActionComplete, ActionProgress};
use crate::{ACTION_CHANNEL_SIZE, Action, OperationError};

/// Result sent through the channel while an action runs.
#[derive(Debug)]
pub enum ActionResult {
    /// Progress update.
    Progress(ActionProgress),
    /// The action finished for every entry.
    Complete(ActionComplete),
}

/// Start an async action on `entries`.
///
/// Entries are processed one at a time on the blocking pool. A failing entry
/// is recorded and logged; the remaining entries are still processed.
/// Returns a receiver for progress updates and the final result.
pub fn start_action(entries: Vec<FsEntry>, action: Action) -> mpsc::Receiver<ActionResult> {
    let (tx, rx) = mpsc::channel(ACTION_CHANNEL_SIZE);

    tokio::spawn(async move {
        run_action(entries, action, tx).await;
    });

    rx
}

async fn run_action(entries: Vec<FsEntry>, action: Action, tx: mpsc::Sender<ActionResult>) {
    let mut progress = ActionProgress::new(action.kind(), entries.len());
    let mut succeeded = 0;
    let mut failed = 0;

    for entry in entries {
        progress.current = Some(entry.path.clone());
        let _ = tx.send(ActionResult::Progress(progress.clone())).await;

        let path = entry.path.clone();
        let task_action = action.clone();
        let result = tokio::task::spawn_blocking(move || apply(&entry, &task_action))
            .await
            .map_err(|e| format!("Task failed: {e}"));

        match result {
            Ok(Ok(())) => succeeded += 1,
            Ok(Err(message)) | Err(message) => {
                let err = OperationError::new(&path, message);
                error!("{err}");
                progress.errors.push(err);
                failed += 1;
            }
        }
        progress.completed += 1;
    }

    progress.current = None;
    let _ = tx.send(ActionResult::Progress(progress.clone())).await;
    let _ = tx
        .send(ActionResult::Complete(ActionComplete {
            action: action.kind(),
            succeeded,
            failed,
            errors: progress.errors,
        }))
        .await;
}

/// Apply `action` to a single entry.
pub fn apply(entry: &FsEntry, action: &Action) -> Result<(), String> {
    match action {
        Action::Delete { recursive } => delete_entry(entry, *recursive),
        Action::Move { target } => move_entry(entry, target),
    }
}

fn delete_entry(entry: &FsEntry, recursive: bool) -> Result<(), String> {
    info!("Deleting {}: {}", entry.kind, entry.path.display());
    match entry.kind {
        EntryKind::Directory if recursive => fs::remove_dir_all(&entry.path)
            .map_err(|e| format!("Error while recursively deleting: {e}")),
        EntryKind::Directory => {
            fs::remove_dir(&entry.path).map_err(|e| format!("Cannot remove directory: {e}"))
        }
        EntryKind::File | EntryKind::Symlink => {
            fs::remove_file(&entry.path).map_err(|e| format!("Cannot delete: {e}"))
        }
    }
}

fn move_entry(entry: &FsEntry, target: &Path) -> Result<(), String> {
    info!(
        "Moving {} to directory {}: {}",
        entry.kind,
        target.display(),
        entry.path.display()
    );
    let name = entry
        .path
        .file_name()
        .ok_or_else(|| "Path has no file name".to_string())?;
    let dest = target.join(name);

    let source = resolve_parent(&entry.path).map_err(|e| format!("Cannot resolve source: {e}"))?;
    let resolved_target =
        fs::canonicalize(target).map_err(|e| format!("Cannot resolve target: {e}"))?;
    if resolved_target.starts_with(&source) {
        return Err(format!(
            "Cannot move a directory into itself: '{}'",
            dest.display()
        ));
    }

    // lstat so that a dangling symlink also counts as existing.
    if fs::symlink_metadata(&dest).is_ok() {
        return Err(format!("Destination already exists: '{}'", dest.display()));
    }

    // Try rename first (fast path for same filesystem)
    if fs::rename(&entry.path, &dest).is_ok() {
        return Ok(());
    }

    // Fall back to copy + delete for cross-filesystem moves
    match entry.kind {
        EntryKind::Directory => {
            copy_dir_recursive(&entry.path, &dest)
                .map_err(|e| format!("Failed to copy directory: {e}"))?;
            fs::remove_dir_all(&entry.path).map_err(|e| format!("Failed to remove source: {e}"))
        }
        EntryKind::Symlink => {
            copy_symlink(&entry.path, &dest).map_err(|e| format!("Failed to copy link: {e}"))?;
            fs::remove_file(&entry.path).map_err(|e| format!("Failed to remove source: {e}"))
        }
        EntryKind::File => {
            fs::copy(&entry.path, &dest).map_err(|e| format!("Failed to copy: {e}"))?;
            fs::remove_file(&entry.path).map_err(|e| format!("Failed to remove source: {e}"))
        }
    }
}

/// Canonicalize the parent of `path` and rejoin its file name, so that a
/// symlink entry stays the link itself.
fn resolve_parent(path: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(fs::canonicalize(parent)?.join(name))
}

/// Recursively copy a directory, recreating symbolic links as links.
fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir(dest)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            copy_symlink(&path, &dest_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(source)?, dest)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, _dest: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot copy symbolic link '{}'", source.display()),
    ))
}
