//! Action types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// What to do with the selected file system entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Remove entries. Directories must be empty unless `recursive`.
    Delete { recursive: bool },
    /// Move entries into an existing directory, keeping their basenames.
    Move { target: PathBuf },
}

impl Action {
    /// The kind of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Delete { .. } => ActionKind::Delete,
            Action::Move { .. } => ActionKind::Move,
        }
    }
}

/// Action discriminant, used for progress reporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Delete,
    Move,
}

/// Configuration for building an [`Action`].
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ActionConfig {
    /// Which action to run.
    pub kind: ActionKind,

    /// Target directory for [`ActionKind::Move`].
    #[builder(default)]
    #[serde(default)]
    pub target: Option<PathBuf>,

    /// Delete non-empty directories.
    #[builder(default)]
    #[serde(default)]
    pub recursive: bool,
}

impl ActionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let target = self.target.as_ref().and_then(Option::as_ref);
        match self.kind {
            Some(ActionKind::Move) => {
                let Some(target) = target else {
                    return Err("Move requires a target directory".to_string());
                };
                if !target.is_dir() {
                    return Err(format!(
                        "Move target is not a directory: '{}'",
                        target.display()
                    ));
                }
                if self.recursive == Some(true) {
                    return Err("Recursive mode is only allowed with delete".to_string());
                }
            }
            Some(ActionKind::Delete) if target.is_some() => {
                return Err("Delete does not take a target directory".to_string());
            }
            _ => {}
        }
        Ok(())
    }
}

impl ActionConfig {
    /// Create a new config builder.
    pub fn builder() -> ActionConfigBuilder {
        ActionConfigBuilder::default()
    }

    /// The action described by this config.
    ///
    /// Returns `None` for a move without a target, which a config read
    /// through serde can hold since it skips the builder validation.
    pub fn action(&self) -> Option<Action> {
        match (self.kind, &self.target) {
            (ActionKind::Move, Some(target)) => Some(Action::Move {
                target: target.clone(),
            }),
            (ActionKind::Move, None) => None,
            (ActionKind::Delete, _) => Some(Action::Delete {
                recursive: self.recursive,
            }),
        }
    }
}

/// An error that occurred while acting on one entry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{path}: {message}")]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_delete_config() {
        let config = ActionConfig::builder()
            .kind(ActionKind::Delete)
            .recursive(true)
            .build()
            .unwrap();
        assert_eq!(config.action(), Some(Action::Delete { recursive: true }));
        assert_eq!(config.action().map(|a| a.kind()), Some(ActionKind::Delete));
    }

    #[test]
    fn test_move_config() {
        let temp = TempDir::new().unwrap();
        let config = ActionConfig::builder()
            .kind(ActionKind::Move)
            .target(Some(temp.path().to_path_buf()))
            .build()
            .unwrap();
        assert_eq!(
            config.action(),
            Some(Action::Move {
                target: temp.path().to_path_buf()
            })
        );
    }

    #[test]
    fn test_move_without_target_has_no_action() {
        let config: ActionConfig = serde_json::from_str(r#"{"kind": "move"}"#).unwrap();
        assert_eq!(config.target, None);
        assert_eq!(config.action(), None);

        let config = ActionConfig {
            kind: ActionKind::Move,
            target: None,
            recursive: true,
        };
        assert_eq!(config.action(), None);
    }

    #[test]
    fn test_move_config_validation() {
        let missing_target = ActionConfig::builder().kind(ActionKind::Move).build();
        assert!(missing_target.is_err());

        let temp = TempDir::new().unwrap();
        let not_a_dir = ActionConfig::builder()
            .kind(ActionKind::Move)
            .target(Some(temp.path().join("missing")))
            .build();
        assert!(
            not_a_dir
                .unwrap_err()
                .to_string()
                .contains("not a directory")
        );

        let recursive_move = ActionConfig::builder()
            .kind(ActionKind::Move)
            .target(Some(temp.path().to_path_buf()))
            .recursive(true)
            .build();
        assert!(recursive_move.is_err());
    }

    #[test]
    fn test_action_kind_strings() {
        assert_eq!(ActionKind::Move.to_string(), "move");
        assert_eq!("delete".parse::<ActionKind>().unwrap(), ActionKind::Delete);
    }

    #[test]
    fn test_operation_error_display() {
        let err = OperationError::new("/srv/a", "Directory not empty");
        assert_eq!(err.to_string(), "/srv/a: Directory not empty");
    }
}
