//! Item collection configuration types.

use derive_builder::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Where the timestamp of an item comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "format", rename_all = "lowercase")]
pub enum TimeSource {
    /// Modification time from the inode (lstat).
    #[default]
    Inode,
    /// Items are paths; parse the time from the basename with this format.
    Basename(String),
    /// Items are plain strings; parse the time with this format.
    Text(String),
}

impl TimeSource {
    /// The strftime format, if the time is parsed from a string.
    pub fn format(&self) -> Option<&str> {
        match self {
            TimeSource::Inode => None,
            TimeSource::Basename(fmt) | TimeSource::Text(fmt) => Some(fmt),
        }
    }

    /// Items are not interpreted as paths.
    pub fn is_text(&self) -> bool {
        matches!(self, TimeSource::Text(_))
    }
}

/// Item separator for stdin input and for output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Newline,
    Nul,
}

impl Separator {
    /// The separator byte.
    pub fn byte(self) -> u8 {
        match self {
            Separator::Newline => b'\n',
            Separator::Nul => b'\0',
        }
    }
}

/// Configuration for turning user input into items.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CollectConfig {
    /// Where item timestamps come from.
    #[builder(default)]
    #[serde(default)]
    pub time_source: TimeSource,

    /// Regex whose single capture group extracts the time part of a string.
    #[builder(default)]
    #[serde(default)]
    pub time_regex: Option<String>,

    /// Separator between items read from a stream.
    #[builder(default)]
    #[serde(default)]
    pub separator: Separator,
}

impl CollectConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(fmt) = self.time_source.as_ref().and_then(TimeSource::format) {
            if fmt.is_empty() {
                return Err("Time format cannot be empty".to_string());
            }
        }

        if let Some(Some(pattern)) = &self.time_regex {
            if self.time_source.as_ref().and_then(TimeSource::format).is_none() {
                return Err(
                    "A time regex requires the time to be parsed from the basename or string"
                        .to_string(),
                );
            }
            compile_time_regex(pattern)?;
        }
        Ok(())
    }
}

impl CollectConfig {
    /// Create a new config builder.
    pub fn builder() -> CollectConfigBuilder {
        CollectConfigBuilder::default()
    }

    /// Compile the time regex, if any.
    pub fn compiled_regex(&self) -> Result<Option<Regex>, String> {
        self.time_regex
            .as_deref()
            .map(compile_time_regex)
            .transpose()
    }
}

/// Compile a time regex and check it has exactly one capture group.
fn compile_time_regex(pattern: &str) -> Result<Regex, String> {
    let regex = Regex::new(pattern).map_err(|e| format!("Invalid time regex '{pattern}': {e}"))?;
    // Group 0 is the whole match.
    if regex.captures_len() != 2 {
        return Err(format!(
            "Time regex '{pattern}' must have exactly one capturing group"
        ));
    }
    Ok(regex)
}
