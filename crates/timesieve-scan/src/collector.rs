//! Turning raw input strings into timed items.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{MAIN_SEPARATOR, Path};

use regex::Regex;
use tracing::{debug, trace};

use timesieve_core::{CollectConfig, CollectError, Item, TextItem, TimeSource};

use crate::entry::stat_entry;
use crate::timeparse::{extract_time_part, parse_local_time};

/// Builds [`Item`]s from command line arguments or records read from a stream.
#[derive(Debug, Clone)]
pub struct ItemCollector {
    config: CollectConfig,
    regex: Option<Regex>,
}

impl ItemCollector {
    /// Create a collector, compiling the time regex up front.
    pub fn new(config: CollectConfig) -> Result<Self, CollectError> {
        let regex = config
            .compiled_regex()
            .map_err(|message| CollectError::InvalidRegex {
                pattern: config.time_regex.clone().unwrap_or_default(),
                message,
            })?;
        Ok(Self { config, regex })
    }

    /// Get the collection config.
    pub fn config(&self) -> &CollectConfig {
        &self.config
    }

    /// Build one item per input. The first invalid input aborts collection.
    ///
    /// Paths need not be UTF-8; only the text a time is parsed from must be.
    pub fn collect<I, S>(&self, inputs: I) -> Result<Vec<Item>, CollectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let items = inputs
            .into_iter()
            .map(|input| self.collect_one(input.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = items.len(), source = ?self.config.time_source, "collected items");
        Ok(items)
    }

    /// Build a single item.
    pub fn collect_one(&self, input: &OsStr) -> Result<Item, CollectError> {
        match &self.config.time_source {
            TimeSource::Inode => stat_entry(input, None).map(Item::from),
            TimeSource::Basename(format) => {
                let name = utf8(basename(input), input)?;
                trace!(name, "parsing modification time from basename");
                let modified = self.parse_time(name, format)?;
                stat_entry(input, Some(modified)).map(Item::from)
            }
            TimeSource::Text(format) => {
                let text = utf8(input.as_encoded_bytes(), input)?;
                let modified = self.parse_time(text, format)?;
                Ok(TextItem::new(text, modified).into())
            }
        }
    }

    /// Read records from `reader` until EOF.
    ///
    /// Records are split on the configured separator; empty records are
    /// dropped. Every record must be valid UTF-8.
    pub fn read_records<R: Read>(&self, mut reader: R) -> Result<Vec<String>, CollectError> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|source| CollectError::Read { source })?;

        let records = buf
            .split(|&b| b == self.config.separator.byte())
            .filter(|record| !record.is_empty())
            .enumerate()
            .map(|(index, record)| {
                String::from_utf8(record.to_vec())
                    .map_err(|_| CollectError::InvalidUtf8 { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = records.len(), "read records");
        Ok(records)
    }

    fn parse_time(&self, input: &str, format: &str) -> Result<f64, CollectError> {
        let part = match &self.regex {
            Some(regex) => extract_time_part(regex, input)?,
            None => input,
        };
        let modified = parse_local_time(part, format)?;
        trace!(input, modified, "parsed time");
        Ok(modified)
    }
}

/// Final path component; empty for a trailing separator.
fn basename(path: &OsStr) -> &[u8] {
    let bytes = path.as_encoded_bytes();
    // The separator is ASCII, so splitting never cuts a character.
    bytes
        .rsplit(|&b| b == MAIN_SEPARATOR as u8)
        .next()
        .unwrap_or(bytes)
}

fn utf8<'a>(bytes: &'a [u8], input: &OsStr) -> Result<&'a str, CollectError> {
    std::str::from_utf8(bytes).map_err(|_| CollectError::NonUtf8Text {
        input: Path::new(input).display().to_string(),
    })
}
