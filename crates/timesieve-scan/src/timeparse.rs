//! Parsing local times out of strings.

use chrono::format::{ParseResult, Parsed, StrftimeItems, parse};
use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use timesieve_core::CollectError;

/// Parse `input` as a local time according to the strftime `format`.
///
/// Fields the format leaves out default like `strptime`: year 1900, month
/// and day 1, and midnight. `%Y%m` resolves to the first of the month and
/// `%Y%m%d-%H` keeps its hour. Returns seconds since the Unix epoch.
pub fn parse_local_time(input: &str, format: &str) -> Result<f64, CollectError> {
    let time_parse = |source| CollectError::TimeParse {
        input: input.to_string(),
        format: format.to_string(),
        source,
    };

    let mut parsed = Parsed::new();
    parse(&mut parsed, input, StrftimeItems::new(format)).map_err(time_parse)?;

    // `%s` is already absolute.
    if let Some(timestamp) = parsed.timestamp() {
        let nanos = parsed.nanosecond().unwrap_or(0);
        return Ok(timestamp as f64 + f64::from(nanos) / 1e9);
    }

    fill_missing_fields(&mut parsed).map_err(time_parse)?;
    let naive = parsed
        .to_naive_datetime_with_offset(0)
        .map_err(time_parse)?;

    let local = Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| CollectError::AmbiguousLocalTime {
            input: input.to_string(),
        })?;
    Ok(epoch_seconds(&local))
}

/// Default every field the format did not set to 1900-01-01 00:00:00.
///
/// Dates given as ordinal or week numbers keep their own resolution.
fn fill_missing_fields(parsed: &mut Parsed) -> ParseResult<()> {
    let week_date = parsed.isoyear().is_some()
        || parsed.isoyear_mod_100().is_some()
        || parsed.isoweek().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some();

    if !week_date {
        let has_year = parsed.year().is_some()
            || parsed.year_div_100().is_some()
            || parsed.year_mod_100().is_some();
        if !has_year {
            parsed.set_year(1900)?;
        }
        if parsed.ordinal().is_none() {
            if parsed.month().is_none() {
                parsed.set_month(1)?;
            }
            if parsed.day().is_none() {
                parsed.set_day(1)?;
            }
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // %p without an hour
        (Some(_), None) => parsed.set_hour12(12)?,
        // %I without %p is AM
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    Ok(())
}

/// Seconds since the Unix epoch, including the fractional part.
pub fn epoch_seconds<Tz: TimeZone>(time: &DateTime<Tz>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9
}

/// Return the first capture group of `regex` in `input`.
pub fn extract_time_part<'a>(regex: &Regex, input: &'a str) -> Result<&'a str, CollectError> {
    regex
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|group| group.as_str())
        .ok_or_else(|| CollectError::RegexNoMatch {
            pattern: regex.as_str().to_string(),
            input: input.to_string(),
        })
}
