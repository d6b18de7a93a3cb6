//! Timestamp conversion at the database boundary.
//!
//! Every `trade_time` column holds an RFC-3339 UTC string with millisecond
//! precision, so lexical order equals time order.

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};

/// RFC-3339 with any offset -> UTC.
pub fn parse_ts_to_utc(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(s).with_context(|| format!("bad rfc3339: {s}"))?;
    Ok(dt.with_timezone(&Utc))
}

/// Formats a UTC datetime as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn to_rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
