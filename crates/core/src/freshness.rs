use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

// "2 months" and "6 months", approximated as 30-day months
const YELLOW_THRESHOLD: Duration = Duration::days(60);
const RED_THRESHOLD: Duration = Duration::days(180);

/// Staleness classification of a repository, derived from its last push time.
/// Never stored; always recomputed against a reference time.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Green,
    Yellow,
    Red,
}

impl Freshness {
    pub const fn variants() -> &'static [Self] { &[Self::Green, Self::Yellow, Self::Red] }

    /// Classify by elapsed time since the last update. Boundaries are inclusive
    /// on the fresher side: exactly 60 days is green, exactly 180 days is yellow.
    /// A future timestamp (negative age) classifies as green.
    pub fn classify(last_updated: OffsetDateTime, now: OffsetDateTime) -> Self {
        let age = now - last_updated;
        if age > RED_THRESHOLD {
            Self::Red
        } else if age > YELLOW_THRESHOLD {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("invalid freshness value {0:?} (must be green, yellow, or red)")]
pub struct ParseFreshnessError(pub String);

impl FromStr for Freshness {
    type Err = ParseFreshnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            _ => Err(ParseFreshnessError(s.to_string())),
        }
    }
}

/// Human-readable age of a timestamp relative to `now`.
/// Deliberately calendar-naive: whole days, 30-day months, integer division.
pub fn age(last_updated: OffsetDateTime, now: OffsetDateTime) -> String {
    let days = (now - last_updated).whole_days();
    if days < 1 {
        return "today".to_string();
    }
    if days < 30 {
        return format!("{} ago", pluralize(days, "day"));
    }
    let months = days / 30;
    if months < 12 {
        return format!("{} ago", pluralize(months, "month"));
    }
    let years = months / 12;
    let remaining_months = months % 12;
    if remaining_months == 0 {
        format!("{} ago", pluralize(years, "year"))
    } else {
        format!("{}, {} ago", pluralize(years, "year"), pluralize(remaining_months, "month"))
    }
}

fn pluralize(n: i64, unit: &str) -> String {
    if n == 1 { format!("1 {unit}") } else { format!("{n} {unit}s") }
}
