//! Timeframe resolution: abstract calendar granularity plus partial date
//! fields to an absolute `[start, end]` window.
//!
//! All range math runs on the UTC calendar so a resolved range never depends
//! on the host timezone.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use matchcast_core::error::{MatchcastError, Result};
use matchcast_core::types::{day_end, day_start, TimeRange};
use serde::{Deserialize, Serialize};

/// Named calendar granularity used to bound a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::Quarterly => "quarterly",
            Timeframe::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = MatchcastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            "quarterly" => Ok(Timeframe::Quarterly),
            "yearly" => Ok(Timeframe::Yearly),
            other => Err(MatchcastError::InvalidTimeframe(format!(
                "unknown timeframe '{other}'"
            ))),
        }
    }
}

/// Optional date component overrides. Omitted year/month/date default to the
/// current instant's components; week/quarter default to no override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeParams {
    pub year: Option<i32>,
    /// Month name ("March"), 3-letter abbreviation ("mar") or 1-12 numeral.
    pub month: Option<String>,
    pub week: Option<u32>,
    pub date: Option<u32>,
    pub quarter: Option<u32>,
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Parse a month field to its 1-12 number, case-insensitively. An unparsable
/// month is fatal to the whole calendar request.
pub fn parse_month(input: &str) -> Result<u32> {
    let needle = input.trim().to_lowercase();
    if let Ok(n) = needle.parse::<u32>() {
        if (1..=12).contains(&n) {
            return Ok(n);
        }
        return Err(MatchcastError::InvalidTimeframe(format!(
            "month number out of range: {n}"
        )));
    }
    if needle.len() >= 3
        && let Some(index) = MONTHS.iter().position(|m| m.starts_with(&needle))
    {
        return Ok(index as u32 + 1);
    }
    Err(MatchcastError::InvalidTimeframe(format!(
        "unparsable month '{input}'"
    )))
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        MatchcastError::InvalidTimeframe(format!("invalid calendar date {year}-{month}-{day}"))
    })
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let first_of_next = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    first_of_next.pred_opt().ok_or_else(|| {
        MatchcastError::InvalidTimeframe(format!("invalid calendar month {year}-{month}"))
    })
}

fn range(start: NaiveDate, end: NaiveDate) -> TimeRange {
    TimeRange { start: day_start(start), end: day_end(end) }
}

/// Resolve a timeframe against the current instant.
pub fn resolve(timeframe: Timeframe, params: &RangeParams) -> Result<TimeRange> {
    resolve_at(timeframe, params, Utc::now().date_naive())
}

/// Resolve against an explicit "today". With explicit params the result never
/// consults `today`, so repeated resolution is idempotent.
pub fn resolve_at(timeframe: Timeframe, params: &RangeParams, today: NaiveDate) -> Result<TimeRange> {
    let year = params.year.unwrap_or_else(|| today.year());
    let month = match &params.month {
        Some(m) => parse_month(m)?,
        None => today.month(),
    };
    let day = params.date.unwrap_or_else(|| today.day());

    match timeframe {
        Timeframe::Daily => {
            let date = ymd(year, month, day)?;
            Ok(range(date, date))
        }
        Timeframe::Weekly => {
            if let Some(week) = params.week {
                // Week N is anchored off the 1st of the month: shift by
                // (N-1)*7 minus the 1st's weekday offset, so the window can
                // start in the previous month when day 1 falls mid-week.
                let first = ymd(year, month, 1)?;
                let offset =
                    (week as i64 - 1) * 7 - first.weekday().num_days_from_sunday() as i64 + 1;
                let anchor = first + Duration::days(offset);
                Ok(range(anchor, anchor + Duration::days(6)))
            } else {
                // Monday–Sunday week containing "today"; year/month overrides
                // are ignored in this branch.
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                Ok(range(monday, monday + Duration::days(6)))
            }
        }
        Timeframe::Monthly => Ok(range(ymd(year, month, 1)?, last_day_of_month(year, month)?)),
        Timeframe::Yearly => Ok(range(ymd(year, 1, 1)?, ymd(year, 12, 31)?)),
        Timeframe::Quarterly => {
            let quarter = params.quarter.ok_or_else(|| {
                MatchcastError::InvalidTimeframe("quarterly requires a quarter (1-4)".into())
            })?;
            if !(1..=4).contains(&quarter) {
                return Err(MatchcastError::InvalidTimeframe(format!(
                    "quarter out of range: {quarter}"
                )));
            }
            let start = ymd(year, (quarter - 1) * 3 + 1, 1)?;
            let end = last_day_of_month(year, quarter * 3)?;
            Ok(range(start, end))
        }
    }
}
