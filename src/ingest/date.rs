// src/ingest/date.rs
//! `DD/MM/YYYY` sheet dates to sortable timestamps.
//!
//! Every failure path yields `0`, so undated rows sink to the bottom of a
//! newest-first sort instead of breaking it.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Parse `DD/MM/YYYY` into epoch milliseconds at local midnight.
///
/// - empty input → `0`
/// - any part count other than three → `0`, silently
/// - non-numeric parts or an impossible calendar date → `0`, logged at debug
/// - years are taken as written: `23` is year 23, not 1923
pub fn parse_date_to_timestamp(date_text: &str) -> i64 {
    if date_text.is_empty() {
        return 0;
    }
    let parts: Vec<&str> = date_text.split('/').collect();
    if parts.len() != 3 {
        return 0;
    }
    match local_midnight_ms(parts[0], parts[1], parts[2]) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::debug!(date = date_text, error = %e, "date parse error");
            0
        }
    }
}

fn local_midnight_ms(day: &str, month: &str, year: &str) -> Result<i64> {
    let day: u32 = day.trim().parse().context("day")?;
    let month: u32 = month.trim().parse().context("month")?;
    let year: i32 = year.trim().parse().context("year")?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("no such calendar date {day}/{month}/{year}"))?;
    let midnight = date.and_time(NaiveTime::MIN);

    let local = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight skipped by a DST jump; the first valid instant is an hour on.
        LocalResult::None => Local
            .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
            .earliest()
            .ok_or_else(|| anyhow!("unrepresentable local time for {date}"))?,
    };
    Ok(local.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(y: i32, m: u32, d: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn well_formed_dates_hit_local_midnight() {
        assert_eq!(parse_date_to_timestamp("01/02/2023"), expected(2023, 2, 1));
        assert_eq!(parse_date_to_timestamp("31/12/1999"), expected(1999, 12, 31));
    }

    #[test]
    fn later_dates_sort_higher() {
        let dates = ["28/02/2023", "01/03/2023", "02/03/2023", "01/01/2024"];
        let ts: Vec<i64> = dates.iter().map(|d| parse_date_to_timestamp(d)).collect();
        assert!(ts.windows(2).all(|w| w[0] < w[1]), "{ts:?}");
    }

    #[test]
    fn empty_and_wrong_shape_are_zero() {
        assert_eq!(parse_date_to_timestamp(""), 0);
        assert_eq!(parse_date_to_timestamp("2023-02-01"), 0);
        assert_eq!(parse_date_to_timestamp("01/02"), 0);
        assert_eq!(parse_date_to_timestamp("01/02/2023/5"), 0);
    }

    #[test]
    fn garbage_parts_are_zero() {
        assert_eq!(parse_date_to_timestamp("aa/bb/cccc"), 0);
        assert_eq!(parse_date_to_timestamp("//"), 0);
        assert_eq!(parse_date_to_timestamp("31/02/2023"), 0);
        assert_eq!(parse_date_to_timestamp("01/13/2023"), 0);
    }

    #[test]
    fn two_digit_years_are_taken_literally() {
        let short = parse_date_to_timestamp("01/02/23");
        assert_eq!(short, expected(23, 2, 1));
        assert!(short < 0);
        assert!(short < parse_date_to_timestamp("01/02/1923"));
    }

    #[test]
    fn tolerates_padding_around_parts() {
        assert_eq!(parse_date_to_timestamp(" 1/2/2023 "), expected(2023, 2, 1));
    }
}
