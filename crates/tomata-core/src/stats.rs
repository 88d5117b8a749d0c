//! Derived work statistics.
//!
//! Everything here is recomputed from the session ledger on demand;
//! "today" means the current local calendar day of the completion
//! timestamp, so a session finished after midnight belongs to the new
//! day and a long-lived process never serves stale totals.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Work-session statistics, today and all-time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub today_pomodoros: u64,
    pub today_work_secs: u64,
    pub total_pomodoros: u64,
    pub total_work_secs: u64,
}

/// Work totals for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocus {
    pub date: NaiveDate,
    pub work_secs: u64,
    pub pomodoros: u64,
}

/// Current local calendar day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local calendar day a UTC timestamp falls on.
pub fn local_date_of(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// UTC instant of local midnight for `day`. Around a DST gap the earliest
/// valid local time is used.
pub fn local_day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(midnight, Utc))
}

/// UTC instant where "today" begins, local time.
pub fn today_start_utc() -> DateTime<Utc> {
    local_day_start_utc(local_today())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_boundary_is_in_the_past() {
        let start = today_start_utc();
        assert!(start <= Utc::now());
        // Midnight is at most 24h (plus DST slack) behind now.
        assert!(Utc::now() - start < chrono::Duration::hours(25));
    }

    #[test]
    fn now_falls_on_local_today() {
        assert_eq!(local_date_of(Utc::now()), local_today());
    }

    #[test]
    fn day_start_orders_consecutive_days() {
        let d1 = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(local_day_start_utc(d1) < local_day_start_utc(d2));
    }
}
