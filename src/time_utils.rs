// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time arithmetic.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Midnight UTC on the first day of the month containing `now`.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Last instant a donation may have happened and still block availability.
pub fn cooldown_cutoff(now: DateTime<Utc>, cooldown_days: i64) -> DateTime<Utc> {
    now - Duration::days(cooldown_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 13, 45, 9).unwrap();
        let start = start_of_month(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_month_on_the_first() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(start_of_month(now), now);
    }

    #[test]
    fn test_cooldown_cutoff() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 0, 0, 0).unwrap();
        let cutoff = cooldown_cutoff(now, 90);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 5, 27, 0, 0, 0).unwrap());
        assert!(cutoff < now);
    }
}
