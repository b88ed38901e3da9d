use chrono::{Datelike, NaiveDate, Weekday};

/// Parse a `YYYY-MM` month string. Returns the year and 1-based month.
pub fn parse_month(month: &str) -> Option<(i32, u32)> {
    let (year, mon) = month.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let mon: u32 = mon.parse().ok()?;
    if !(1..=12).contains(&mon) {
        return None;
    }
    Some((year, mon))
}

/// Canonical `YYYY-MM` form, zero-padded. Month filters in SQL compare
/// against `DATE_FORMAT(date, '%Y-%m')`, which always emits two digits.
pub fn normalize_month(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Every calendar date of the given month, ascending.
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(31);
    let mut current = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return dates,
    };
    while current.month() == month {
        dates.push(current);
        current = match current.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }
    dates
}

/// Full English weekday label, as shown on the dashboard.
pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_accepts_valid_input() {
        assert_eq!(parse_month("2026-02"), Some((2026, 2)));
        assert_eq!(parse_month("2026-12"), Some((2026, 12)));
        // single-digit month is tolerated on input, normalized on output
        assert_eq!(parse_month("2026-2"), Some((2026, 2)));
    }

    #[test]
    fn parse_month_rejects_garbage() {
        assert_eq!(parse_month("2026-13"), None);
        assert_eq!(parse_month("2026-00"), None);
        assert_eq!(parse_month("2026"), None);
        assert_eq!(parse_month("Feb 2026"), None);
        assert_eq!(parse_month(""), None);
    }

    #[test]
    fn normalize_month_pads() {
        assert_eq!(normalize_month(2026, 2), "2026-02");
        assert_eq!(normalize_month(2026, 11), "2026-11");
    }

    #[test]
    fn month_dates_covers_whole_month() {
        assert_eq!(month_dates(2026, 1).len(), 31);
        assert_eq!(month_dates(2026, 2).len(), 28);
        assert_eq!(month_dates(2024, 2).len(), 29); // leap year
        assert_eq!(month_dates(2026, 4).len(), 30);

        let jan = month_dates(2026, 1);
        assert_eq!(jan[0], NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(jan[30], NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
    }

    #[test]
    fn day_name_matches_calendar() {
        // 2026-01-04 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        assert_eq!(day_name(sunday.weekday()), "Sunday");
        assert_eq!(day_name(sunday.succ_opt().unwrap().weekday()), "Monday");
    }
}
