use chrono::{NaiveTime, Weekday};
use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

/// Display status of one attendance day.
///
/// Sunday is always `Off` — it is never counted as leave, even with no
/// punches. Any other day without a full in/out pair is `Leave`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
pub enum DayStatus {
    Present,
    Off,
    Leave,
}

/// Outcome of the attendance rules for a single day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayRule {
    pub expected_hours: f64,
    pub is_leave: bool,
    /// `None` on leave days or when either punch is missing.
    pub worked_hours: Option<f64>,
}

/// Contract hours by weekday: full day Monday-Friday, half Saturday, off Sunday.
pub fn expected_hours(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sun => 0.0,
        Weekday::Sat => 4.0,
        _ => 8.5,
    }
}

/// Hours between two punches, with +24h wraparound for overnight shifts.
pub fn worked_hours(in_time: NaiveTime, out_time: NaiveTime) -> f64 {
    let mut hours = (out_time - in_time).num_seconds() as f64 / 3600.0;
    if hours < 0.0 {
        hours += 24.0;
    }
    hours
}

/// Evaluate the attendance rules for one day. Total over its input domain.
pub fn evaluate(
    weekday: Weekday,
    in_time: Option<NaiveTime>,
    out_time: Option<NaiveTime>,
) -> DayRule {
    let is_leave = weekday != Weekday::Sun && (in_time.is_none() || out_time.is_none());

    let worked = match (in_time, out_time) {
        (Some(start), Some(end)) if !is_leave => Some(worked_hours(start, end)),
        _ => None,
    };

    DayRule {
        expected_hours: expected_hours(weekday),
        is_leave,
        worked_hours: worked,
    }
}

pub fn day_status(weekday: Weekday, is_leave: bool) -> DayStatus {
    if weekday == Weekday::Sun {
        DayStatus::Off
    } else if is_leave {
        DayStatus::Leave
    } else {
        DayStatus::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn expected_hours_table() {
        assert_eq!(expected_hours(Weekday::Sun), 0.0);
        assert_eq!(expected_hours(Weekday::Sat), 4.0);
        for wd in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            assert_eq!(expected_hours(wd), 8.5);
        }
    }

    #[test]
    fn sunday_without_punches_is_off_not_leave() {
        let rule = evaluate(Weekday::Sun, None, None);
        assert!(!rule.is_leave);
        assert_eq!(rule.expected_hours, 0.0);
        assert_eq!(rule.worked_hours, None);
        assert_eq!(day_status(Weekday::Sun, rule.is_leave), DayStatus::Off);
    }

    #[test]
    fn missing_punch_marks_leave_on_working_days() {
        for wd in [Weekday::Mon, Weekday::Sat] {
            assert!(evaluate(wd, None, None).is_leave);
            assert!(evaluate(wd, Some(t(9, 0)), None).is_leave);
            assert!(evaluate(wd, None, Some(t(17, 0))).is_leave);
        }
        assert!(!evaluate(Weekday::Mon, Some(t(9, 0)), Some(t(17, 30))).is_leave);
    }

    #[test]
    fn worked_hours_full_day() {
        let rule = evaluate(Weekday::Mon, Some(t(9, 0)), Some(t(17, 30)));
        assert_eq!(rule.worked_hours, Some(8.5));
        assert_eq!(day_status(Weekday::Mon, rule.is_leave), DayStatus::Present);
    }

    #[test]
    fn overnight_shift_wraps_around() {
        let rule = evaluate(Weekday::Fri, Some(t(22, 0)), Some(t(6, 0)));
        assert_eq!(rule.worked_hours, Some(8.0));
        assert!(!rule.is_leave);
    }

    #[test]
    fn sunday_with_punches_still_counts_worked_hours() {
        let rule = evaluate(Weekday::Sun, Some(t(10, 0)), Some(t(14, 0)));
        assert!(!rule.is_leave);
        assert_eq!(rule.expected_hours, 0.0);
        assert_eq!(rule.worked_hours, Some(4.0));
    }

    #[test]
    fn leave_day_has_no_worked_hours() {
        let rule = evaluate(Weekday::Wed, Some(t(9, 0)), None);
        assert!(rule.is_leave);
        assert_eq!(rule.worked_hours, None);
        assert_eq!(day_status(Weekday::Wed, true), DayStatus::Leave);
    }

    #[test]
    fn status_labels_render_for_the_dashboard() {
        assert_eq!(DayStatus::Present.to_string(), "Present");
        assert_eq!(DayStatus::Off.to_string(), "Off");
        assert_eq!(DayStatus::Leave.to_string(), "Leave");
    }
}
