use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One attendance row as stored, scoped to what the daily view needs.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceDay {
    pub date: NaiveDate,
    pub in_time: Option<NaiveTime>,
    pub out_time: Option<NaiveTime>,
    pub worked_hours: Option<f64>,
    pub expected_hours: f64,
    pub is_leave: bool,
}
