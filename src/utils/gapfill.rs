use crate::utils::{dates, rules};
use chrono::{Datelike, Weekday};
use sqlx::MySqlPool;

/// Insert a synthetic leave record for every non-Sunday date of the month
/// that has no attendance row yet. Returns how many records were inserted.
///
/// `INSERT IGNORE` against the (employee_id, date) unique key leaves
/// existing rows untouched, which also makes the whole operation
/// idempotent: a second run inserts nothing.
pub async fn fill_missing(
    pool: &MySqlPool,
    employee_id: u64,
    year: i32,
    month: u32,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut inserted = 0u64;
    for date in dates::month_dates(year, month) {
        if date.weekday() == Weekday::Sun {
            continue;
        }

        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO attendance
                (employee_id, date, in_time, out_time, worked_hours, expected_hours, is_leave)
            VALUES (?, ?, NULL, NULL, 0, ?, 1)
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(rules::expected_hours(date.weekday()))
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_non_sunday_is_a_candidate() {
        // January 2026 has 31 days, 4 of them Sundays
        let candidates: Vec<_> = dates::month_dates(2026, 1)
            .into_iter()
            .filter(|d| d.weekday() != Weekday::Sun)
            .collect();
        assert_eq!(candidates.len(), 27);
        assert!(candidates.iter().all(|d| d.weekday() != Weekday::Sun));
    }

    #[test]
    fn candidates_carry_the_expected_hours_table() {
        for date in dates::month_dates(2026, 2) {
            let expected = rules::expected_hours(date.weekday());
            match date.weekday() {
                Weekday::Sun => assert_eq!(expected, 0.0),
                Weekday::Sat => assert_eq!(expected, 4.0),
                _ => assert_eq!(expected, 8.5),
            }
        }
    }
}
