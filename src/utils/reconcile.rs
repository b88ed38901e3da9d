use crate::utils::rules;
use crate::utils::xlsx::{Cell, ColumnMap, cell_at, parse_date, parse_time};
use anyhow::bail;
use chrono::Datelike;
use serde::Serialize;
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::info;
use utoipa::ToSchema;

/// How many row-level error messages the upload response carries.
/// Counters stay exact; only the sample list is capped.
const MAX_ERROR_SAMPLES: usize = 10;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    #[schema(example = 31)]
    pub total_rows: usize,
    #[schema(example = 30)]
    pub success_count: usize,
    #[schema(example = 1)]
    pub error_count: usize,
    #[schema(example = json!(["Row 7: Missing employee ID or date"]))]
    pub errors: Vec<String>,
}

/// Reconcile one uploaded sheet against the store.
///
/// The whole batch runs in a single transaction. Row-level failures are
/// collected and never abort the batch; only begin/commit failures (or a
/// dead connection) bubble up as `sqlx::Error` and roll everything back.
pub async fn run(
    pool: &MySqlPool,
    columns: &ColumnMap,
    data_rows: &[Vec<Cell>],
) -> Result<BatchSummary, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut success_count = 0usize;
    let mut error_count = 0usize;
    let mut errors = Vec::new();

    for (i, row) in data_rows.iter().enumerate() {
        if row.iter().all(Cell::is_empty) {
            continue;
        }

        match apply_row(&mut tx, columns, row).await {
            Ok(()) => success_count += 1,
            Err(e) => {
                error_count += 1;
                errors.push(format!("Row {}: {}", i + 1, e));
            }
        }
    }

    tx.commit().await?;

    errors.truncate(MAX_ERROR_SAMPLES);
    Ok(BatchSummary {
        total_rows: data_rows.len(),
        success_count,
        error_count,
        errors,
    })
}

/// Process one sheet row: normalize, resolve the employee, upsert the
/// attendance record for (employee, date).
async fn apply_row(
    tx: &mut Transaction<'_, MySql>,
    columns: &ColumnMap,
    row: &[Cell],
) -> anyhow::Result<()> {
    let employee_code = cell_at(row, columns.employee_code).as_text();
    let date_cell = cell_at(row, columns.date);

    let Some(employee_code) = employee_code else {
        bail!("Missing employee ID or date");
    };
    if date_cell.is_empty() {
        bail!("Missing employee ID or date");
    }

    let Some(date) = parse_date(&date_cell) else {
        bail!("Invalid date format: {}", date_cell);
    };

    let in_time = parse_time(&cell_at(row, columns.in_time));
    let out_time = parse_time(&cell_at(row, columns.out_time));

    let employee_id = find_or_create_employee(tx, &employee_code).await?;

    let rule = rules::evaluate(date.weekday(), in_time, out_time);

    // The (employee_id, date) unique key makes this a race-free upsert:
    // re-uploads overwrite in place, last write wins.
    sqlx::query(
        r#"
        INSERT INTO attendance
            (employee_id, date, in_time, out_time, worked_hours, expected_hours, is_leave)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            in_time = VALUES(in_time),
            out_time = VALUES(out_time),
            worked_hours = VALUES(worked_hours),
            expected_hours = VALUES(expected_hours),
            is_leave = VALUES(is_leave)
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(in_time)
    .bind(out_time)
    .bind(rule.worked_hours)
    .bind(rule.expected_hours)
    .bind(rule.is_leave)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Resolve an employee code to its id, provisioning the employee when the
/// code is unseen. Auto-provisioning is a deliberate, logged side effect so
/// operators can tell it apart from matching an existing employee.
async fn find_or_create_employee(
    tx: &mut Transaction<'_, MySql>,
    employee_code: &str,
) -> anyhow::Result<u64> {
    let existing: Option<u64> =
        sqlx::query_scalar("SELECT id FROM employees WHERE employee_code = ? LIMIT 1")
            .bind(employee_code)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let name = placeholder_name(employee_code);
    let result = sqlx::query("INSERT INTO employees (employee_code, name) VALUES (?, ?)")
        .bind(employee_code)
        .bind(&name)
        .execute(&mut **tx)
        .await?;

    let id = result.last_insert_id();
    info!(employee_code, id, "auto-provisioned employee from upload");
    Ok(id)
}

/// Placeholder display name for auto-provisioned employees: codes shaped
/// like `E123` become "Employee 123", anything else keeps the raw code.
fn placeholder_name(employee_code: &str) -> String {
    employee_code
        .strip_prefix('E')
        .and_then(|digits| digits.parse::<u64>().ok())
        .map(|n| format!("Employee {}", n))
        .unwrap_or_else(|| employee_code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_name_expands_numeric_codes() {
        assert_eq!(placeholder_name("E100"), "Employee 100");
        assert_eq!(placeholder_name("E007"), "Employee 7");
        assert_eq!(placeholder_name("EMP-001"), "EMP-001");
        assert_eq!(placeholder_name("X9"), "X9");
        assert_eq!(placeholder_name("E"), "E");
    }

    #[test]
    fn blank_rows_are_detected() {
        let blank = vec![Cell::Empty, Cell::Empty, Cell::Empty];
        assert!(blank.iter().all(Cell::is_empty));

        let not_blank = vec![Cell::Empty, Cell::Text("E100".into())];
        assert!(!not_blank.iter().all(Cell::is_empty));
    }
}
