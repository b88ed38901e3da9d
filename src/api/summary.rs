use crate::utils::dates;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummaryQuery {
    /// Employee id (surrogate key)
    pub employee_id: Option<u64>,
    /// Month in YYYY-MM format
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlySummaryQuery {
    /// Month in YYYY-MM format
    pub month: Option<String>,
}

/// Aggregates of one employee's month.
///
/// Expected hours are summed over non-leave days only, so taking leave
/// lowers the denominator instead of the productivity score.
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    expected_hours: f64,
    actual_hours: f64,
    leaves_used: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeMonthRow {
    employee_code: String,
    expected_hours: f64,
    worked_hours: f64,
    leaves_used: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEmployeeSummary {
    #[schema(example = "E100")]
    pub employee_code: String,
    #[schema(example = "2026-01")]
    pub month: String,
    #[schema(example = 170.0)]
    pub expected_hours: f64,
    #[schema(example = 165.5)]
    pub worked_hours: f64,
    #[schema(example = 2)]
    pub leaves_used: i64,
    #[schema(example = 97.35)]
    pub productivity: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Productivity percentage, 2 decimals. Zero expected hours yield 0
/// rather than null, uniformly across both summary endpoints.
pub fn productivity(actual_hours: f64, expected_hours: f64) -> f64 {
    if expected_hours > 0.0 {
        round2(actual_hours / expected_hours * 100.0)
    } else {
        0.0
    }
}

/// Monthly summary for one employee
#[utoipa::path(
    get,
    path = "/api/employee-summary",
    params(EmployeeSummaryQuery),
    responses(
        (status = 200, description = "Aggregates for the month", body = Object, example = json!({
            "success": true,
            "employeeId": 1,
            "month": "2026-01",
            "expectedHours": 170.0,
            "actualHours": 165.5,
            "leavesUsed": 2,
            "productivity": 97.35
        })),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Summary"
)]
pub async fn employee_summary(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeSummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let (Some(employee_id), Some(month)) = (query.employee_id, query.month.as_deref()) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "employeeId and month are required"
        })));
    };

    let Some((year, mon)) = dates::parse_month(month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "month must be in YYYY-MM format"
        })));
    };
    let month_key = dates::normalize_month(year, mon);

    let summary = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN is_leave = 0 THEN expected_hours ELSE 0 END), 0) AS expected_hours,
            COALESCE(SUM(worked_hours), 0) AS actual_hours,
            COUNT(CASE WHEN is_leave = 1 THEN 1 END) AS leaves_used
        FROM attendance
        WHERE employee_id = ?
        AND DATE_FORMAT(date, '%Y-%m') = ?
        "#,
    )
    .bind(employee_id)
    .bind(&month_key)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "employeeId": employee_id,
        "month": month_key,
        "expectedHours": round2(summary.expected_hours),
        "actualHours": round2(summary.actual_hours),
        "leavesUsed": summary.leaves_used,
        "productivity": productivity(summary.actual_hours, summary.expected_hours)
    })))
}

/// Monthly summary across all employees
#[utoipa::path(
    get,
    path = "/api/monthly-summary",
    params(MonthlySummaryQuery),
    responses(
        (status = 200, description = "One row per employee with records that month", body = Object, example = json!({
            "success": true,
            "month": "2026-01",
            "totalEmployees": 1,
            "data": [{
                "employeeCode": "E100",
                "month": "2026-01",
                "expectedHours": 170.0,
                "workedHours": 165.5,
                "leavesUsed": 2,
                "productivity": 97.35
            }]
        })),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Summary"
)]
pub async fn monthly_summary(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthlySummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let Some(month) = query.month.as_deref() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Month is required (YYYY-MM)"
        })));
    };

    let Some((year, mon)) = dates::parse_month(month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "month must be in YYYY-MM format"
        })));
    };
    let month_key = dates::normalize_month(year, mon);

    let rows = sqlx::query_as::<_, EmployeeMonthRow>(
        r#"
        SELECT
            e.employee_code,
            COALESCE(SUM(CASE WHEN a.is_leave = 0 THEN a.expected_hours ELSE 0 END), 0) AS expected_hours,
            COALESCE(SUM(a.worked_hours), 0) AS worked_hours,
            COUNT(CASE WHEN a.is_leave = 1 THEN 1 END) AS leaves_used
        FROM attendance a
        INNER JOIN employees e ON a.employee_id = e.id
        WHERE DATE_FORMAT(a.date, '%Y-%m') = ?
        GROUP BY e.employee_code
        ORDER BY e.employee_code
        "#,
    )
    .bind(&month_key)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch monthly summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data: Vec<MonthlyEmployeeSummary> = rows
        .into_iter()
        .map(|r| MonthlyEmployeeSummary {
            employee_code: r.employee_code,
            month: month_key.clone(),
            expected_hours: round2(r.expected_hours),
            worked_hours: round2(r.worked_hours),
            leaves_used: r.leaves_used,
            productivity: productivity(r.worked_hours, r.expected_hours),
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "month": month_key,
        "totalEmployees": data.len(),
        "data": data
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn productivity_is_zero_when_nothing_was_expected() {
        assert_eq!(productivity(0.0, 0.0), 0.0);
        assert_eq!(productivity(4.0, 0.0), 0.0);
    }

    #[test]
    fn full_month_fully_present_scores_one_hundred() {
        // 20 weekdays at 8.5h each, all worked
        let expected = 20.0 * 8.5;
        assert_eq!(productivity(expected, expected), 100.0);
    }

    #[test]
    fn leave_days_shrink_the_denominator() {
        // 2 of 20 weekdays on leave: expected drops to 18 * 8.5 = 153
        let expected = 18.0 * 8.5;
        assert_eq!(productivity(expected, expected), 100.0);
        assert_eq!(productivity(150.0, expected), 98.04);
    }

    #[test]
    fn productivity_rounds_to_two_decimals() {
        assert_eq!(productivity(100.0, 300.0), 33.33);
        assert_eq!(productivity(200.0, 300.0), 66.67);
    }

    #[test]
    fn round2_behaves_on_boundaries() {
        assert_eq!(round2(1.005), 1.0); // 1.005 is 1.00499... in binary
        assert_eq!(round2(8.5), 8.5);
        assert_eq!(round2(97.345), 97.35);
    }
}
