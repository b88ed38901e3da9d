use crate::model::attendance::AttendanceDay;
use crate::utils::rules::DayStatus;
use crate::utils::{dates, gapfill, rules};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    /// Employee id (surrogate key, not the employee code)
    pub employee_id: Option<u64>,
    /// Month in YYYY-MM format
    pub month: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDayResponse {
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(example = "09:00:00", value_type = String, nullable = true)]
    pub in_time: Option<NaiveTime>,
    #[schema(example = "17:30:00", value_type = String, nullable = true)]
    pub out_time: Option<NaiveTime>,
    #[schema(example = 8.5, nullable = true)]
    pub worked_hours: Option<f64>,
    #[schema(example = 8.5)]
    pub expected_hours: f64,
    #[schema(example = "Present")]
    pub status: DayStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMissingRequest {
    #[schema(example = 1)]
    pub employee_id: Option<u64>,
    #[schema(example = "2026-01")]
    pub month: Option<String>,
}

/// Daily attendance of one employee for one month
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance rows, ascending by date", body = Object, example = json!({
            "success": true,
            "employeeId": 1,
            "month": "2026-01",
            "totalDays": 1,
            "data": [{
                "date": "2026-01-05",
                "day": "Monday",
                "inTime": "09:00:00",
                "outTime": "17:30:00",
                "workedHours": 8.5,
                "expectedHours": 8.5,
                "status": "Present"
            }]
        })),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn daily_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
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

    let rows = sqlx::query_as::<_, AttendanceDay>(
        r#"
        SELECT date, in_time, out_time, worked_hours, expected_hours, is_leave
        FROM attendance
        WHERE employee_id = ?
        AND DATE_FORMAT(date, '%Y-%m') = ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(&month_key)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch daily attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data: Vec<AttendanceDayResponse> = rows
        .into_iter()
        .map(|r| {
            let weekday = r.date.weekday();
            AttendanceDayResponse {
                date: r.date,
                day: dates::day_name(weekday).to_string(),
                in_time: r.in_time,
                out_time: r.out_time,
                worked_hours: r.worked_hours,
                expected_hours: r.expected_hours,
                status: rules::day_status(weekday, r.is_leave),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "employeeId": employee_id,
        "month": month_key,
        "totalDays": data.len(),
        "data": data
    })))
}

/// Backfill leave records for days without an attendance row
#[utoipa::path(
    post,
    path = "/api/generate-missing-attendance",
    request_body = GenerateMissingRequest,
    responses(
        (status = 200, description = "Missing days filled in", body = Object, example = json!({
            "success": true,
            "message": "Missing attendance auto-generated",
            "employeeId": 1,
            "month": "2026-01",
            "insertedLeaves": 4
        })),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn generate_missing(
    pool: web::Data<MySqlPool>,
    payload: web::Json<GenerateMissingRequest>,
) -> actix_web::Result<impl Responder> {
    let (Some(employee_id), Some(month)) = (payload.employee_id, payload.month.as_deref()) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "employeeId and month are required"
        })));
    };

    let Some((year, mon)) = dates::parse_month(month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "month must be in YYYY-MM format"
        })));
    };

    let inserted = gapfill::fill_missing(pool.get_ref(), employee_id, year, mon)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to generate missing attendance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Missing attendance auto-generated",
        "employeeId": employee_id,
        "month": dates::normalize_month(year, mon),
        "insertedLeaves": inserted
    })))
}
