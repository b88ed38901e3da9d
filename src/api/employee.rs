use crate::model::employee::Employee;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;

/// List all employees, oldest first
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = Object, example = json!({
            "success": true,
            "total": 2,
            "data": [
                { "id": 1, "employeeCode": "E100", "name": "Employee 100" },
                { "id": 2, "employeeCode": "E101", "name": "Employee 101" }
            ]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, name
        FROM employees
        ORDER BY id
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total": employees.len(),
        "data": employees
    })))
}
