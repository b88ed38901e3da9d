use crate::utils::{reconcile, xlsx};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, web};
use futures_util::StreamExt;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};

/// Upload an attendance sheet
///
/// Expects one multipart field named `file` holding an Excel workbook with a
/// header row and the columns Employee ID / Date / In-Time / Out-Time. The
/// first worksheet is reconciled row by row; the response reports per-batch
/// counts with a sample of row errors, so partial success is visible.
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Batch processed (row errors reported inline)", body = Object, example = json!({
            "success": true,
            "message": "Excel processing completed",
            "summary": {
                "totalRows": 31,
                "successCount": 30,
                "errorCount": 1,
                "errors": ["Row 7: Missing employee ID or date"]
            }
        })),
        (status = 400, description = "No file, unreadable workbook, or no data rows"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Upload"
)]
pub async fn upload_attendance(
    pool: web::Data<MySqlPool>,
    mut payload: Multipart,
) -> actix_web::Result<impl Responder> {
    let mut file_bytes: Vec<u8> = Vec::new();
    let mut has_file = false;

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| {
            error!(error = %e, "Form parse error");
            actix_web::error::ErrorBadRequest("File upload failed")
        })?;

        if field.name() != "file" {
            continue;
        }
        has_file = true;

        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                error!(error = %e, "Upload stream error");
                actix_web::error::ErrorBadRequest("File upload failed")
            })?;
            file_bytes.extend_from_slice(&chunk);
        }
    }

    if !has_file || file_bytes.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "No file uploaded"
        })));
    }

    let rows = match xlsx::read_first_sheet(file_bytes) {
        Ok(rows) => rows,
        Err(e) => {
            debug!(error = %e, "Rejected unreadable workbook");
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Invalid Excel file"
            })));
        }
    };

    if rows.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Excel file is empty"
        })));
    }

    let columns = xlsx::resolve_columns(&rows[0]);
    let data_rows = &rows[1..];

    if data_rows.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Excel file contains only headers, no data"
        })));
    }

    let summary = reconcile::run(pool.get_ref(), &columns, data_rows)
        .await
        .map_err(|e| {
            error!(error = %e, "Attendance upload failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    debug!(
        total = summary.total_rows,
        ok = summary.success_count,
        failed = summary.error_count,
        "Upload summary"
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Excel processing completed",
        "summary": summary
    })))
}
