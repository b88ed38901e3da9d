use crate::api::attendance::{AttendanceDayResponse, GenerateMissingRequest};
use crate::api::summary::MonthlyEmployeeSummary;
use crate::model::employee::Employee;
use crate::utils::reconcile::BatchSummary;
use crate::utils::rules::DayStatus;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave & Productivity API",
        version = "1.0.0",
        description = r#"
## Leave & Productivity Dashboard

Backend for an internal HR dashboard that tracks attendance uploads,
leave days, and month-level productivity.

### 🔹 Key Features
- **Attendance Upload**
  - Ingest an Excel sheet (Employee ID, Date, In-Time, Out-Time) and
    reconcile it against stored records
- **Daily Attendance**
  - Per-employee day list with Present / Off / Leave status
- **Productivity Summaries**
  - Per-employee and all-employee monthly aggregates
- **Leave Backfill**
  - Auto-generate leave records for days without an attendance row

### 📦 Response Format
- JSON-based RESTful responses
- Batch endpoints report per-row errors inline

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,

        crate::api::attendance::daily_attendance,
        crate::api::attendance::generate_missing,

        crate::api::summary::employee_summary,
        crate::api::summary::monthly_summary,

        crate::api::upload::upload_attendance
    ),
    components(
        schemas(
            Employee,
            AttendanceDayResponse,
            DayStatus,
            GenerateMissingRequest,
            MonthlyEmployeeSummary,
            BatchSummary
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Daily attendance and leave backfill APIs"),
        (name = "Summary", description = "Monthly productivity summary APIs"),
        (name = "Upload", description = "Attendance sheet upload API"),
    )
)]
pub struct ApiDoc;
