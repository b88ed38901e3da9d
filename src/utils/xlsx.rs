use anyhow::{Context, anyhow};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{Duration, NaiveDate, NaiveTime};
use std::io::Cursor;

/// Normalized spreadsheet cell. Everything downstream (date/time parsing,
/// blank-row detection) works on this instead of calamine's `Data`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Cell content as trimmed text, `None` when blank. Integral numbers
    /// render without the trailing `.0` so numeric employee codes match
    /// their textual form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Cell::Number(n) => {
                if (n.floor() - n).abs() < f64::EPSILON {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Cell::Empty => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Empty => write!(f, ""),
        }
    }
}

fn from_data(data: &Data) -> Cell {
    match data {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Empty | Data::Error(_) => Cell::Empty,
    }
}

/// Read the first worksheet of an uploaded workbook into rows of cells.
pub fn read_first_sheet(bytes: Vec<u8>) -> anyhow::Result<Vec<Vec<Cell>>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("unreadable workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no sheets"))?
        .context("failed to read first sheet")?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(from_data).collect())
        .collect())
}

/// Column indices of the expected upload headers. Any of them may be
/// missing; the per-row checks report the resulting gaps.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub employee_code: Option<usize>,
    pub date: Option<usize>,
    pub in_time: Option<usize>,
    pub out_time: Option<usize>,
}

/// Resolve header labels to column positions. Both the display headers
/// ("Employee ID") and their snake_case twins ("employee_id") are accepted.
pub fn resolve_columns(header: &[Cell]) -> ColumnMap {
    let mut map = ColumnMap::default();
    for (idx, cell) in header.iter().enumerate() {
        let Some(label) = cell.as_text() else {
            continue;
        };
        match label.as_str() {
            "Employee ID" | "employee_id" => map.employee_code.get_or_insert(idx),
            "Date" | "date" => map.date.get_or_insert(idx),
            "In-Time" | "in_time" => map.in_time.get_or_insert(idx),
            "Out-Time" | "out_time" => map.out_time.get_or_insert(idx),
            _ => continue,
        };
    }
    map
}

pub fn cell_at(row: &[Cell], idx: Option<usize>) -> Cell {
    idx.and_then(|i| row.get(i).cloned()).unwrap_or(Cell::Empty)
}

// Excel day 0. Serial 25569 is the Unix epoch.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0; // 9999-12-31

/// Calendar date from a cell: Excel serial numbers (fraction kept, rounded
/// to whole seconds), else `YYYY-MM-DD` / `MM/DD/YYYY` / `DD/MM/YYYY` text.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Number(serial) => {
            if !serial.is_finite() || *serial <= 0.0 || *serial >= MAX_EXCEL_SERIAL {
                return None;
            }
            let (y, m, d) = EXCEL_EPOCH;
            let base = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
            let seconds = (serial * 86_400.0).round() as i64;
            base.checked_add_signed(Duration::seconds(seconds))
                .map(|dt| dt.date())
        }
        Cell::Text(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
                .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
                .ok()
        }
        Cell::Empty => None,
    }
}

/// Time-of-day from a cell. Unparseable values are simply absent, never an
/// error: a missing punch is a business state (leave), not bad input.
pub fn parse_time(cell: &Cell) -> Option<NaiveTime> {
    match cell {
        Cell::Number(fraction) => {
            if !(0.0..1.0).contains(fraction) {
                return None;
            }
            let total_seconds = fraction * 86_400.0;
            let hours = (total_seconds / 3600.0).floor() as u32;
            let minutes = ((total_seconds % 3600.0) / 60.0).floor() as u32;
            let seconds = (total_seconds % 60.0).floor() as u32;
            NaiveTime::from_hms_opt(hours, minutes, seconds)
        }
        Cell::Text(s) => parse_time_text(s.trim()),
        Cell::Empty => None,
    }
}

fn parse_time_text(s: &str) -> Option<NaiveTime> {
    // bare hour, e.g. "10" => 10:00:00
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) && s.len() <= 2 {
        return NaiveTime::from_hms_opt(s.parse().ok()?, 0, 0);
    }

    let mut parts = s.split(':');
    let hours = parts.next()?;
    let minutes = parts.next()?;
    let seconds = parts.next().unwrap_or("00");
    if parts.next().is_some() {
        return None;
    }
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 || seconds.len() != 2 {
        return None;
    }
    if ![hours, minutes, seconds]
        .iter()
        .all(|p| p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    NaiveTime::from_hms_opt(
        hours.parse().ok()?,
        minutes.parse().ok()?,
        seconds.parse().ok()?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn serial_dates_convert() {
        // 25569 = 1970-01-01, 45292 = 2024-01-01
        assert_eq!(parse_date(&Cell::Number(25569.0)), Some(date(1970, 1, 1)));
        assert_eq!(parse_date(&Cell::Number(45292.0)), Some(date(2024, 1, 1)));
        // intra-day fraction stays on the same calendar day
        assert_eq!(parse_date(&Cell::Number(45292.4)), Some(date(2024, 1, 1)));
    }

    #[test]
    fn out_of_range_serials_are_rejected() {
        assert_eq!(parse_date(&Cell::Number(-1.0)), None);
        assert_eq!(parse_date(&Cell::Number(0.0)), None);
        assert_eq!(parse_date(&Cell::Number(f64::NAN)), None);
        assert_eq!(parse_date(&Cell::Number(9_000_000.0)), None);
    }

    #[test]
    fn text_dates_convert() {
        assert_eq!(
            parse_date(&Cell::Text("2026-01-15".into())),
            Some(date(2026, 1, 15))
        );
        assert_eq!(
            parse_date(&Cell::Text("01/15/2026".into())),
            Some(date(2026, 1, 15))
        );
        // day-first fallback for values the US order cannot produce
        assert_eq!(
            parse_date(&Cell::Text("25/12/2026".into())),
            Some(date(2026, 12, 25))
        );
        assert_eq!(parse_date(&Cell::Text("next tuesday".into())), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn fractional_day_times_convert() {
        assert_eq!(parse_time(&Cell::Number(0.5)), Some(time(12, 0, 0)));
        // 08:30 = 30600s = 0.354166...
        assert_eq!(
            parse_time(&Cell::Number(30_600.0 / 86_400.0)),
            Some(time(8, 30, 0))
        );
        assert_eq!(parse_time(&Cell::Number(0.0)), Some(time(0, 0, 0)));
        assert_eq!(parse_time(&Cell::Number(1.0)), None);
        assert_eq!(parse_time(&Cell::Number(9.0)), None);
    }

    #[test]
    fn text_times_convert() {
        assert_eq!(parse_time(&Cell::Text("9:30".into())), Some(time(9, 30, 0)));
        assert_eq!(
            parse_time(&Cell::Text("09:30:15".into())),
            Some(time(9, 30, 15))
        );
        assert_eq!(parse_time(&Cell::Text("10".into())), Some(time(10, 0, 0)));
        assert_eq!(parse_time(&Cell::Text("0".into())), Some(time(0, 0, 0)));
    }

    #[test]
    fn unparseable_times_are_absent() {
        assert_eq!(parse_time(&Cell::Text("25:00".into())), None);
        assert_eq!(parse_time(&Cell::Text("9:3".into())), None);
        assert_eq!(parse_time(&Cell::Text("24".into())), None);
        assert_eq!(parse_time(&Cell::Text("lunch".into())), None);
        assert_eq!(parse_time(&Cell::Text("9:30:15:00".into())), None);
        assert_eq!(parse_time(&Cell::Empty), None);
    }

    #[test]
    fn header_columns_resolve_by_either_label() {
        let header = vec![
            Cell::Text("Employee ID".into()),
            Cell::Text("date".into()),
            Cell::Text("In-Time".into()),
            Cell::Text("out_time".into()),
            Cell::Text("Notes".into()),
        ];
        let map = resolve_columns(&header);
        assert_eq!(map.employee_code, Some(0));
        assert_eq!(map.date, Some(1));
        assert_eq!(map.in_time, Some(2));
        assert_eq!(map.out_time, Some(3));
    }

    #[test]
    fn missing_headers_stay_unresolved() {
        let map = resolve_columns(&[Cell::Text("Name".into()), Cell::Empty]);
        assert_eq!(map, ColumnMap::default());
        assert_eq!(cell_at(&[Cell::Text("x".into())], map.date), Cell::Empty);
    }

    #[test]
    fn numeric_codes_render_without_decimal_point() {
        assert_eq!(Cell::Number(1001.0).as_text().as_deref(), Some("1001"));
        assert_eq!(Cell::Number(10.5).as_text().as_deref(), Some("10.5"));
        assert_eq!(Cell::Text("  E100  ".into()).as_text().as_deref(), Some("E100"));
        assert_eq!(Cell::Empty.as_text(), None);
    }
}
