//! CSV export for the reports page.
//!
//! Columns follow the JSON field names of the exported rows. Quoting is left
//! to the csv writer.

use shared::{AttendanceRecord, MonthlyReportRow};
use wasm_bindgen::{JsCast, JsValue};

use super::date_utils::month_name;

pub const NO_DATA: &str = "No data to export";

pub fn monthly_report_csv(rows: &[MonthlyReportRow]) -> Result<String, String> {
    if rows.is_empty() {
        return Err(NO_DATA.to_string());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "student_id",
            "student_name",
            "student_age",
            "total_attendance",
            "classes_attended",
        ])
        .map_err(|e| e.to_string())?;

    for row in rows {
        writer
            .write_record([
                row.student_id.to_string(),
                row.student_name.clone(),
                row.student_age.to_string(),
                row.total_attendance.to_string(),
                row.classes_attended.join(", "),
            ])
            .map_err(|e| e.to_string())?;
    }

    finish(writer)
}

pub fn attendance_history_csv(records: &[AttendanceRecord]) -> Result<String, String> {
    if records.is_empty() {
        return Err(NO_DATA.to_string());
    }

    // AttendanceRecord is flat, so serde supplies the header row
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record).map_err(|e| e.to_string())?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, String> {
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

pub fn monthly_report_filename(year: i32, month: u32) -> String {
    format!("attendance_report_{}_{}.csv", month_name(month), year)
}

pub fn attendance_history_filename(start_date: &str, end_date: &str) -> String {
    format!("attendance_history_{}_to_{}.csv", start_date, end_date)
}

/// Hand `content` to the browser as a file download
pub fn download_csv(filename: &str, content: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let document = window.document().ok_or("No document available")?;

    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8;");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Failed to create file: {:?}", e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create download link: {:?}", e))?;

    let link: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("Failed to create download link: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Failed to create download link".to_string())?;
    link.set_href(&url);
    link.set_download(filename);
    link.click();

    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}
