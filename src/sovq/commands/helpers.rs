use crate::error::{Result, SovqError};
use crate::model::{Report, UploadedFile};

pub fn find_report_mut<'a>(reports: &'a mut [Report], id: &str) -> Result<&'a mut Report> {
    reports
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| SovqError::ReportNotFound(id.to_string()))
}

pub fn find_upload_mut<'a>(
    uploads: &'a mut [UploadedFile],
    filename: &str,
) -> Result<&'a mut UploadedFile> {
    uploads
        .iter_mut()
        .find(|u| u.filename == filename)
        .ok_or_else(|| SovqError::UploadNotFound(filename.to_string()))
}

/// Trim and reject empty names.
pub fn required_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SovqError::validation("report name is required"));
    }
    Ok(trimmed.to_string())
}

/// Absent and blank descriptions are the same thing.
pub fn optional_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
