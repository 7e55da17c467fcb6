mod pdf;
mod projection;
mod render;
pub mod views;

pub use projection::{NOTE_QUOTA_ELIGIBLE_ON_MERIT, NOTE_REALLOCATED};
pub use render::{RenderError, ReportDocument, ReportFormat, ReportRenderer};
pub use views::{ReportData, ReportRow, ReportSummary};
