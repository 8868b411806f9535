//! In-memory report renderers.
//!
//! Both renderers take data already computed by
//! [`ReportService`](crate::services::reports::ReportService) and return the
//! finished file as bytes. Nothing is written to disk.

pub mod pdf;
pub mod spreadsheet;

/// Shown instead of a percentage when the dispatched quantity is not positive.
pub const NOT_AVAILABLE: &str = "N/A";

/// Percentage text or the `N/A` sentinel
pub fn wastage_label(wastage: Option<&str>) -> &str {
    wastage.unwrap_or(NOT_AVAILABLE)
}
