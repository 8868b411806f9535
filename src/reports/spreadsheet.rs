//! Wastage workbook export

use super::wastage_label;
use crate::errors::ServiceError;
use crate::services::reports::DispatchReportRow;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

/// Download name of the wastage workbook
pub const FILE_NAME: &str = "wastage-report.xlsx";
pub const SHEET_NAME: &str = "Wastage Report";

/// Header text and column width
const COLUMNS: [(&str, f64); 6] = [
    ("Material Name", 25.0),
    ("To Company", 25.0),
    ("Given Quantity", 15.0),
    ("Received Quantity", 18.0),
    ("Wastage (%)", 15.0),
    ("Dispatch Date", 20.0),
];

fn report_error(e: XlsxError) -> ServiceError {
    ServiceError::ReportError(e.to_string())
}

/// Renders one row per dispatch into an xlsx workbook held in memory
pub fn render_wastage_workbook(rows: &[DispatchReportRow]) -> Result<Vec<u8>, ServiceError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_wastage_sheet(sheet, rows)?;

    workbook.save_to_buffer().map_err(report_error)
}

fn write_wastage_sheet(
    sheet: &mut Worksheet,
    rows: &[DispatchReportRow],
) -> Result<(), ServiceError> {
    sheet.set_name(SHEET_NAME).map_err(report_error)?;

    let header_format = Format::new().set_bold();

    for (col, (header, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, *width).map_err(report_error)?;
        sheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(report_error)?;
    }

    for (row_idx, entry) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, &entry.material_name)
            .map_err(report_error)?;
        sheet
            .write_string(row, 1, &entry.to_company)
            .map_err(report_error)?;
        sheet
            .write_number(row, 2, entry.given_quantity)
            .map_err(report_error)?;
        sheet
            .write_number(row, 3, entry.received_quantity)
            .map_err(report_error)?;
        sheet
            .write_string(row, 4, wastage_label(entry.wastage.as_deref()))
            .map_err(report_error)?;
        sheet
            .write_string(row, 5, entry.dispatch_date.format("%Y-%m-%d").to_string())
            .map_err(report_error)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::{Cursor, Read};

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    fn row(name: &str, wastage: Option<&str>) -> DispatchReportRow {
        DispatchReportRow {
            material_name: name.to_string(),
            to_company: "Acme".to_string(),
            given_quantity: 100.0,
            received_quantity: 75.0,
            wastage: wastage.map(str::to_string),
            dispatch_date: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn renders_a_zip_container() {
        let bytes =
            render_wastage_workbook(&[row("Steel", Some("25.00")), row("Copper", None)]).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn renders_header_only_workbook_when_empty() {
        let bytes = render_wastage_workbook(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn workbook_holds_headers_rows_and_sentinel() {
        let bytes =
            render_wastage_workbook(&[row("Steel", Some("25.00")), row("Copper", None)]).unwrap();

        let strings = part(&bytes, "xl/sharedStrings.xml");
        for (header, _) in COLUMNS {
            assert!(strings.contains(&format!("<t>{}</t>", header)), "{header}");
        }
        for text in ["Steel", "Copper", "Acme", "25.00", "N/A", "2024-01-01"] {
            assert!(strings.contains(&format!("<t>{}</t>", text)), "{text}");
        }
        assert!(!strings.contains("10:00"));

        let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<v>100</v>"));
        assert!(sheet.contains("<v>75</v>"));
        assert!(sheet.contains(r#"<c r="F3""#));

        let workbook = part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(&format!(r#"name="{}""#, SHEET_NAME)));
    }
}
