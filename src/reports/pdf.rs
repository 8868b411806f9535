//! Per-dispatch PDF report

use super::wastage_label;
use crate::errors::ServiceError;
use crate::services::reports::DispatchDocument;
use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

pub const TITLE: &str = "Material Dispatch Report";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LAYER_NAME: &str = "Layer 1";
/// Millimetres per PostScript point
const PT_TO_MM: f32 = 0.3528;

fn report_error(e: printpdf::Error) -> ServiceError {
    ServiceError::ReportError(e.to_string())
}

/// `report_<material>_<unix millis>.pdf`, with the material name reduced to
/// characters that are safe in a `Content-Disposition` header
pub fn report_file_name(material_name: &str, at: DateTime<Utc>) -> String {
    let sanitized: String = material_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if sanitized.is_empty() {
        "material"
    } else {
        sanitized.as_str()
    };
    format!("report_{}_{}.pdf", name, at.timestamp_millis())
}

/// Top-down text cursor that starts a new page when the current one is full
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ServiceError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(report_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(report_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn line_height(size: f32) -> f32 {
        size * PT_TO_MM * 1.5
    }

    fn ensure_room(&mut self, size: f32) {
        if self.y - Self::line_height(size) < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn write_at(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        self.ensure_room(size);
        self.y -= Self::line_height(size);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn text(&mut self, text: &str, size: f32) {
        self.write_at(text, size, MARGIN, false);
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.write_at(text, size, MARGIN, true);
    }

    /// Centres using an average Helvetica glyph width of half the font size
    fn centered_heading(&mut self, text: &str, size: f32) {
        let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.write_at(text, size, x, true);
    }

    fn gap(&mut self) {
        self.y -= Self::line_height(12.0);
    }

    fn finish(self) -> Result<Vec<u8>, ServiceError> {
        self.doc.save_to_bytes().map_err(report_error)
    }
}

fn display_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// How a report line is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Field,
    Entry,
    Gap,
}

/// One line of the dispatch report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
}

impl ReportLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    fn gap() -> Self {
        Self::new(LineStyle::Gap, "")
    }
}

/// Text of the dispatch report, top to bottom
pub fn report_lines(document: &DispatchDocument) -> Vec<ReportLine> {
    let dispatch = &document.dispatch;
    let mut lines = vec![
        ReportLine::new(LineStyle::Title, TITLE),
        ReportLine::gap(),
        ReportLine::new(
            LineStyle::Field,
            format!("Material: {}", dispatch.material_name),
        ),
        ReportLine::new(LineStyle::Field, format!("Company: {}", dispatch.to_company)),
        ReportLine::new(
            LineStyle::Field,
            format!("Dispatched Quantity: {}", dispatch.given_quantity),
        ),
        ReportLine::new(
            LineStyle::Field,
            format!("Dispatch Date: {}", display_date(&dispatch.dispatch_date)),
        ),
        ReportLine::gap(),
        ReportLine::new(LineStyle::Heading, "Batch Returns:"),
    ];

    lines.extend(document.batches.iter().enumerate().map(|(index, batch)| {
        ReportLine::new(
            LineStyle::Entry,
            format!(
                "{}. Received: {} on {}",
                index + 1,
                batch.received_quantity,
                display_date(&batch.received_date)
            ),
        )
    }));

    let wastage = match document.wastage.as_deref() {
        Some(value) => format!("Wastage: {}%", value),
        None => format!("Wastage: {}", wastage_label(None)),
    };
    lines.push(ReportLine::gap());
    lines.push(ReportLine::new(
        LineStyle::Field,
        format!("Total Received: {}", document.total_received),
    ));
    lines.push(ReportLine::new(LineStyle::Field, wastage));
    lines
}

/// Renders the dispatch, its batch returns and the wastage into a PDF held in memory
pub fn render_dispatch_pdf(document: &DispatchDocument) -> Result<Vec<u8>, ServiceError> {
    let mut writer = PageWriter::new(TITLE)?;

    for line in report_lines(document) {
        match line.style {
            LineStyle::Title => writer.centered_heading(&line.text, 20.0),
            LineStyle::Heading => writer.heading(&line.text, 16.0),
            LineStyle::Field => writer.text(&line.text, 14.0),
            LineStyle::Entry => writer.text(&line.text, 12.0),
            LineStyle::Gap => writer.gap(),
        }
    }

    writer.finish()
}
