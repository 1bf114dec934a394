//! PDF report renderer backed by `printpdf`.

use std::io::BufWriter;

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

use crate::domain::{FontWeight, MedicalReport, ReportError, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, REPORT_TITLE};
use crate::ports::ReportRenderer;

/// Single-page A4 report in Helvetica.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl PdfReportRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, report: &MedicalReport) -> Result<Vec<u8>, ReportError> {
        let (doc, page, layer) = PdfDocument::new(
            REPORT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;

        for line in report.layout() {
            let font = match line.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.use_text(
                line.text,
                line.size,
                Mm::from(Pt(line.x)),
                Mm::from(Pt(line.y)),
                font,
            );
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        buf.into_inner()
            .map_err(|e| ReportError::Render(e.to_string()))
    }
}
