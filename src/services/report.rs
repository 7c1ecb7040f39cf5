// src/services/report.rs
use log::{debug, error, info};
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::models::{PeerRow, ValuationSummary};
use super::valuation::{Result, ValuationError};

pub const SPREADSHEET_FILE_NAME: &str = "valuation_report.xlsx";
pub const DOCUMENT_FILE_NAME: &str = "valuation_report.pdf";

pub const SUMMARY_SHEET: &str = "Summary";
pub const COMPS_SHEET: &str = "Comps";
const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value (M)"];
const COMPS_HEADERS: [&str; 7] = [
    "Company",
    "Revenue",
    "EBITDA",
    "P/E",
    "EV/EBITDA",
    "Revenue_Growth",
    "Market_Cap",
];

// US Letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

/// Formats millions the way the dashboard shows them, e.g. `$13,773M`.
pub fn format_millions(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}{}M", sign, grouped)
}

fn export_error(what: &str, e: impl std::fmt::Display) -> ValuationError {
    error!("Failed to render {}: {}", what, e);
    ValuationError::Export(format!("{}: {}", what, e))
}

/// Two-sheet workbook: the four summary metrics and the peer table as-is.
pub fn render_spreadsheet(summary: &ValuationSummary, peers: &[PeerRow]) -> Result<Vec<u8>> {
    build_workbook(summary, peers).map_err(|e| export_error("spreadsheet", e))
}

fn build_workbook(summary: &ValuationSummary, peers: &[PeerRow]) -> std::result::Result<Vec<u8>, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    for (col, title) in SUMMARY_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, (metric, value)) in summary.metrics().iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *metric)?;
        sheet.write_number(row, 1, *value)?;
    }
    sheet.set_column_width(0, 16)?;
    sheet.set_column_width(1, 14)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(COMPS_SHEET)?;
    for (col, title) in COMPS_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, peer) in peers.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, peer.company.as_str())?;
        let figures = [
            peer.revenue,
            peer.ebitda,
            peer.pe,
            peer.ev_ebitda,
            peer.revenue_growth,
            peer.market_cap,
        ];
        for (offset, value) in figures.iter().enumerate() {
            sheet.write_number(row, offset as u16 + 1, *value)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    info!("Rendered spreadsheet report ({} bytes, {} peers)", bytes.len(), peers.len());
    Ok(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Typeface {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub typeface: Typeface,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

fn line(text: String, typeface: Typeface, size: f32, x: f32, y: f32) -> TextLine {
    TextLine { text, typeface, size, x, y }
}

/// Fixed page layout. Coordinates are points from the bottom-left corner.
pub fn document_lines(summary: &ValuationSummary, recommendation: &str) -> Vec<TextLine> {
    let mut lines = vec![line(
        "Equity Valuation Report".to_string(),
        Typeface::Bold,
        16.0,
        200.0,
        750.0,
    )];

    let mut y = 700.0;
    for (metric, value) in summary.metrics() {
        lines.push(line(
            format!("{}: {}", metric, format_millions(value)),
            Typeface::Regular,
            12.0,
            100.0,
            y,
        ));
        y -= 20.0;
    }

    lines.push(line(
        format!("Recommendation: {}", recommendation),
        Typeface::Bold,
        12.0,
        100.0,
        600.0,
    ));
    lines
}

/// One-page PDF with the summary metrics and the recommendation.
pub fn render_document(summary: &ValuationSummary, recommendation: &str) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Equity Valuation Report",
        Mm::from(Pt(PAGE_WIDTH)),
        Mm::from(Pt(PAGE_HEIGHT)),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| export_error("document font", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| export_error("document font", e))?;

    let canvas = doc.get_page(page).get_layer(layer);
    for text_line in document_lines(summary, recommendation) {
        debug!("PDF text at ({}, {}): {}", text_line.x, text_line.y, text_line.text);
        let font = match text_line.typeface {
            Typeface::Regular => &regular,
            Typeface::Bold => &bold,
        };
        canvas.use_text(
            text_line.text,
            text_line.size,
            Mm::from(Pt(text_line.x)),
            Mm::from(Pt(text_line.y)),
            font,
        );
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| export_error("document", e))?;
    info!("Rendered PDF report ({} bytes)", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::peers::reference_peers;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    fn summary() -> ValuationSummary {
        ValuationSummary {
            dcf_value: 13773.44657127245,
            comps_value: 4490.0,
            blended_value: 9131.723285636224,
            market_cap: 15000.0,
        }
    }

    fn cell_f64(cell: &Data) -> f64 {
        match cell {
            Data::Float(f) => *f,
            Data::Int(i) => *i as f64,
            other => panic!("expected a number, got {:?}", other),
        }
    }

    fn cell_str(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            other => panic!("expected a string, got {:?}", other),
        }
    }

    #[test]
    fn formats_millions_with_separators() {
        assert_eq!(format_millions(13773.44), "$13,773M");
        assert_eq!(format_millions(4490.0), "$4,490M");
        assert_eq!(format_millions(999.4), "$999M");
        assert_eq!(format_millions(1234567.8), "$1,234,568M");
        assert_eq!(format_millions(-2500.0), "$-2,500M");
        assert_eq!(format_millions(0.0), "$0M");
    }

    #[test]
    fn summary_sheet_reads_back() {
        let summary = summary();
        let bytes = render_spreadsheet(&summary, &reference_peers()).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SUMMARY_SHEET.to_string(), COMPS_SHEET.to_string()]);

        let range = workbook.worksheet_range(SUMMARY_SHEET).unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(cell_str(&rows[0][0]), "Metric");
        assert_eq!(cell_str(&rows[0][1]), "Value (M)");

        for (row, (metric, value)) in rows[1..].iter().zip(summary.metrics()) {
            assert_eq!(cell_str(&row[0]), metric);
            assert!((cell_f64(&row[1]) - value).abs() < 1e-9);
        }
    }

    #[test]
    fn comps_sheet_copies_peer_table() {
        let peers = reference_peers();
        let bytes = render_spreadsheet(&summary(), &peers).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(COMPS_SHEET).unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), peers.len() + 1);

        let headers: Vec<String> = rows[0].iter().map(cell_str).collect();
        assert_eq!(headers, COMPS_HEADERS.to_vec());

        let comp_c = rows[3];
        assert_eq!(cell_str(&comp_c[0]), "Comp C");
        assert_eq!(cell_f64(&comp_c[3]), 20.0);
        assert_eq!(cell_f64(&comp_c[6]), 14000.0);
    }

    #[test]
    fn document_layout_is_fixed() {
        let lines = document_lines(&summary(), "SELL (Overvalued)");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Equity Valuation Report",
                "DCF Value: $13,773M",
                "Comps Value: $4,490M",
                "Blended Value: $9,132M",
                "Market Cap: $15,000M",
                "Recommendation: SELL (Overvalued)",
            ]
        );
        let ys: Vec<f32> = lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![750.0, 700.0, 680.0, 660.0, 640.0, 600.0]);
        assert_eq!(lines[0].typeface, Typeface::Bold);
        assert_eq!(lines[0].size, 16.0);
        assert_eq!(lines[5].typeface, Typeface::Bold);
    }

    #[test]
    fn document_renders_pdf_bytes() {
        let bytes = render_document(&summary(), "HOLD (Fairly Valued)").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 200);
    }
}
