//! PDF report rendering in two stages.
//!
//! [`layout`] turns export data into a page model of positioned text and
//! rectangles (A4 portrait, millimetres, `y` measured down from the top edge).
//! [`render`] writes that model with `printpdf`. Keeping pagination out of the
//! renderer makes it testable without parsing PDF output.

use crate::csv_export::campaign_row;
use crate::model::{ExportData, ExportSections};
use insights_core::types::{Campaign, MetricData};
use insights_core::{InsightsError, InsightsResult};
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, Rect, Rgb};
use tracing::debug;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
/// Space that must remain before the campaign heading; otherwise it moves to
/// a new page.
pub const SECTION_BREAK_MM: f32 = 60.0;
pub const FOOTER_OFFSET_MM: f32 = 10.0;

pub const CAMPAIGN_COLUMN_WIDTHS_MM: [f32; 11] =
    [25.0, 15.0, 12.0, 15.0, 15.0, 18.0, 12.0, 15.0, 10.0, 12.0, 12.0];
pub const HEADER_FILL: [u8; 3] = [34, 139, 230];

const PT_TO_MM: f32 = 0.352_778;
const CELL_PADDING_MM: f32 = 1.5;
const LINE_HEIGHT: f32 = 1.15;
const ASCENT: f32 = 0.8;
const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

const METRIC_COLUMNS: [&str; 5] = ["Metric", "Value", "Change", "Type", "Description"];
const CAMPAIGN_COLUMNS: [&str; 11] = [
    "Campaign",
    "Channel",
    "Status",
    "Budget",
    "Spent",
    "Impressions",
    "Clicks",
    "Conversions",
    "CTR",
    "CPC",
    "ROAS",
];

// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: Weight,
        color: [u8; 3],
        text: String,
    },
    /// `y` is the top edge. No fill means outline only.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<[u8; 3]>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub ops: Vec<DrawOp>,
}

impl PdfPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rect { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub title: String,
    pub pages: Vec<PdfPage>,
}

/// Rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size: f32, weight: Weight) -> f32 {
    let table = match weight {
        Weight::Regular => &HELVETICA,
        Weight::Bold => &HELVETICA_BOLD,
    };
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => u32::from(table[(code - 32) as usize]),
            _ => 556,
        })
        .sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}

/// Greedy word wrap; words wider than the line are split by character.
pub fn wrap(text: &str, max_width: f32, size: f32, weight: Weight) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width_mm(&candidate, size, weight) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for ch in word.chars() {
            current.push(ch);
            if text_width_mm(&current, size, weight) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

enum ColumnWidths {
    /// Natural widths stretched or shrunk to the printable width.
    Auto,
    Fixed(&'static [f32]),
}

struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    size: f32,
    widths: ColumnWidths,
}

impl Table {
    fn column_widths(&self) -> Vec<f32> {
        match self.widths {
            ColumnWidths::Fixed(widths) => widths.to_vec(),
            ColumnWidths::Auto => {
                let natural: Vec<f32> = (0..self.headers.len())
                    .map(|col| {
                        let header = text_width_mm(&self.headers[col], self.size, Weight::Bold);
                        let body = self
                            .rows
                            .iter()
                            .filter_map(|row| row.get(col))
                            .map(|cell| text_width_mm(cell, self.size, Weight::Regular))
                            .fold(0.0_f32, f32::max);
                        header.max(body) + 2.0 * CELL_PADDING_MM
                    })
                    .collect();
                let total: f32 = natural.iter().sum();
                let available = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
                if total <= 0.0 {
                    return vec![available / natural.len().max(1) as f32; natural.len()];
                }
                natural.iter().map(|w| w * available / total).collect()
            }
        }
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_HEIGHT
}

struct PageBuilder {
    pages: Vec<PdfPage>,
    y: f32,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            pages: vec![PdfPage::default()],
            y: MARGIN_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PdfPage::default());
        self.y = MARGIN_MM;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, weight: Weight, color: [u8; 3], text: &str) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            weight,
            color,
            text: text.to_string(),
        });
    }

    fn centered(&mut self, y: f32, size: f32, weight: Weight, text: &str) {
        let x = (PAGE_WIDTH_MM - text_width_mm(text, size, weight)) / 2.0;
        self.text(x, y, size, weight, BLACK, text);
    }

    fn heading(&mut self, text: &str) {
        self.text(MARGIN_MM, self.y, 16.0, Weight::Bold, BLACK, text);
        self.y += 10.0;
    }

    fn row(&mut self, cells: &[String], widths: &[f32], size: f32, header: bool) {
        let weight = if header { Weight::Bold } else { Weight::Regular };
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| wrap(cell, w - 2.0 * CELL_PADDING_MM, size, weight))
            .collect();
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = lines as f32 * line_height(size) + 2.0 * CELL_PADDING_MM;
        let (fill, color) = if header {
            (Some(HEADER_FILL), WHITE)
        } else {
            (None, BLACK)
        };

        let mut x = MARGIN_MM;
        for (cell_lines, width) in wrapped.iter().zip(widths) {
            self.push(DrawOp::Rect {
                x,
                y: self.y,
                width: *width,
                height,
                fill,
            });
            for (i, line) in cell_lines.iter().enumerate() {
                let baseline = self.y
                    + CELL_PADDING_MM
                    + i as f32 * line_height(size)
                    + size * PT_TO_MM * ASCENT;
                self.text(x + CELL_PADDING_MM, baseline, size, weight, color, line);
            }
            x += width;
        }
        self.y += height;
    }

    fn row_height(cells: &[String], widths: &[f32], size: f32) -> f32 {
        let lines = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| wrap(cell, w - 2.0 * CELL_PADDING_MM, size, Weight::Regular).len())
            .max()
            .unwrap_or(1);
        lines as f32 * line_height(size) + 2.0 * CELL_PADDING_MM
    }

    /// Grid table starting at the cursor; rows that would cross the bottom
    /// margin move to a new page under a repeated header.
    fn table(&mut self, table: &Table) {
        let widths = table.column_widths();
        let bottom = PAGE_HEIGHT_MM - MARGIN_MM;
        self.row(&table.headers, &widths, table.size, true);
        let mut rows_on_page = 0;
        for row in &table.rows {
            let height = Self::row_height(row, &widths, table.size);
            if self.y + height > bottom && rows_on_page > 0 {
                self.new_page();
                self.row(&table.headers, &widths, table.size, true);
                rows_on_page = 0;
            }
            self.row(row, &widths, table.size, false);
            rows_on_page += 1;
        }
    }

    fn footers(&mut self, brand: &str) {
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            let text = format!("Generated by {brand} Insights - Page {} of {total}", i + 1);
            let x = (PAGE_WIDTH_MM - text_width_mm(&text, 10.0, Weight::Regular)) / 2.0;
            page.ops.push(DrawOp::Text {
                x,
                y: PAGE_HEIGHT_MM - FOOTER_OFFSET_MM,
                size: 10.0,
                weight: Weight::Regular,
                color: BLACK,
                text,
            });
        }
    }
}

fn metric_cells(metric: &MetricData) -> Vec<String> {
    vec![
        metric.title.clone(),
        metric.value.to_string(),
        metric.change.clone(),
        metric.change_type.to_string(),
        metric.description.clone(),
    ]
}

fn campaign_cells(campaign: &Campaign) -> Vec<String> {
    let mut cells = campaign_row(campaign);
    cells.truncate(CAMPAIGN_COLUMNS.len());
    cells[9] = format!("${:.2}", campaign.cpc);
    cells
}

/// Paginate the report. Time series data is not part of the PDF.
pub fn layout(data: &ExportData, sections: ExportSections, brand: &str) -> PdfLayout {
    let title = format!("{brand} Dashboard Export");
    let mut pages = PageBuilder::new();

    pages.centered(pages.y, 20.0, Weight::Bold, &title);
    pages.y += 10.0;
    pages.centered(
        pages.y,
        12.0,
        Weight::Regular,
        &format!("Export Date: {}", data.export_date),
    );
    pages.y += 5.0;
    pages.centered(
        pages.y,
        12.0,
        Weight::Regular,
        &format!("Date Range: {}", data.date_range),
    );
    pages.y += 15.0;

    if sections.metrics {
        pages.heading("Key Metrics");
        pages.table(&Table {
            headers: METRIC_COLUMNS.iter().map(|h| h.to_string()).collect(),
            rows: data.metrics.iter().map(metric_cells).collect(),
            size: 10.0,
            widths: ColumnWidths::Auto,
        });
        pages.y += 15.0;
    }

    if sections.campaigns {
        if pages.y > PAGE_HEIGHT_MM - SECTION_BREAK_MM {
            pages.new_page();
        }
        pages.heading("Campaign Performance");
        pages.table(&Table {
            headers: CAMPAIGN_COLUMNS.iter().map(|h| h.to_string()).collect(),
            rows: data.campaigns.iter().map(campaign_cells).collect(),
            size: 8.0,
            widths: ColumnWidths::Fixed(&CAMPAIGN_COLUMN_WIDTHS_MM),
        });
    }

    pages.footers(brand);
    debug!(pages = pages.pages.len(), "PDF laid out");
    PdfLayout {
        title,
        pages: pages.pages,
    }
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(color[0]) / 255.0,
        f32::from(color[1]) / 255.0,
        f32::from(color[2]) / 255.0,
        None,
    ))
}

fn pdf_error(e: impl std::fmt::Display) -> InsightsError {
    InsightsError::Export(format!("PDF rendering failed: {e}"))
}

/// Write a laid-out report as PDF bytes.
pub fn render(layout: &PdfLayout) -> InsightsResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        &layout.title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        layer.set_outline_color(rgb([200, 200, 200]));
        layer.set_outline_thickness(0.3);

        for op in &page.ops {
            match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => {
                    let rect = Rect::new(
                        Mm(*x),
                        Mm(PAGE_HEIGHT_MM - y - height),
                        Mm(x + width),
                        Mm(PAGE_HEIGHT_MM - y),
                    );
                    match fill {
                        Some(color) => {
                            layer.set_fill_color(rgb(*color));
                            layer.add_rect(rect.with_mode(PaintMode::FillStroke));
                        }
                        None => layer.add_rect(rect.with_mode(PaintMode::Stroke)),
                    }
                }
                DrawOp::Text {
                    x,
                    y,
                    size,
                    weight,
                    color,
                    text,
                } => {
                    let font: &IndirectFontRef = match weight {
                        Weight::Regular => &regular,
                        Weight::Bold => &bold,
                    };
                    layer.set_fill_color(rgb(*color));
                    layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT_MM - y), font);
                }
            }
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_mock::fixtures;

    fn data() -> ExportData {
        ExportData {
            metrics: fixtures::metrics(),
            campaigns: fixtures::campaigns(),
            time_series_data: Vec::new(),
            export_date: "7/15/2024".into(),
            date_range: "Last 30 days".into(),
        }
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222 units.
        let w = text_width_mm("Hi", 10.0, Weight::Regular);
        assert!((w - 0.944 * 10.0 * PT_TO_MM).abs() < 1e-4);
        assert!(text_width_mm("Hi", 10.0, Weight::Bold) > w);
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("Summer Sale 2024 - Social Media Blitz", 22.0, 8.0, Weight::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 8.0, Weight::Regular) <= 22.0);
        }
        assert_eq!(lines.join(" "), "Summer Sale 2024 - Social Media Blitz");
        assert_eq!(wrap("", 10.0, 8.0, Weight::Regular), vec![String::new()]);
    }

    #[test]
    fn test_single_page_report() {
        let report = layout(&data(), ExportSections::ALL, "ADmyBRAND");
        assert_eq!(report.title, "ADmyBRAND Dashboard Export");
        assert_eq!(report.pages.len(), 1);

        let texts: Vec<&str> = report.pages[0].texts().collect();
        assert_eq!(texts[0], "ADmyBRAND Dashboard Export");
        assert!(texts.contains(&"Key Metrics"));
        assert!(texts.contains(&"Campaign Performance"));
        assert!(texts.contains(&"$8,500"));
        assert!(texts.contains(&"$1.33"));
        assert_eq!(
            texts.last().copied(),
            Some("Generated by ADmyBRAND Insights - Page 1 of 1")
        );
    }

    #[test]
    fn test_campaign_columns_use_fixed_widths() {
        let report = layout(
            &data(),
            ExportSections {
                metrics: false,
                campaigns: true,
                time_series: true,
            },
            "ADmyBRAND",
        );
        let header_cells: Vec<f32> = report.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    width,
                    fill: Some(_),
                    ..
                } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(header_cells, CAMPAIGN_COLUMN_WIDTHS_MM.to_vec());
        assert!(!report.pages[0].texts().any(|t| t == "Key Metrics"));
    }

    #[test]
    fn test_long_tables_paginate_with_repeated_header_and_footers() {
        let mut input = data();
        let template = input.campaigns.clone();
        for _ in 0..6 {
            input.campaigns.extend(template.iter().cloned());
        }
        let report = layout(&input, ExportSections::ALL, "ADmyBRAND");
        let total = report.pages.len();
        assert!(total > 1);

        for (i, page) in report.pages.iter().enumerate() {
            let footer = format!("Generated by ADmyBRAND Insights - Page {} of {total}", i + 1);
            assert!(page.texts().any(|t| t == footer));
            assert!(page.texts().any(|t| t == "Campaign"));
            for op in &page.ops {
                if let DrawOp::Rect { y, height, .. } = op {
                    assert!(y + height <= PAGE_HEIGHT_MM - MARGIN_MM + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let report = layout(&data(), ExportSections::ALL, "ADmyBRAND");
        let bytes = render(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
