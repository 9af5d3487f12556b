//! Dashboard exports: display formatting, CSV and PDF renderers, quick
//! exports and the export dialog flow.

pub mod csv_export;
pub mod dialog;
pub mod format;
pub mod model;
pub mod pdf;

pub use dialog::{DialogState, ExportDialog};
pub use model::{
    ExportArtifact, ExportData, ExportFormat, ExportPreview, ExportSections, QuickExport,
};

use chrono::NaiveDate;
use insights_core::{InsightsError, InsightsResult};
use tracing::debug;

/// Render `data` in `format`, keeping only the included sections.
pub fn render(
    format: ExportFormat,
    data: &ExportData,
    sections: ExportSections,
    brand: &str,
) -> InsightsResult<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Csv => csv_export::render_dashboard(data, sections, brand)?.into_bytes(),
        ExportFormat::Pdf => pdf::render(&pdf::layout(data, sections, brand))?,
    };
    debug!(format = %format, bytes = bytes.len(), "Rendered export");
    Ok(bytes)
}

/// Render a named export without going through the dialog.
pub fn export(
    filename: &str,
    format: ExportFormat,
    data: &ExportData,
    sections: ExportSections,
    brand: &str,
) -> InsightsResult<ExportArtifact> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(InsightsError::Validation(
            dialog::FILENAME_REQUIRED_MESSAGE.into(),
        ));
    }
    if !sections.any() {
        return Err(InsightsError::Validation(
            dialog::SECTION_REQUIRED_MESSAGE.into(),
        ));
    }
    let bytes = render(format, data, sections, brand)?;
    metrics::counter!("export.completed", "format" => format.extension()).increment(1);
    Ok(ExportArtifact {
        filename: format!("{filename}.{}", format.extension()),
        format,
        bytes,
    })
}

/// One-click export named `<category>-<date>.<ext>`.
pub fn quick_export(
    kind: QuickExport,
    format: ExportFormat,
    data: &ExportData,
    brand: &str,
    today: NaiveDate,
) -> InsightsResult<ExportArtifact> {
    if !kind.supports(format) {
        return Err(InsightsError::Validation(format!(
            "{} export is only available as CSV",
            kind.stem()
        )));
    }
    let bytes = match kind {
        QuickExport::Full => render(format, data, ExportSections::ALL, brand)?,
        QuickExport::Campaigns => csv_export::campaigns_table(&data.campaigns)?.into_bytes(),
        QuickExport::Metrics => csv_export::metrics_table(&data.metrics)?.into_bytes(),
        QuickExport::TimeSeries => {
            csv_export::time_series_table(&data.time_series_data)?.into_bytes()
        }
    };
    metrics::counter!("export.completed", "format" => format.extension()).increment(1);
    Ok(ExportArtifact {
        filename: kind.filename(format, today),
        format,
        bytes,
    })
}

/// Counts plus the size of the full CSV export.
pub fn preview(data: &ExportData, brand: &str) -> InsightsResult<ExportPreview> {
    let csv = csv_export::render_dashboard(data, ExportSections::ALL, brand)?;
    Ok(ExportPreview {
        total_metrics: data.metrics.len(),
        total_campaigns: data.campaigns.len(),
        total_data_points: data.time_series_data.len(),
        estimated_file_size: format::file_size(csv.len() as u64),
    })
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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    #[test]
    fn test_quick_export_campaigns_csv() {
        let artifact =
            quick_export(QuickExport::Campaigns, ExportFormat::Csv, &data(), "ADmyBRAND", today())
                .unwrap();
        assert_eq!(artifact.filename, "campaigns-2024-07-15.csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("\"Campaign Name\",\"Channel\""));
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn test_quick_export_rejects_pdf_tables() {
        let err = quick_export(QuickExport::Metrics, ExportFormat::Pdf, &data(), "ADmyBRAND", today())
            .unwrap_err();
        assert!(matches!(err, InsightsError::Validation(_)));
    }

    #[test]
    fn test_quick_export_full_pdf() {
        let artifact =
            quick_export(QuickExport::Full, ExportFormat::Pdf, &data(), "ADmyBRAND", today())
                .unwrap();
        assert_eq!(artifact.filename, "dashboard-full-2024-07-15.pdf");
        assert_eq!(artifact.mime(), "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_validates_and_names_file() {
        let data = data();
        assert!(export("  ", ExportFormat::Csv, &data, ExportSections::ALL, "ADmyBRAND").is_err());
        let none = ExportSections {
            metrics: false,
            campaigns: false,
            time_series: false,
        };
        assert!(export("report", ExportFormat::Csv, &data, none, "ADmyBRAND").is_err());

        let artifact =
            export(" report ", ExportFormat::Csv, &data, ExportSections::ALL, "ADmyBRAND").unwrap();
        assert_eq!(artifact.filename, "report.csv");
    }

    #[test]
    fn test_preview_counts_and_size() {
        let data = data();
        let preview = preview(&data, "ADmyBRAND").unwrap();
        assert_eq!(preview.total_metrics, 4);
        assert_eq!(preview.total_campaigns, 8);
        assert_eq!(preview.total_data_points, 0);
        assert!(preview.estimated_file_size.ends_with("KB"));

        let empty = super::preview(&ExportData::default(), "ADmyBRAND").unwrap();
        assert!(empty.estimated_file_size.ends_with("Bytes"));
    }
}
