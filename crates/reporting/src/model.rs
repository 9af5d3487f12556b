//! Export inputs, options and outputs.

use chrono::NaiveDate;
use insights_core::types::{Campaign, MetricData, TimeSeriesData};
use insights_core::{InsightsError, InsightsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Everything a dashboard export can contain, plus its labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub metrics: Vec<MetricData>,
    pub campaigns: Vec<Campaign>,
    pub time_series_data: Vec<TimeSeriesData>,
    pub export_date: String,
    pub date_range: String,
}

/// Which sections go into an export. Excluded sections are left out
/// entirely; included but empty sections keep their header.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSections {
    pub metrics: bool,
    pub campaigns: bool,
    pub time_series: bool,
}

impl ExportSections {
    pub const ALL: ExportSections = ExportSections {
        metrics: true,
        campaigns: true,
        time_series: true,
    };

    pub fn any(&self) -> bool {
        self.metrics || self.campaigns || self.time_series
    }
}

impl Default for ExportSections {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// One-click exports from the dashboard menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuickExport {
    Full,
    Campaigns,
    Metrics,
    #[serde(rename = "timeseries")]
    TimeSeries,
}

impl QuickExport {
    pub fn stem(&self) -> &'static str {
        match self {
            QuickExport::Full => "dashboard-full",
            QuickExport::Campaigns => "campaigns",
            QuickExport::Metrics => "metrics",
            QuickExport::TimeSeries => "timeseries",
        }
    }

    /// `<stem>-<YYYY-MM-DD>.<ext>`
    pub fn filename(&self, format: ExportFormat, date: NaiveDate) -> String {
        format!("{}-{}.{}", self.stem(), date.format("%Y-%m-%d"), format.extension())
    }

    /// Only the full export has a PDF rendition.
    pub fn supports(&self, format: ExportFormat) -> bool {
        matches!((self, format), (_, ExportFormat::Csv) | (QuickExport::Full, _))
    }
}

impl FromStr for QuickExport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "full" => Ok(QuickExport::Full),
            "campaigns" => Ok(QuickExport::Campaigns),
            "metrics" => Ok(QuickExport::Metrics),
            "timeseries" => Ok(QuickExport::TimeSeries),
            other => Err(format!("unknown quick export: {other}")),
        }
    }
}

/// Counts shown before exporting, plus the size of the full CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportPreview {
    pub total_metrics: usize,
    pub total_campaigns: usize,
    pub total_data_points: usize,
    pub estimated_file_size: String,
}

/// A rendered export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// Write into `dir` through a temporary file so a failed write never
    /// leaves a partial export behind.
    pub fn write_to(&self, dir: &Path) -> InsightsResult<PathBuf> {
        if self.filename.is_empty() || self.filename.contains(['/', '\\']) {
            return Err(InsightsError::Validation(format!(
                "invalid export filename: {:?}",
                self.filename
            )));
        }
        let target = dir.join(&self.filename);
        let tmp = dir.join(format!(".{}.{}.tmp", self.filename, uuid::Uuid::new_v4()));

        if let Err(e) = fs::write(&tmp, &self.bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(tmp = %tmp.display(), "Export moved into place");
        info!(path = %target.display(), bytes = self.bytes.len(), "Export written");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_export_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(
            QuickExport::Campaigns.filename(ExportFormat::Csv, date),
            "campaigns-2024-07-15.csv"
        );
        assert_eq!(
            QuickExport::Full.filename(ExportFormat::Pdf, date),
            "dashboard-full-2024-07-15.pdf"
        );
        assert!(QuickExport::Full.supports(ExportFormat::Pdf));
        assert!(!QuickExport::Metrics.supports(ExportFormat::Pdf));
        assert_eq!("time-series".parse::<QuickExport>(), Ok(QuickExport::TimeSeries));
    }

    #[test]
    fn test_sections() {
        assert!(ExportSections::default().any());
        let none = ExportSections {
            metrics: false,
            campaigns: false,
            time_series: false,
        };
        assert!(!none.any());
    }

    #[test]
    fn test_write_to_leaves_only_target() {
        let dir = std::env::temp_dir().join(format!("insights-export-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let artifact = ExportArtifact {
            filename: "report.csv".into(),
            format: ExportFormat::Csv,
            bytes: b"a,b\n".to_vec(),
        };
        let path = artifact.write_to(&dir).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");

        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_to_rejects_path_separators() {
        let artifact = ExportArtifact {
            filename: "../escape.csv".into(),
            format: ExportFormat::Csv,
            bytes: Vec::new(),
        };
        let err = artifact.write_to(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, InsightsError::Validation(_)));
    }
}
