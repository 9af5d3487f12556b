//! Export dialog flow.
//!
//! ```text
//! Idle --begin--> Exporting --(delay elapsed, render ok)--> Complete --(reset delay)--> Idle
//!                     \--(render failed)--> Idle with last_error
//! ```
//!
//! Validation happens in [`ExportDialog::begin`]; a rejected request never
//! leaves `Idle`. Timing is driven by the caller's clock through `poll`.

use crate::model::{ExportArtifact, ExportData, ExportFormat, ExportSections};
use chrono::{DateTime, Utc};
use insights_core::config::ExportConfig;
use insights_core::{deadline, millis, InsightsError, InsightsResult};
use tracing::{error, info};

pub const EXPORT_FAILED_MESSAGE: &str = "There was an error exporting your data. Please try again.";
pub const FILENAME_REQUIRED_MESSAGE: &str = "Please enter a filename for your export.";
pub const SECTION_REQUIRED_MESSAGE: &str = "Please select at least one data section to export.";

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState {
    Idle,
    /// Format and sections are fixed when the export begins.
    Exporting {
        started: DateTime<Utc>,
        filename: String,
        format: ExportFormat,
        sections: ExportSections,
    },
    Complete {
        finished: DateTime<Utc>,
        filename: String,
    },
}

pub struct ExportDialog {
    config: ExportConfig,
    state: DialogState,
    last_error: Option<String>,

    pub format: ExportFormat,
    pub filename: String,
    pub sections: ExportSections,
}

impl ExportDialog {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            state: DialogState::Idle,
            last_error: None,
            format: ExportFormat::Csv,
            filename: String::new(),
            sections: ExportSections::ALL,
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.state == DialogState::Idle
    }

    /// The final `<filename>.<ext>` for the current inputs.
    pub fn final_filename(&self) -> String {
        format!("{}.{}", self.filename.trim(), self.format.extension())
    }

    /// Validate the inputs and start exporting.
    pub fn begin(&mut self, now: DateTime<Utc>) -> InsightsResult<()> {
        if !self.is_idle() {
            return Err(InsightsError::Validation(
                "An export is already in progress.".into(),
            ));
        }
        if self.filename.trim().is_empty() {
            return Err(InsightsError::Validation(FILENAME_REQUIRED_MESSAGE.into()));
        }
        if !self.sections.any() {
            return Err(InsightsError::Validation(SECTION_REQUIRED_MESSAGE.into()));
        }

        let filename = self.final_filename();
        info!(filename = %filename, format = %self.format, "Export started");
        self.last_error = None;
        self.state = DialogState::Exporting {
            started: now,
            filename,
            format: self.format,
            sections: self.sections,
        };
        Ok(())
    }

    /// Advance the flow with the built-in renderers. Returns the artifact on
    /// the poll that completes the export.
    pub fn poll(&mut self, now: DateTime<Utc>, data: &ExportData) -> Option<ExportArtifact> {
        let brand = self.config.brand.clone();
        self.poll_with(now, |format, sections| {
            crate::render(format, data, sections, &brand)
        })
    }

    pub fn poll_with<F>(&mut self, now: DateTime<Utc>, render: F) -> Option<ExportArtifact>
    where
        F: FnOnce(ExportFormat, ExportSections) -> InsightsResult<Vec<u8>>,
    {
        match &self.state {
            DialogState::Idle => None,
            DialogState::Exporting {
                started,
                filename,
                format,
                sections,
            } => {
                if now < deadline(*started, millis(self.config.processing_delay_ms)) {
                    return None;
                }
                let filename = filename.clone();
                let (format, sections) = (*format, *sections);
                match render(format, sections) {
                    Ok(bytes) => {
                        info!(filename = %filename, bytes = bytes.len(), "Export complete");
                        metrics::counter!("export.completed", "format" => format.extension())
                            .increment(1);
                        self.state = DialogState::Complete {
                            finished: now,
                            filename: filename.clone(),
                        };
                        Some(ExportArtifact {
                            filename,
                            format,
                            bytes,
                        })
                    }
                    Err(e) => {
                        error!(filename = %filename, error = %e, "Export failed");
                        metrics::counter!("export.failed").increment(1);
                        self.state = DialogState::Idle;
                        self.last_error = Some(EXPORT_FAILED_MESSAGE.to_string());
                        None
                    }
                }
            }
            DialogState::Complete { finished, .. } => {
                if now >= deadline(*finished, millis(self.config.complete_reset_ms)) {
                    self.state = DialogState::Idle;
                }
                None
            }
        }
    }

    /// Back to the defaults: CSV, empty filename, every section.
    pub fn reset(&mut self) {
        self.state = DialogState::Idle;
        self.last_error = None;
        self.format = ExportFormat::Csv;
        self.filename.clear();
        self.sections = ExportSections::ALL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use insights_mock::fixtures;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 10, 0, 0).unwrap()
    }

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
    fn test_validation_keeps_dialog_idle() {
        let mut dialog = ExportDialog::new(ExportConfig::default());
        dialog.filename = "   ".into();
        assert!(matches!(dialog.begin(t0()), Err(InsightsError::Validation(_))));
        assert!(dialog.is_idle());

        dialog.filename = "report".into();
        dialog.sections = ExportSections {
            metrics: false,
            campaigns: false,
            time_series: false,
        };
        assert!(matches!(dialog.begin(t0()), Err(InsightsError::Validation(_))));
        assert!(dialog.is_idle());
    }

    #[test]
    fn test_full_flow() {
        let mut dialog = ExportDialog::new(ExportConfig::default());
        dialog.filename = "q3-report".into();
        dialog.begin(t0()).unwrap();
        assert!(dialog.begin(t0()).is_err());

        let data = data();
        assert!(dialog.poll(t0() + Duration::milliseconds(1499), &data).is_none());

        let artifact = dialog
            .poll(t0() + Duration::milliseconds(1500), &data)
            .unwrap();
        assert_eq!(artifact.filename, "q3-report.csv");
        assert_eq!(artifact.mime(), "text/csv;charset=utf-8");
        assert!(String::from_utf8(artifact.bytes).unwrap().contains("CAMPAIGNS"));
        assert!(matches!(dialog.state(), DialogState::Complete { .. }));

        dialog.poll(t0() + Duration::milliseconds(3499), &data);
        assert!(!dialog.is_idle());
        dialog.poll(t0() + Duration::milliseconds(3500), &data);
        assert!(dialog.is_idle());
    }

    #[test]
    fn test_render_failure_returns_to_idle_with_error() {
        let mut dialog = ExportDialog::new(ExportConfig::default());
        dialog.filename = "broken".into();
        dialog.format = ExportFormat::Pdf;
        dialog.begin(t0()).unwrap();

        let artifact = dialog.poll_with(t0() + Duration::seconds(2), |_, _| {
            Err(InsightsError::Export("boom".into()))
        });
        assert!(artifact.is_none());
        assert!(dialog.is_idle());
        assert_eq!(dialog.last_error(), Some(EXPORT_FAILED_MESSAGE));

        // Retrying clears the error.
        dialog.begin(t0() + Duration::seconds(3)).unwrap();
        assert!(dialog.last_error().is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut dialog = ExportDialog::new(ExportConfig::default());
        dialog.filename = "x".into();
        dialog.format = ExportFormat::Pdf;
        dialog.sections.metrics = false;
        dialog.begin(t0()).unwrap();

        dialog.reset();
        assert!(dialog.is_idle());
        assert_eq!(dialog.format, ExportFormat::Csv);
        assert!(dialog.filename.is_empty());
        assert_eq!(dialog.sections, ExportSections::ALL);
    }

    #[test]
    fn test_inputs_edited_mid_export_do_not_leak_into_artifact() {
        let mut dialog = ExportDialog::new(ExportConfig::default());
        dialog.filename = "locked".into();
        dialog.sections = ExportSections {
            metrics: false,
            campaigns: true,
            time_series: false,
        };
        dialog.begin(t0()).unwrap();

        dialog.format = ExportFormat::Pdf;
        dialog.sections = ExportSections::ALL;

        let artifact = dialog
            .poll(t0() + Duration::milliseconds(1500), &data())
            .unwrap();
        assert_eq!(artifact.filename, "locked.csv");
        assert_eq!(artifact.format, ExportFormat::Csv);
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("CAMPAIGNS"));
        assert!(!text.contains("METRICS"));
    }

    #[test]
    fn test_oversized_delays_never_panic() {
        let config = ExportConfig {
            processing_delay_ms: u64::MAX,
            complete_reset_ms: u64::MAX,
            ..ExportConfig::default()
        };
        let mut dialog = ExportDialog::new(config);
        dialog.filename = "slow".into();
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        dialog.begin(late).unwrap();

        assert!(dialog.poll(late + Duration::hours(1), &data()).is_none());
        assert!(dialog.poll(DateTime::<Utc>::MAX_UTC, &data()).is_some());
        dialog.poll(DateTime::<Utc>::MAX_UTC, &data());
        assert!(dialog.is_idle());
    }
}
