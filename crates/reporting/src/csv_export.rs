//! CSV rendering. Values are display-formatted (currency, grouping,
//! percentages) before they are written, so the output is meant for people,
//! not for re-import.

use crate::format;
use crate::model::{ExportData, ExportSections};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use insights_core::types::{Campaign, MetricData, TimeSeriesData};
use insights_core::{InsightsError, InsightsResult};

pub const METRICS_LABEL: &str = "METRICS";
pub const CAMPAIGNS_LABEL: &str = "CAMPAIGNS";
pub const TIME_SERIES_LABEL: &str = "TIME SERIES DATA";

pub const METRIC_HEADERS: [&str; 5] = ["Metric", "Value", "Change", "Change Type", "Description"];
pub const CAMPAIGN_HEADERS: [&str; 14] = [
    "Campaign Name",
    "Channel",
    "Status",
    "Budget",
    "Spent",
    "Impressions",
    "Clicks",
    "Conversions",
    "CTR (%)",
    "CPC ($)",
    "ROAS",
    "Start Date",
    "End Date",
    "Objective",
];
pub const TIME_SERIES_HEADERS: [&str; 5] = ["Date", "Revenue", "Users", "Conversions", "Impressions"];

pub fn metric_row(metric: &MetricData) -> Vec<String> {
    vec![
        metric.title.clone(),
        metric.value.to_string(),
        metric.change.clone(),
        metric.change_type.to_string(),
        metric.description.clone(),
    ]
}

pub fn campaign_row(campaign: &Campaign) -> Vec<String> {
    vec![
        campaign.name.clone(),
        campaign.channel.to_string(),
        campaign.status.to_string(),
        format::currency(campaign.budget),
        format::currency(campaign.spent),
        format::count(campaign.impressions),
        format::count(campaign.clicks),
        format::count(campaign.conversions),
        format::percentage(campaign.ctr),
        format!("{:.2}", campaign.cpc),
        format!("{:.1}x", campaign.roas),
        campaign.start_date.format("%Y-%m-%d").to_string(),
        campaign.end_date.format("%Y-%m-%d").to_string(),
        campaign.objective.clone(),
    ]
}

pub fn time_series_row(point: &TimeSeriesData) -> Vec<String> {
    vec![
        point.date.format("%Y-%m-%d").to_string(),
        point.revenue.to_string(),
        point.users.to_string(),
        point.conversions.to_string(),
        point.impressions.to_string(),
    ]
}

/// Write `rows` with every field quoted, one `\n`-terminated line each.
fn quoted_rows<I>(rows: I) -> InsightsResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| InsightsError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| InsightsError::Export(e.to_string()))
}

fn section<I>(label: &str, headers: &[&str], rows: I) -> InsightsResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = format!("{label}\n{}\n", headers.join(","));
    out.push_str(&quoted_rows(rows)?);
    Ok(out)
}

/// Full dashboard export: a preamble followed by the included sections,
/// separated by blank lines.
pub fn render_dashboard(
    data: &ExportData,
    sections: ExportSections,
    brand: &str,
) -> InsightsResult<String> {
    let mut out = format!(
        "{brand} Dashboard Export\nExport Date: {}\nDate Range: {}\n\n",
        data.export_date, data.date_range
    );

    let mut parts = Vec::with_capacity(3);
    if sections.metrics {
        parts.push(section(
            METRICS_LABEL,
            &METRIC_HEADERS,
            data.metrics.iter().map(metric_row),
        )?);
    }
    if sections.campaigns {
        parts.push(section(
            CAMPAIGNS_LABEL,
            &CAMPAIGN_HEADERS,
            data.campaigns.iter().map(campaign_row),
        )?);
    }
    if sections.time_series {
        parts.push(section(
            TIME_SERIES_LABEL,
            &TIME_SERIES_HEADERS,
            data.time_series_data.iter().map(time_series_row),
        )?);
    }
    out.push_str(&parts.join("\n"));
    Ok(out)
}

/// Single-table export: header and rows all quoted, joined by `\n` with no
/// trailing newline.
fn table<I>(headers: &[&str], rows: I) -> InsightsResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let body = quoted_rows(std::iter::once(header).chain(rows))?;
    Ok(body.trim_end_matches('\n').to_string())
}

pub fn campaigns_table(campaigns: &[Campaign]) -> InsightsResult<String> {
    table(&CAMPAIGN_HEADERS, campaigns.iter().map(campaign_row))
}

pub fn metrics_table(metrics: &[MetricData]) -> InsightsResult<String> {
    table(&METRIC_HEADERS, metrics.iter().map(metric_row))
}

pub fn time_series_table(points: &[TimeSeriesData]) -> InsightsResult<String> {
    table(&TIME_SERIES_HEADERS, points.iter().map(time_series_row))
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

    fn section_lines<'a>(csv: &'a str, label: &str) -> Vec<&'a str> {
        csv.lines()
            .skip_while(|l| *l != label)
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_empty_sections_keep_their_header() {
        let mut input = data();
        input.metrics.clear();
        input.campaigns.truncate(1);
        let csv = render_dashboard(&input, ExportSections::ALL, "ADmyBRAND").unwrap();

        assert!(csv.starts_with(
            "ADmyBRAND Dashboard Export\nExport Date: 7/15/2024\nDate Range: Last 30 days\n\n"
        ));
        assert_eq!(section_lines(&csv, METRICS_LABEL), vec![METRIC_HEADERS.join(",")]);
        let campaigns = section_lines(&csv, CAMPAIGNS_LABEL);
        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[0], CAMPAIGN_HEADERS.join(","));
        assert_eq!(
            section_lines(&csv, TIME_SERIES_LABEL),
            vec![TIME_SERIES_HEADERS.join(",")]
        );
    }

    #[test]
    fn test_campaign_row_is_display_formatted() {
        let campaign = fixtures::campaigns().remove(0);
        let csv = render_dashboard(
            &ExportData {
                campaigns: vec![campaign],
                ..ExportData::default()
            },
            ExportSections::ALL,
            "ADmyBRAND",
        )
        .unwrap();
        let row = section_lines(&csv, CAMPAIGNS_LABEL)[1];
        assert_eq!(
            row,
            "\"Summer Sale 2024 - Social Media Blitz\",\"Social Media\",\"Active\",\"$8,500\",\
             \"$6,240\",\"245,000\",\"4,680\",\"312\",\"1.9%\",\"1.33\",\"5.2x\",\"2024-06-01\",\
             \"2024-08-31\",\"Drive Sales & Brand Awareness\""
        );
    }

    #[test]
    fn test_excluded_sections_are_omitted() {
        let sections = ExportSections {
            metrics: false,
            campaigns: true,
            time_series: false,
        };
        let csv = render_dashboard(&data(), sections, "ADmyBRAND").unwrap();
        assert!(!csv.contains(METRICS_LABEL));
        assert!(!csv.contains(TIME_SERIES_LABEL));
        assert_eq!(section_lines(&csv, CAMPAIGNS_LABEL).len(), 9);
    }

    #[test]
    fn test_sections_separated_by_blank_line() {
        let csv = render_dashboard(&data(), ExportSections::ALL, "ADmyBRAND").unwrap();
        assert!(csv.contains("\n\nCAMPAIGNS\n"));
        assert!(csv.contains("\n\nTIME SERIES DATA\n"));
        assert!(csv.ends_with("Date,Revenue,Users,Conversions,Impressions\n"));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let mut metric = fixtures::metrics()[0].clone();
        metric.description = "the \"real\" number".into();
        let csv = metrics_table(&[metric]).unwrap();
        assert!(csv.contains("\"the \"\"real\"\" number\""));
    }

    #[test]
    fn test_quick_table_quotes_header_and_has_no_trailing_newline() {
        let csv = time_series_table(&[]).unwrap();
        assert_eq!(
            csv,
            "\"Date\",\"Revenue\",\"Users\",\"Conversions\",\"Impressions\""
        );
        let campaigns = campaigns_table(&fixtures::campaigns()).unwrap();
        assert_eq!(campaigns.lines().count(), 9);
        assert!(!campaigns.ends_with('\n'));
    }
}
