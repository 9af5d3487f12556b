//! ADmyBRAND Insights: command-line front-end for the dashboard data layer.
//!
//! Fetches dashboard data through the cached API facade, runs the live
//! simulators for a while, and writes CSV/PDF exports.

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use insights_api::{
    ApiService, CampaignQuery, CampaignSortField, DashboardData, MockDataSource, SortOrder,
};
use insights_core::config::AppConfig;
use insights_core::types::{
    CampaignStatus, Channel, DateRange, RealTimeActivity, RealTimeMetrics,
};
use insights_core::{Clock, SystemClock};
use insights_mock::fixtures;
use insights_realtime::{run_until, LiveSession};
use insights_reporting::{ExportArtifact, ExportData, ExportFormat, ExportSections, QuickExport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "insights")]
#[command(about = "Marketing dashboard data layer: mock API, live simulators and exports")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Skip the simulated endpoint latency
    #[arg(long, global = true, default_value_t = false)]
    no_latency: bool,

    /// PRNG seed for the mock data (overrides config)
    #[arg(long, global = true, env = "INSIGHTS__REALTIME__SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headline metrics, time series, channels and funnel
    Overview,

    /// Filtered, sorted and paginated campaign list
    Campaigns {
        #[arg(long)]
        status: Option<CampaignStatus>,
        #[arg(long)]
        channel: Option<Channel>,
        #[arg(long)]
        sort_by: Option<CampaignSortField>,
        /// Sort descending
        #[arg(long, default_value_t = false)]
        desc: bool,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Detailed analytics for a date window
    Analytics {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },

    /// Competitor analysis and industry benchmarks
    Competitors,

    /// A/B test results
    AbTests,

    /// Run the live simulators and print what they produced
    Realtime {
        #[arg(long, default_value_t = 30)]
        seconds: u64,
    },

    /// Export the dashboard with a chosen filename and sections
    Export {
        #[arg(long, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long)]
        filename: String,
        #[arg(long, default_value_t = false)]
        no_metrics: bool,
        #[arg(long, default_value_t = false)]
        no_campaigns: bool,
        #[arg(long, default_value_t = false)]
        no_time_series: bool,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// One-click export: full, campaigns, metrics or timeseries
    QuickExport {
        kind: QuickExport,
        #[arg(long, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeSummary<'a> {
    ticks: usize,
    connected: bool,
    metrics: Option<&'a RealTimeMetrics>,
    activities: Vec<&'a RealTimeActivity>,
    recently_updated: &'a [String],
    chart_points: usize,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "insights=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// en-US short date, e.g. `7/15/2024`.
fn export_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

async fn export_data(
    api: Arc<ApiService<MockDataSource>>,
    config: &AppConfig,
    today: NaiveDate,
) -> anyhow::Result<ExportData> {
    let mut dashboard = DashboardData::new(api, config.dashboard.clone());
    dashboard.fetch(true).await;
    if let Some(err) = dashboard.error.take() {
        anyhow::bail!("dashboard fetch failed: {err}");
    }
    Ok(ExportData {
        metrics: dashboard.metrics,
        campaigns: dashboard.campaigns,
        time_series_data: dashboard.time_series,
        export_date: export_date(today),
        date_range: config.export.default_date_range.clone(),
    })
}

fn save(artifact: &ExportArtifact, out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = artifact.write_to(out_dir)?;
    println!("{}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // CLI overrides
    if let Some(seed) = cli.seed {
        config.realtime.seed = Some(seed);
    }
    if cli.no_latency {
        let api = &mut config.api;
        api.overview_latency_ms = 0;
        api.campaigns_latency_ms = 0;
        api.analytics_latency_ms = 0;
        api.competitors_latency_ms = 0;
        api.ab_tests_latency_ms = 0;
        api.realtime_latency_ms = 0;
    }

    info!(
        seed = ?config.realtime.seed,
        overview_latency_ms = config.api.overview_latency_ms,
        brand = %config.export.brand,
        "Configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let api = Arc::new(
        ApiService::new(
            MockDataSource::new(config.realtime.seed),
            clock.clone(),
            config.api.clone(),
        )
        .with_overview_days(config.dashboard.overview_days),
    );
    let today = clock.now().date_naive();

    match cli.command {
        Command::Overview => print_json(&api.dashboard_overview(None).await?)?,
        Command::Campaigns {
            status,
            channel,
            sort_by,
            desc,
            page,
            limit,
        } => {
            let query = CampaignQuery {
                status,
                channel,
                page,
                limit,
                sort_by,
                sort_order: sort_by.map(|_| if desc { SortOrder::Desc } else { SortOrder::Asc }),
            };
            print_json(&api.campaigns(query).await?)?;
        }
        Command::Analytics { start, end } => {
            print_json(&api.analytics(DateRange::new(start, end)).await?)?
        }
        Command::Competitors => print_json(&api.competitor_analysis().await?)?,
        Command::AbTests => print_json(&api.ab_test_results().await?)?,
        Command::Realtime { seconds } => {
            let mut session = LiveSession::new(config.realtime.clone(), fixtures::campaigns());
            session.start(clock.now());
            let ticks = run_until(
                &mut session,
                clock.clone(),
                std::time::Duration::from_millis(250),
                tokio::time::sleep(std::time::Duration::from_secs(seconds)),
            )
            .await;
            session.stop();
            info!(ticks, seconds, "Live session finished");

            print_json(&RealtimeSummary {
                ticks,
                connected: session.is_connected(),
                metrics: session.metrics.latest(),
                activities: session.activities.iter().collect(),
                recently_updated: session.drift.recent_updates(),
                chart_points: session.chart.len(),
            })?;
        }
        Command::Export {
            format,
            filename,
            no_metrics,
            no_campaigns,
            no_time_series,
            out_dir,
        } => {
            let sections = ExportSections {
                metrics: !no_metrics,
                campaigns: !no_campaigns,
                time_series: !no_time_series,
            };
            let data = export_data(api, &config, today).await?;
            let preview = insights_reporting::preview(&data, &config.export.brand)?;
            info!(
                metrics = preview.total_metrics,
                campaigns = preview.total_campaigns,
                points = preview.total_data_points,
                size = %preview.estimated_file_size,
                "Export preview"
            );
            let artifact =
                insights_reporting::export(&filename, format, &data, sections, &config.export.brand)?;
            save(&artifact, &out_dir)?;
        }
        Command::QuickExport {
            kind,
            format,
            out_dir,
        } => {
            let data = export_data(api, &config, today).await?;
            let artifact =
                insights_reporting::quick_export(kind, format, &data, &config.export.brand, today)?;
            save(&artifact, &out_dir)?;
        }
    }

    Ok(())
}
