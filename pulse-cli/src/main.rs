use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulse_api::{DataSource, ExportFormat};
use pulse_core::{KpiStatus, aggregate, build_trend, classify};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(
    name = "pulse",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PULSE_BUILD_SHA"), ")"),
    about = "Project-health dashboard CLI"
)]
struct Cli {
    /// Use the offline fixture source regardless of config
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Latest KPI values for a project, with derived statuses
    Kpis { project_id: i64 },

    /// Measurement history and trend chart for one metric
    History {
        project_id: i64,
        metric_code: String,

        /// Chart width in columns
        #[arg(long, default_value_t = 60)]
        width: usize,

        /// Chart height in rows
        #[arg(long, default_value_t = 12)]
        height: usize,
    },

    /// Phase plan, per-phase progress, and the weighted overall percentage
    Planning { project_id: i64 },

    /// List threshold breaches; exits non-zero on any critical breach
    Check { project_id: i64 },

    /// List the configured metric definitions
    Metrics,

    /// Export the KPI report for a project
    Export {
        project_id: i64,

        /// csv, excel, or pdf
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output path (defaults to kpi-report-<project>.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write a default ~/.pulse/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let source = cfg.data_source(cli.mock);

    match cli.command {
        Command::Kpis { project_id } => show_kpis(&source, project_id).await?,
        Command::History {
            project_id,
            metric_code,
            width,
            height,
        } => show_history(&source, project_id, &metric_code, width, height).await?,
        Command::Planning { project_id } => show_planning(&source, project_id).await?,
        Command::Check { project_id } => check_breaches(&source, project_id).await?,
        Command::Metrics => show_metrics(&source).await?,
        Command::Export {
            project_id,
            format,
            out,
        } => export_report(&source, project_id, &format, out).await?,
        Command::Init => config::init_config()?,
    }

    Ok(())
}

async fn show_kpis(source: &DataSource, project_id: i64) -> Result<()> {
    let catalog = source.metric_catalog().await?;
    let kpis = source.project_kpis(project_id).await?;

    if kpis.is_empty() {
        println!("No KPIs available for project {project_id}");
        return Ok(());
    }

    println!("KPIs for project {project_id}\n");
    println!(
        "{:<22} {:<26} {:>14}  {:<8}  {}",
        "CODE", "METRIC", "VALUE", "STATUS", "MEASURED"
    );

    let mut warnings = 0;
    let mut criticals = 0;
    for kpi in &kpis {
        let name = catalog
            .get(&kpi.metric_code)
            .map(|d| d.name.as_str())
            .unwrap_or("(unknown metric)");
        let status = catalog
            .get(&kpi.metric_code)
            .map(|d| classify(kpi.value, d))
            .unwrap_or(KpiStatus::Unknown);
        match status {
            KpiStatus::Warning => warnings += 1,
            KpiStatus::Critical => criticals += 1,
            _ => {}
        }

        println!(
            "{:<22} {:<26} {:>14}  {:<8}  {}",
            kpi.metric_code,
            name,
            render::format_value(kpi.value, catalog.unit(&kpi.metric_code)),
            render::status_badge(status),
            render::format_date(&kpi.measured_at)
        );
    }

    println!(
        "\n{} metrics, {} warning, {} critical",
        kpis.len(),
        warnings,
        criticals
    );
    Ok(())
}

async fn show_history(
    source: &DataSource,
    project_id: i64,
    metric_code: &str,
    width: usize,
    height: usize,
) -> Result<()> {
    let catalog = source.metric_catalog().await?;
    let name = catalog
        .get(metric_code)
        .map(|d| d.name.as_str())
        .unwrap_or(metric_code);
    let unit = catalog.unit(metric_code);

    let history = source.kpi_history(project_id, metric_code).await?;

    let series = match build_trend(&history) {
        Ok(series) => series,
        Err(pulse_core::TrendError::EmptyHistory) => {
            println!("No history available for {name} on project {project_id}");
            return Ok(());
        }
    };

    println!("{name} — project {project_id}\n");
    print!("{}", render::trend_chart(&series, width, height));

    println!("\n{:<18} {:>14}  {}", "DATE", "VALUE", "COMMENT");
    // Newest first in the table
    let mut rows: Vec<_> = history.iter().collect();
    rows.sort_by_key(|m| std::cmp::Reverse(m.measured_at));
    for m in rows {
        println!(
            "{:<18} {:>14}  {}",
            render::format_datetime(&m.measured_at),
            render::format_value(m.value, unit),
            m.comment.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn show_planning(source: &DataSource, project_id: i64) -> Result<()> {
    let plans = source.phase_plans(project_id).await?;
    let progress = source.phase_progress(project_id).await?;

    if plans.is_empty() {
        println!("No planning phases defined for project {project_id}");
        return Ok(());
    }

    let overall = aggregate(&plans, &progress);
    println!("Planning for project {project_id}\n");
    println!("Overall  {}\n", render::progress_bar(overall, 30));

    for plan in &plans {
        match progress.get(&plan.phase_id) {
            Some(&pct) => println!(
                "{:<16} weight {:>5}   {}",
                plan.name,
                render::format_percent(plan.weight_percent),
                render::progress_bar(pct, 30)
            ),
            None => println!(
                "{:<16} weight {:>5}   (not tracked yet)",
                plan.name,
                render::format_percent(plan.weight_percent)
            ),
        }
    }
    Ok(())
}

async fn check_breaches(source: &DataSource, project_id: i64) -> Result<()> {
    let catalog = source.metric_catalog().await?;
    let kpis = source.project_kpis(project_id).await?;

    let mut breaches = 0;
    let mut criticals = 0;
    for kpi in &kpis {
        let Some(def) = catalog.get(&kpi.metric_code) else {
            continue;
        };
        if !def.enable_notifications {
            continue;
        }
        match classify(kpi.value, def) {
            KpiStatus::Critical => {
                criticals += 1;
                breaches += 1;
                println!(
                    "CRITICAL  {:<26} {}",
                    def.name,
                    render::format_value(kpi.value, catalog.unit(&kpi.metric_code))
                );
            }
            KpiStatus::Warning => {
                breaches += 1;
                println!(
                    "WARNING   {:<26} {}",
                    def.name,
                    render::format_value(kpi.value, catalog.unit(&kpi.metric_code))
                );
            }
            _ => {}
        }
    }

    if breaches == 0 {
        println!("No threshold breaches for project {project_id}");
    } else {
        info!(breaches, criticals, project_id, "threshold sweep complete");
    }

    if criticals > 0 {
        std::process::exit(1);
    }
    Ok(())
}

async fn show_metrics(source: &DataSource) -> Result<()> {
    let catalog = source.metric_catalog().await?;

    println!(
        "{:<22} {:<26} {:<6} {:>9} {:>9}  {}",
        "CODE", "NAME", "UNIT", "WARNING", "CRITICAL", "DIRECTION"
    );
    for def in catalog.sorted() {
        let fmt_threshold =
            |t: Option<f64>| t.map(|v| format!("{v:.0}")).unwrap_or_else(|| "-".into());
        println!(
            "{:<22} {:<26} {:<6} {:>9} {:>9}  {}",
            def.code,
            def.name,
            def.unit.as_deref().unwrap_or("-"),
            fmt_threshold(def.threshold_warning),
            fmt_threshold(def.threshold_critical),
            if def.higher_is_better {
                "higher is better"
            } else {
                "lower is better"
            }
        );
    }
    Ok(())
}

async fn export_report(
    source: &DataSource,
    project_id: i64,
    format: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let bytes = source.export_report(project_id, format).await?;

    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "kpi-report-{project_id}.{}",
            format.file_extension()
        ))
    });
    std::fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))?;

    println!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
