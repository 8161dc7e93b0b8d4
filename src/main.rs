use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use trade_insights::analytics;
use trade_insights::config::Config;
use trade_insights::models::PlanTier;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // Usage: trade-insights <file> [plan] [--json]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let Some(path) = positional.first() else {
        bail!("usage: trade-insights <file> [free|pro|advanced|elite] [--json]");
    };
    let plan: PlanTier = match positional.get(1) {
        Some(name) => name.parse()?,
        None => cfg.plan,
    };

    let text = tokio::fs::read_to_string(path.as_str())
        .await
        .with_context(|| format!("reading {}", path))?;

    let report = analytics::analyze(&text, plan, cfg.display_timezone);
    info!(
        "Analyzed {} of {} trades on the {} plan",
        report.view.displayed_count, report.view.original_count, plan
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_summary(&cfg.currency_symbol);
    }

    Ok(())
}
