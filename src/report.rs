use std::fmt;

use crate::analytics::insights::RiskAlert;
use crate::analytics::normalize::{format_currency, format_signed_currency};
use crate::analytics::AnalysisReport;

const RULE: &str = "  ───────────────────────────────────";

/// Plain-text dashboard summary of a report, with amounts in `currency`.
pub struct Summary<'a> {
    report: &'a AnalysisReport,
    currency: &'a str,
}

impl AnalysisReport {
    pub fn summary<'a>(&'a self, currency: &'a str) -> Summary<'a> {
        Summary {
            report: self,
            currency,
        }
    }

    pub fn print_summary(&self, currency: &str) {
        println!("\n{}", self.summary(currency));
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let currency = self.currency;
        let view = &report.view;

        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f, "  TRADE INSIGHTS ({} plan)", view.plan)?;
        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(
            f,
            "  Trades:      {} of {}",
            view.displayed_count, view.original_count
        )?;
        if view.truncated {
            writeln!(
                f,
                "  Showing the first {} trades. Upgrade your plan to analyze all {}.",
                view.displayed_count, view.original_count
            )?;
        }

        let m = &report.metrics;
        writeln!(f)?;
        writeln!(f, "  PERFORMANCE")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "  Win Rate:    {:.2}%", m.win_rate)?;
        writeln!(
            f,
            "  Total P/L:   {}",
            format_signed_currency(m.total_profit, currency)
        )?;
        writeln!(f, "  Risk/Reward: {}", m.risk_reward)?;
        writeln!(f, "  Avg DD:      {:.2}%", m.avg_drawdown)?;
        writeln!(f, "  Style:       {}", m.trading_style)?;

        writeln!(f)?;
        writeln!(f, "  COLUMNS")?;
        writeln!(f, "{}", RULE)?;
        if report.mapping.is_empty() {
            writeln!(f, "  (none recognised)")?;
        }
        for (role, column) in report.mapping.iter() {
            writeln!(f, "  {:>15}: {}", role, column)?;
        }

        if let Some(exposure) = &report.insights.symbol_exposure {
            if !exposure.is_empty() {
                writeln!(f)?;
                writeln!(f, "  EXPOSURE")?;
                writeln!(f, "{}", RULE)?;
                for e in exposure {
                    writeln!(
                        f,
                        "  {:>8}: {} trades ({:.0}%) | P/L {}",
                        e.symbol,
                        e.trades,
                        e.share_pct,
                        format_currency(e.total_pnl, currency)
                    )?;
                }
            }
        }

        if let Some(alerts) = &report.insights.risk_alerts {
            writeln!(f)?;
            writeln!(f, "  RISK ALERTS")?;
            writeln!(f, "{}", RULE)?;
            if alerts.is_empty() {
                writeln!(f, "  None")?;
            }
            for alert in alerts {
                match alert {
                    RiskAlert::LosingStreak { length } => {
                        writeln!(f, "  - {} losing trades in a row", length)?
                    }
                    RiskAlert::OversizedLoss { loss, avg_win } => writeln!(
                        f,
                        "  - Largest loss {} vs average win {}",
                        format_currency(*loss, currency),
                        format_currency(*avg_win, currency)
                    )?,
                    RiskAlert::LiquidationsDetected { count } => {
                        writeln!(f, "  - {} liquidated positions", count)?
                    }
                }
            }
        }

        let busiest = report
            .insights
            .trading_hours
            .iter()
            .filter(|b| b.trades > 0)
            .max_by_key(|b| b.trades);
        if let Some(b) = busiest {
            writeln!(f)?;
            writeln!(
                f,
                "  Busiest hour: {:02}:00 ({} trades, P/L {})",
                b.hour,
                b.trades,
                format_signed_currency(b.total_pnl, currency)
            )?;
        }

        write!(f, "{}", "=".repeat(70))
    }
}

#[cfg(test)]
mod tests {
    use crate::analytics::analyze;
    use crate::models::PlanTier;

    #[test]
    fn summary_mentions_truncation_and_metrics() {
        let mut text = String::from("Symbol,PnL\n");
        for i in 0..10 {
            text.push_str(&format!("BTCUSDT,{}\n", i - 3));
        }
        let report = analyze(&text, PlanTier::Free, chrono_tz::UTC);
        let summary = report.summary("$").to_string();

        assert!(summary.contains("7 of 10"));
        assert!(summary.contains("Upgrade your plan"));
        assert!(summary.contains("Win Rate:    42.86%"));
        assert!(summary.contains("Total P/L:   +$0.00"));
        assert!(!summary.contains("RISK ALERTS"));
    }

    #[test]
    fn summary_for_empty_upload() {
        let report = analyze("", PlanTier::Elite, chrono_tz::UTC);
        let summary = report.summary("$").to_string();
        assert!(summary.contains("Risk/Reward: undefined"));
        assert!(summary.contains("Style:       Undefined"));
        assert!(summary.contains("(none recognised)"));
    }

    #[test]
    fn summary_lists_alerts_for_pro_plans() {
        let text = "Symbol,PnL\nBTCUSDT,10\nBTCUSDT,-4\nBTCUSDT,-5\nBTCUSDT,-6\n";
        let report = analyze(text, PlanTier::Pro, chrono_tz::UTC);
        let summary = format!("{}", report.summary("€"));

        assert!(summary.contains("RISK ALERTS"));
        assert!(summary.contains("  - 3 losing trades in a row"));
        assert!(summary.contains("Total P/L:   -€5.00"));
        assert!(summary.ends_with(&"=".repeat(70)));
    }
}
