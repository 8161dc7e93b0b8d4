use chrono::Timelike;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analytics::normalize::{clean_symbol, number, parse_timestamp};
use crate::analytics::resolver::ColumnMapping;
use crate::models::{ColumnRole, InsightCategory, PlanTier, TradeRecord};

const MIN_LOSING_STREAK: usize = 3;
const OVERSIZED_LOSS_MULTIPLE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolExposure {
    pub symbol: String,
    pub trades: usize,
    pub total_pnl: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub trades: usize,
    pub total_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskAlert {
    LosingStreak { length: usize },
    OversizedLoss { loss: f64, avg_win: f64 },
    LiquidationsDetected { count: usize },
}

/// Insights unlocked by a plan. Locked categories are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub trading_hours: Vec<HourBucket>,
    pub symbol_exposure: Option<Vec<SymbolExposure>>,
    pub risk_alerts: Option<Vec<RiskAlert>>,
    pub real_time_alerts: bool,
}

impl Insights {
    pub fn for_plan(
        records: &[TradeRecord],
        mapping: &ColumnMapping,
        plan: PlanTier,
        tz: Tz,
    ) -> Self {
        Self {
            trading_hours: trading_hours(records, mapping, tz),
            symbol_exposure: plan
                .allows(InsightCategory::RiskExposureMapping)
                .then(|| symbol_exposure(records, mapping)),
            risk_alerts: plan
                .allows(InsightCategory::RiskPatternAlerts)
                .then(|| risk_alerts(records, mapping)),
            real_time_alerts: plan.allows(InsightCategory::RealTimeAlerts),
        }
    }
}

/// Trades and P&L grouped by base asset, busiest first.
pub fn symbol_exposure(records: &[TradeRecord], mapping: &ColumnMapping) -> Vec<SymbolExposure> {
    let Some(symbol_col) = mapping.get(ColumnRole::Symbol) else {
        return Vec::new();
    };
    let pnl_col = mapping.get(ColumnRole::ProfitLoss);

    let mut groups: HashMap<String, (usize, f64)> = HashMap::new();
    let mut total = 0usize;
    for r in records {
        let symbol = clean_symbol(r.value(Some(symbol_col)));
        if symbol.is_empty() {
            continue;
        }
        let pnl = pnl_col.and_then(|c| number(r.value(Some(c)))).unwrap_or(0.0);
        let entry = groups.entry(symbol).or_default();
        entry.0 += 1;
        entry.1 += pnl;
        total += 1;
    }

    let mut out: Vec<SymbolExposure> = groups
        .into_iter()
        .map(|(symbol, (trades, total_pnl))| SymbolExposure {
            symbol,
            trades,
            total_pnl,
            share_pct: trades as f64 / total as f64 * 100.0,
        })
        .collect();
    out.sort_by(|a, b| b.trades.cmp(&a.trades).then_with(|| a.symbol.cmp(&b.symbol)));
    out
}

/// Trade count and P&L for each hour of the day in `tz`. Always 24 buckets.
pub fn trading_hours(records: &[TradeRecord], mapping: &ColumnMapping, tz: Tz) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..24)
        .map(|hour| HourBucket {
            hour,
            trades: 0,
            total_pnl: 0.0,
        })
        .collect();

    let Some(time_col) = mapping
        .get(ColumnRole::Timestamp)
        .or_else(|| mapping.get(ColumnRole::Date))
    else {
        return buckets;
    };
    let pnl_col = mapping.get(ColumnRole::ProfitLoss);

    for r in records {
        let Some(ts) = parse_timestamp(r.value(Some(time_col))) else {
            continue;
        };
        let hour = ts.with_timezone(&tz).hour() as usize;
        buckets[hour].trades += 1;
        buckets[hour].total_pnl += pnl_col.and_then(|c| number(r.value(Some(c)))).unwrap_or(0.0);
    }
    buckets
}

/// Behaviour worth flagging: long losing runs, outsized losses, liquidations.
pub fn risk_alerts(records: &[TradeRecord], mapping: &ColumnMapping) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();

    if let Some(pnl_col) = mapping.get(ColumnRole::ProfitLoss) {
        let pnls: Vec<f64> = records
            .iter()
            .filter_map(|r| number(r.value(Some(pnl_col))))
            .collect();

        let mut longest = 0usize;
        let mut current = 0usize;
        for p in &pnls {
            if *p < 0.0 {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        if longest >= MIN_LOSING_STREAK {
            alerts.push(RiskAlert::LosingStreak { length: longest });
        }

        let wins: Vec<f64> = pnls.iter().copied().filter(|p| *p > 0.0).collect();
        let worst = pnls
            .iter()
            .copied()
            .filter(|p| *p < 0.0)
            .fold(0.0_f64, |acc, p| acc.max(p.abs()));
        if !wins.is_empty() && worst > 0.0 {
            let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
            if worst > avg_win * OVERSIZED_LOSS_MULTIPLE {
                alerts.push(RiskAlert::OversizedLoss {
                    loss: worst,
                    avg_win,
                });
            }
        }
    }

    let liquidations = records
        .iter()
        .filter(|r| {
            [ColumnRole::Status, ColumnRole::InstrumentType]
                .iter()
                .filter_map(|role| mapping.get(*role))
                .any(|col| {
                    let text = r.value(Some(col)).to_lowercase();
                    text.contains("bust") || text.contains("liquidat")
                })
        })
        .count();
    if liquidations > 0 {
        alerts.push(RiskAlert::LiquidationsDetected {
            count: liquidations,
        });
    }

    alerts
}
