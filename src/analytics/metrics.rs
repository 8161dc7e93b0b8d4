use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analytics::normalize::number;
use crate::analytics::resolver::ColumnMapping;
use crate::analytics::style::{classify, TradingStyle};
use crate::models::{ColumnRole, TradeRecord};

/// Cap, in percent, on the drawdown estimate used when position value is unknown.
const ROUGH_DRAWDOWN_CAP: f64 = 10.0;

/// Average loss relative to average win. `Undefined` when either side has no trades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskReward {
    Ratio(f64),
    Undefined,
}

impl RiskReward {
    pub fn value(&self) -> Option<f64> {
        match self {
            RiskReward::Ratio(r) => Some(*r),
            RiskReward::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, RiskReward::Ratio(_))
    }
}

impl fmt::Display for RiskReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskReward::Ratio(r) => write!(f, "{:.2}", r),
            RiskReward::Undefined => write!(f, "undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub win_rate: f64,
    pub total_profit: f64,
    pub risk_reward: RiskReward,
    pub avg_drawdown: f64,
    pub trading_style: TradingStyle,
}

impl DerivedMetrics {
    pub fn compute(records: &[TradeRecord], mapping: &ColumnMapping) -> Self {
        Self {
            win_rate: win_rate(records, mapping),
            total_profit: total_profit(records, mapping),
            risk_reward: risk_reward(records, mapping),
            avg_drawdown: avg_drawdown(records, mapping),
            trading_style: classify(records, mapping),
        }
    }
}

/// Share of winning trades in percent.
///
/// Wins come from the P&L column, then from exit above entry, then from
/// side/status wording. Zero when none of those columns exist.
pub fn win_rate(records: &[TradeRecord], mapping: &ColumnMapping) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let pnl_col = mapping.get(ColumnRole::ProfitLoss);
    let entry_col = mapping.get(ColumnRole::EntryPrice);
    let exit_col = mapping.get(ColumnRole::ExitPrice);
    let side_col = mapping.get(ColumnRole::Side);
    let status_col = mapping.get(ColumnRole::Status);

    let wins = if let Some(pnl) = pnl_col {
        records
            .iter()
            .filter(|r| number(r.value(Some(pnl))).is_some_and(|p| p > 0.0))
            .count()
    } else if let (Some(entry), Some(exit)) = (entry_col, exit_col) {
        records
            .iter()
            .filter(|r| match (number(r.value(Some(entry))), number(r.value(Some(exit)))) {
                (Some(en), Some(ex)) => ex > en,
                _ => false,
            })
            .count()
    } else if side_col.is_some() || status_col.is_some() {
        records
            .iter()
            .filter(|r| {
                let text = format!("{} {}", r.value(side_col), r.value(status_col)).to_lowercase();
                text_suggests_win(&text)
            })
            .count()
    } else {
        return 0.0;
    };

    wins as f64 / records.len() as f64 * 100.0
}

fn text_suggests_win(text: &str) -> bool {
    ((text.contains("buy") || text.contains("long")) && !text.contains("bust"))
        || text.contains("win")
        || text.contains("profit")
}

/// Net result in the unit of the source P&L column.
///
/// Without a P&L column, sums `(exit - entry) * size` with size defaulting to 1.
pub fn total_profit(records: &[TradeRecord], mapping: &ColumnMapping) -> f64 {
    if let Some(pnl) = mapping.get(ColumnRole::ProfitLoss) {
        return records
            .iter()
            .filter_map(|r| number(r.value(Some(pnl))))
            .sum();
    }

    let (Some(entry), Some(exit)) = (
        mapping.get(ColumnRole::EntryPrice),
        mapping.get(ColumnRole::ExitPrice),
    ) else {
        return 0.0;
    };
    let size_col = mapping.get(ColumnRole::Size);

    records
        .iter()
        .filter_map(|r| {
            let en = number(r.value(Some(entry)))?;
            let ex = number(r.value(Some(exit)))?;
            let size = size_col.and_then(|c| number(r.value(Some(c)))).unwrap_or(1.0);
            Some((ex - en) * size)
        })
        .sum()
}

/// Average loss over average win. Needs a P&L column; price deltas decide
/// wins and losses when entry and exit are both present.
pub fn risk_reward(records: &[TradeRecord], mapping: &ColumnMapping) -> RiskReward {
    let Some(pnl) = mapping.get(ColumnRole::ProfitLoss) else {
        return RiskReward::Undefined;
    };

    let mut wins = Vec::new();
    let mut losses = Vec::new();

    match (
        mapping.get(ColumnRole::EntryPrice),
        mapping.get(ColumnRole::ExitPrice),
    ) {
        (Some(entry), Some(exit)) => {
            for r in records {
                let en = number(r.value(Some(entry)));
                let ex = number(r.value(Some(exit)));
                let (Some(en), Some(ex)) = (en, ex) else {
                    continue;
                };
                if ex > en {
                    wins.push(ex - en);
                } else if ex < en {
                    losses.push(en - ex);
                }
            }
        }
        _ => {
            for p in records.iter().filter_map(|r| number(r.value(Some(pnl)))) {
                if p > 0.0 {
                    wins.push(p);
                } else if p < 0.0 {
                    losses.push(p.abs());
                }
            }
        }
    }

    if wins.is_empty() || losses.is_empty() {
        return RiskReward::Undefined;
    }

    let avg_win = mean(&wins);
    let avg_loss = mean(&losses);
    let ratio = avg_loss / avg_win;
    if ratio.is_finite() && ratio > 0.0 {
        RiskReward::Ratio(ratio)
    } else {
        RiskReward::Undefined
    }
}

/// Mean drawdown of losing trades, in percent of position value.
///
/// Falls back to `min(10, |loss| / 100)` when entry or size is unusable. That
/// estimate is a placeholder carried over from the dashboard, not a
/// validated formula.
pub fn avg_drawdown(records: &[TradeRecord], mapping: &ColumnMapping) -> f64 {
    let Some(pnl) = mapping.get(ColumnRole::ProfitLoss) else {
        return 0.0;
    };
    let entry_col = mapping.get(ColumnRole::EntryPrice);
    let size_col = mapping.get(ColumnRole::Size);

    let drawdowns: Vec<f64> = records
        .iter()
        .filter_map(|r| {
            let loss = number(r.value(Some(pnl))).filter(|p| *p < 0.0)?.abs();
            let entry = entry_col.and_then(|c| number(r.value(Some(c))));
            let size = size_col.and_then(|c| number(r.value(Some(c))));
            match (entry, size) {
                (Some(en), Some(sz)) if en > 0.0 && sz > 0.0 => Some(loss / (en * sz) * 100.0),
                _ => Some((loss / 100.0).min(ROUGH_DRAWDOWN_CAP)),
            }
        })
        .collect();

    if drawdowns.is_empty() {
        0.0
    } else {
        mean(&drawdowns)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_trades;

    fn run(csv: &str) -> (Vec<TradeRecord>, ColumnMapping) {
        let records = parse_trades(csv);
        let mapping = ColumnMapping::for_records(&records);
        (records, mapping)
    }

    #[test]
    fn win_rate_from_pnl() {
        let (records, mapping) = run("Symbol,PnL\nBTCUSDT,100\nETHUSDT,-50\nSOLUSDT,75\n");
        let wr = win_rate(&records, &mapping);
        assert!((wr - 66.6667).abs() < 0.001);
    }

    #[test]
    fn unparseable_pnl_counts_as_non_win() {
        let (records, mapping) = run("PnL\n10\nn/a\n-5\n20\n");
        assert!((win_rate(&records, &mapping) - 50.0).abs() < 1e-9);
        assert!((total_profit(&records, &mapping) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn win_rate_from_prices() {
        let (records, mapping) = run("Entry,Exit\n100,120\n50,40\n");
        assert!((win_rate(&records, &mapping) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn win_rate_from_side_and_status() {
        let (records, mapping) = run("Side,Status\nBuy,Filled\nSell,Filled\nLong,Bust\nSell,Win\n");
        // "buy", then "sell win" count; "long bust" does not.
        assert!((win_rate(&records, &mapping) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn win_rate_zero_without_usable_columns() {
        let (records, mapping) = run("Foo,Bar\n1,2\n");
        assert_eq!(win_rate(&records, &mapping), 0.0);
        assert_eq!(total_profit(&records, &mapping), 0.0);
    }

    #[test]
    fn total_profit_price_fallback_uses_size() {
        let (records, mapping) = run("Entry,Exit,Qty\n100,110,2\n50,45,\n");
        // (110-100)*2 + (45-50)*1
        assert!((total_profit(&records, &mapping) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn risk_reward_from_pnl_groups() {
        let (records, mapping) = run("PnL\n100\n50\n-30\n-90\n");
        // avg loss 60 / avg win 75
        assert_eq!(risk_reward(&records, &mapping), RiskReward::Ratio(0.8));
    }

    #[test]
    fn risk_reward_prefers_price_deltas() {
        let (records, mapping) = run("Entry,Exit,PnL\n100,110,500\n100,95,-300\n");
        // avg loss 5 / avg win 10
        assert_eq!(risk_reward(&records, &mapping), RiskReward::Ratio(0.5));
    }

    #[test]
    fn risk_reward_undefined_without_both_sides() {
        let (records, mapping) = run("PnL\n10\n20\n");
        assert_eq!(risk_reward(&records, &mapping), RiskReward::Undefined);

        let (records, mapping) = run("Entry,Exit\n100,80\n100,120\n");
        assert_eq!(risk_reward(&records, &mapping), RiskReward::Undefined);
    }

    #[test]
    fn drawdown_uses_position_value() {
        let (records, mapping) = run("Entry,Qty,PnL\n100,2,-20\n50,1,-5\n10,1,30\n");
        // 20/200 = 10%, 5/50 = 10%
        assert!((avg_drawdown(&records, &mapping) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_rough_estimate_is_capped() {
        let (records, mapping) = run("PnL\n-250\n-5000\n");
        // min(10, 2.5) and min(10, 50)
        assert!((avg_drawdown(&records, &mapping) - 6.25).abs() < 1e-9);
    }

    #[test]
    fn drawdown_zero_without_losses() {
        let (records, mapping) = run("PnL\n5\n6\n");
        assert_eq!(avg_drawdown(&records, &mapping), 0.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let (records, mapping) = run("Symbol,PnL,Entry,Exit\nBTCUSDT,10,1,2\nETHUSDT,-4,3,2\n");
        let a = DerivedMetrics::compute(&records, &mapping);
        let b = DerivedMetrics::compute(&records, &mapping);
        assert_eq!(a, b);
        assert_eq!(a.win_rate.to_bits(), b.win_rate.to_bits());
    }
}
