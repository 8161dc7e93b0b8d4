use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::analytics::normalize::parse_timestamp;
use crate::analytics::resolver::ColumnMapping;
use crate::models::{ColumnRole, TradeRecord};

const PERPETUAL_SUFFIXES: &[&str] = &["PERP", "SWAP"];
const LEVERAGE_WORDS: &[&str] = &["bust", "liquidat", "leverage", "perpetual", "futures"];
const SUB_HOUR_MARKERS: &[&str] = &["sec", "min"];
const MULTI_DAY_MARKERS: &[&str] = &["day", "week", "month"];

const SCALP_TRADES_PER_DAY: f64 = 5.0;
const DAY_TRADES_PER_DAY: f64 = 1.0;
const ACTIVE_TRADE_COUNT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingStyle {
    #[serde(rename = "Scalp Trader")]
    ScalpTrader,
    #[serde(rename = "Scalp Futures Trader")]
    ScalpFuturesTrader,
    #[serde(rename = "Day Trader")]
    DayTrader,
    #[serde(rename = "Day Futures Trader")]
    DayFuturesTrader,
    #[serde(rename = "Swing Trader")]
    SwingTrader,
    #[serde(rename = "Position Trader")]
    PositionTrader,
    #[serde(rename = "Futures Trader")]
    FuturesTrader,
    #[serde(rename = "Position Futures Trader")]
    PositionFuturesTrader,
    #[serde(rename = "Undefined")]
    Undefined,
}

impl TradingStyle {
    pub const ALL: [TradingStyle; 9] = [
        TradingStyle::ScalpTrader,
        TradingStyle::ScalpFuturesTrader,
        TradingStyle::DayTrader,
        TradingStyle::DayFuturesTrader,
        TradingStyle::SwingTrader,
        TradingStyle::PositionTrader,
        TradingStyle::FuturesTrader,
        TradingStyle::PositionFuturesTrader,
        TradingStyle::Undefined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TradingStyle::ScalpTrader => "Scalp Trader",
            TradingStyle::ScalpFuturesTrader => "Scalp Futures Trader",
            TradingStyle::DayTrader => "Day Trader",
            TradingStyle::DayFuturesTrader => "Day Futures Trader",
            TradingStyle::SwingTrader => "Swing Trader",
            TradingStyle::PositionTrader => "Position Trader",
            TradingStyle::FuturesTrader => "Futures Trader",
            TradingStyle::PositionFuturesTrader => "Position Futures Trader",
            TradingStyle::Undefined => "Undefined",
        }
    }

    pub fn from_signals(holding: HoldingClass, leveraged: bool) -> Self {
        match (holding, leveraged) {
            (HoldingClass::Scalp, false) => TradingStyle::ScalpTrader,
            (HoldingClass::Scalp, true) => TradingStyle::ScalpFuturesTrader,
            (HoldingClass::Day, false) => TradingStyle::DayTrader,
            (HoldingClass::Day, true) => TradingStyle::DayFuturesTrader,
            (HoldingClass::Long, false) => TradingStyle::SwingTrader,
            (HoldingClass::Long, true) => TradingStyle::PositionTrader,
        }
    }
}

impl fmt::Display for TradingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradingStyle {
    type Err = ();

    /// Accepts the labels stored with user profiles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TradingStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// How long positions are typically held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingClass {
    Scalp,
    Day,
    Long,
}

/// Infer a trading-style label from holding time and leverage signals.
pub fn classify(records: &[TradeRecord], mapping: &ColumnMapping) -> TradingStyle {
    if records.is_empty() {
        return TradingStyle::Undefined;
    }
    let holding = holding_class(records, mapping);
    let leveraged = is_leveraged(records, mapping);
    debug!("Holding class {:?}, leveraged {}", holding, leveraged);
    TradingStyle::from_signals(holding, leveraged)
}

/// True when most symbols are perpetuals or any status/type text mentions
/// liquidation, leverage or futures.
pub fn is_leveraged(records: &[TradeRecord], mapping: &ColumnMapping) -> bool {
    if let Some(symbol_col) = mapping.get(ColumnRole::Symbol) {
        let symbols: Vec<String> = records
            .iter()
            .map(|r| r.value(Some(symbol_col)).trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        let perpetual = symbols
            .iter()
            .filter(|s| PERPETUAL_SUFFIXES.iter().any(|suffix| s.ends_with(suffix)))
            .count();
        if !symbols.is_empty() && perpetual * 2 > symbols.len() {
            return true;
        }
    }

    [ColumnRole::Status, ColumnRole::InstrumentType]
        .iter()
        .filter_map(|role| mapping.get(*role))
        .any(|col| {
            records.iter().any(|r| {
                let text = r.value(Some(col)).to_lowercase();
                LEVERAGE_WORDS.iter().any(|w| text.contains(w))
            })
        })
}

/// Holding class from durations, then trade frequency, then trade count.
pub fn holding_class(records: &[TradeRecord], mapping: &ColumnMapping) -> HoldingClass {
    if let Some(col) = mapping.get(ColumnRole::Duration) {
        return majority(records.iter().map(|r| duration_class(r.value(Some(col)))));
    }

    let time_col = mapping
        .get(ColumnRole::Date)
        .or_else(|| mapping.get(ColumnRole::Timestamp));
    if let Some(col) = time_col {
        if let Some(class) = frequency_class(records, col) {
            return class;
        }
    }

    if records.len() > ACTIVE_TRADE_COUNT {
        HoldingClass::Day
    } else {
        HoldingClass::Long
    }
}

fn duration_class(raw: &str) -> HoldingClass {
    let text = raw.trim().to_lowercase();

    match duration_hours(&text) {
        Some(hours) if hours < 1.0 => HoldingClass::Scalp,
        Some(hours) if hours > 24.0 => HoldingClass::Long,
        Some(_) => HoldingClass::Day,
        None if SUB_HOUR_MARKERS.iter().any(|m| text.contains(m)) => HoldingClass::Scalp,
        None if MULTI_DAY_MARKERS.iter().any(|m| text.contains(m)) => HoldingClass::Long,
        None => HoldingClass::Day,
    }
}

/// Holding time in hours from `01:30:00`, `1h 30m`, `5 min`, `3 days` or a
/// bare number of hours.
fn duration_hours(text: &str) -> Option<f64> {
    if text.contains(':') {
        return clock_hours(text);
    }

    let mut total = None;
    let mut rest = text;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let Ok(value) = rest[..num_len].parse::<f64>() else {
            break;
        };

        rest = rest[num_len..].trim_start();
        let unit_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_len);
        rest = tail;

        total = Some(total.unwrap_or(0.0) + value * unit_hours(unit));
        if unit.is_empty() {
            break;
        }
    }
    total
}

/// `H:MM` or `H:MM:SS`.
fn clock_hours(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut hours = 0.0;
    let mut scale = 1.0;
    for part in parts {
        hours += part.trim().parse::<f64>().ok()? * scale;
        scale /= 60.0;
    }
    Some(hours)
}

fn unit_hours(unit: &str) -> f64 {
    match unit {
        u if u.starts_with("mo") => 720.0,
        u if u.starts_with('m') => 1.0 / 60.0,
        u if u.starts_with('s') => 1.0 / 3600.0,
        u if u.starts_with('d') => 24.0,
        u if u.starts_with('w') => 168.0,
        u if u.starts_with('y') => 8760.0,
        // no unit, or h/hr/hours
        _ => 1.0,
    }
}

fn majority(classes: impl Iterator<Item = HoldingClass>) -> HoldingClass {
    let (mut scalp, mut day, mut long) = (0usize, 0usize, 0usize);
    for class in classes {
        match class {
            HoldingClass::Scalp => scalp += 1,
            HoldingClass::Day => day += 1,
            HoldingClass::Long => long += 1,
        }
    }

    if day >= scalp && day >= long {
        HoldingClass::Day
    } else if scalp >= long {
        HoldingClass::Scalp
    } else {
        HoldingClass::Long
    }
}

/// Trades per day across the dated span. `None` when no row has a usable date.
fn frequency_class(records: &[TradeRecord], col: &str) -> Option<HoldingClass> {
    let times: Vec<_> = records
        .iter()
        .filter_map(|r| parse_timestamp(r.value(Some(col))))
        .collect();
    let earliest = times.iter().min()?;
    let latest = times.iter().max()?;

    let span_days = ((*latest - *earliest).num_seconds() as f64 / 86_400.0).max(1.0);
    let per_day = times.len() as f64 / span_days;
    debug!("{} dated trades over {:.1} days", times.len(), span_days);

    Some(if per_day > SCALP_TRADES_PER_DAY {
        HoldingClass::Scalp
    } else if per_day > DAY_TRADES_PER_DAY {
        HoldingClass::Day
    } else {
        HoldingClass::Long
    })
}
