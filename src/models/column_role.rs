use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical trading concept a raw CSV column may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Symbol,
    EntryPrice,
    ExitPrice,
    ProfitLoss,
    Size,
    Side,
    Status,
    Timestamp,
    Date,
    Duration,
    InstrumentType,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 11] = [
        ColumnRole::Symbol,
        ColumnRole::EntryPrice,
        ColumnRole::ExitPrice,
        ColumnRole::ProfitLoss,
        ColumnRole::Size,
        ColumnRole::Side,
        ColumnRole::Status,
        ColumnRole::Timestamp,
        ColumnRole::Date,
        ColumnRole::Duration,
        ColumnRole::InstrumentType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Symbol => "symbol",
            ColumnRole::EntryPrice => "entry_price",
            ColumnRole::ExitPrice => "exit_price",
            ColumnRole::ProfitLoss => "profit_loss",
            ColumnRole::Size => "size",
            ColumnRole::Side => "side",
            ColumnRole::Status => "status",
            ColumnRole::Timestamp => "timestamp",
            ColumnRole::Date => "date",
            ColumnRole::Duration => "duration",
            ColumnRole::InstrumentType => "instrument_type",
        }
    }

    /// Header names exchanges commonly export for this role, in priority order.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::ProfitLoss => &[
                "PnL",
                "P&L",
                "P/L",
                "Profit",
                "Profit/Loss",
                "GainLoss",
                "Gain/Loss",
                "Net",
                "Net Profit",
                "Result",
                "Return",
                "Outcome",
                "Closed P&L",
                "Closed PnL",
                "Realized PnL",
                "pnl",
                "p&l",
                "p/l",
                "profit",
                "profit/loss",
                "gainloss",
                "gain/loss",
                "net",
                "net profit",
                "result",
                "return",
                "outcome",
                "closed p&l",
                "closed pnl",
                "realized pnl",
            ],
            ColumnRole::EntryPrice => &[
                "Entry",
                "Entry Price",
                "Open",
                "Open Price",
                "Buy",
                "Buy Price",
            ],
            ColumnRole::ExitPrice => &[
                "Exit",
                "Exit Price",
                "Close",
                "Close Price",
                "Sell",
                "Sell Price",
            ],
            ColumnRole::Size => &[
                "Size", "Quantity", "Amount", "Volume", "Shares", "Contracts", "Qty", "position",
            ],
            ColumnRole::Side => &["Side", "Direction", "Buy/Sell", "Long/Short", "Order Side"],
            ColumnRole::Status => &["Status", "Trade Status", "Result", "Outcome"],
            ColumnRole::Symbol => &["Symbol", "Contracts", "Contract", "Pair", "Market"],
            ColumnRole::Duration => &[
                "Duration",
                "Time Held",
                "Holding Period",
                "Hold Time",
                "Timeframe",
            ],
            ColumnRole::Date => &["Date", "Trade Date", "Entry Date", "Open Date", "Create Time"],
            ColumnRole::Timestamp => &[
                "Time",
                "Timestamp",
                "Trade Time",
                "Entry Time",
                "Trade Time(UTC)",
                "Create Time",
            ],
            ColumnRole::InstrumentType => &[
                "Type",
                "Symbol Type",
                "Contract Type",
                "Product Type",
                "Instrument Type",
            ],
        }
    }

    /// Extra rule a matched header must satisfy, on top of the name lists.
    pub fn accepts(&self, header: &str) -> bool {
        match self {
            // "Create Time" and friends belong to Timestamp.
            ColumnRole::Date => !header.to_lowercase().contains("time"),
            _ => true,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
