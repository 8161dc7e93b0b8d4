use crate::models::TradeRecord;

/// Build a record from `(column, value)` pairs, keeping their order.
pub fn record(pairs: &[(&str, &str)]) -> TradeRecord {
    TradeRecord::from_pairs(pairs.iter().copied())
}

/// Join a header and data rows into CSV text.
pub fn csv(header: &str, rows: &[&str]) -> String {
    let mut text = String::from(header);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

/// `n` records with `Symbol` and a `PnL` of 1, 2, 3, ...
pub fn numbered_trades(n: usize) -> Vec<TradeRecord> {
    (1..=n)
        .map(|i| {
            TradeRecord::from_pairs([
                ("Symbol", "BTCUSDT".to_string()),
                ("PnL", i.to_string()),
            ])
        })
        .collect()
}
