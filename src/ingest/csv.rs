use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::TradeRecord;

/// Header captions that show up as data when an export is pasted twice.
const HEADER_ECHOES: &[&str] = &["Symbol Type", "Exit Price"];

/// Parse comma or tab separated text into trade records.
///
/// The delimiter is a comma when the header line contains one, tab otherwise.
/// Quoted fields are not supported. Malformed rows never fail the parse: short
/// rows are padded with empty values and blank rows are dropped.
pub fn parse_trades(text: &str) -> Vec<TradeRecord> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    let Some((header_line, rows)) = lines.split_first() else {
        return Vec::new();
    };

    let delimiter = if header_line.contains(',') { ',' } else { '\t' };
    let headers: Vec<&str> = header_line.split(delimiter).map(str::trim).collect();

    let mut records = Vec::with_capacity(rows.len());
    let mut discarded = 0usize;

    for line in rows {
        let cells: Vec<&str> = line.split(delimiter).collect();
        let mut fields = IndexMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let value = cells.get(i).map(|c| c.trim()).unwrap_or("");
            fields.insert(header.to_string(), value.to_string());
        }

        let record = TradeRecord::new(fields);
        if record.is_blank() || record.values().any(|v| HEADER_ECHOES.contains(&v)) {
            discarded += 1;
            continue;
        }
        records.push(record);
    }

    debug!(
        "Parsed {} trade rows ({} discarded, delimiter {:?})",
        records.len(),
        discarded,
        delimiter
    );
    records
}

/// Read a trade export from disk and parse it.
pub fn load_trades(path: impl AsRef<Path>) -> Result<Vec<TradeRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let records = parse_trades(&content);
    info!("Loaded {} trades from {}", records.len(), path.display());
    Ok(records)
}
