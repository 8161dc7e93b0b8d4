use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::normalize::parse_timestamp;
use crate::analytics::resolver::ColumnMapping;
use crate::models::{ColumnRole, DateRange, PlanTier, TradeRecord};

/// Records visible under a plan, with what the caller needs to tell the user
/// that some were hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitedView {
    pub records: Vec<TradeRecord>,
    pub original_count: usize,
    pub displayed_count: usize,
    pub plan: PlanTier,
    pub truncated: bool,
}

/// Keep the first `plan.max_trades()` records.
pub fn limit_view(mut records: Vec<TradeRecord>, plan: PlanTier) -> LimitedView {
    let original_count = records.len();
    let cap = plan.max_trades();

    records.truncate(cap);
    let truncated = original_count > cap;

    if truncated {
        info!(
            "Plan {} shows {} of {} trades",
            plan,
            records.len(),
            original_count
        );
    }

    LimitedView {
        displayed_count: records.len(),
        records,
        original_count,
        plan,
        truncated,
    }
}

/// Keep records dated inside `range`, counting back from `now`.
///
/// Datasets without a date column, and `DateRange::AllTime`, pass through
/// untouched. Rows whose date does not parse are dropped when a window applies.
pub fn filter_by_range(
    records: &[TradeRecord],
    mapping: &ColumnMapping,
    range: DateRange,
    now: DateTime<Utc>,
) -> Vec<TradeRecord> {
    let time_col = mapping
        .get(ColumnRole::Date)
        .or_else(|| mapping.get(ColumnRole::Timestamp));

    let (Some(col), Some(start)) = (time_col, range.start(now)) else {
        return records.to_vec();
    };

    records
        .iter()
        .filter(|r| {
            parse_timestamp(r.value(Some(col))).is_some_and(|ts| ts >= start && ts <= now)
        })
        .cloned()
        .collect()
}
