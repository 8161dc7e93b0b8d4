pub mod insights;
pub mod limiter;
pub mod metrics;
pub mod normalize;
pub mod resolver;
pub mod style;

pub use insights::Insights;
pub use limiter::{filter_by_range, limit_view, LimitedView};
pub use metrics::{DerivedMetrics, RiskReward};
pub use resolver::{resolve_column, ColumnMapping};
pub use style::TradingStyle;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest::parse_trades;
use crate::models::{PlanTier, TradeRecord};

/// Truncation metadata for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub plan: PlanTier,
    pub original_count: usize,
    pub displayed_count: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub view: ViewSummary,
    pub records: Vec<TradeRecord>,
    pub mapping: ColumnMapping,
    pub metrics: DerivedMetrics,
    pub insights: Insights,
}

/// Run the whole pipeline on an uploaded export.
pub fn analyze(text: &str, plan: PlanTier, tz: Tz) -> AnalysisReport {
    analyze_records(parse_trades(text), plan, tz)
}

/// Pipeline over already-ingested records: limit, resolve columns, measure.
pub fn analyze_records(records: Vec<TradeRecord>, plan: PlanTier, tz: Tz) -> AnalysisReport {
    let view = limit_view(records, plan);
    let mapping = ColumnMapping::for_records(&view.records);
    debug!("Resolved {} column roles", mapping.len());

    let metrics = DerivedMetrics::compute(&view.records, &mapping);
    let insights = Insights::for_plan(&view.records, &mapping, plan, tz);

    AnalysisReport {
        view: ViewSummary {
            plan: view.plan,
            original_count: view.original_count,
            displayed_count: view.displayed_count,
            truncated: view.truncated,
        },
        records: view.records,
        mapping,
        metrics,
        insights,
    }
}
