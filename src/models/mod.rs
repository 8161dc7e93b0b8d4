pub mod column_role;
pub mod plan;
pub mod trade_record;

pub use column_role::ColumnRole;
pub use plan::{DateRange, InsightCategory, PlanTier};
pub use trade_record::TradeRecord;
