use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Advanced,
    Elite,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Advanced => "advanced",
            PlanTier::Elite => "elite",
        }
    }

    /// Maximum number of trade records exposed downstream.
    pub fn max_trades(&self) -> usize {
        match self {
            PlanTier::Free => 7,
            PlanTier::Pro => 200,
            PlanTier::Advanced => 1000,
            PlanTier::Elite => 3000,
        }
    }

    pub fn allows(&self, insight: InsightCategory) -> bool {
        match insight {
            InsightCategory::RiskPatternAlerts => *self >= PlanTier::Pro,
            InsightCategory::RiskExposureMapping => *self >= PlanTier::Advanced,
            InsightCategory::RealTimeAlerts => *self == PlanTier::Elite,
        }
    }

    pub fn date_ranges(&self) -> &'static [DateRange] {
        match self {
            PlanTier::Free => &[DateRange::Last7Days],
            PlanTier::Pro => &[
                DateRange::Last7Days,
                DateRange::Last30Days,
                DateRange::Last90Days,
            ],
            PlanTier::Advanced => &[
                DateRange::Last7Days,
                DateRange::Last30Days,
                DateRange::Last90Days,
                DateRange::LastYear,
            ],
            PlanTier::Elite => &[
                DateRange::Last7Days,
                DateRange::Last30Days,
                DateRange::Last90Days,
                DateRange::LastYear,
                DateRange::AllTime,
            ],
        }
    }

    pub fn allows_range(&self, range: DateRange) -> bool {
        self.date_ranges().contains(&range)
    }

    fn rank(&self) -> u8 {
        match self {
            PlanTier::Free => 0,
            PlanTier::Pro => 1,
            PlanTier::Advanced => 2,
            PlanTier::Elite => 3,
        }
    }
}

impl PartialOrd for PlanTier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlanTier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            "advanced" => Ok(PlanTier::Advanced),
            "elite" => Ok(PlanTier::Elite),
            other => Err(AnalyzerError::UnknownPlan(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    RiskPatternAlerts,
    RiskExposureMapping,
    RealTimeAlerts,
}

/// Historical window a user can select on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "1y")]
    LastYear,
    #[serde(rename = "all")]
    AllTime,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Last7Days => "7d",
            DateRange::Last30Days => "30d",
            DateRange::Last90Days => "90d",
            DateRange::LastYear => "1y",
            DateRange::AllTime => "all",
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            DateRange::Last7Days => Some(Duration::days(7)),
            DateRange::Last30Days => Some(Duration::days(30)),
            DateRange::Last90Days => Some(Duration::days(90)),
            DateRange::LastYear => Some(Duration::days(365)),
            DateRange::AllTime => None,
        }
    }

    /// Earliest instant included when the window ends at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.as_duration().map(|d| now - d)
    }

    pub fn from_str_loose(s: &str) -> Option<DateRange> {
        match s {
            "7d" => Some(DateRange::Last7Days),
            "30d" => Some(DateRange::Last30Days),
            "90d" => Some(DateRange::Last90Days),
            "1y" | "365d" => Some(DateRange::LastYear),
            "all" => Some(DateRange::AllTime),
            _ => None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_per_tier() {
        assert_eq!(PlanTier::Free.max_trades(), 7);
        assert_eq!(PlanTier::Pro.max_trades(), 200);
        assert_eq!(PlanTier::Advanced.max_trades(), 1000);
        assert_eq!(PlanTier::Elite.max_trades(), 3000);
    }

    #[test]
    fn insight_gates() {
        assert!(!PlanTier::Free.allows(InsightCategory::RiskPatternAlerts));
        assert!(PlanTier::Pro.allows(InsightCategory::RiskPatternAlerts));
        assert!(!PlanTier::Pro.allows(InsightCategory::RiskExposureMapping));
        assert!(PlanTier::Advanced.allows(InsightCategory::RiskExposureMapping));
        assert!(!PlanTier::Advanced.allows(InsightCategory::RealTimeAlerts));
        assert!(PlanTier::Elite.allows(InsightCategory::RealTimeAlerts));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Elite".parse::<PlanTier>().unwrap(), PlanTier::Elite);
        assert_eq!(" pro ".parse::<PlanTier>().unwrap(), PlanTier::Pro);
        assert!("platinum".parse::<PlanTier>().is_err());
    }

    #[test]
    fn only_elite_gets_all_time() {
        assert!(!PlanTier::Advanced.allows_range(DateRange::AllTime));
        assert!(PlanTier::Elite.allows_range(DateRange::AllTime));
        assert!(PlanTier::Free.allows_range(DateRange::Last7Days));
        assert!(!PlanTier::Free.allows_range(DateRange::Last30Days));
    }

    #[test]
    fn range_names() {
        assert_eq!(DateRange::from_str_loose("90d"), Some(DateRange::Last90Days));
        assert_eq!(DateRange::from_str_loose("365d"), Some(DateRange::LastYear));
        assert_eq!(DateRange::from_str_loose("2w"), None);
        assert!(DateRange::AllTime.as_duration().is_none());
    }
}
