use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AnalyzerError;
use crate::models::PlanTier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Plan used when none is given on the command line
    pub plan: PlanTier,

    // Display
    pub currency_symbol: String,
    pub display_timezone: Tz,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plan: PlanTier::Free,
            currency_symbol: "$".to_string(),
            display_timezone: chrono_tz::UTC,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let defaults = Config::default();

        let plan: PlanTier = env("PLAN_TIER", defaults.plan.as_str())
            .parse()
            .unwrap_or_else(|e: AnalyzerError| {
                warn!("{}, using {}", e, defaults.plan);
                defaults.plan
            });

        let display_timezone = parse_timezone(&env("DISPLAY_TIMEZONE", "UTC")).unwrap_or_else(|e| {
            warn!("{}, using UTC", e);
            defaults.display_timezone
        });

        Config {
            plan,
            currency_symbol: env("CURRENCY_SYMBOL", &defaults.currency_symbol),
            display_timezone,
            log_level: env("LOG_LEVEL", &defaults.log_level),
        }
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, AnalyzerError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AnalyzerError::UnknownTimezone(name.to_string()))
}
