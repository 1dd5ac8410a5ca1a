use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::domain::group_order::OrderPolicy;

// ============================================================================
// Configuration - environment-driven, with logged defaults
// ============================================================================

pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub metrics_port: u16,
    /// Days between opening a group order and its scheduled delivery.
    pub delivery_lead_days: i64,
}

impl AppConfig {
    pub fn load() -> Self {
        Self {
            bind_addr: try_load("POOL_BIND_ADDR", "0.0.0.0"),
            port: try_load("POOL_PORT", "8080"),
            metrics_port: try_load("POOL_METRICS_PORT", "9090"),
            delivery_lead_days: try_load("POOL_DELIVERY_LEAD_DAYS", "7"),
        }
    }

    pub fn order_policy(&self) -> OrderPolicy {
        OrderPolicy::from_lead_days(self.delivery_lead_days)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let config = AppConfig::load();
        assert_eq!(config.port, 8080);
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.delivery_lead_days, 7);
        assert_eq!(config.order_policy().delivery_lead, chrono::Duration::days(7));
    }
}
