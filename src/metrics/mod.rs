// Private module declaration
mod server;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Aggregator commands (throughput, latency, outcome)
// - Capacity rejections (joins/modifies that would overshoot the target)
// - Optimistic-concurrency conflicts on event appends
// - Order lifecycle (opened/closed)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Command Metrics
    pub commands_total: IntCounterVec,
    pub command_duration: HistogramVec,

    // Aggregation Metrics
    pub capacity_rejections_total: IntCounter,
    pub append_conflicts_total: IntCounter,

    // Lifecycle Metrics
    pub orders_opened_total: IntCounter,
    pub orders_closed_total: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let commands_total = IntCounterVec::new(
            Opts::new("group_order_commands_total", "Group order commands by kind and outcome"),
            &["command", "outcome"],
        )?;
        registry.register(Box::new(commands_total.clone()))?;

        let command_duration = HistogramVec::new(
            HistogramOpts::new("group_order_command_duration_seconds", "Command handling duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["command"],
        )?;
        registry.register(Box::new(command_duration.clone()))?;

        let capacity_rejections_total = IntCounter::new(
            "group_order_capacity_rejections_total",
            "Joins/modifies rejected because they would overshoot the target",
        )?;
        registry.register(Box::new(capacity_rejections_total.clone()))?;

        let append_conflicts_total = IntCounter::new(
            "group_order_append_conflicts_total",
            "Optimistic-concurrency conflicts on event append",
        )?;
        registry.register(Box::new(append_conflicts_total.clone()))?;

        let orders_opened_total = IntCounter::new(
            "group_orders_opened_total",
            "Group orders opened",
        )?;
        registry.register(Box::new(orders_opened_total.clone()))?;

        let orders_closed_total = IntCounter::new(
            "group_orders_closed_total",
            "Group orders that reached their target and closed",
        )?;
        registry.register(Box::new(orders_closed_total.clone()))?;

        Ok(Self {
            registry,
            commands_total,
            command_duration,
            capacity_rejections_total,
            append_conflicts_total,
            orders_opened_total,
            orders_closed_total,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one handled command
    pub fn record_command(&self, command: &str, outcome: &str, duration_secs: f64) {
        self.commands_total.with_label_values(&[command, outcome]).inc();
        self.command_duration.with_label_values(&[command]).observe(duration_secs);
    }

    pub fn record_capacity_rejection(&self) {
        self.capacity_rejections_total.inc();
    }

    pub fn record_append_conflict(&self) {
        self.append_conflicts_total.inc();
    }

    pub fn record_order_opened(&self) {
        self.orders_opened_total.inc();
    }

    pub fn record_order_closed(&self) {
        self.orders_closed_total.inc();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.registry.gather().len() > 0);
    }

    #[test]
    fn test_record_command() {
        let metrics = Metrics::new().unwrap();
        metrics.record_command("join", "ok", 0.002);
        metrics.record_command("join", "rejected", 0.001);

        let gathered = metrics.registry.gather();
        let commands = gathered
            .iter()
            .find(|m| m.name() == "group_order_commands_total")
            .unwrap();
        assert_eq!(commands.metric.len(), 2); // Two outcome labels
    }

    #[test]
    fn test_record_capacity_rejection() {
        let metrics = Metrics::new().unwrap();
        metrics.record_capacity_rejection();
        metrics.record_capacity_rejection();

        let gathered = metrics.registry.gather();
        let rejections = gathered
            .iter()
            .find(|m| m.name() == "group_order_capacity_rejections_total")
            .unwrap();
        assert_eq!(rejections.metric[0].counter.value, Some(2.0));
    }

    #[test]
    fn test_record_lifecycle() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_opened();
        metrics.record_order_closed();
        metrics.record_append_conflict();

        let gathered = metrics.registry.gather();
        let opened = gathered
            .iter()
            .find(|m| m.name() == "group_orders_opened_total")
            .unwrap();
        assert_eq!(opened.metric[0].counter.value, Some(1.0));
    }
}
