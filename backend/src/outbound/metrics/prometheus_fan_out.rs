//! Prometheus adapter for search-alert fan-out metrics.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::AlertFanOutReport;
use crate::domain::ports::{FanOutMetrics, FanOutMetricsError};

/// Prometheus-backed fan-out recorder.
///
/// - `marketplace_alert_fan_out_events_total{event}` counts scanned
///   candidates, evaluated alerts, matches, recorded notifications,
///   dispatched pushes, and candidate failures.
/// - `marketplace_alert_fan_out_skipped_total{reason}` counts runs that
///   stopped before scanning candidates.
pub struct PrometheusFanOutMetrics {
    events_total: IntCounterVec,
    skipped_total: IntCounterVec,
}

impl PrometheusFanOutMetrics {
    /// Create the counters and register them with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error when a metric with the same name is already
    /// registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let events_total = IntCounterVec::new(
            Opts::new(
                "marketplace_alert_fan_out_events_total",
                "Search-alert fan-out events by kind",
            ),
            &["event"],
        )?;
        let skipped_total = IntCounterVec::new(
            Opts::new(
                "marketplace_alert_fan_out_skipped_total",
                "Search-alert fan-out runs skipped before scanning candidates",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(events_total.clone()))?;
        registry.register(Box::new(skipped_total.clone()))?;
        Ok(Self {
            events_total,
            skipped_total,
        })
    }

    fn add(&self, event: &str, count: usize) {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        if count > 0 {
            self.events_total.with_label_values(&[event]).inc_by(count);
        }
    }
}

#[async_trait]
impl FanOutMetrics for PrometheusFanOutMetrics {
    async fn record_fan_out(&self, report: &AlertFanOutReport) -> Result<(), FanOutMetricsError> {
        if let Some(reason) = report.skipped {
            self.skipped_total
                .with_label_values(&[reason.as_str()])
                .inc();
            return Ok(());
        }
        self.add("candidate", report.candidates_scanned);
        self.add("alert_evaluated", report.alerts_evaluated);
        self.add("match", report.matches);
        self.add("notification_recorded", report.notifications_recorded);
        self.add("push_dispatched", report.pushes_dispatched);
        self.add("failure", report.failures.len());
        Ok(())
    }
}
