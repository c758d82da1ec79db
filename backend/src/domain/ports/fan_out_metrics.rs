//! Port for exporting search-alert fan-out outcomes.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::AlertFanOutReport;

define_port_error! {
    /// Errors exposed when recording fan-out metrics.
    pub enum FanOutMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "fan-out metrics exporter failed: {message}",
    }
}

/// Records the summary of each fan-out run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FanOutMetrics: Send + Sync {
    async fn record_fan_out(&self, report: &AlertFanOutReport) -> Result<(), FanOutMetricsError>;
}

/// Discards every report; used when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpFanOutMetrics;

#[async_trait]
impl FanOutMetrics for NoOpFanOutMetrics {
    async fn record_fan_out(&self, _report: &AlertFanOutReport) -> Result<(), FanOutMetricsError> {
        Ok(())
    }
}
