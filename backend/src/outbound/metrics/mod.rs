//! Prometheus exporters for domain metrics ports.
//!
//! Compiled only with the `metrics` feature.

mod prometheus_fan_out;

pub use prometheus_fan_out::PrometheusFanOutMetrics;
