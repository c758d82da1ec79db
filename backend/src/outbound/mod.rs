//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL/PostGIS repositories using Diesel ORM
//! - **push**: HTTP push gateway dispatcher
//! - **images**: public base-URL image resolver
//! - **metrics**: Prometheus exporters (`metrics` feature)
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod images;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod push;
