//! Marketplace backend library modules.
//!
//! The crate is organised as a hexagon: [`domain`] holds transport-agnostic
//! types, services, and ports; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the driven ports against
//! PostgreSQL, the push gateway, and the image host.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
