//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on driving ports,
//! so they stay testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{ProductCatalogue, ProductDiscovery, ProfileSettings, SearchAlerts};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub discovery: Arc<dyn ProductDiscovery>,
    pub catalogue: Arc<dyn ProductCatalogue>,
    pub alerts: Arc<dyn SearchAlerts>,
    pub profile: Arc<dyn ProfileSettings>,
}

impl HttpState {
    pub fn new(
        discovery: Arc<dyn ProductDiscovery>,
        catalogue: Arc<dyn ProductCatalogue>,
        alerts: Arc<dyn SearchAlerts>,
        profile: Arc<dyn ProfileSettings>,
    ) -> Self {
        Self {
            discovery,
            catalogue,
            alerts,
            profile,
        }
    }
}
