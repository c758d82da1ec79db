//! Domain primitives, services, and ports.
//!
//! Purpose: model marketplace listings, saved search alerts, and the two
//! engines built on them: geo-aware product discovery and search-alert
//! fan-out. Types here are transport agnostic; adapters live under
//! `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: domain error payload and stable codes.
//! - Product, SearchAlert, FeedPreferences: persisted aggregates.
//! - DiscoveryCriteria, ProductFilter: discovery inputs.
//! - ProductDiscoveryService, AlertMatchingService, ProductCatalogueService,
//!   SearchAlertService, ProfileSettingsService: driving port
//!   implementations.

pub mod alert_matching_service;
pub mod catalogue_service;
pub mod discovery;
pub mod discovery_service;
pub mod error;
pub mod feed;
pub mod geo;
pub mod ports;
pub mod product;
mod product_views;
pub mod profile_settings_service;
pub mod search_alert;
pub mod search_alert_service;
mod store_errors;
pub mod trace_id;
pub mod user;

pub use self::alert_matching_service::{
    AlertFanOutReport, AlertMatchingService, CandidateFailure, FanOutSkip, FanOutStage,
};
pub use self::catalogue_service::ProductCatalogueService;
pub use self::discovery::{
    DiscoveryCriteria, DiscoveryCriteriaError, DiscoverySort, PriceBand, ProductFilter,
};
pub use self::discovery_service::{DEFAULT_FAN_OUT_CONCURRENCY, ProductDiscoveryService};
pub use self::error::{Error, ErrorCode};
pub use self::feed::FeedPreferences;
pub use self::geo::{
    ALERT_RADIUS_METRES, DEFAULT_SEARCH_RADIUS_MILES, GeoPoint, GeoPointError, miles_to_metres,
};
pub use self::product::{
    FavouriteToggle, ListingKind, Product, ProductDraft, ProductDraftError, ProductEdit, ProductId,
    ProductStatus, ProductView, UnknownLabel, image_key_path,
};
pub use self::profile_settings_service::ProfileSettingsService;
pub use self::search_alert::{
    AlertNotificationView, AlertPriceRange, SearchAlert, SearchAlertDraft, SearchAlertDraftError,
    SearchAlertNotification,
};
pub use self::search_alert_service::SearchAlertService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PushTarget, UserId, UserIdError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
