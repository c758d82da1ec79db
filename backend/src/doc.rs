//! OpenAPI documentation for the marketplace REST API.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes, the
//! request/response DTOs, and the session cookie security scheme. Swagger UI
//! serves it in debug builds; `openapi-dump` prints it for external tooling.

use crate::inbound::http::alerts::{
    AlertNotificationResponse, MinMaxPrice, SearchAlertRequest, SearchAlertResponse,
};
use crate::inbound::http::products::{
    CreateProductRequest, DiscoveryRequest, FavouriteToggleResponse, PriceBandRequest,
    ProductResponse, ProductStatusRequest, UpdateProductRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    FeedRequest, FeedResponse, LocationRequest, NotificationsRequest, PushTokenRequest,
    PushTokenResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie carrying the user id issued by the login flow.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace API",
        description = "Listings, geo-aware discovery, favourites, and saved search alerts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_own_products,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::change_product_status,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::discover_products,
        crate::inbound::http::products::toggle_favourite,
        crate::inbound::http::products::list_favourites,
        crate::inbound::http::alerts::save_search_alert,
        crate::inbound::http::alerts::get_search_alert,
        crate::inbound::http::alerts::list_alert_notifications,
        crate::inbound::http::users::update_location,
        crate::inbound::http::users::save_feed,
        crate::inbound::http::users::get_feed,
        crate::inbound::http::users::register_push_token,
        crate::inbound::http::users::set_notifications,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateProductRequest,
        UpdateProductRequest,
        ProductStatusRequest,
        ProductResponse,
        DiscoveryRequest,
        PriceBandRequest,
        FavouriteToggleResponse,
        SearchAlertRequest,
        MinMaxPrice,
        SearchAlertResponse,
        AlertNotificationResponse,
        LocationRequest,
        FeedRequest,
        FeedResponse,
        PushTokenRequest,
        PushTokenResponse,
        NotificationsRequest,
    )),
    tags(
        (name = "products", description = "Listings, discovery, and favourites"),
        (name = "alerts", description = "Saved search alerts and their notifications"),
        (name = "users", description = "Location, feed, and push delivery preferences"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
