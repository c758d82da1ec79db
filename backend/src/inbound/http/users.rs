//! Per-user settings HTTP handlers.
//!
//! ```text
//! PUT /api/v1/users/me/location
//! PUT /api/v1/users/me/feed
//! GET /api/v1/users/me/feed
//! PUT /api/v1/users/me/push-tokens
//! PUT /api/v1/users/me/notifications
//! ```

use actix_web::{HttpResponse, get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, FeedPreferences, GeoPoint};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ValidationCode, field_error};

/// GeoJSON point: `{"type": "Point", "coordinates": [lng, lat]}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LocationRequest {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    #[schema(example = json!([-0.1276, 51.5072]))]
    pub coordinates: Vec<f64>,
}

impl LocationRequest {
    fn into_point(self) -> Result<GeoPoint, Error> {
        if self.kind != "Point" {
            return Err(field_error(
                "type",
                ValidationCode::InvalidEnum,
                "location type must be Point",
                Some(&self.kind),
            ));
        }
        let &[longitude, latitude] = self.coordinates.as_slice() else {
            return Err(Error::invalid_request(
                "coordinates must be [longitude, latitude]",
            )
            .with_details(json!({ "field": "coordinates", "code": "invalid_coordinates" })));
        };
        GeoPoint::new(longitude, latitude).map_err(|error| {
            Error::invalid_request(error.to_string()).with_details(json!({
                "field": error.field(),
                "code": "invalid_coordinates",
            }))
        })
    }
}

/// Categories shown in the caller's personalised feed.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct FeedRequest {
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub categories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeedPreferences> for FeedResponse {
    fn from(value: FeedPreferences) -> Self {
        Self {
            categories: value.categories,
            updated_at: value.updated_at,
        }
    }
}

/// Device token registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenRequest {
    #[schema(example = "fcm-device-token")]
    pub fcm_key: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenResponse {
    /// `false` when the token was already registered.
    pub added: bool,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NotificationsRequest {
    pub enabled: bool,
}

/// Store the caller's location used for discovery and alert matching.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/location",
    request_body = LocationRequest,
    responses(
        (status = 204, description = "Location stored"),
        (status = 400, description = "Invalid coordinates", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateLocation"
)]
#[put("/users/me/location")]
pub async fn update_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LocationRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let point = payload.into_inner().into_point()?;
    state.profile.update_location(&user, point).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the caller's feed categories.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/feed",
    request_body = FeedRequest,
    responses(
        (status = 200, description = "Stored feed preferences", body = FeedResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "saveFeed"
)]
#[put("/users/me/feed")]
pub async fn save_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FeedRequest>,
) -> ApiResult<web::Json<FeedResponse>> {
    let user = session.require_user_id()?;
    let feed = state
        .profile
        .save_feed(&user, payload.into_inner().categories)
        .await?;
    Ok(web::Json(feed.into()))
}

/// Fetch the caller's feed categories.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/feed",
    responses(
        (status = 200, description = "Feed preferences", body = FeedResponse),
        (status = 404, description = "No feed saved", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getFeed"
)]
#[get("/users/me/feed")]
pub async fn get_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FeedResponse>> {
    let user = session.require_user_id()?;
    let feed = state.profile.fetch_feed(&user).await?;
    Ok(web::Json(feed.into()))
}

/// Register a device token for search-alert pushes.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/push-tokens",
    request_body = PushTokenRequest,
    responses(
        (status = 200, description = "Token registered or already known", body = PushTokenResponse),
        (status = 400, description = "Empty token", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerPushToken"
)]
#[put("/users/me/push-tokens")]
pub async fn register_push_token(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PushTokenRequest>,
) -> ApiResult<web::Json<PushTokenResponse>> {
    let user = session.require_user_id()?;
    let added = state
        .profile
        .register_push_token(&user, &payload.fcm_key)
        .await?;
    Ok(web::Json(PushTokenResponse { added }))
}

/// Opt in to or out of search-alert pushes.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/notifications",
    request_body = NotificationsRequest,
    responses(
        (status = 204, description = "Preference stored"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setNotifications"
)]
#[put("/users/me/notifications")]
pub async fn set_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NotificationsRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    state
        .profile
        .set_notifications_enabled(&user, payload.enabled)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use crate::domain::ports::MockProfileSettings;
    use crate::inbound::http::test_utils::{
        configure_test_login, login_cookie, mock_state, test_session_middleware,
    };

    fn location(kind: &str, coordinates: Vec<f64>) -> LocationRequest {
        LocationRequest {
            kind: kind.to_owned(),
            coordinates,
        }
    }

    #[rstest]
    #[case(location("Polygon", vec![0.0, 0.0]), "type")]
    #[case(location("Point", vec![0.0]), "coordinates")]
    #[case(location("Point", vec![190.0, 0.0]), "longitude")]
    #[case(location("Point", vec![0.0, -91.0]), "latitude")]
    fn invalid_locations_name_the_field(#[case] request: LocationRequest, #[case] field: &str) {
        let err = request.into_point().expect_err("invalid location");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!(field)));
    }

    #[actix_web::test]
    async fn location_update_stores_point() {
        let user = UserId::random();
        let mut profile = MockProfileSettings::new();
        profile
            .expect_update_location()
            .withf(|_, point| point.longitude() == -0.1276 && point.latitude() == 51.5072)
            .times(1)
            .returning(|_, _| Ok(()));
        let state = HttpState {
            profile: Arc::new(profile),
            ..mock_state()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .configure(configure_test_login)
                .service(web::scope("/api/v1").service(update_location)),
        )
        .await;
        let cookie = login_cookie(&app, &user).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/users/me/location")
            .cookie(cookie)
            .set_json(json!({"type": "Point", "coordinates": [-0.1276, 51.5072]}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn push_token_registration_reports_whether_it_was_added() {
        let user = UserId::random();
        let mut profile = MockProfileSettings::new();
        profile
            .expect_register_push_token()
            .withf(|_, token| token.to_string() == "device-1")
            .times(1)
            .returning(|_, _| Ok(false));
        let state = HttpState {
            profile: Arc::new(profile),
            ..mock_state()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .configure(configure_test_login)
                .service(web::scope("/api/v1").service(register_push_token)),
        )
        .await;
        let cookie = login_cookie(&app, &user).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/users/me/push-tokens")
            .cookie(cookie)
            .set_json(json!({"fcmKey": "device-1"}))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"added": false}));
    }

    #[actix_web::test]
    async fn push_token_registration_requires_login() {
        let mut profile = MockProfileSettings::new();
        profile.expect_register_push_token().times(0);
        let state = HttpState {
            profile: Arc::new(profile),
            ..mock_state()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(register_push_token)),
        )
        .await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/users/me/push-tokens")
            .set_json(json!({"fcmKey": "device-1"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn notifications_toggle_returns_no_content() {
        let user = UserId::random();
        let mut profile = MockProfileSettings::new();
        profile
            .expect_set_notifications_enabled()
            .withf(|_, enabled| !*enabled)
            .times(1)
            .returning(|_, _| Ok(()));
        let state = HttpState {
            profile: Arc::new(profile),
            ..mock_state()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .configure(configure_test_login)
                .service(web::scope("/api/v1").service(set_notifications)),
        )
        .await;
        let cookie = login_cookie(&app, &user).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/users/me/notifications")
            .cookie(cookie)
            .set_json(json!({"enabled": false}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
