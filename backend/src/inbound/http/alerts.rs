//! Search alert HTTP handlers.
//!
//! ```text
//! PUT /api/v1/users/me/search-alert
//! GET /api/v1/users/me/search-alert
//! GET /api/v1/users/me/search-alert/notifications
//! ```

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AlertNotificationView, SearchAlert, SearchAlertDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Alert price window. Missing bounds default to zero.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct MinMaxPrice {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Request payload replacing the caller's search alert.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchAlertRequest {
    #[serde(default)]
    pub categories: Vec<String>,
    pub min_max_price: Option<MinMaxPrice>,
    #[serde(default)]
    pub search_words: Vec<String>,
}

impl From<SearchAlertRequest> for SearchAlertDraft {
    fn from(value: SearchAlertRequest) -> Self {
        let price = value.min_max_price.unwrap_or_default();
        Self {
            categories: value.categories,
            min_price: price.min,
            max_price: price.max,
            keywords: value.search_words,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct PriceRangeResponse {
    pub min: f64,
    pub max: f64,
}

/// Stored search alert.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchAlertResponse {
    pub categories: Vec<String>,
    pub min_max_price: PriceRangeResponse,
    pub search_words: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<SearchAlert> for SearchAlertResponse {
    fn from(alert: SearchAlert) -> Self {
        Self {
            categories: alert.categories,
            min_max_price: PriceRangeResponse {
                min: alert.price_range.min,
                max: alert.price_range.max,
            },
            search_words: alert.keywords,
            updated_at: alert.updated_at,
        }
    }
}

/// One entry of the alert notification feed.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotificationResponse {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_description: String,
    pub product_images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AlertNotificationView> for AlertNotificationResponse {
    fn from(view: AlertNotificationView) -> Self {
        Self {
            id: view.id.to_string(),
            product_id: view.product_id.to_string(),
            product_name: view.product_name,
            product_description: view.product_description,
            product_images: view.image_urls,
            created_at: view.created_at,
        }
    }
}

/// Replace the caller's search alert.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/search-alert",
    request_body = SearchAlertRequest,
    responses(
        (status = 200, description = "Stored alert", body = SearchAlertResponse),
        (status = 400, description = "Invalid price range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["alerts"],
    operation_id = "saveSearchAlert"
)]
#[put("/users/me/search-alert")]
pub async fn save_search_alert(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SearchAlertRequest>,
) -> ApiResult<web::Json<SearchAlertResponse>> {
    let user = session.require_user_id()?;
    let alert = state
        .alerts
        .save_alert(&user, payload.into_inner().into())
        .await?;
    Ok(web::Json(alert.into()))
}

/// Fetch the caller's search alert.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/search-alert",
    responses(
        (status = 200, description = "Stored alert", body = SearchAlertResponse),
        (status = 404, description = "No alert saved", body = ErrorSchema)
    ),
    tags = ["alerts"],
    operation_id = "getSearchAlert"
)]
#[get("/users/me/search-alert")]
pub async fn get_search_alert(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SearchAlertResponse>> {
    let user = session.require_user_id()?;
    let alert = state.alerts.fetch_alert(&user).await?;
    Ok(web::Json(alert.into()))
}

/// Products that matched the caller's alert, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/search-alert/notifications",
    responses(
        (status = 200, description = "Notification feed", body = [AlertNotificationResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["alerts"],
    operation_id = "listSearchAlertNotifications"
)]
#[get("/users/me/search-alert/notifications")]
pub async fn list_alert_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AlertNotificationResponse>>> {
    let user = session.require_user_id()?;
    let views = state.alerts.list_alert_notifications(&user).await?;
    Ok(web::Json(views.into_iter().map(Into::into).collect()))
}
