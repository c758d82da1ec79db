//! Product HTTP handlers.
//!
//! ```text
//! POST   /api/v1/products
//! GET    /api/v1/products?productStatus=active
//! PUT    /api/v1/products/{product_id}
//! PUT    /api/v1/products/{product_id}/status
//! DELETE /api/v1/products/{product_id}
//! POST   /api/v1/products/nearest
//! POST   /api/v1/products/{product_id}/favourite
//! GET    /api/v1/products/favourites
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DiscoveryCriteria, DiscoverySort, Error, FavouriteToggle, ListingKind, PriceBand,
    ProductDraft, ProductEdit, ProductView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ValidationCode, field_error, parse_product_id, parse_status, require,
};

/// Request payload for listing a product.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Storage keys of already uploaded images, in display order.
    #[serde(default)]
    pub product_image: Vec<String>,
    pub product_name: Option<String>,
    /// `sale` or `free`.
    #[schema(example = "sale")]
    pub listing_type: Option<String>,
    pub product_price: Option<f64>,
    #[serde(default)]
    pub open_to_offers: bool,
    pub product_description: Option<String>,
    pub category_name: Option<String>,
}

fn parse_listing_kind(raw: &str) -> Result<ListingKind, Error> {
    ListingKind::from_str(raw).map_err(|error| {
        field_error(
            "listingType",
            ValidationCode::InvalidEnum,
            error.to_string(),
            Some(raw),
        )
    })
}

impl CreateProductRequest {
    fn into_draft(self) -> Result<ProductDraft, Error> {
        let listing_kind = parse_listing_kind(&require(self.listing_type, "listingType")?)?;
        Ok(ProductDraft {
            image_keys: self.product_image,
            name: require(self.product_name, "productName")?,
            listing_kind,
            price: require(self.product_price, "productPrice")?,
            open_to_offers: self.open_to_offers,
            description: require(self.product_description, "productDescription")?,
            category: require(self.category_name, "categoryName")?,
        })
    }
}

/// Owner edit of a product. Omitted fields keep their stored value except
/// the description, which is always required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_image: Option<Vec<String>>,
    pub product_name: Option<String>,
    #[schema(example = "free")]
    pub listing_type: Option<String>,
    pub product_price: Option<f64>,
    pub open_to_offers: Option<bool>,
    pub product_description: Option<String>,
    pub category_name: Option<String>,
}

impl UpdateProductRequest {
    fn into_edit(self) -> Result<ProductEdit, Error> {
        Ok(ProductEdit {
            image_keys: self.product_image,
            name: self.product_name,
            listing_kind: self
                .listing_type
                .as_deref()
                .map(parse_listing_kind)
                .transpose()?,
            price: self.product_price,
            open_to_offers: self.open_to_offers,
            description: require(self.product_description, "productDescription")?,
            category: self.category_name,
        })
    }
}

/// New lifecycle status: `active`, `reserved`, or `sold`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatusRequest {
    #[schema(example = "reserved")]
    pub product_status: Option<String>,
}

/// Product as returned to clients, with resolved image URLs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub owner_id: String,
    pub product_images: Vec<String>,
    pub product_name: String,
    pub listing_type: String,
    pub product_status: String,
    pub product_price: f64,
    pub open_to_offers: bool,
    pub product_description: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub is_favourite: bool,
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        let ProductView {
            product,
            image_urls,
            is_favourite,
        } = view;
        Self {
            id: product.id.to_string(),
            owner_id: product.owner_id.to_string(),
            product_images: image_urls,
            product_name: product.name,
            listing_type: product.listing_kind.as_str().to_owned(),
            product_status: product.status.as_str().to_owned(),
            product_price: product.price,
            open_to_offers: product.open_to_offers,
            product_description: product.description,
            categories: product.categories,
            created_at: product.created_at,
            is_favourite,
        }
    }
}

fn responses(views: Vec<ProductView>) -> Vec<ProductResponse> {
    views.into_iter().map(ProductResponse::from).collect()
}

/// Optional price bounds for discovery.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct PriceBandRequest {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Discovery filters. Every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequest {
    pub search_term: Option<String>,
    /// Radius in miles; absent or zero means 10 miles.
    pub search_radius: Option<f64>,
    #[serde(default)]
    pub category: Vec<String>,
    /// `0` relevance (nearest owners first), `1` most recent.
    pub sort: Option<u8>,
    pub price: Option<PriceBandRequest>,
}

impl DiscoveryRequest {
    fn into_criteria(self) -> Result<DiscoveryCriteria, Error> {
        let sort = self
            .sort
            .map(|raw| {
                DiscoverySort::try_from(raw).map_err(|error| {
                    Error::invalid_request(error.to_string()).with_details(json!({
                        "field": error.field(),
                        "code": "invalid_criteria",
                    }))
                })
            })
            .transpose()?;
        Ok(DiscoveryCriteria {
            search_term: self.search_term.filter(|term| !term.trim().is_empty()),
            search_radius_miles: self.search_radius,
            categories: self.category,
            sort,
            price: self.price.map(|band| PriceBand {
                min: band.min,
                max: band.max,
            }),
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// `active`, `reserved`, or `sold`.
    pub product_status: Option<String>,
}

/// Outcome of a favourite toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavouriteToggleResponse {
    /// `added` or `removed`.
    pub status: String,
}

impl From<FavouriteToggle> for FavouriteToggleResponse {
    fn from(value: FavouriteToggle) -> Self {
        let status = match value {
            FavouriteToggle::Added => "added",
            FavouriteToggle::Removed => "removed",
        };
        Self {
            status: status.to_owned(),
        }
    }
}

/// List a new product and run search-alert fan-out for it.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 202, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateProductRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let view = state.catalogue.create_product(&owner, draft).await?;
    Ok(HttpResponse::Accepted().json(ProductResponse::from(view)))
}

/// List the caller's own products.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Own products, newest first", body = [ProductResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listOwnProducts"
)]
#[get("/products")]
pub async fn list_own_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListProductsQuery>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let owner = session.require_user_id()?;
    let status = query
        .into_inner()
        .product_status
        .as_deref()
        .map(parse_status)
        .transpose()?;
    let views = state.catalogue.list_own_products(&owner, status).await?;
    Ok(web::Json(responses(views)))
}

/// Edit one of the caller's products.
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = String, Path, description = "Product identifier")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{product_id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateProductRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let user = session.require_user_id()?;
    let product_id = parse_product_id(&path.into_inner())?;
    let edit = payload.into_inner().into_edit()?;
    let view = state
        .catalogue
        .update_product(&user, &product_id, edit)
        .await?;
    Ok(web::Json(view.into()))
}

/// Move one of the caller's products to a new lifecycle status.
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}/status",
    params(("product_id" = String, Path, description = "Product identifier")),
    request_body = ProductStatusRequest,
    responses(
        (status = 200, description = "Product with its current status", body = ProductResponse),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "changeProductStatus"
)]
#[put("/products/{product_id}/status")]
pub async fn change_product_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ProductStatusRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let user = session.require_user_id()?;
    let product_id = parse_product_id(&path.into_inner())?;
    let status = parse_status(&require(
        payload.into_inner().product_status,
        "productStatus",
    )?)?;
    let view = state
        .catalogue
        .change_status(&user, &product_id, status)
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete one of the caller's products together with its alert notifications.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{product_id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let product_id = parse_product_id(&path.into_inner())?;
    state.catalogue.delete_product(&user, &product_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Products listed by users near the caller.
#[utoipa::path(
    post,
    path = "/api/v1/products/nearest",
    request_body = DiscoveryRequest,
    responses(
        (status = 200, description = "Matching products", body = [ProductResponse]),
        (status = 400, description = "Invalid criteria", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Caller has no saved location", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "discoverNearestProducts"
)]
#[post("/products/nearest")]
pub async fn discover_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DiscoveryRequest>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let requester = session.require_user_id()?;
    let criteria = payload.into_inner().into_criteria()?;
    let views = state.discovery.discover(&requester, criteria).await?;
    Ok(web::Json(responses(views)))
}

/// Add or remove a product from the caller's favourites.
#[utoipa::path(
    post,
    path = "/api/v1/products/{product_id}/favourite",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Toggle outcome", body = FavouriteToggleResponse),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "toggleFavourite"
)]
#[post("/products/{product_id}/favourite")]
pub async fn toggle_favourite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FavouriteToggleResponse>> {
    let user = session.require_user_id()?;
    let product_id = parse_product_id(&path.into_inner())?;
    let outcome = state.catalogue.toggle_favourite(&user, &product_id).await?;
    Ok(web::Json(outcome.into()))
}

/// The caller's favourite products.
#[utoipa::path(
    get,
    path = "/api/v1/products/favourites",
    responses(
        (status = 200, description = "Favourite products", body = [ProductResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listFavourites"
)]
#[get("/products/favourites")]
pub async fn list_favourites(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let user = session.require_user_id()?;
    let views = state.catalogue.list_favourites(&user).await?;
    Ok(web::Json(responses(views)))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
