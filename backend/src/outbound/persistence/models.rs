//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types live beside each row.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Double, Nullable};
use uuid::Uuid;

use crate::domain::{
    AlertPriceRange, FeedPreferences, Product, ProductId, PushTarget, SearchAlert,
    SearchAlertNotification, UnknownLabel, UserId,
};

use super::schema::{
    favourites, feed_preferences, products, search_alert_notifications, search_alerts, users,
};

// ---------------------------------------------------------------------------
// User profile models
// ---------------------------------------------------------------------------

/// Push delivery columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PushTargetRow {
    pub push_tokens: Vec<String>,
    pub notifications_enabled: bool,
}

impl From<PushTargetRow> for PushTarget {
    fn from(row: PushTargetRow) -> Self {
        Self {
            tokens: row.push_tokens,
            notifications_enabled: row.notifications_enabled,
        }
    }
}

/// Location projected out of the PostGIS geography column.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct LocationRow {
    #[diesel(sql_type = Nullable<Double>)]
    pub longitude: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub latitude: Option<f64>,
}

/// Identifier row returned by the radius query.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct NearbyUserRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: Uuid,
}

// ---------------------------------------------------------------------------
// Product models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub image_keys: Vec<String>,
    pub name: String,
    pub listing_kind: String,
    pub status: String,
    pub price: f64,
    pub open_to_offers: bool,
    pub description: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = UnknownLabel;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            image_keys: row.image_keys,
            name: row.name,
            listing_kind: row.listing_kind.parse()?,
            status: row.status.parse()?,
            price: row.price,
            open_to_offers: row.open_to_offers,
            description: row.description,
            categories: row.categories,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub image_keys: &'a [String],
    pub name: &'a str,
    pub listing_kind: &'static str,
    pub status: &'static str,
    pub price: f64,
    pub open_to_offers: bool,
    pub description: &'a str,
    pub categories: &'a [String],
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Product> for NewProductRow<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: *product.id.as_uuid(),
            owner_id: *product.owner_id.as_uuid(),
            image_keys: &product.image_keys,
            name: &product.name,
            listing_kind: product.listing_kind.as_str(),
            status: product.status.as_str(),
            price: product.price,
            open_to_offers: product.open_to_offers,
            description: &product.description,
            categories: &product.categories,
            created_at: product.created_at,
        }
    }
}

/// Mutable product columns. Identity, owner and creation time never change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductChangeset<'a> {
    pub image_keys: &'a [String],
    pub name: &'a str,
    pub listing_kind: &'static str,
    pub status: &'static str,
    pub price: f64,
    pub open_to_offers: bool,
    pub description: &'a str,
    pub categories: &'a [String],
}

impl<'a> From<&'a Product> for ProductChangeset<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            image_keys: &product.image_keys,
            name: &product.name,
            listing_kind: product.listing_kind.as_str(),
            status: product.status.as_str(),
            price: product.price,
            open_to_offers: product.open_to_offers,
            description: &product.description,
            categories: &product.categories,
        }
    }
}

// ---------------------------------------------------------------------------
// Search alert models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = search_alerts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SearchAlertRow {
    pub user_id: Uuid,
    pub categories: Vec<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub keywords: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<SearchAlertRow> for SearchAlert {
    fn from(row: SearchAlertRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            categories: row.categories,
            price_range: AlertPriceRange {
                min: row.min_price,
                max: row.max_price,
            },
            keywords: row.keywords,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = search_alerts)]
pub(crate) struct SearchAlertWrite<'a> {
    pub user_id: Uuid,
    pub categories: &'a [String],
    pub min_price: f64,
    pub max_price: f64,
    pub keywords: &'a [String],
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a SearchAlert> for SearchAlertWrite<'a> {
    fn from(alert: &'a SearchAlert) -> Self {
        Self {
            user_id: *alert.user_id.as_uuid(),
            categories: &alert.categories,
            min_price: alert.price_range.min,
            max_price: alert.price_range.max,
            keywords: &alert.keywords,
            updated_at: alert.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Notification models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = search_alert_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub receiver_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&SearchAlertNotification> for NotificationRow {
    fn from(notification: &SearchAlertNotification) -> Self {
        Self {
            id: notification.id,
            receiver_id: *notification.receiver_id.as_uuid(),
            product_id: *notification.product_id.as_uuid(),
            created_at: notification.created_at,
        }
    }
}

impl From<NotificationRow> for SearchAlertNotification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            receiver_id: UserId::from_uuid(row.receiver_id),
            product_id: ProductId::from_uuid(row.product_id),
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Favourites and feed models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favourites)]
pub(crate) struct NewFavouriteRow {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = feed_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedPreferencesRow {
    pub user_id: Uuid,
    pub categories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&FeedPreferences> for FeedPreferencesRow {
    fn from(preferences: &FeedPreferences) -> Self {
        Self {
            user_id: *preferences.user_id.as_uuid(),
            categories: preferences.categories.clone(),
            updated_at: preferences.updated_at,
        }
    }
}

impl From<FeedPreferencesRow> for FeedPreferences {
    fn from(row: FeedPreferencesRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            categories: row.categories,
            updated_at: row.updated_at,
        }
    }
}
