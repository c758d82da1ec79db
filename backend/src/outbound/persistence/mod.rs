//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the marketplace's driven ports, backed by
//! PostgreSQL with PostGIS via `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows
//!   and domain types.
//! - **Internal models**: `models.rs` and `schema.rs` never leave this
//!   module.
//! - **Strongly typed errors**: Diesel and pool failures map onto each
//!   port's connection/query error variants.
//!
//! # Example
//!
//! ```ignore
//! use marketplace::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/market")).await?;
//! let products = DieselProductRepository::new(pool);
//! ```

mod diesel_alert_notification_repository;
mod diesel_error_mapping;
mod diesel_favourites_repository;
mod diesel_feed_preferences_repository;
mod diesel_nearby_users;
mod diesel_product_repository;
mod diesel_search_alert_repository;
mod diesel_user_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_alert_notification_repository::DieselAlertNotificationRepository;
pub use diesel_favourites_repository::DieselFavouritesRepository;
pub use diesel_feed_preferences_repository::DieselFeedPreferencesRepository;
pub use diesel_nearby_users::DieselNearbyUsers;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_search_alert_repository::DieselSearchAlertRepository;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use migrations::{MigrationError, apply_migrations};
pub use pool::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
