//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations`. The PostGIS
//! `users.location` column is deliberately absent: Diesel has no geography
//! type, so location reads and writes go through raw SQL in the user
//! profile and geo index adapters.

diesel::table! {
    /// Marketplace-owned user profile columns.
    users (id) {
        id -> Uuid,
        push_tokens -> Array<Text>,
        notifications_enabled -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    products (id) {
        id -> Uuid,
        owner_id -> Uuid,
        image_keys -> Array<Text>,
        name -> Text,
        /// `sale` or `free`.
        listing_kind -> Text,
        /// `active`, `reserved`, or `sold`.
        status -> Text,
        price -> Float8,
        open_to_offers -> Bool,
        description -> Text,
        categories -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One saved alert per user.
    search_alerts (user_id) {
        user_id -> Uuid,
        categories -> Array<Text>,
        min_price -> Float8,
        max_price -> Float8,
        keywords -> Array<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only log, unique per (receiver_id, product_id).
    search_alert_notifications (id) {
        id -> Uuid,
        receiver_id -> Uuid,
        product_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    favourites (user_id, product_id) {
        user_id -> Uuid,
        product_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    feed_preferences (user_id) {
        user_id -> Uuid,
        categories -> Array<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(search_alert_notifications -> products (product_id));
diesel::joinable!(favourites -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    products,
    search_alerts,
    search_alert_notifications,
    favourites,
    feed_preferences,
);
