//! HTTP inbound adapter exposing REST endpoints under `/api/v1`.

use actix_web::web;

pub mod alerts;
pub mod error;
pub mod health;
pub mod products;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every session-authenticated endpoint on an `/api/v1` scope.
///
/// Static product paths are registered before `{product_id}` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(products::list_favourites)
        .service(products::discover_products)
        .service(products::create_product)
        .service(products::list_own_products)
        .service(products::update_product)
        .service(products::change_product_status)
        .service(products::delete_product)
        .service(products::toggle_favourite)
        .service(alerts::list_alert_notifications)
        .service(alerts::save_search_alert)
        .service(alerts::get_search_alert)
        .service(users::update_location)
        .service(users::save_feed)
        .service(users::get_feed)
        .service(users::register_push_token)
        .service(users::set_notifications);
}
