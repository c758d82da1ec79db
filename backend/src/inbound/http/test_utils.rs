//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;

pub const TEST_LOGIN_PATH: &str = "/__test/login/{user_id}";

/// Session middleware with a fresh key, `session` cookie, and no `Secure`
/// flag so plain-HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn test_login(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stand-in for the external login flow.
pub fn configure_test_login(cfg: &mut web::ServiceConfig) {
    cfg.route(TEST_LOGIN_PATH, web::post().to(test_login));
}

/// Log `user` in through [`configure_test_login`] and return the cookie.
pub async fn login_cookie<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/__test/login/{user}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("login sets session cookie")
        .into_owned()
}

/// Handler state backed by driving-port mocks with no expectations.
///
/// Tests replace the one port they exercise via struct update.
pub fn mock_state() -> crate::inbound::http::state::HttpState {
    use std::sync::Arc;

    use crate::domain::ports::{
        MockProductCatalogue, MockProductDiscovery, MockProfileSettings, MockSearchAlerts,
    };

    crate::inbound::http::state::HttpState::new(
        Arc::new(MockProductDiscovery::new()),
        Arc::new(MockProductCatalogue::new()),
        Arc::new(MockSearchAlerts::new()),
        Arc::new(MockProfileSettings::new()),
    )
}
