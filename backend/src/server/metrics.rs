//! Prometheus request metrics, compiled with the `metrics` feature.

use std::io;
use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;

const METRICS_NAMESPACE: &str = "marketplace";
const METRICS_ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware serving `/metrics`.
///
/// # Errors
/// Returns [`io::Error`] when the collectors cannot be registered.
pub(crate) fn build_prometheus() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .endpoint(METRICS_ENDPOINT)
        .build()
        .map_err(|e| io::Error::other(format!("prometheus setup failed: {e}")))
}

/// Request metrics when configured, a pass-through otherwise. Both arms
/// box the response body so the app type does not depend on the choice.
#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl From<Option<PrometheusMetrics>> for MetricsLayer {
    fn from(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self {
            Self::Enabled(metrics) => {
                let fut = Compat::new(PrometheusMetrics::clone(metrics)).new_transform(service);
                Box::pin(async move { Ok(boxed::service(fut.await?)) })
            }
            Self::Disabled => Box::pin(async move {
                Ok(boxed::service(
                    service.map(ServiceResponse::<B>::map_into_boxed_body),
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn enabled_layer_serves_metrics_endpoint() {
        let layer = MetricsLayer::from(Some(build_prometheus().expect("prometheus builds")));
        let app = test::init_service(
            App::new()
                .wrap(layer)
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(METRICS_ENDPOINT).to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let body = test::read_body(res).await;
        assert!(String::from_utf8_lossy(&body).contains(METRICS_NAMESPACE));
    }

    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from(None))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert!(res.status().is_success());
    }
}
