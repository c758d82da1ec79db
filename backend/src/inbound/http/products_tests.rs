//! Tests for product HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::TimeZone;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockProductCatalogue, MockProductDiscovery};
use crate::domain::{ErrorCode, Product, ProductId, ProductStatus, UserId};
use crate::inbound::http::test_utils::{
    configure_test_login, login_cookie, mock_state, test_session_middleware,
};

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(configure_test_login)
        .service(
            web::scope("/api/v1")
                .service(list_favourites)
                .service(discover_products)
                .service(create_product)
                .service(list_own_products)
                .service(update_product)
                .service(change_product_status)
                .service(delete_product)
                .service(toggle_favourite),
        )
}

fn view(owner: &UserId, name: &str) -> ProductView {
    let created_at = chrono::Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    ProductView {
        product: Product {
            id: ProductId::random(),
            owner_id: owner.clone(),
            image_keys: vec!["k.jpg".to_owned()],
            name: name.to_owned(),
            listing_kind: ListingKind::Sale,
            status: ProductStatus::Active,
            price: 15.0,
            open_to_offers: false,
            description: "desc".to_owned(),
            categories: vec!["books".to_owned()],
            created_at,
        },
        image_urls: vec!["https://cdn.example/k.jpg".to_owned()],
        is_favourite: false,
    }
}

fn create_payload() -> Value {
    json!({
        "productImage": ["k.jpg"],
        "productName": "Desk",
        "listingType": "sale",
        "productPrice": 40.0,
        "productDescription": "Oak",
        "categoryName": "furniture",
    })
}

#[actix_web::test]
async fn create_returns_accepted_with_product() {
    let user = UserId::random();
    let owner = user.clone();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_create_product()
        .withf(move |id, draft| {
            *id == owner && draft.name == "Desk" && draft.category == "furniture"
        })
        .times(1)
        .returning(|owner, _| Ok(view(owner, "Desk")));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/products")
        .cookie(cookie)
        .set_json(create_payload())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["productName"], "Desk");
    assert_eq!(body["productImages"], json!(["https://cdn.example/k.jpg"]));
    assert_eq!(body["isFavourite"], false);
}

#[rstest]
#[case("productName")]
#[case("listingType")]
#[case("categoryName")]
#[actix_web::test]
async fn create_rejects_missing_fields(#[case] field: &str) {
    let user = UserId::random();
    let app = actix_test::init_service(test_app(mock_state())).await;
    let cookie = login_cookie(&app, &user).await;
    let mut payload = create_payload();
    payload
        .as_object_mut()
        .expect("object payload")
        .remove(field);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/products")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn anonymous_discovery_is_unauthorised() {
    let app = actix_test::init_service(test_app(mock_state())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/products/nearest")
        .set_json(json!({}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn discovery_maps_request_into_criteria() {
    let user = UserId::random();
    let mut discovery = MockProductDiscovery::new();
    discovery
        .expect_discover()
        .withf(|_, criteria| {
            criteria.search_term.as_deref() == Some("lamp")
                && criteria.search_radius_miles == Some(5.0)
                && criteria.sort == Some(DiscoverySort::MostRecent)
                && criteria.price == Some(PriceBand { min: Some(10.0), max: Some(20.0) })
        })
        .times(1)
        .returning(|_, _| Ok(vec![view(&UserId::random(), "Lamp")]));
    let state = HttpState {
        discovery: Arc::new(discovery),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/products/nearest")
        .cookie(cookie)
        .set_json(json!({
            "searchTerm": "lamp",
            "searchRadius": 5.0,
            "sort": 1,
            "price": {"min": 10.0, "max": 20.0},
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<Value> = actix_test::read_body_json(res).await;
    assert_eq!(body.len(), 1);
}

#[actix_web::test]
async fn discovery_without_location_is_unprocessable() {
    let user = UserId::random();
    let mut discovery = MockProductDiscovery::new();
    discovery
        .expect_discover()
        .returning(|_, _| Err(Error::location_missing("no saved location")));
    let state = HttpState {
        discovery: Arc::new(discovery),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/products/nearest")
        .cookie(cookie)
        .set_json(json!({}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn discovery_rejects_unknown_sort() {
    let user = UserId::random();
    let app = actix_test::init_service(test_app(mock_state())).await;
    let cookie = login_cookie(&app, &user).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/products/nearest")
        .cookie(cookie)
        .set_json(json!({"sort": 7}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "sort");
}

#[actix_web::test]
async fn list_own_products_passes_status_filter() {
    let user = UserId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_list_own_products()
        .with(eq(user.clone()), eq(Some(ProductStatus::Sold)))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/products?productStatus=sold")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn delete_maps_forbidden() {
    let user = UserId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_delete_product()
        .returning(|_, _| Err(Error::forbidden("only the owner may delete a product")));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/products/{}", ProductId::random()))
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::Forbidden);
}

#[actix_web::test]
async fn toggle_reports_outcome() {
    let user = UserId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_toggle_favourite()
        .times(1)
        .returning(|_, _| Ok(FavouriteToggle::Added));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/products/{}/favourite", ProductId::random()))
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: FavouriteToggleResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.status, "added");
}

#[actix_web::test]
async fn favourites_route_is_not_mistaken_for_product_id() {
    let user = UserId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_list_favourites()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/products/favourites")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn update_passes_partial_edit() {
    let user = UserId::random();
    let product_id = ProductId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_update_product()
        .withf(move |_, id, edit| {
            *id == product_id
                && edit.price == Some(25.0)
                && edit.name.is_none()
                && edit.description == "Refinished"
        })
        .times(1)
        .returning(|user, _, _| Ok(view(user, "Desk")));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/products/{product_id}"))
        .cookie(cookie)
        .set_json(json!({"productPrice": 25.0, "productDescription": "Refinished"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["productName"], "Desk");
}

#[actix_web::test]
async fn update_requires_description() {
    let user = UserId::random();
    let app = actix_test::init_service(test_app(mock_state())).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/products/{}", ProductId::random()))
        .cookie(cookie)
        .set_json(json!({"productPrice": 25.0}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "productDescription");
}

#[actix_web::test]
async fn update_maps_forbidden() {
    let user = UserId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_update_product()
        .returning(|_, _, _| Err(Error::forbidden("only the owner may edit a product")));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/products/{}", ProductId::random()))
        .cookie(cookie)
        .set_json(json!({"productDescription": "Refinished"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn status_change_parses_label() {
    let user = UserId::random();
    let product_id = ProductId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_change_status()
        .with(eq(user.clone()), eq(product_id), eq(ProductStatus::Reserved))
        .times(1)
        .returning(|user, _, status| {
            let mut view = view(user, "Desk");
            view.product.status = status;
            Ok(view)
        });
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/products/{product_id}/status"))
        .cookie(cookie)
        .set_json(json!({"productStatus": "reserved"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["productStatus"], "reserved");
}

#[rstest]
#[case(json!({"productStatus": "archived"}))]
#[case(json!({}))]
#[actix_web::test]
async fn status_change_rejects_bad_status(#[case] payload: Value) {
    let user = UserId::random();
    let app = actix_test::init_service(test_app(mock_state())).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/products/{}/status", ProductId::random()))
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "productStatus");
}

#[actix_web::test]
async fn status_change_maps_not_found() {
    let user = UserId::random();
    let mut catalogue = MockProductCatalogue::new();
    catalogue
        .expect_change_status()
        .returning(|_, id, _| Err(Error::not_found(format!("product {id} not found"))));
    let state = HttpState {
        catalogue: Arc::new(catalogue),
        ..mock_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, &user).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/products/{}/status", ProductId::random()))
        .cookie(cookie)
        .set_json(json!({"productStatus": "sold"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
