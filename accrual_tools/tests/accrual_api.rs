use std::time::Duration;

use accrual_tools::{AccrualApi, AccrualApiConfig, AccrualApiError, AccrualStatus};
use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use loyalty_common::Points;
use serde_json::json;

async fn order_info(number: web::Path<String>) -> HttpResponse {
    match number.as_str() {
        "12345678903" => HttpResponse::Ok().json(json!({"order": "12345678903", "status": "PROCESSED", "accrual": 500})),
        "79927398713" => HttpResponse::Ok().json(json!({"order": "79927398713", "status": "PROCESSING"})),
        "2" => HttpResponse::NoContent().finish(),
        "3" => HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", "60"))
            .body("No more than 10 requests per minute allowed"),
        "4" => HttpResponse::Ok().content_type("application/json").body("{not json"),
        _ => HttpResponse::InternalServerError().body("calculation engine offline"),
    }
}

/// Starts a stand-in accrual service on a random local port.
fn start_accrual_service() -> (AccrualApi, ServerHandle) {
    let server = HttpServer::new(|| App::new().route("/api/orders/{number}", web::get().to(order_info)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Could not bind test server");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    let config = AccrualApiConfig::new(&addr.to_string()).with_request_timeout(Duration::from_secs(5));
    let api = AccrualApi::new(config).expect("Could not create accrual client");
    (api, handle)
}

#[actix_web::test]
async fn processed_order() {
    let _ = env_logger::try_init();
    let (api, handle) = start_accrual_service();
    let info = api.get_order_info("12345678903").await.expect("Query failed");
    assert_eq!(info.order, "12345678903");
    assert_eq!(info.status, AccrualStatus::Processed);
    assert_eq!(info.accrual, Some(Points::from_points(500)));

    let info = api.get_order_info("79927398713").await.expect("Query failed");
    assert_eq!(info.status, AccrualStatus::Processing);
    assert!(info.accrual.is_none());
    handle.stop(true).await;
}

#[actix_web::test]
async fn no_content() {
    let (api, handle) = start_accrual_service();
    let err = api.get_order_info("2").await.expect_err("Expected no content");
    assert!(matches!(err, AccrualApiError::NoContent), "Unexpected error: {err}");
    handle.stop(true).await;
}

#[actix_web::test]
async fn rate_limited() {
    let (api, handle) = start_accrual_service();
    let err = api.get_order_info("3").await.expect_err("Expected rate limit");
    match err {
        AccrualApiError::TooManyRequests { retry_after } => assert_eq!(retry_after, Some(Duration::from_secs(60))),
        e => panic!("Unexpected error: {e}"),
    }
    handle.stop(true).await;
}

#[actix_web::test]
async fn malformed_body() {
    let (api, handle) = start_accrual_service();
    let err = api.get_order_info("4").await.expect_err("Expected a decoding error");
    assert!(matches!(err, AccrualApiError::JsonError(_)), "Unexpected error: {err}");
    handle.stop(true).await;
}

#[actix_web::test]
async fn server_error() {
    let (api, handle) = start_accrual_service();
    let err = api.get_order_info("5").await.expect_err("Expected a server error");
    match err {
        AccrualApiError::QueryError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "calculation engine offline");
        },
        e => panic!("Unexpected error: {e}"),
    }
    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_service() {
    // Port 9 (discard) is assumed closed on test machines.
    let config = AccrualApiConfig::new("127.0.0.1:9").with_request_timeout(Duration::from_secs(2));
    let api = AccrualApi::new(config).unwrap();
    let err = api.get_order_info("12345678903").await.expect_err("Expected a network error");
    assert!(matches!(err, AccrualApiError::RestResponseError(_)), "Unexpected error: {err}");
}
