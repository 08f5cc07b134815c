use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_store, Store};
use serde_json::{json, Value};
use tower::ServiceExt;

const BEARER: &str = "Bearer sk_test_mock";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, BEARER)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, BEARER)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_returns_401_with_error_body() {
    let resp = app()
        .oneshot(Request::builder().uri("/licenses").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"error": {"message": "Invalid API key"}}));
}

#[tokio::test]
async fn empty_bearer_token_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/products")
                .header(http::header::AUTHORIZATION, "Bearer ")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- licenses ---

#[tokio::test]
async fn list_licenses_empty() {
    let resp = app().oneshot(request("GET", "/licenses")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 20);
}

#[tokio::test]
async fn create_license_requires_email() {
    let resp = app()
        .oneshot(json_request("POST", "/licenses", r#"{"plan":"prod_1"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["message"], "email is required");
}

#[tokio::test]
async fn create_license_generates_key_and_empty_metadata() {
    let resp = app()
        .oneshot(json_request("POST", "/licenses", r#"{"plan":"prod_1","email":"a@b.com"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let license = body_json(resp).await;
    assert!(!license["key"].as_str().unwrap().is_empty());
    assert_eq!(license["metadata"], json!({}));
    assert_eq!(license["unlocked"], false);
}

#[tokio::test]
async fn get_license_not_found() {
    let resp = app().oneshot(request("GET", "/licenses/NOPE")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_license_not_found() {
    let resp = app().oneshot(request("DELETE", "/licenses/NOPE")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_licenses_paginates() {
    use tower::Service;

    let mut app = app().into_service();
    for n in 0..3 {
        let body = format!(r#"{{"plan":"prod_1","email":"u{n}@b.com","key":"KEY-{n}"}}"#);
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/licenses", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/licenses?page=2&limit=2"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["key"], "KEY-2");
}

// --- payments and waitlist fixtures ---

#[tokio::test]
async fn refund_already_refunded_payment_is_rejected() {
    let resp = app().oneshot(request("POST", "/payments/pay_2/refund")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["error"]["message"],
        "Payment has already been refunded"
    );
}

#[tokio::test]
async fn refund_returns_accepted_text() {
    let resp = app().oneshot(request("POST", "/payments/pay_1/refund")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(&body_bytes(resp).await[..], b"Accepted");
}

#[tokio::test]
async fn empty_store_has_no_payments() {
    let resp = app_with_store(Store::new())
        .oneshot(request("GET", "/payments/pay_1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn waitlist_entry_fixture_is_served() {
    let resp = app().oneshot(request("GET", "/waitlist/entries/wle_1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["email"], "early@example.com");
}

// --- links ---

#[tokio::test]
async fn create_link_requires_existing_plan() {
    let resp = app()
        .oneshot(json_request("POST", "/links", r#"{"plan":"prod_missing"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["message"], "No such plan");
}

// --- raffles and coupons filter by active ---

#[tokio::test]
async fn list_raffles_filters_on_active() {
    use tower::Service;

    let mut app = app().into_service();
    for active in [true, false] {
        let body = json!({"plan": "prod_1", "spots": 5, "pick_winners_at": "2024-06-01T18:00:00Z", "active": active});
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/raffles", &body.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/raffles?active=false"))
        .await
        .unwrap();
    let inactive = body_json(resp).await;
    assert_eq!(inactive["data"].as_array().unwrap().len(), 1);
    assert_eq!(inactive["data"][0]["active"], false);
}

// --- full license lifecycle ---

#[tokio::test]
async fn license_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/licenses",
            r#"{"plan":"prod_1","email":"a@b.com","key":"ABCD","metadata":{"seat":1}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["metadata"], json!({"seat": 1}));

    // update: metadata replaced wholesale, subscription merged
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            "/licenses/ABCD",
            r#"{"metadata":{"hwid":"aa:bb:cc:dd:ee:ff"},"subscription":{"cancel_at_period_end":true}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["metadata"], json!({"hwid": "aa:bb:cc:dd:ee:ff"}));
    assert_eq!(updated["subscription"]["cancel_at_period_end"], true);
    assert_eq!(updated["email"], "a@b.com");

    // metadata endpoint
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", "/licenses/ABCD/metadata", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({}));

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", "/licenses/ABCD"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(&body_bytes(resp).await[..], b"Accepted");

    // gone after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/licenses/ABCD"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
