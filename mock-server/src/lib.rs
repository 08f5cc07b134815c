//! In-memory stand-in for the Hyper API.
//!
//! Implements the endpoints the SDK calls with the same status conventions:
//! 200 for reads and writes, 202 with a plain `Accepted` body for license
//! deletion and refunds, 404 for unknown ids, and `{"error": {"message": ..}}`
//! bodies for everything the server rejects. Payments and waitlist entries
//! cannot be created through the API, so `Store::with_fixtures` seeds a few.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const LICENSES: &str = "licenses";
pub const PRODUCTS: &str = "products";
pub const LINKS: &str = "links";
pub const RAFFLES: &str = "raffles";
pub const WAITLIST: &str = "waitlist";
pub const PAYMENTS: &str = "payments";
pub const COUPONS: &str = "coupons";

/// Resources grouped by collection, keyed by id (license key for licenses).
#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<&'static str, BTreeMap<String, Value>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `pay_1` (refundable), `pay_2` (already refunded) and
    /// the waitlist entry `wle_1`.
    pub fn with_fixtures() -> Self {
        let mut store = Self::new();
        store.insert(
            PAYMENTS,
            "pay_1",
            json!({"id": "pay_1", "amount": 2500, "currency": "usd", "refunded": false}),
        );
        store.insert(
            PAYMENTS,
            "pay_2",
            json!({"id": "pay_2", "amount": 1000, "currency": "usd", "refunded": true}),
        );
        store.insert(
            WAITLIST,
            "wle_1",
            json!({"id": "wle_1", "email": "early@example.com", "status": "pending"}),
        );
        store
    }

    pub fn insert(&mut self, collection: &'static str, id: &str, value: Value) {
        self.collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), value);
    }

    fn get(&self, collection: &str, id: &str) -> Option<&Value> {
        self.collections.get(collection)?.get(id)
    }

    fn get_mut(&mut self, collection: &str, id: &str) -> Option<&mut Value> {
        self.collections.get_mut(collection)?.get_mut(id)
    }

    fn remove(&mut self, collection: &str, id: &str) -> Option<Value> {
        self.collections.get_mut(collection)?.remove(id)
    }

    fn all(&self, collection: &str) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default()
    }
}

pub type Db = Arc<RwLock<Store>>;

/// A rejected request, rendered the way the real API renders it.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(collection: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("No such {collection} resource"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "request rejected");
        (self.status, Json(json!({"error": {"message": self.message}}))).into_response()
    }
}

type ApiResult<T = Json<Value>> = Result<T, ApiError>;

pub fn app() -> Router {
    app_with_store(Store::with_fixtures())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/licenses", get(list_licenses).post(create_license))
        .route(
            "/licenses/{key}",
            get(|db: State<Db>, key: Path<String>| retrieve(db, key, LICENSES))
                .patch(update_license)
                .delete(delete_license),
        )
        .route("/licenses/{key}/metadata", patch(update_license_metadata))
        .route(
            "/products",
            get(|db: State<Db>| list(db, PRODUCTS)).post(create_product),
        )
        .route(
            "/products/{id}",
            get(|db: State<Db>, id: Path<String>| retrieve(db, id, PRODUCTS))
                .patch(|db: State<Db>, id: Path<String>, body: Json<Value>| merge_into(db, id, body, PRODUCTS)),
        )
        .route("/links", get(|db: State<Db>| list(db, LINKS)).post(create_link))
        .route(
            "/links/{link}",
            get(|db: State<Db>, id: Path<String>| retrieve(db, id, LINKS))
                .patch(|db: State<Db>, id: Path<String>, body: Json<Value>| merge_into(db, id, body, LINKS)),
        )
        .route(
            "/raffles",
            get(|db: State<Db>, q: Query<ActiveQuery>| list_active(db, q, RAFFLES)).post(create_raffle),
        )
        .route(
            "/raffles/{id}",
            get(|db: State<Db>, id: Path<String>| retrieve(db, id, RAFFLES)),
        )
        .route("/waitlist/entries", get(|db: State<Db>| list(db, WAITLIST)))
        .route(
            "/waitlist/entries/{id}",
            get(|db: State<Db>, id: Path<String>| retrieve(db, id, WAITLIST)),
        )
        .route("/payments", get(|db: State<Db>| list(db, PAYMENTS)))
        .route(
            "/payments/{id}",
            get(|db: State<Db>, id: Path<String>| retrieve(db, id, PAYMENTS)),
        )
        .route("/payments/{id}/refund", post(refund_payment))
        .route(
            "/coupons",
            get(|db: State<Db>, q: Query<ActiveQuery>| list_active(db, q, COUPONS)).post(create_coupon),
        )
        .route(
            "/coupons/{id}",
            get(|db: State<Db>, id: Path<String>| retrieve(db, id, COUPONS)),
        )
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty());
    if !authorized {
        return ApiError::new(StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
    }
    next.run(request).await
}

// --- helpers ---

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn object(body: Value) -> ApiResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("Request body must be a JSON object")),
    }
}

fn require<'a>(body: &'a Map<String, Value>, field: &str) -> ApiResult<&'a Value> {
    body.get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

fn require_str<'a>(body: &'a Map<String, Value>, field: &str) -> ApiResult<&'a str> {
    require(body, field)?
        .as_str()
        .ok_or_else(|| ApiError::bad_request(format!("{field} must be a string")))
}

/// Shallow merge: every top-level field in `patch` replaces the stored one.
fn merge(target: &mut Value, patch: Map<String, Value>) {
    if let Value::Object(existing) = target {
        existing.extend(patch);
    }
}

async fn retrieve(State(db): State<Db>, Path(id): Path<String>, collection: &'static str) -> ApiResult {
    let store = db.read().await;
    store
        .get(collection, &id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(collection))
}

async fn list(State(db): State<Db>, collection: &'static str) -> Json<Value> {
    let items = db.read().await.all(collection);
    Json(json!({"data": items}))
}

#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    pub active: Option<bool>,
}

async fn list_active(State(db): State<Db>, Query(query): Query<ActiveQuery>, collection: &'static str) -> Json<Value> {
    let active = query.active.unwrap_or(true);
    let items: Vec<Value> = db
        .read()
        .await
        .all(collection)
        .into_iter()
        .filter(|item| item["active"].as_bool().unwrap_or(true) == active)
        .collect();
    Json(json!({"data": items}))
}

async fn merge_into(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
    collection: &'static str,
) -> ApiResult {
    let patch = object(body)?;
    let mut store = db.write().await;
    let item = store
        .get_mut(collection, &id)
        .ok_or_else(|| ApiError::not_found(collection))?;
    merge(item, patch);
    Ok(Json(item.clone()))
}

// --- licenses ---

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

async fn list_licenses(State(db): State<Db>, Query(query): Query<Pagination>) -> Json<Value> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20);
    let all = db.read().await.all(LICENSES);
    let total = all.len();
    let data: Vec<Value> = all.into_iter().skip((page - 1) * limit).take(limit).collect();
    Json(json!({"data": data, "page": page, "limit": limit, "total": total}))
}

async fn create_license(State(db): State<Db>, Json(body): Json<Value>) -> ApiResult {
    let body = object(body)?;
    let plan = require_str(&body, "plan")?;
    let email = require_str(&body, "email")?;
    let key = match body.get("key").and_then(Value::as_str) {
        Some(key) => key.to_string(),
        None => Uuid::new_v4().simple().to_string().to_uppercase(),
    };

    let mut store = db.write().await;
    if store.get(LICENSES, &key).is_some() {
        return Err(ApiError::bad_request("A license with this key already exists"));
    }
    let license = json!({
        "id": new_id("lic"),
        "key": key,
        "plan": plan,
        "email": email,
        "unlocked": false,
        "metadata": body.get("metadata").cloned().unwrap_or_else(|| json!({})),
        "subscription": null,
    });
    store.insert(LICENSES, &key, license.clone());
    Ok(Json(license))
}

async fn update_license(State(db): State<Db>, Path(key): Path<String>, Json(body): Json<Value>) -> ApiResult {
    let mut patch = object(body)?;
    let mut store = db.write().await;
    let mut license = store
        .remove(LICENSES, &key)
        .ok_or_else(|| ApiError::not_found(LICENSES))?;

    if let Some(Value::Object(changes)) = patch.remove("subscription") {
        let subscription = &mut license["subscription"];
        if !subscription.is_object() {
            *subscription = json!({});
        }
        merge(subscription, changes);
    }
    merge(&mut license, patch);

    let new_key = license["key"].as_str().unwrap_or(&key).to_string();
    if new_key != key && store.get(LICENSES, &new_key).is_some() {
        store.insert(LICENSES, &key, license);
        return Err(ApiError::bad_request("A license with this key already exists"));
    }
    store.insert(LICENSES, &new_key, license.clone());
    Ok(Json(license))
}

async fn update_license_metadata(
    State(db): State<Db>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let metadata = Value::Object(object(body)?);
    let mut store = db.write().await;
    let license = store
        .get_mut(LICENSES, &key)
        .ok_or_else(|| ApiError::not_found(LICENSES))?;
    license["metadata"] = metadata.clone();
    Ok(Json(metadata))
}

async fn delete_license(State(db): State<Db>, Path(key): Path<String>) -> ApiResult<(StatusCode, &'static str)> {
    db.write()
        .await
        .remove(LICENSES, &key)
        .map(|_| (StatusCode::ACCEPTED, "Accepted"))
        .ok_or_else(|| ApiError::not_found(LICENSES))
}

// --- products, links, raffles, coupons ---

async fn create_product(State(db): State<Db>, Json(body): Json<Value>) -> ApiResult {
    let mut body = object(body)?;
    require_str(&body, "name")?;
    require_str(&body, "type")?;
    require(&body, "amount")?;
    require_str(&body, "currency")?;

    let id = new_id("prod");
    body.insert("id".to_string(), json!(id));
    let product = Value::Object(body);
    db.write().await.insert(PRODUCTS, &id, product.clone());
    Ok(Json(product))
}

async fn create_link(State(db): State<Db>, Json(body): Json<Value>) -> ApiResult {
    let mut body = object(body)?;
    let plan = require_str(&body, "plan")?.to_string();

    let mut store = db.write().await;
    if store.get(PRODUCTS, &plan).is_none() {
        return Err(ApiError::bad_request("No such plan"));
    }
    let id = Uuid::new_v4().simple().to_string()[..8].to_string();
    body.insert("id".to_string(), json!(id));
    body.entry("active").or_insert(json!(true));
    let link = Value::Object(body);
    store.insert(LINKS, &id, link.clone());
    Ok(Json(link))
}

async fn create_raffle(State(db): State<Db>, Json(body): Json<Value>) -> ApiResult {
    let mut body = object(body)?;
    require_str(&body, "plan")?;
    require(&body, "spots")?;
    require_str(&body, "pick_winners_at")?;

    let id = new_id("raffle");
    body.insert("id".to_string(), json!(id));
    body.entry("active").or_insert(json!(true));
    let raffle = Value::Object(body);
    db.write().await.insert(RAFFLES, &id, raffle.clone());
    Ok(Json(raffle))
}

async fn create_coupon(State(db): State<Db>, Json(body): Json<Value>) -> ApiResult {
    let mut body = object(body)?;
    require_str(&body, "name")?;

    let id = new_id("coupon");
    body.insert("id".to_string(), json!(id));
    body.entry("active").or_insert(json!(true));
    let coupon = Value::Object(body);
    db.write().await.insert(COUPONS, &id, coupon.clone());
    Ok(Json(coupon))
}

// --- payments ---

async fn refund_payment(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<(StatusCode, &'static str)> {
    let mut store = db.write().await;
    let payment = store
        .get_mut(PAYMENTS, &id)
        .ok_or_else(|| ApiError::not_found(PAYMENTS))?;
    if payment["refunded"].as_bool().unwrap_or(false) {
        return Err(ApiError::bad_request("Payment has already been refunded"));
    }
    payment["refunded"] = json!(true);
    Ok((StatusCode::ACCEPTED, "Accepted"))
}
