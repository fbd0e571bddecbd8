use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app_with_db() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    let app = router(ServerState {
        engine: Arc::new(engine),
    });
    (app, db)
}

async fn app() -> Router {
    app_with_db().await.0
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn new_wallet(app: &Router, name: &str) -> i64 {
    let (status, body) = call(app, Method::POST, "/wallets", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn balance_of(app: &Router, wallet_id: i64) -> i64 {
    let (status, body) = call(
        app,
        Method::GET,
        &format!("/balances?wallet_id={wallet_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body[0]["balance"].as_i64().unwrap()
}

#[tokio::test]
async fn wallet_is_created_with_default_currency() {
    let app = app().await;
    let (status, body) = call(&app, Method::POST, "/wallets", Some(json!({ "name": " Cash " }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Cash");
    assert_eq!(body["currency"], "IDR");
    assert!(body["createdAt"].is_string());

    let (status, body) = call(&app, Method::GET, "/wallets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn transfer_moves_money_and_exposes_both_legs() {
    let app = app().await;
    let a = new_wallet(&app, "A").await;
    let b = new_wallet(&app, "B").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "type": "transfer",
            "from_wallet_id": a,
            "to_wallet_id": b,
            "amount": 500000,
            "occurred_at": "2024-01-10 09:30",
            "note": "savings"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = body["transferGroupId"].as_i64().unwrap();
    assert_eq!(body["outgoing"]["walletId"], a);
    assert_eq!(body["outgoing"]["transferDirection"], "out");
    assert_eq!(body["incoming"]["walletId"], b);
    assert_eq!(body["incoming"]["transferDirection"], "in");

    assert_eq!(balance_of(&app, a).await, -500000);
    assert_eq!(balance_of(&app, b).await, 500000);

    let (status, legs) = call(&app, Method::GET, &format!("/transfer-groups/{group_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let legs = legs.as_array().unwrap();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0]["walletId"], a);
    assert_eq!(legs[1]["walletId"], b);
    assert_eq!(legs[0]["amount"], 500000);

    let (status, list) = call(&app, Method::GET, "/transactions?type=transfer", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|item| item["type"] == "transfer"));
    assert!(list.iter().any(|item| item["walletName"] == "A"));
}

#[tokio::test]
async fn malformed_requests_map_to_400() {
    let app = app().await;
    let a = new_wallet(&app, "A").await;

    let same_wallet = json!({
        "type": "transfer",
        "from_wallet_id": a,
        "to_wallet_id": a,
        "amount": 100,
        "occurred_at": "2024-01-10 09:30"
    });
    let (status, body) = call(&app, Method::POST, "/transactions", Some(same_wallet)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let zero = json!({
        "type": "expense",
        "wallet_id": a,
        "amount": 0,
        "occurred_at": "2024-01-10 09:30"
    });
    let (status, _) = call(&app, Method::POST, "/transactions", Some(zero)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_date = json!({
        "type": "income",
        "wallet_id": a,
        "amount": 10,
        "occurred_at": "2024-01-10T09:30:00Z"
    });
    let (status, _) = call(&app, Method::POST, "/transactions", Some(bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::GET, "/transactions/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_rows_map_to_404() {
    let app = app().await;

    let (status, _) = call(&app, Method::GET, "/transactions/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::GET, "/balances?wallet_id=42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, "/categories/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let entry = json!({
        "type": "expense",
        "wallet_id": 42,
        "amount": 10,
        "occurred_at": "2024-01-10 09:30"
    });
    let (status, _) = call(&app, Method::POST, "/transactions", Some(entry)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ledger_rule_violations_map_to_422() {
    let app = app().await;
    let a = new_wallet(&app, "A").await;
    let (status, salary) = call(
        &app,
        Method::POST,
        "/categories",
        Some(json!({ "name": "Salary", "type": "income" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let entry = json!({
        "type": "expense",
        "wallet_id": a,
        "category_id": salary["id"],
        "amount": 10,
        "occurred_at": "2024-01-10 09:30"
    });
    let (status, _) = call(&app, Method::POST, "/transactions", Some(entry)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &app,
        Method::GET,
        "/reports/monthly-summary?month=2024-13",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn patch_and_delete_transaction() {
    let app = app().await;
    let a = new_wallet(&app, "A").await;
    let (_, food) = call(
        &app,
        Method::POST,
        "/categories",
        Some(json!({ "name": "Food", "type": "expense" })),
    )
    .await;

    let (status, created) = call(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "type": "expense",
            "wallet_id": a,
            "category_id": food["id"],
            "amount": 25000,
            "occurred_at": "2024-01-12 12:00",
            "note": "lunch"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(balance_of(&app, a).await, -25000);

    let (status, patched) = call(
        &app,
        Method::PATCH,
        &format!("/transactions/{id}"),
        Some(json!({ "amount": 30000, "category_id": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["amount"], 30000);
    assert!(patched["categoryId"].is_null());
    assert_eq!(patched["note"], "lunch");
    assert_eq!(balance_of(&app, a).await, -30000);

    let (status, body) = call(&app, Method::DELETE, &format!("/transactions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(balance_of(&app, a).await, 0);
}

#[tokio::test]
async fn monthly_summary_report() {
    let app = app().await;
    let a = new_wallet(&app, "A").await;
    let b = new_wallet(&app, "B").await;

    for body in [
        json!({ "type": "income", "wallet_id": a, "amount": 5000000, "occurred_at": "2024-01-01 08:00" }),
        json!({ "type": "expense", "wallet_id": a, "amount": 50000, "occurred_at": "2024-01-31 23:59" }),
        json!({ "type": "expense", "wallet_id": a, "amount": 70000, "occurred_at": "2024-02-01 00:00" }),
        json!({ "type": "transfer", "from_wallet_id": a, "to_wallet_id": b, "amount": 1000, "occurred_at": "2024-01-15 10:00" }),
    ] {
        let (status, _) = call(&app, Method::POST, "/transactions", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(
        &app,
        Method::GET,
        "/reports/monthly-summary?month=2024-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["month"], "2024-01");
    assert_eq!(body["summary"]["totalIncome"], 5000000);
    assert_eq!(body["summary"]["totalExpense"], 50000);
    assert_eq!(body["summary"]["net"], 4950000);
    let by_category = body["byCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 2);
    assert!(by_category.iter().all(|row| row["categoryId"].is_null()));
}

#[tokio::test]
async fn wallet_summaries_cover_every_wallet() {
    let app = app().await;
    let a = new_wallet(&app, "A").await;
    new_wallet(&app, "B").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({ "type": "income", "wallet_id": a, "amount": 900, "occurred_at": "2024-03-01 10:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, Method::GET, "/wallets/summaries", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["income"], 900);
    assert_eq!(rows[0]["uncategorized"], 900);
    assert_eq!(rows[1]["net"], 0);

    let (status, body) = call(&app, Method::GET, &format!("/wallets/{a}/summary"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["walletId"], a);
    assert_eq!(body["net"], 900);

    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/wallets/{a}/summary?from=2024-03-10&to=2024-03-01"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn undecodable_stored_row_maps_to_500() {
    let (app, db) = app_with_db().await;
    new_wallet(&app, "Cash").await;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "INSERT INTO wallets (name, currency, created_at) \
         VALUES ('X', 'R1P', '2024-01-01T00:00:00+00:00')",
    ))
    .await
    .unwrap();

    let (status, body) = call(&app, Method::GET, "/balances", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}
