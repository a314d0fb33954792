use crate::handlers::accounts::CreateAccountRequest;
use crate::handlers::activities::ActivityPayload;
use crate::handlers::activities::expenses::CreateExpenseRequest;
use crate::handlers::activities::incomes::CreateIncomeRequest;
use crate::handlers::activities::transfers::CreateTransferRequest;
use crate::handlers::budgets::CreateBudgetRequest;
use crate::handlers::profiles::CreateProfileRequest;
use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
use crate::test_utils::{TestApp, TestUser, setup_test_app};
use model::entities::profile::Currency;
use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::{TestRequest, TestServer};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn authed(request: TestRequest, user: &TestUser) -> TestRequest {
    let (name, value) = user.auth();
    request.add_header(name, value)
}

async fn server() -> (TestServer, TestApp) {
    let app = setup_test_app().await;
    let server = TestServer::new(app.router.clone()).unwrap();
    (server, app)
}

async fn create(server: &TestServer, user: &TestUser, path: &str, body: &impl serde::Serialize) -> Value {
    let response = authed(server.post(path), user).json(body).await;
    if response.status_code() != StatusCode::CREATED {
        panic!(
            "Expected 201 Created from {}, got {}: {}",
            path,
            response.status_code(),
            response.text()
        );
    }
    let body: ApiResponse<Value> = response.json();
    assert!(body.success);
    body.data
}

async fn list(server: &TestServer, user: &TestUser, path: &str) -> Vec<Value> {
    let response = authed(server.get(path), user).await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<Value>> = response.json();
    body.data
}

fn id(value: &Value) -> i32 {
    value["id"].as_i64().unwrap() as i32
}

async fn seed_profile(server: &TestServer, user: &TestUser) -> i32 {
    let profile = create(
        server,
        user,
        "/api/v1/profiles",
        &CreateProfileRequest {
            currency: Currency::Eur,
            user: None,
        },
    )
    .await;
    id(&profile)
}

async fn seed_account(server: &TestServer, user: &TestUser, profile: i32, name: &str) -> i32 {
    let account = create(
        server,
        user,
        "/api/v1/accounts",
        &CreateAccountRequest {
            name: name.to_string(),
            balance: Decimal::ZERO,
            profile,
            user: None,
        },
    )
    .await;
    id(&account)
}

async fn seed_budget(server: &TestServer, user: &TestUser, profile: i32, limit: &str) -> i32 {
    let budget = create(
        server,
        user,
        "/api/v1/budgets",
        &CreateBudgetRequest {
            name: "Food".to_string(),
            limit: dec(limit),
            period_in_months: 1,
            profile,
            user: None,
        },
    )
    .await;
    id(&budget)
}

fn activity(name: &str, amount: &str, account: i32) -> ActivityPayload {
    ActivityPayload {
        name: name.to_string(),
        amount: dec(amount),
        account,
        user: None,
    }
}

async fn balance(server: &TestServer, user: &TestUser, account: i32) -> String {
    let response = authed(server.get(&format!("/api/v1/accounts/{account}")), user).await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Value> = response.json();
    body.data["balance"].as_str().unwrap().to_string()
}

fn error_code(response: &axum_test::TestResponse) -> String {
    let body: ErrorResponse = response.json();
    assert!(!body.success);
    body.code
}

#[tokio::test]
async fn test_health_check() {
    let (server, _app) = server().await;

    let response = server.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "healthy");
    assert_eq!(body.database, "connected");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let (server, _app) = server().await;

    for path in [
        "/api/v1/profiles",
        "/api/v1/accounts",
        "/api/v1/budgets",
        "/api/v1/incomes",
        "/api/v1/expenses",
        "/api/v1/transfers",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&response), "NOT_AUTHENTICATED");
    }

    let response = server
        .get("/api/v1/profiles")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer 0000"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&response), "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn test_legacy_token_scheme_is_accepted() {
    let (server, app) = server().await;

    let header = HeaderValue::from_str(&format!("Token {}", app.alice.token)).unwrap();
    let response = server.get("/api/v1/profiles").add_header(AUTHORIZATION, header).await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_inactive_user_is_forbidden() {
    let (server, app) = server().await;
    ledger::users::set_active(&app.state.db, app.bob.id, false)
        .await
        .unwrap();

    let response = authed(server.get("/api/v1/accounts"), &app.bob).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_create_and_list_profiles() {
    let (server, app) = server().await;

    let response = authed(server.post("/api/v1/profiles"), &app.alice)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<Value> = response.json();
    assert_eq!(body.message, "Profile created successfully");
    assert_eq!(body.data["currency"], "CZK");
    assert_eq!(body.data["user"], app.alice.id);

    seed_profile(&server, &app.alice).await;

    let profiles = list(&server, &app.alice, "/api/v1/profiles").await;
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1]["currency"], "EUR");
    assert!(list(&server, &app.bob, "/api/v1/profiles").await.is_empty());
}

#[tokio::test]
async fn test_unknown_currency_is_rejected() {
    let (server, app) = server().await;

    let response = authed(server.post("/api/v1/profiles"), &app.alice)
        .json(&json!({ "currency": "GBP" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "INVALID_REQUEST");
    assert!(body.error.contains("GBP"));

    let response = authed(server.post("/api/v1/profiles"), &app.alice)
        .json(&json!({ "currency": "eur" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "INVALID_REQUEST");
    assert!(list(&server, &app.alice, "/api/v1/profiles").await.is_empty());
}

#[tokio::test]
async fn test_body_user_must_be_the_caller() {
    let (server, app) = server().await;

    let response = authed(server.post("/api/v1/profiles"), &app.alice)
        .json(&json!({ "currency": "USD", "user": app.bob.id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "USER_MISMATCH");

    let response = authed(server.post("/api/v1/profiles"), &app.alice)
        .json(&json!({ "currency": "USD", "user": app.alice.id }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_account_with_opening_balance() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;

    let account = create(
        &server,
        &app.alice,
        "/api/v1/accounts",
        &json!({ "name": "  Savings ", "balance": "250.5", "profile": profile }),
    )
    .await;

    assert_eq!(account["name"], "Savings");
    assert_eq!(account["balance"], "250.50");
    assert_eq!(account["profile"], profile);
    assert_eq!(account["user"], app.alice.id);
}

#[tokio::test]
async fn test_account_in_foreign_profile_is_rejected() {
    let (server, app) = server().await;
    let bobs_profile = seed_profile(&server, &app.bob).await;

    let response = authed(server.post("/api/v1/accounts"), &app.alice)
        .json(&json!({ "name": "Sneaky", "profile": bobs_profile }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "USER_MISMATCH");
    assert!(list(&server, &app.alice, "/api/v1/accounts").await.is_empty());
    assert!(list(&server, &app.bob, "/api/v1/accounts").await.is_empty());
}

#[tokio::test]
async fn test_account_in_missing_profile_is_rejected() {
    let (server, app) = server().await;

    let response = authed(server.post("/api/v1/accounts"), &app.alice)
        .json(&json!({ "name": "Orphan", "profile": 4242 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "DOES_NOT_EXIST");
}

#[tokio::test]
async fn test_other_users_account_is_not_found() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let account = seed_account(&server, &app.alice, profile, "Cash").await;

    let response = authed(server.get(&format!("/api/v1/accounts/{account}")), &app.bob).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let (server, app) = server().await;

    let response = authed(server.post("/api/v1/accounts"), &app.alice)
        .json(&json!({ "name": "No profile" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "INVALID_REQUEST");

    let response = authed(server.post("/api/v1/accounts"), &app.alice)
        .json(&json!({ "name": "x".repeat(33), "profile": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_budget_validation() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;

    let response = authed(server.post("/api/v1/budgets"), &app.alice)
        .json(&json!({ "name": "Fun", "limit": "0", "period_in_months": 0, "profile": profile }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
    assert!(body.error.contains("limit"));
    assert!(body.error.contains("period_in_months"));
}

#[tokio::test]
async fn test_income_expense_transfer_walkthrough() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let checking = seed_account(&server, &app.alice, profile, "Checking").await;
    let savings = seed_account(&server, &app.alice, profile, "Savings").await;
    let food = seed_budget(&server, &app.alice, profile, "500").await;
    assert_eq!(balance(&server, &app.alice, checking).await, "0.00");

    let income = create(
        &server,
        &app.alice,
        "/api/v1/incomes",
        &CreateIncomeRequest {
            activity: activity("Salary", "100.00", checking),
        },
    )
    .await;
    assert_eq!(income["activity"]["amount"], "100.00");
    assert_eq!(income["activity"]["account"], checking);
    assert_eq!(balance(&server, &app.alice, checking).await, "100.00");

    let expense = create(
        &server,
        &app.alice,
        "/api/v1/expenses",
        &CreateExpenseRequest {
            activity: activity("Groceries", "30.00", checking),
            budget: food,
        },
    )
    .await;
    assert_eq!(expense["budget"], food);
    assert_eq!(balance(&server, &app.alice, checking).await, "70.00");

    let transfer = create(
        &server,
        &app.alice,
        "/api/v1/transfers",
        &CreateTransferRequest {
            activity: activity("Save", "20.00", checking),
            account: savings,
        },
    )
    .await;
    assert_eq!(transfer["account"], savings);
    assert_eq!(transfer["activity"]["account"], checking);
    assert_eq!(balance(&server, &app.alice, checking).await, "50.00");
    assert_eq!(balance(&server, &app.alice, savings).await, "20.00");

    assert_eq!(list(&server, &app.alice, "/api/v1/incomes").await.len(), 1);
    assert_eq!(list(&server, &app.alice, "/api/v1/expenses").await.len(), 1);
    assert_eq!(list(&server, &app.alice, "/api/v1/transfers").await.len(), 1);
    assert!(list(&server, &app.bob, "/api/v1/incomes").await.is_empty());
    assert!(list(&server, &app.bob, "/api/v1/transfers").await.is_empty());
}

#[tokio::test]
async fn test_income_past_the_balance_limit_is_rejected() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let cash = seed_account(&server, &app.alice, profile, "Cash").await;
    create(
        &server,
        &app.alice,
        "/api/v1/incomes",
        &CreateIncomeRequest {
            activity: activity("Jackpot", "999999999999.99", cash),
        },
    )
    .await;

    let response = authed(server.post("/api/v1/incomes"), &app.alice)
        .json(&CreateIncomeRequest {
            activity: activity("Jackpot", "999999999999.99", cash),
        })
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
    assert!(body.error.contains("balance"));
    assert_eq!(balance(&server, &app.alice, cash).await, "999999999999.99");
    assert_eq!(list(&server, &app.alice, "/api/v1/incomes").await.len(), 1);
}

#[tokio::test]
async fn test_overspent_budget_reports_spent() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let cash = seed_account(&server, &app.alice, profile, "Cash").await;
    let treats = seed_budget(&server, &app.alice, profile, "10").await;

    create(
        &server,
        &app.alice,
        "/api/v1/expenses",
        &CreateExpenseRequest {
            activity: activity("Cake", "12.34", cash),
            budget: treats,
        },
    )
    .await;

    let budgets = list(&server, &app.alice, "/api/v1/budgets").await;
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["limit"], "10.00");
    assert_eq!(budgets[0]["spent"], "12.34");
    assert_eq!(balance(&server, &app.alice, cash).await, "-12.34");
}

#[tokio::test]
async fn test_self_transfer_records_activity_only() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let cash = seed_account(&server, &app.alice, profile, "Cash").await;

    create(
        &server,
        &app.alice,
        "/api/v1/transfers",
        &CreateTransferRequest {
            activity: activity("Shuffle", "5", cash),
            account: cash,
        },
    )
    .await;

    assert_eq!(balance(&server, &app.alice, cash).await, "0.00");
    assert_eq!(list(&server, &app.alice, "/api/v1/transfers").await.len(), 1);
}

#[tokio::test]
async fn test_foreign_references_in_activities_are_rejected() {
    let (server, app) = server().await;
    let alices_profile = seed_profile(&server, &app.alice).await;
    let bobs_profile = seed_profile(&server, &app.bob).await;
    let alices_cash = seed_account(&server, &app.alice, alices_profile, "Cash").await;
    let bobs_cash = seed_account(&server, &app.bob, bobs_profile, "Cash").await;
    let bobs_budget = seed_budget(&server, &app.bob, bobs_profile, "100").await;

    let response = authed(server.post("/api/v1/incomes"), &app.alice)
        .json(&CreateIncomeRequest {
            activity: activity("Steal", "5", bobs_cash),
        })
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "USER_MISMATCH");

    let response = authed(server.post("/api/v1/expenses"), &app.alice)
        .json(&CreateExpenseRequest {
            activity: activity("Lunch", "5", alices_cash),
            budget: bobs_budget,
        })
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "USER_MISMATCH");

    let response = authed(server.post("/api/v1/transfers"), &app.alice)
        .json(&CreateTransferRequest {
            activity: activity("Move", "5", alices_cash),
            account: bobs_cash,
        })
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "USER_MISMATCH");

    assert_eq!(balance(&server, &app.alice, alices_cash).await, "0.00");
    assert_eq!(balance(&server, &app.bob, bobs_cash).await, "0.00");
    assert!(list(&server, &app.alice, "/api/v1/incomes").await.is_empty());
    assert!(list(&server, &app.alice, "/api/v1/expenses").await.is_empty());
    assert!(list(&server, &app.alice, "/api/v1/transfers").await.is_empty());
}

#[tokio::test]
async fn test_activity_amount_must_be_positive() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let cash = seed_account(&server, &app.alice, profile, "Cash").await;

    for amount in ["0", "-1.00", "0.001"] {
        let response = authed(server.post("/api/v1/incomes"), &app.alice)
            .json(&json!({ "activity": { "name": "Bad", "amount": amount, "account": cash } }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(body.error.starts_with("activity.amount: "), "{}", body.error);
    }

    assert_eq!(balance(&server, &app.alice, cash).await, "0.00");
}

#[tokio::test]
async fn test_nested_user_field_is_checked() {
    let (server, app) = server().await;
    let profile = seed_profile(&server, &app.alice).await;
    let cash = seed_account(&server, &app.alice, profile, "Cash").await;

    let response = authed(server.post("/api/v1/incomes"), &app.alice)
        .json(&json!({
            "activity": { "name": "Gift", "amount": "5.00", "account": cash, "user": app.bob.id }
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "USER_MISMATCH");
}
