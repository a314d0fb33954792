use crate::auth::require_token;
use crate::config::Settings;
use crate::handlers::{
    accounts::{create_account, get_account, list_accounts},
    activities::{
        expenses::{create_expense, list_expenses},
        incomes::{create_income, list_incomes},
        transfers::{create_transfer, list_transfers},
    },
    budgets::{create_budget, list_budgets},
    health::health_check,
    profiles::{create_profile, list_profiles},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{middleware, routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Base path of every authenticated resource route
pub const API_BASE: &str = "/api/v1";

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let api = Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:account_id", get(get_account))
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/incomes", get(list_incomes).post(create_income))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest(API_BASE, api)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
