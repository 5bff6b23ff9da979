//! Application router configuration.
//!
//! Authentication is enforced per handler through the
//! [Claims](crate::auth::Claims) extractor rather than a middleware layer, so
//! every protected handler receives the authenticated user ID as an explicit
//! argument.

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AppState,
    budget::{delete_budget_endpoint, get_budget_recommendations, list_budgets, set_budget},
    endpoints,
    response::ApiFailure,
    savings_goal::{
        delete_savings_goal_endpoint, edit_savings_goal, get_savings_goal_endpoint,
        get_savings_progress, set_savings_goal,
    },
    stats::{get_category_stats, get_stats_overview},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        export_transactions, get_transaction_endpoint, list_transactions,
    },
    user::{get_me, log_in, register_user, update_profile},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::ME, get(get_me))
        .route(endpoints::PROFILE, put(update_profile))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions).post(create_transaction_endpoint),
        )
        .route(endpoints::STATS_OVERVIEW, get(get_stats_overview))
        .route(endpoints::STATS_CATEGORIES, get(get_category_stats))
        .route(endpoints::EXPORT_TRANSACTIONS, get(export_transactions))
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::BUDGETS, get(list_budgets).post(set_budget))
        .route(
            endpoints::BUDGET_RECOMMENDATIONS,
            get(get_budget_recommendations),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(
            endpoints::SAVINGS,
            get(get_savings_goal_endpoint)
                .post(set_savings_goal)
                .put(edit_savings_goal)
                .delete(delete_savings_goal_endpoint),
        )
        .route(endpoints::SAVINGS_PROGRESS, get(get_savings_progress))
        .fallback(get_route_not_found)
        .with_state(state)
}

/// The body of the index route.
#[derive(Serialize)]
struct ApiInfo {
    success: bool,
    message: &'static str,
    version: &'static str,
}

async fn get_index() -> Json<ApiInfo> {
    Json(ApiInfo {
        success: true,
        message: "Spend Log API is running...",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// The body of the health check route.
#[derive(Serialize)]
struct Health {
    success: bool,
    message: &'static str,
    timestamp: String,
}

async fn get_health() -> Json<Health> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(Health {
        success: true,
        message: "Server is healthy",
        timestamp,
    })
}

async fn get_route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiFailure::new("Route not found".to_owned())),
    )
}
