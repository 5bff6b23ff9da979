//! The budget deletion endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::Claims,
    budget::{db::delete_budget, domain::BudgetID},
    response::ApiResponse,
};

/// Handle budget deletion requests.
///
/// # Errors
///
/// Responds with 404 when the ID does not exist or the budget belongs to
/// another user.
pub async fn delete_budget_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<BudgetID>,
) -> Result<Json<ApiResponse<Value>>, Error> {
    {
        let connection = state.lock_connection()?;
        delete_budget(budget_id, claims.sub, &connection)?;
    }

    Ok(Json(ApiResponse::with_message(
        json!({}),
        "Budget deleted successfully",
    )))
}
