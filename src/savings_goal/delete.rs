//! The savings goal deletion endpoint.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    AppState, Error, auth::Claims, response::ApiResponse, savings_goal::db::delete_savings_goal,
};

/// Handle savings goal deletion requests.
///
/// # Errors
///
/// Responds with 404 when the user has not set a goal.
pub async fn delete_savings_goal_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<Value>>, Error> {
    {
        let connection = state.lock_connection()?;
        delete_savings_goal(claims.sub, &connection)?;
    }

    Ok(Json(ApiResponse::with_message(
        json!({}),
        "Savings goal deleted successfully",
    )))
}
