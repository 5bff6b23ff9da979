//! The transaction deletion endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    transaction::{db::delete_transaction, domain::TransactionID},
};

/// Handle transaction deletion requests.
///
/// # Errors
///
/// Responds with 404 when the ID does not exist or the transaction belongs to
/// another user.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionID>,
) -> Result<Json<ApiResponse<Value>>, Error> {
    {
        let connection = state.lock_connection()?;
        delete_transaction(transaction_id, claims.sub, &connection)?;
    }

    Ok(Json(ApiResponse::with_message(
        json!({}),
        "Transaction deleted successfully",
    )))
}
