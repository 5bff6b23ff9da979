//! The cumulative savings progress endpoint.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    savings_goal::db::get_savings_goal,
    stats::aggregation::{MonthlyProgress, progress_series},
    transaction::{TransactionQuery, query_transactions},
};

/// Handle requests for the month-by-month savings progress since the goal was
/// created.
///
/// A user without a goal gets an empty series rather than a 404.
pub async fn get_savings_progress(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Error> {
    let connection = state.lock_connection()?;

    let goal = match get_savings_goal(claims.sub, &connection) {
        Ok(goal) => goal,
        Err(Error::NotFound) => {
            return Ok(Json(ApiResponse::with_message(
                Vec::<MonthlyProgress>::new(),
                "No savings goal set",
            ))
            .into_response());
        }
        Err(error) => return Err(error),
    };

    let transactions = query_transactions(
        &TransactionQuery {
            date_from: Some(goal.created_at),
            ..TransactionQuery::for_user(claims.sub)
        },
        &connection,
    )?;

    let series = progress_series(&transactions, goal.goal_amount);

    Ok(Json(ApiResponse::new(series)).into_response())
}
