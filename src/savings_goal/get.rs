//! The endpoint for fetching the savings goal with its pace projection.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::{Date, Month, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    savings_goal::{
        db::{get_savings_goal, update_savings_goal},
        domain::SavingsGoal,
    },
    stats::aggregation::{
        SavingsProjection, apply_current_savings, savings_projection, year_to_date_savings,
    },
    transaction::{TransactionQuery, query_transactions},
};

/// The goal and its derived pace figures, merged into one JSON object.
#[derive(Debug, Serialize)]
pub struct SavingsGoalView {
    /// The stored goal.
    #[serde(flatten)]
    pub goal: SavingsGoal,
    /// The derived pace figures.
    #[serde(flatten)]
    pub projection: SavingsProjection,
}

/// Handle requests for the current user's savings goal.
///
/// The saved amount is recomputed from this calendar year's cumulative
/// income minus expenses on every read and written back, latching the
/// completion flag once the target is first reached. A user without a goal
/// gets `data: null` rather than a 404, since "no goal yet" is the normal
/// starting state.
pub async fn get_savings_goal_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Error> {
    let today = OffsetDateTime::now_utc().date();

    let connection = state.lock_connection()?;

    let mut goal = match get_savings_goal(claims.sub, &connection) {
        Ok(goal) => goal,
        Err(Error::NotFound) => {
            return Ok(Json(ApiResponse::with_message(
                Option::<SavingsGoalView>::None,
                "No savings goal set",
            ))
            .into_response());
        }
        Err(error) => return Err(error),
    };

    let year_start = Date::from_calendar_date(today.year(), Month::January, 1)
        .map_err(|_| Error::YearOutOfRange(today.year()))?;
    let year_to_date = query_transactions(
        &TransactionQuery {
            date_from: Some(year_start),
            ..TransactionQuery::for_user(claims.sub)
        },
        &connection,
    )?;

    apply_current_savings(&mut goal, year_to_date_savings(&year_to_date));
    update_savings_goal(&goal, &connection)?;

    let projection = savings_projection(&goal, today);

    Ok(Json(ApiResponse::new(SavingsGoalView { goal, projection })).into_response())
}
