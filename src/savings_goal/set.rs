//! The endpoint for creating or replacing the savings goal.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    savings_goal::{
        db::upsert_savings_goal,
        domain::{NewSavingsGoal, SavingsGoal},
    },
};

/// The request body for setting the savings goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSavingsGoalForm {
    /// The amount to save.
    pub goal_amount: f64,
    /// When the goal should be reached.
    pub target_date: Date,
    /// A short name for the goal.
    pub name: String,
    /// A longer description of the goal.
    #[serde(default)]
    pub description: Option<String>,
    /// The colour the client should render the goal with.
    #[serde(default)]
    pub color: Option<String>,
}

/// Handle requests to set the savings goal.
///
/// Each user has at most one goal; posting again replaces it and resets the
/// saved amount and the completion flag.
pub async fn set_savings_goal(
    State(state): State<AppState>,
    claims: Claims,
    Json(form): Json<SetSavingsGoalForm>,
) -> Result<(StatusCode, Json<ApiResponse<SavingsGoal>>), Error> {
    let today = OffsetDateTime::now_utc().date();

    let new_goal = NewSavingsGoal::new(
        form.goal_amount,
        form.target_date,
        &form.name,
        form.description.as_deref(),
        form.color,
        claims.sub,
        today,
    )?;

    let goal = {
        let connection = state.lock_connection()?;
        upsert_savings_goal(new_goal, &connection)?
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            goal,
            "Savings goal set successfully",
        )),
    ))
}
