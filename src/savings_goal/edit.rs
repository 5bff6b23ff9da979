//! The endpoint for partially updating the savings goal.

use axum::{Json, extract::State};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    savings_goal::{
        db::{get_savings_goal, update_savings_goal},
        domain::{DESCRIPTION_LIMIT, NAME_LIMIT, SavingsGoal},
    },
    stats::aggregation::apply_current_savings,
};

/// The request body for updating the savings goal.
///
/// Every field is optional; omitted fields keep their current value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSavingsGoalForm {
    /// A new goal amount. Must be positive.
    #[serde(default)]
    pub goal_amount: Option<f64>,
    /// A new target date. Must be today or later.
    #[serde(default)]
    pub target_date: Option<Date>,
    /// A new name.
    #[serde(default)]
    pub name: Option<String>,
    /// A new description.
    #[serde(default)]
    pub description: Option<String>,
    /// A new colour.
    #[serde(default)]
    pub color: Option<String>,
    /// Manually set the saved amount. This is the one write path that trusts
    /// a client-supplied amount; the next read recomputes it from
    /// transactions again.
    #[serde(default)]
    pub current_amount: Option<f64>,
}

/// Handle savings goal update requests.
///
/// Unlike goal creation, a new target date must not be in the past.
///
/// # Errors
///
/// Responds with 404 when the user has not set a goal.
pub async fn edit_savings_goal(
    State(state): State<AppState>,
    claims: Claims,
    Json(form): Json<EditSavingsGoalForm>,
) -> Result<Json<ApiResponse<SavingsGoal>>, Error> {
    let today = OffsetDateTime::now_utc().date();

    let connection = state.lock_connection()?;
    let mut goal = get_savings_goal(claims.sub, &connection)?;

    if let Some(goal_amount) = form.goal_amount {
        if goal_amount <= 0.0 {
            return Err(Error::NonPositiveGoalAmount);
        }
        goal.goal_amount = goal_amount;
    }

    if let Some(target_date) = form.target_date {
        if target_date < today {
            return Err(Error::TargetDateInPast);
        }
        goal.target_date = target_date;
    }

    if let Some(name) = form.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyGoalName);
        }
        if name.chars().count() > NAME_LIMIT {
            return Err(Error::GoalNameTooLong);
        }
        goal.name = name.to_owned();
    }

    if let Some(description) = form.description {
        let description = description.trim();
        if description.chars().count() > DESCRIPTION_LIMIT {
            return Err(Error::GoalDescriptionTooLong);
        }
        goal.description = description.to_owned();
    }

    if let Some(color) = form.color {
        goal.color = color;
    }

    if let Some(current_amount) = form.current_amount {
        // Manual updates go through the same one-way completion latch as the
        // recomputed amount.
        apply_current_savings(&mut goal, current_amount);
    }

    update_savings_goal(&goal, &connection)?;

    Ok(Json(ApiResponse::with_message(
        goal,
        "Savings goal updated successfully",
    )))
}
