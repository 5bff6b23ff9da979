//! The budget upsert endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    budget::{
        db::upsert_budget,
        domain::{Budget, NewBudget},
    },
    response::ApiResponse,
};

/// The request body for setting a budget.
#[derive(Debug, Deserialize)]
pub struct SetBudgetForm {
    /// The category the limit applies to.
    pub category: String,
    /// The spending limit. Must not be negative.
    pub amount: f64,
    /// The calendar month, 1-12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// The colour the client should render the budget with.
    #[serde(default)]
    pub color: Option<String>,
}

/// Handle requests to create or update a budget.
///
/// Posting an existing `(category, month, year)` combination updates that
/// budget in place rather than creating a duplicate.
pub async fn set_budget(
    State(state): State<AppState>,
    claims: Claims,
    Json(form): Json<SetBudgetForm>,
) -> Result<Json<ApiResponse<Budget>>, Error> {
    let new_budget = NewBudget::new(
        &form.category,
        form.amount,
        form.month,
        form.year,
        form.color,
        claims.sub,
    )?;

    let budget = {
        let connection = state.lock_connection()?;
        upsert_budget(new_budget, &connection)?
    };

    Ok(Json(ApiResponse::with_message(
        budget,
        "Budget set successfully",
    )))
}
