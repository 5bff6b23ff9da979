//! The budget listing endpoint, including usage against actual spending.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    budget::db::get_budgets_for_month,
    calendar::{month_window, resolve_month},
    response::ApiResponse,
    stats::aggregation::{BudgetReport, budget_usage, monthly_overview},
    transaction::{TransactionQuery, TransactionType, query_transactions},
};

/// The query parameters accepted by the budget endpoints.
#[derive(Debug, Deserialize)]
pub struct BudgetParams {
    /// The month to report on, defaulting to the current month.
    pub month: Option<u8>,
    /// The year to report on, defaulting to the current year.
    pub year: Option<i32>,
}

/// Handle requests for a month's budgets joined with the spending in each
/// category, plus an overall summary.
pub async fn list_budgets(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<BudgetParams>,
) -> Result<Json<ApiResponse<BudgetReport>>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let (year, month) = resolve_month(params.month, params.year, today);
    let (month_start, month_end) = month_window(year, month)?;

    let (budgets, expenses) = {
        let connection = state.lock_connection()?;

        (
            get_budgets_for_month(claims.sub, month, year, &connection)?,
            query_transactions(
                &TransactionQuery {
                    date_from: Some(month_start),
                    date_before: Some(month_end),
                    transaction_type: Some(TransactionType::Expense),
                    ..TransactionQuery::for_user(claims.sub)
                },
                &connection,
            )?,
        )
    };

    let overview = monthly_overview(&expenses, month_start, month_end);
    let report = budget_usage(budgets, &overview.category_spending);

    Ok(Json(ApiResponse::new(report)))
}
