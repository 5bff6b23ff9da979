//! The budget recommendation endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    budget::list::BudgetParams,
    calendar::{month_window, months_before, resolve_month},
    response::ApiResponse,
    stats::aggregation::{BudgetRecommendation, recommend_budgets},
    transaction::{TransactionQuery, TransactionType, query_transactions},
};

/// How many full months of history feed a recommendation.
const LOOKBACK_MONTHS: u8 = 3;

/// Handle requests for budget recommendations based on past spending.
///
/// Looks at the [LOOKBACK_MONTHS] full months before the requested month and
/// suggests the per-category average plus a 10% buffer.
pub async fn get_budget_recommendations(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<BudgetParams>,
) -> Result<Json<ApiResponse<Vec<BudgetRecommendation>>>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let (year, month) = resolve_month(params.month, params.year, today);

    let lookback_start = months_before(year, month, LOOKBACK_MONTHS)?;
    let (month_start, _) = month_window(year, month)?;

    let past_transactions = {
        let connection = state.lock_connection()?;

        query_transactions(
            &TransactionQuery {
                date_from: Some(lookback_start),
                date_before: Some(month_start),
                transaction_type: Some(TransactionType::Expense),
                ..TransactionQuery::for_user(claims.sub)
            },
            &connection,
        )?
    };

    Ok(Json(ApiResponse::new(recommend_budgets(&past_transactions))))
}
