//! The per-category expense statistics endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    calendar::{month_window, resolve_month},
    response::ApiResponse,
    stats::{
        aggregation::{CategoryTotal, category_breakdown},
        overview::StatsParams,
    },
    transaction::{TransactionQuery, TransactionType, query_transactions},
};

/// Handle requests for a month's expense totals per category, largest first.
pub async fn get_category_stats(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<StatsParams>,
) -> Result<Json<ApiResponse<Vec<CategoryTotal>>>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let (year, month) = resolve_month(params.month, params.year, today);
    let (month_start, month_end) = month_window(year, month)?;

    let transactions = {
        let connection = state.lock_connection()?;

        query_transactions(
            &TransactionQuery {
                date_from: Some(month_start),
                date_before: Some(month_end),
                transaction_type: Some(TransactionType::Expense),
                ..TransactionQuery::for_user(claims.sub)
            },
            &connection,
        )?
    };

    Ok(Json(ApiResponse::new(category_breakdown(&transactions))))
}
