//! The transaction listing endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::Claims,
    calendar::month_window,
    pagination::{PageInfo, page_count},
    transaction::{
        db::{SortOrder, TransactionQuery, count_transactions, query_transactions},
        domain::{Transaction, TransactionType},
    },
};

/// The query parameters accepted by the transaction listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    /// Restrict results to this month. Only applied together with `year`.
    pub month: Option<u8>,
    /// Restrict results to this year. Only applied together with `month`.
    pub year: Option<i32>,
    /// Restrict results to incomes or expenses. Unknown values are ignored.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Restrict results to categories containing this string.
    pub category: Option<String>,
    /// The page to return, starting at 1.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub limit: Option<u64>,
}

/// The response body for the transaction listing endpoint.
///
/// Extends the usual envelope with the page of results and totals so the
/// client can render pagination controls.
#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The number of transactions in this page.
    pub count: usize,
    /// The total number of transactions matching the query.
    pub total: u64,
    /// Which page this is and how many there are.
    pub pagination: PageInfo,
    /// The page of transactions, sorted by date descending.
    pub data: Vec<Transaction>,
}

/// Handle transaction listing requests.
///
/// Results are sorted by date descending and paged. Passing both `month` and
/// `year` restricts results to that calendar month.
pub async fn list_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<TransactionListResponse>, Error> {
    let mut query = TransactionQuery::for_user(claims.sub);

    if let (Some(month), Some(year)) = (params.month, params.year) {
        let (start, end) = month_window(year, month)?;
        query.date_from = Some(start);
        query.date_before = Some(end);
    }

    // An unknown type filter is ignored rather than rejected.
    query.transaction_type = params
        .transaction_type
        .as_deref()
        .and_then(TransactionType::from_str);
    query.category = params.category;

    let page = params
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);
    let limit = params
        .limit
        .unwrap_or(state.pagination_config.default_page_size)
        .max(1);

    query.sort_date = Some(SortOrder::Descending);
    query.limit = Some(limit);
    query.offset = (page - 1) * limit;

    let (transactions, total) = {
        let connection = state.lock_connection()?;

        (
            query_transactions(&query, &connection)?,
            count_transactions(&query, &connection)?,
        )
    };

    Ok(Json(TransactionListResponse {
        success: true,
        count: transactions.len(),
        total,
        pagination: PageInfo {
            page,
            pages: page_count(total, limit),
        },
        data: transactions,
    }))
}
