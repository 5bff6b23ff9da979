//! The endpoint for exporting transactions as CSV or JSON.

use axum::{
    Json,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    transaction::{
        db::{SortOrder, TransactionQuery, query_transactions},
        domain::Transaction,
    },
};

/// The query parameters accepted by the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Either `csv` (the default) or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

/// One row of the CSV export.
#[derive(Debug, Serialize)]
struct ExportRecord {
    date: time::Date,
    #[serde(rename = "type")]
    transaction_type: &'static str,
    category: String,
    description: String,
    amount: f64,
    recurring: bool,
    tags: String,
}

impl From<Transaction> for ExportRecord {
    fn from(transaction: Transaction) -> Self {
        Self {
            date: transaction.date,
            transaction_type: transaction.transaction_type.as_str(),
            category: transaction.category,
            description: transaction.description,
            amount: transaction.amount,
            recurring: transaction.recurring,
            tags: transaction.tags.join(";"),
        }
    }
}

/// Handle requests to export the user's full transaction history.
///
/// CSV responses are served as a file attachment; JSON responses reuse the
/// usual envelope.
pub async fn export_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<ExportParams>,
) -> Result<Response, Error> {
    let query = TransactionQuery {
        sort_date: Some(SortOrder::Ascending),
        ..TransactionQuery::for_user(claims.sub)
    };

    let transactions = {
        let connection = state.lock_connection()?;
        query_transactions(&query, &connection)?
    };

    match params.format.as_deref().unwrap_or("csv") {
        "json" => Ok(Json(ApiResponse::new(transactions)).into_response()),
        "csv" => {
            let mut writer = csv::Writer::from_writer(Vec::new());

            for transaction in transactions {
                writer
                    .serialize(ExportRecord::from(transaction))
                    .map_err(|error| Error::CSVError(error.to_string()))?;
            }

            let bytes = writer
                .into_inner()
                .map_err(|error| Error::CSVError(error.to_string()))?;

            Ok((
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        CONTENT_DISPOSITION,
                        "attachment; filename=\"transactions.csv\"",
                    ),
                ],
                bytes,
            )
                .into_response())
        }
        other => Err(Error::InvalidExportFormat(other.to_owned())),
    }
}
