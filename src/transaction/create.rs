//! The transaction creation endpoint.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    transaction::{
        db::create_transaction,
        domain::{RecurringPeriod, Transaction, TransactionType},
    },
};

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionForm {
    /// The amount of money that changed hands. Must be positive.
    pub amount: f64,
    /// Whether this transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free-text category such as "Food".
    pub category: String,
    /// What the transaction was for. Defaults to an empty string.
    #[serde(default)]
    pub description: Option<String>,
    /// When the transaction happened. Defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
    /// Whether this transaction repeats.
    #[serde(default)]
    pub recurring: Option<bool>,
    /// How often the transaction repeats.
    #[serde(default)]
    pub recurring_type: Option<RecurringPeriod>,
    /// Free-form labels for the transaction.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Handle transaction creation requests.
///
/// # Errors
///
/// This function will return an error if the amount is not positive, the
/// category is blank, or the description is over the length limit.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(form): Json<CreateTransactionForm>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), Error> {
    let mut builder =
        Transaction::build(form.amount, form.transaction_type, &form.category, claims.sub)?;

    if let Some(ref description) = form.description {
        builder = builder.description(description)?;
    }
    if let Some(date) = form.date {
        builder = builder.date(date);
    }
    if form.recurring.unwrap_or(false) {
        builder = builder.recurring(form.recurring_type);
    }
    if let Some(tags) = form.tags {
        builder = builder.tags(tags);
    }

    let transaction = {
        let connection = state.lock_connection()?;
        create_transaction(builder, &connection)?
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            transaction,
            "Transaction created successfully",
        )),
    ))
}

#[cfg(test)]
mod create_transaction_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, pagination::PaginationConfig};

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "42", PaginationConfig::default())
            .expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    async fn register_and_get_token(server: &TestServer) -> String {
        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Foo Bar",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("Register response should contain a token")
            .to_owned()
    }

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": 42.5,
                "type": "expense",
                "category": "Food",
                "description": "Rust Pie",
                "date": "2024-01-15",
                "tags": ["lunch"],
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["amount"], json!(42.5));
        assert_eq!(body["data"]["type"], json!("expense"));
        assert_eq!(body["data"]["category"], json!("Food"));
        assert_eq!(body["data"]["date"], json!("2024-01-15"));
        assert_eq!(body["data"]["tags"], json!(["lunch"]));
    }

    #[tokio::test]
    async fn create_transaction_fails_on_non_positive_amount() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": 0.0,
                "type": "expense",
                "category": "Food",
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_transaction_fails_without_token() {
        let server = get_test_server();

        server
            .post(endpoints::TRANSACTIONS)
            .content_type("application/json")
            .json(&json!({
                "amount": 1.0,
                "type": "expense",
                "category": "Food",
            }))
            .await
            .assert_status_unauthorized();
    }
}
