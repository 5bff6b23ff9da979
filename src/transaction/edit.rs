//! The transaction update endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    transaction::{
        db::{get_transaction, update_transaction},
        domain::{
            DESCRIPTION_LIMIT, RecurringPeriod, Transaction, TransactionID, TransactionType,
        },
    },
};

/// The request body for updating a transaction.
///
/// Every field is optional; omitted fields keep their current value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTransactionForm {
    /// A new amount. Must be positive.
    #[serde(default)]
    pub amount: Option<f64>,
    /// A new transaction type.
    #[serde(rename = "type", default)]
    pub transaction_type: Option<TransactionType>,
    /// A new category.
    #[serde(default)]
    pub category: Option<String>,
    /// A new description.
    #[serde(default)]
    pub description: Option<String>,
    /// A new date.
    #[serde(default)]
    pub date: Option<Date>,
    /// Whether the transaction repeats. Setting this to `false` also clears
    /// the recurring period.
    #[serde(default)]
    pub recurring: Option<bool>,
    /// A new recurring period.
    #[serde(default)]
    pub recurring_type: Option<RecurringPeriod>,
    /// A new set of tags, replacing the old one.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Handle transaction update requests.
///
/// The updated fields go through the same validation as at creation time.
///
/// # Errors
///
/// Responds with 404 when the ID does not exist or the transaction belongs to
/// another user.
pub async fn edit_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionID>,
    Json(form): Json<EditTransactionForm>,
) -> Result<Json<ApiResponse<Transaction>>, Error> {
    let connection = state.lock_connection()?;
    let mut transaction = get_transaction(transaction_id, claims.sub, &connection)?;

    apply_edit(&mut transaction, form)?;
    update_transaction(&transaction, &connection)?;

    Ok(Json(ApiResponse::with_message(
        transaction,
        "Transaction updated successfully",
    )))
}

/// Merge `form` into `transaction`, validating each changed field.
fn apply_edit(transaction: &mut Transaction, form: EditTransactionForm) -> Result<(), Error> {
    if let Some(amount) = form.amount {
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }
        transaction.amount = amount;
    }

    if let Some(transaction_type) = form.transaction_type {
        transaction.transaction_type = transaction_type;
    }

    if let Some(category) = form.category {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }
        transaction.category = category.to_owned();
    }

    if let Some(description) = form.description {
        let description = description.trim();
        if description.chars().count() > DESCRIPTION_LIMIT {
            return Err(Error::DescriptionTooLong);
        }
        transaction.description = description.to_owned();
    }

    if let Some(date) = form.date {
        transaction.date = date;
    }

    if let Some(recurring) = form.recurring {
        transaction.recurring = recurring;
        if !recurring {
            transaction.recurring_type = None;
        }
    }

    if let Some(period) = form.recurring_type {
        transaction.recurring_type = Some(period);
    }

    if let Some(tags) = form.tags {
        transaction.tags = tags
            .into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
    }

    Ok(())
}

#[cfg(test)]
mod edit_transaction_tests {
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

    async fn register_and_get_token(server: &TestServer, email: &str) -> String {
        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Foo Bar",
                "email": email,
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("Register response should contain a token")
            .to_owned()
    }

    async fn post_recurring_expense(server: &TestServer, token: &str) -> i64 {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": 9.99,
                "type": "expense",
                "category": "Food",
                "date": "2024-01-15",
                "recurring": true,
                "recurringType": "monthly",
            }))
            .await;

        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("Create response should contain an ID")
    }

    #[tokio::test]
    async fn edit_changes_only_provided_fields() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "foo@bar.baz").await;
        let id = post_recurring_expense(&server, &token).await;

        let response = server
            .put(&format!("/api/transactions/{id}"))
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({"amount": 19.99, "category": "Transport"}))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["data"]["amount"], json!(19.99));
        assert_eq!(body["data"]["category"], json!("Transport"));
        assert_eq!(body["data"]["date"], json!("2024-01-15"));
        assert_eq!(body["data"]["recurringType"], json!("monthly"));
    }

    #[tokio::test]
    async fn edit_clearing_recurring_also_clears_period() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "foo@bar.baz").await;
        let id = post_recurring_expense(&server, &token).await;

        let response = server
            .put(&format!("/api/transactions/{id}"))
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({"recurring": false}))
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["data"]["recurring"], json!(false));
        assert_eq!(body["data"]["recurringType"], json!(null));
    }

    #[tokio::test]
    async fn edit_rejects_invalid_amount() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "foo@bar.baz").await;
        let id = post_recurring_expense(&server, &token).await;

        server
            .put(&format!("/api/transactions/{id}"))
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({"amount": -1.0}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn edit_fails_on_wrong_user() {
        let server = get_test_server();
        let owner_token = register_and_get_token(&server, "foo@bar.baz").await;
        let id = post_recurring_expense(&server, &owner_token).await;
        let other_token = register_and_get_token(&server, "bar@baz.qux").await;

        server
            .put(&format!("/api/transactions/{id}"))
            .authorization_bearer(other_token)
            .content_type("application/json")
            .json(&json!({"amount": 1.0}))
            .await
            .assert_status_not_found();
    }
}
