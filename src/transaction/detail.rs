//! The endpoint for fetching a single transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    transaction::{
        db::get_transaction,
        domain::{Transaction, TransactionID},
    },
};

/// Handle requests for a single transaction by its ID.
///
/// Responds with 404 when the ID does not exist or the transaction belongs to
/// another user, so clients cannot tell the two cases apart.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionID>,
) -> Result<Json<ApiResponse<Transaction>>, Error> {
    let transaction = {
        let connection = state.lock_connection()?;
        get_transaction(transaction_id, claims.sub, &connection)?
    };

    Ok(Json(ApiResponse::new(transaction)))
}

#[cfg(test)]
mod get_transaction_tests {
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

    async fn post_expense(server: &TestServer, token: &str) -> i64 {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": 9.99,
                "type": "expense",
                "category": "Food",
                "date": "2024-01-15",
            }))
            .await;

        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("Create response should contain an ID")
    }

    #[tokio::test]
    async fn get_transaction_succeeds_for_owner() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "foo@bar.baz").await;
        let id = post_expense(&server, &token).await;

        let response = server
            .get(&format!("/api/transactions/{id}"))
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["id"], json!(id));
    }

    #[tokio::test]
    async fn get_transaction_fails_on_wrong_user() {
        let server = get_test_server();
        let owner_token = register_and_get_token(&server, "foo@bar.baz").await;
        let id = post_expense(&server, &owner_token).await;
        let other_token = register_and_get_token(&server, "bar@baz.qux").await;

        server
            .get(&format!("/api/transactions/{id}"))
            .authorization_bearer(other_token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn get_transaction_fails_on_missing_id() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "foo@bar.baz").await;

        server
            .get("/api/transactions/1337")
            .authorization_bearer(token)
            .await
            .assert_status_not_found();
    }
}
