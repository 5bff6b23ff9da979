//! The login endpoint.

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::encode_token,
    response::ApiResponse,
    user::{db::get_user_by_email, domain::UserProfile},
};

/// The email and password entered during login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during login.
    pub email: EmailAddress,
    /// Password entered during login.
    pub password: String,
}

/// Handle login requests.
///
/// Responds with the user's profile and a fresh bearer token.
///
/// # Errors
///
/// This function will return an [Error::InvalidCredentials] if the email does
/// not belong to a registered user or the password is not correct. The two
/// cases are indistinguishable to the client on purpose.
pub async fn log_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ApiResponse<UserProfile>>, Error> {
    let user = {
        let connection = state.lock_connection()?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let password_is_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.encoding_key()).map_err(|_| Error::TokenCreation)?;

    Ok(Json(ApiResponse::with_message(
        UserProfile::new(user, Some(token)),
        "Login successful",
    )))
}

#[cfg(test)]
mod log_in_tests {
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

    async fn register_test_user(server: &TestServer) {
        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Foo Bar",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();
        register_test_user(&server).await;

        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["email"], json!("foo@bar.baz"));
        assert!(body["data"]["token"].is_string());
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();
        register_test_user(&server).await;

        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["success"], json!(false));
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "nobody@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_unauthorized();
    }
}
