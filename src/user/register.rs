//! The user registration endpoint.

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::encode_token,
    password::PasswordHash,
    response::ApiResponse,
    user::{
        db::create_user,
        domain::{DEFAULT_CURRENCY, NewUser, UserProfile},
    },
};

/// The request body for registering a new user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// The user's display name.
    pub name: String,
    /// The email address to register with.
    pub email: EmailAddress,
    /// The password to protect the account with.
    pub password: String,
    /// The currency symbol to display amounts with.
    #[serde(default)]
    pub currency: Option<String>,
    /// The user's self-reported monthly income.
    #[serde(default)]
    pub monthly_income: Option<f64>,
}

/// Handle registration requests.
///
/// Responds with the new user's profile and a fresh bearer token.
///
/// # Errors
///
/// This function will return an error if the password is too weak or the email
/// already belongs to a registered user.
pub async fn register_user(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), Error> {
    let password_hash =
        PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = state.lock_connection()?;

        create_user(
            NewUser {
                name: form.name,
                email: form.email,
                password_hash,
                currency: form.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
                monthly_income: form.monthly_income.unwrap_or(0.0),
            },
            &connection,
        )?
    };

    let token = encode_token(user.id, state.encoding_key()).map_err(|_| Error::TokenCreation)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            UserProfile::new(user, Some(token)),
            "User registered successfully",
        )),
    ))
}

#[cfg(test)]
mod register_tests {
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

    #[tokio::test]
    async fn register_succeeds_with_valid_details() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Foo Bar",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["name"], json!("Foo Bar"));
        assert_eq!(body["data"]["email"], json!("foo@bar.baz"));
        assert_eq!(body["data"]["role"], json!("user"));
        assert_eq!(body["data"]["currency"], json!("₹"));
        assert!(body["data"]["token"].is_string());
    }

    #[tokio::test]
    async fn register_fails_on_duplicate_email() {
        let server = get_test_server();
        let form = json!({
            "name": "Foo Bar",
            "email": "foo@bar.baz",
            "password": "averysafeandsecurepassword",
        });

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&form)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&form)
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["success"], json!(false));
    }

    #[tokio::test]
    async fn register_fails_on_weak_password() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Foo Bar",
                "email": "foo@bar.baz",
                "password": "hunter2",
            }))
            .await;

        response.assert_status_bad_request();
    }
}
