//! The endpoint for updating the current user's profile.

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{Claims, encode_token},
    password::PasswordHash,
    response::ApiResponse,
    user::{
        db::{get_user_by_id, update_user},
        domain::UserProfile,
    },
};

/// The request body for updating the current user's profile.
///
/// Every field is optional; omitted fields keep their current value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileForm {
    /// A new display name.
    #[serde(default)]
    pub name: Option<String>,
    /// A new email address.
    #[serde(default)]
    pub email: Option<EmailAddress>,
    /// A new currency symbol.
    #[serde(default)]
    pub currency: Option<String>,
    /// A new monthly income.
    #[serde(default)]
    pub monthly_income: Option<f64>,
    /// A new password, strength-checked like at registration.
    #[serde(default)]
    pub password: Option<String>,
}

/// Handle profile update requests.
///
/// Responds with the updated profile and a fresh bearer token, mirroring the
/// login response so the client can replace its stored session in one step.
pub async fn update_profile(
    State(state): State<AppState>,
    claims: Claims,
    Json(form): Json<UpdateProfileForm>,
) -> Result<Json<ApiResponse<UserProfile>>, Error> {
    // Hash outside the database lock, bcrypt is deliberately slow.
    let password_hash = match &form.password {
        Some(password) => Some(PasswordHash::from_raw_password(
            password,
            PasswordHash::DEFAULT_COST,
        )?),
        None => None,
    };

    let user = {
        let connection = state.lock_connection()?;
        let mut user = get_user_by_id(claims.sub, &connection)?;

        if let Some(name) = form.name {
            user.name = name;
        }
        if let Some(email) = form.email {
            user.email = email;
        }
        if let Some(currency) = form.currency {
            user.currency = currency;
        }
        if let Some(monthly_income) = form.monthly_income {
            user.monthly_income = monthly_income;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }

        update_user(&user, &connection)?;
        user
    };

    let token = encode_token(user.id, state.encoding_key()).map_err(|_| Error::TokenCreation)?;

    Ok(Json(ApiResponse::with_message(
        UserProfile::new(user, Some(token)),
        "Profile updated successfully",
    )))
}

#[cfg(test)]
mod update_profile_tests {
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
    async fn update_profile_changes_only_provided_fields() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        let response = server
            .put(endpoints::PROFILE)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "currency": "$",
                "monthlyIncome": 5000.0,
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["data"]["name"], json!("Foo Bar"));
        assert_eq!(body["data"]["currency"], json!("$"));
        assert_eq!(body["data"]["monthlyIncome"], json!(5000.0));
        assert!(body["data"]["token"].is_string());
    }

    #[tokio::test]
    async fn update_profile_changes_password() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        server
            .put(endpoints::PROFILE)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({"password": "anothersafeandsecurepassword"}))
            .await
            .assert_status_ok();

        // The old password no longer works.
        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status_unauthorized();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "anothersafeandsecurepassword",
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn update_profile_fails_without_token() {
        let server = get_test_server();

        server
            .put(endpoints::PROFILE)
            .content_type("application/json")
            .json(&json!({"currency": "$"}))
            .await
            .assert_status_unauthorized();
    }
}
