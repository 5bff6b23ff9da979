//! The endpoint for fetching the current user's profile.

use axum::{Json, extract::State};

use crate::{
    AppState, Error,
    auth::Claims,
    response::ApiResponse,
    user::{db::get_user_by_id, domain::UserProfile},
};

/// Handle requests for the profile of the currently authenticated user.
///
/// Unlike registration and login, no fresh bearer token is issued.
pub async fn get_me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<UserProfile>>, Error> {
    let user = {
        let connection = state.lock_connection()?;

        get_user_by_id(claims.sub, &connection)?
    };

    Ok(Json(ApiResponse::new(UserProfile::new(user, None))))
}

#[cfg(test)]
mod me_tests {
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
    async fn get_me_returns_profile_without_token() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        let response = server
            .get(endpoints::ME)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["data"]["email"], json!("foo@bar.baz"));
        assert!(body["data"].get("token").is_none());
    }

    #[tokio::test]
    async fn get_me_fails_without_token() {
        let server = get_test_server();

        server
            .get(endpoints::ME)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_me_fails_with_invalid_token() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        server
            .get(endpoints::ME)
            .authorization_bearer(format!("{token}x"))
            .await
            .assert_status_unauthorized();
    }
}
