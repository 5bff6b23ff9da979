//! Bearer token issuance and verification.
//!
//! Handlers that require authentication take a [Claims] argument, which is an
//! axum extractor that verifies the `Authorization: Bearer ...` header. The
//! claims carry the owning user's ID so each handler receives the
//! authenticated user as an explicit value.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{AppState, UserID, response::ApiFailure};

/// How long a bearer token stays valid after being issued.
const TOKEN_DURATION: Duration = Duration::days(30);

/// The contents of a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
    /// The ID of the user the token was issued to.
    pub sub: UserID,
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;

        let state = AppState::from_ref(state);
        let token_data = decode_token(bearer.token(), state.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// The errors that may occur while issuing or verifying bearer tokens.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The request did not carry a bearer token.
    MissingToken,
    /// The bearer token could not be decoded, was tampered with, or has expired.
    InvalidToken,
    /// A token could not be created, e.g. the claims could not be serialized.
    TokenCreation,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Not authorized, no token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Not authorized, token failed"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "Token creation error"),
        };

        (status, Json(ApiFailure::new(message.to_owned()))).into_response()
    }
}

/// Issue a token for `user_id`, valid for [TOKEN_DURATION].
pub fn encode_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
        sub: user_id,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("could not encode bearer token: {error}");
        AuthError::TokenCreation
    })
}

fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| AuthError::InvalidToken)
}
