//! The user domain types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::password::PasswordHash;

/// The currency symbol given to accounts that do not choose one.
pub const DEFAULT_CURRENCY: &str = "₹";

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better
/// compile time errors, and more flexible generics that can have distinct
/// implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The access level of a user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular account that can only access its own data.
    #[default]
    User,
    /// An administrator account.
    Admin,
}

impl Role {
    /// The string stored in the database for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse a role from its database representation, defaulting to
    /// [Role::User] for unknown values.
    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address. Unique across the application.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The currency symbol to display amounts with.
    pub currency: String,
    /// The user's self-reported monthly income.
    pub monthly_income: f64,
    /// The user's access level.
    pub role: Role,
}

/// The data needed to insert a new user.
#[derive(Debug)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The currency symbol to display amounts with.
    pub currency: String,
    /// The user's self-reported monthly income.
    pub monthly_income: f64,
}

/// The user profile returned by the auth endpoints.
///
/// `token` is only included by the endpoints that issue a fresh bearer token
/// (register, login and profile update).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: EmailAddress,
    /// The user's access level.
    pub role: Role,
    /// The currency symbol to display amounts with.
    pub currency: String,
    /// The user's self-reported monthly income.
    pub monthly_income: f64,
    /// A fresh bearer token, when the endpoint issues one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl UserProfile {
    /// Build the profile view for `user`, optionally attaching a fresh `token`.
    pub fn new(user: User, token: Option<String>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            currency: user.currency,
            monthly_income: user.monthly_income,
            token,
        }
    }
}
