//! Database operations for users.

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    password::PasswordHash,
    user::domain::{NewUser, Role, User, UserID},
};

/// Create the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                currency TEXT NOT NULL,
                monthly_income REAL NOT NULL DEFAULT 0,
                role TEXT NOT NULL DEFAULT 'user'
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user and return it with its generated ID.
///
/// # Errors
///
/// This function will return an [Error::DuplicateEmail] if the email already
/// belongs to a registered user, or an [Error::SqlError] for other SQL errors.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, email, password_hash, currency, monthly_income)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &new_user.name,
            new_user.email.as_str(),
            new_user.password_hash.as_ref(),
            &new_user.currency,
            new_user.monthly_income,
        ),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: new_user.name,
        email: new_user.email,
        password_hash: new_user.password_hash,
        currency: new_user.currency,
        monthly_income: new_user.monthly_income,
        role: Role::User,
    })
}

/// Get the user with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an [Error::NotFound] if `user_id` does not belong
/// to a registered user.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password_hash, currency, monthly_income, role
             FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// This function will return an [Error::NotFound] if no user is registered
/// with `email`.
pub fn get_user_by_email(email: &EmailAddress, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password_hash, currency, monthly_income, role
             FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", &email.as_str())], map_row)
        .map_err(|error| error.into())
}

/// Write all of `user`'s columns back to the database.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user.id` does not exist, or
/// [Error::DuplicateEmail] if the new email belongs to another account.
pub fn update_user(user: &User, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user
         SET name = ?1, email = ?2, password_hash = ?3, currency = ?4, monthly_income = ?5
         WHERE id = ?6",
        (
            &user.name,
            user.email.as_str(),
            user.password_hash.as_ref(),
            &user.currency,
            user.monthly_income,
            user.id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;
    let raw_role: String = row.get(6)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        currency: row.get(4)?,
        monthly_income: row.get(5)?,
        role: Role::from_str_or_default(&raw_role),
    })
}
