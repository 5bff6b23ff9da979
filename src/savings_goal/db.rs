//! Database operations for savings goals.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    savings_goal::domain::{NewSavingsGoal, SavingsGoal},
    user::UserID,
};

const COLUMNS: &str = "id, user_id, goal_amount, current_amount, target_date, name, description, \
                       color, is_completed, created_at";

/// Initialize the savings goal table.
///
/// The unique index on `user_id` enforces the one-goal-per-user rule at the
/// storage layer; [upsert_savings_goal] resolves the conflict as a replace.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS savings_goal (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL UNIQUE,
                goal_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                target_date TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

/// Insert a goal, or replace the user's existing goal.
///
/// Replacing resets the saved amount and the completion flag; the original
/// creation date is kept so the progress series stays anchored to when the
/// user first set a goal.
pub fn upsert_savings_goal(
    new_goal: NewSavingsGoal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO savings_goal
             (user_id, goal_amount, current_amount, target_date, name, description, color,
              is_completed, created_at)
             VALUES (?1, ?2, 0, ?3, ?4, ?5, ?6, 0, ?7)
             ON CONFLICT(user_id)
             DO UPDATE SET goal_amount = excluded.goal_amount,
                           current_amount = 0,
                           target_date = excluded.target_date,
                           name = excluded.name,
                           description = excluded.description,
                           color = excluded.color,
                           is_completed = 0
             RETURNING {COLUMNS}"
        ))?
        .query_row(
            (
                new_goal.user_id.as_i64(),
                new_goal.goal_amount,
                new_goal.target_date,
                &new_goal.name,
                &new_goal.description,
                &new_goal.color,
                new_goal.created_at,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the goal owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has not set a goal.
pub fn get_savings_goal(user_id: UserID, connection: &Connection) -> Result<SavingsGoal, Error> {
    connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM savings_goal WHERE user_id = :user_id"
        ))?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Write all of `goal`'s columns back to the database.
///
/// # Errors
///
/// Returns [Error::NotFound] if the goal does not exist.
pub fn update_savings_goal(goal: &SavingsGoal, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE savings_goal
         SET goal_amount = ?1, current_amount = ?2, target_date = ?3, name = ?4,
             description = ?5, color = ?6, is_completed = ?7
         WHERE id = ?8 AND user_id = ?9",
        (
            goal.goal_amount,
            goal.current_amount,
            goal.target_date,
            &goal.name,
            &goal.description,
            &goal.color,
            goal.is_completed,
            goal.id,
            goal.user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the goal owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has not set a goal.
pub fn delete_savings_goal(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goal WHERE user_id = ?1",
        [user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        goal_amount: row.get(2)?,
        current_amount: row.get(3)?,
        target_date: row.get(4)?,
        name: row.get(5)?,
        description: row.get(6)?,
        color: row.get(7)?,
        is_completed: row.get(8)?,
        created_at: row.get(9)?,
    })
}
