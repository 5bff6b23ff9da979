//! Database operations for budgets.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    budget::domain::{Budget, BudgetID, NewBudget},
    user::UserID,
};

/// Initialize the budget table.
///
/// The unique index turns a duplicate `(user, category, month, year)` insert
/// into a defined conflict that [upsert_budget] resolves as an update, so the
/// same period can never hold two budgets for one category.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                color TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, category, month, year)
        );",
    )?;

    Ok(())
}

/// Insert a budget, or update the amount and colour of the existing budget
/// for the same `(user, category, month, year)`.
pub fn upsert_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount, month, year, color)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, category, month, year)
             DO UPDATE SET amount = excluded.amount, color = excluded.color
             RETURNING id, user_id, category, amount, month, year, color",
        )?
        .query_row(
            (
                new_budget.user_id.as_i64(),
                &new_budget.category,
                new_budget.amount,
                new_budget.month,
                new_budget.year,
                &new_budget.color,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the budgets owned by `user_id` for one calendar month.
pub fn get_budgets_for_month(
    user_id: UserID,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, month, year, color
             FROM budget
             WHERE user_id = :user_id AND month = :month AND year = :year
             ORDER BY category ASC",
        )?
        .query_map(
            &[
                (":user_id", &user_id.as_i64()),
                (":month", &i64::from(month)),
                (":year", &i64::from(year)),
            ],
            map_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Delete a budget owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the budget does not exist or belongs to
/// another user.
pub fn delete_budget(id: BudgetID, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
        color: row.get(6)?,
    })
}
