//! Database operations for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error,
    transaction::domain::{
        RecurringPeriod, Transaction, TransactionBuilder, TransactionID, TransactionType,
    },
    user::UserID,
};

const COLUMNS: &str =
    "id, user_id, amount, type, category, description, date, recurring, recurring_type, tags";

/// Defines which transactions to fetch from [query_transactions].
///
/// Every query is scoped to a single owning user; the other filters are
/// optional and combined with AND.
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    /// Only include transactions owned by this user.
    pub user_id: UserID,
    /// Include transactions dated on or after this date.
    pub date_from: Option<Date>,
    /// Include transactions dated strictly before this date.
    pub date_before: Option<Date>,
    /// Include only incomes or only expenses.
    pub transaction_type: Option<TransactionType>,
    /// Include transactions whose category contains this string,
    /// case-insensitively.
    pub category: Option<String>,
    /// Orders transactions by date. `None` returns transactions in the order
    /// they are stored.
    pub sort_date: Option<SortOrder>,
    /// Selects up to the first N transactions after `offset`.
    pub limit: Option<u64>,
    /// The number of matching transactions to skip.
    pub offset: u64,
}

impl TransactionQuery {
    /// A query matching all transactions owned by `user_id`.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            date_from: None,
            date_before: None,
            transaction_type: None,
            category: None,
            sort_date: None,
            limit: None,
            offset: 0,
        }
    }
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// Initialize the transaction table and indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                recurring INTEGER NOT NULL DEFAULT 0,
                recurring_type TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_user_type ON \"transaction\"(user_id, type);
        CREATE INDEX IF NOT EXISTS idx_transaction_user_category ON \"transaction\"(user_id, category);",
    )?;

    Ok(())
}

/// Insert the transaction described by `builder` and return it with its
/// generated ID.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tags_json = serde_json::to_string(&builder.tags)?;

    connection.execute(
        "INSERT INTO \"transaction\"
         (user_id, amount, type, category, description, date, recurring, recurring_type, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            builder.user_id.as_i64(),
            builder.amount,
            builder.transaction_type.as_str(),
            &builder.category,
            &builder.description,
            builder.date,
            builder.recurring,
            builder.recurring_type.map(|period| period.as_str()),
            &tags_json,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        user_id: builder.user_id,
        amount: builder.amount,
        transaction_type: builder.transaction_type,
        category: builder.category,
        description: builder.description,
        date: builder.date,
        recurring: builder.recurring,
        recurring_type: builder.recurring_type,
        tags: builder.tags,
    })
}

/// Retrieve a single transaction owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `id` does not exist *or* the transaction
/// belongs to another user, so clients cannot probe for other users' data.
pub fn get_transaction(
    id: TransactionID,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Query for transactions in the database.
pub fn query_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, parameters) = build_where_clause(query);

    let mut query_string = format!("SELECT {COLUMNS} FROM \"transaction\" WHERE {where_clause}");

    match query.sort_date {
        Some(SortOrder::Ascending) => query_string.push_str(" ORDER BY date ASC, id ASC"),
        Some(SortOrder::Descending) => query_string.push_str(" ORDER BY date DESC, id DESC"),
        None => {}
    }

    if let Some(limit) = query.limit {
        query_string.push_str(&format!(" LIMIT {limit} OFFSET {}", query.offset));
    }

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(parameters.iter()), map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Count the transactions matching `query`, ignoring its limit and offset.
pub fn count_transactions(query: &TransactionQuery, connection: &Connection) -> Result<u64, Error> {
    let (where_clause, parameters) = build_where_clause(query);

    connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"
        ))?
        .query_row(params_from_iter(parameters.iter()), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })
        .map_err(|error| error.into())
}

/// Write all of `transaction`'s columns back to the database.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub fn update_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    let tags_json = serde_json::to_string(&transaction.tags)?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET amount = ?1, type = ?2, category = ?3, description = ?4, date = ?5,
             recurring = ?6, recurring_type = ?7, tags = ?8
         WHERE id = ?9 AND user_id = ?10",
        (
            transaction.amount,
            transaction.transaction_type.as_str(),
            &transaction.category,
            &transaction.description,
            transaction.date,
            transaction.recurring,
            transaction.recurring_type.map(|period| period.as_str()),
            &tags_json,
            transaction.id,
            transaction.user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub fn delete_transaction(
    id: TransactionID,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn build_where_clause(query: &TransactionQuery) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
    let mut parameters = vec![Value::Integer(query.user_id.as_i64())];

    if let Some(date_from) = query.date_from {
        where_clause_parts.push(format!("date >= ?{}", parameters.len() + 1));
        parameters.push(Value::Text(date_from.to_string()));
    }

    if let Some(date_before) = query.date_before {
        where_clause_parts.push(format!("date < ?{}", parameters.len() + 1));
        parameters.push(Value::Text(date_before.to_string()));
    }

    if let Some(transaction_type) = query.transaction_type {
        where_clause_parts.push(format!("type = ?{}", parameters.len() + 1));
        parameters.push(Value::Text(transaction_type.as_str().to_owned()));
    }

    if let Some(ref category) = query.category {
        where_clause_parts.push(format!(
            "category LIKE ?{} COLLATE NOCASE",
            parameters.len() + 1
        ));
        parameters.push(Value::Text(format!("%{category}%")));
    }

    (where_clause_parts.join(" AND "), parameters)
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_type: String = row.get(3)?;
    let transaction_type = TransactionType::from_str(&raw_type).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown transaction type {raw_type:?}").into(),
        )
    })?;

    let recurring_type: Option<String> = row.get(8)?;
    let recurring_type = recurring_type.as_deref().and_then(RecurringPeriod::from_str);

    let raw_tags: String = row.get(9)?;
    let tags = serde_json::from_str(&raw_tags).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        transaction_type,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
        recurring: row.get(7)?,
        recurring_type,
        tags,
    })
}

#[cfg(test)]
mod transaction_db_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        password::PasswordHash,
        transaction::domain::{RecurringPeriod, Transaction, TransactionType},
        user::{NewUser, UserID, create_user, create_user_table},
    };

    use super::{
        SortOrder, TransactionQuery, count_transactions, create_transaction,
        create_transaction_table, delete_transaction, get_transaction, query_transactions,
        update_transaction,
    };

    fn get_db_connection_and_user_id() -> (Connection, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");
        create_transaction_table(&connection).expect("Could not create transaction table");

        let user = create_user(
            NewUser {
                name: "Foo Bar".to_owned(),
                email: "foo@bar.baz".parse().unwrap(),
                password_hash: PasswordHash::new_unchecked("hunter2"),
                currency: "₹".to_owned(),
                monthly_income: 0.0,
            },
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }

    fn insert_expense(
        amount: f64,
        category: &str,
        date: time::Date,
        user_id: UserID,
        connection: &Connection,
    ) -> Transaction {
        let builder = Transaction::build(amount, TransactionType::Expense, category, user_id)
            .unwrap()
            .date(date);

        create_transaction(builder, connection).unwrap()
    }

    #[test]
    fn create_and_get_round_trips_all_fields() {
        let (connection, user_id) = get_db_connection_and_user_id();

        let builder = Transaction::build(42.5, TransactionType::Expense, "Food", user_id)
            .unwrap()
            .description("Rust Pie")
            .unwrap()
            .date(date!(2024 - 01 - 15))
            .recurring(Some(RecurringPeriod::Monthly))
            .tags(vec!["lunch".to_owned(), "work".to_owned()]);
        let inserted = create_transaction(builder, &connection).unwrap();

        let selected = get_transaction(inserted.id, user_id, &connection).unwrap();

        assert_eq!(selected, inserted);
        assert_eq!(selected.recurring_type, Some(RecurringPeriod::Monthly));
        assert_eq!(selected.tags, vec!["lunch".to_owned(), "work".to_owned()]);
    }

    #[test]
    fn get_fails_for_other_users_transaction() {
        let (connection, user_id) = get_db_connection_and_user_id();
        let other_user = create_user(
            NewUser {
                name: "Bar Baz".to_owned(),
                email: "bar@baz.qux".parse().unwrap(),
                password_hash: PasswordHash::new_unchecked("hunter3"),
                currency: "₹".to_owned(),
                monthly_income: 0.0,
            },
            &connection,
        )
        .unwrap();
        let transaction = insert_expense(9.99, "Food", date!(2024 - 01 - 15), user_id, &connection);

        let result = get_transaction(transaction.id, other_user.id, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn query_filters_by_date_window() {
        let (connection, user_id) = get_db_connection_and_user_id();
        insert_expense(1.0, "Food", date!(2023 - 12 - 31), user_id, &connection);
        let in_window = insert_expense(2.0, "Food", date!(2024 - 01 - 01), user_id, &connection);
        insert_expense(3.0, "Food", date!(2024 - 02 - 01), user_id, &connection);

        let query = TransactionQuery {
            date_from: Some(date!(2024 - 01 - 01)),
            date_before: Some(date!(2024 - 02 - 01)),
            ..TransactionQuery::for_user(user_id)
        };
        let transactions = query_transactions(&query, &connection).unwrap();

        assert_eq!(transactions, vec![in_window]);
    }

    #[test]
    fn query_filters_by_type_and_category() {
        let (connection, user_id) = get_db_connection_and_user_id();
        insert_expense(1.0, "Food", date!(2024 - 01 - 02), user_id, &connection);
        let builder = Transaction::build(100.0, TransactionType::Income, "Salary", user_id)
            .unwrap()
            .date(date!(2024 - 01 - 03));
        create_transaction(builder, &connection).unwrap();

        let expenses = query_transactions(
            &TransactionQuery {
                transaction_type: Some(TransactionType::Expense),
                ..TransactionQuery::for_user(user_id)
            },
            &connection,
        )
        .unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Food");

        // Case-insensitive substring match.
        let by_category = query_transactions(
            &TransactionQuery {
                category: Some("foo".to_owned()),
                ..TransactionQuery::for_user(user_id)
            },
            &connection,
        )
        .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].category, "Food");
    }

    #[test]
    fn query_only_returns_own_transactions() {
        let (connection, user_id) = get_db_connection_and_user_id();
        let other_user = create_user(
            NewUser {
                name: "Bar Baz".to_owned(),
                email: "bar@baz.qux".parse().unwrap(),
                password_hash: PasswordHash::new_unchecked("hunter3"),
                currency: "₹".to_owned(),
                monthly_income: 0.0,
            },
            &connection,
        )
        .unwrap();
        insert_expense(1.0, "Food", date!(2024 - 01 - 02), user_id, &connection);
        insert_expense(2.0, "Food", date!(2024 - 01 - 03), other_user.id, &connection);

        let transactions =
            query_transactions(&TransactionQuery::for_user(user_id), &connection).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].user_id, user_id);
    }

    #[test]
    fn query_sorts_and_paginates() {
        let (connection, user_id) = get_db_connection_and_user_id();
        insert_expense(1.0, "Food", date!(2024 - 01 - 01), user_id, &connection);
        insert_expense(2.0, "Food", date!(2024 - 01 - 03), user_id, &connection);
        insert_expense(3.0, "Food", date!(2024 - 01 - 02), user_id, &connection);

        let query = TransactionQuery {
            sort_date: Some(SortOrder::Descending),
            limit: Some(2),
            offset: 1,
            ..TransactionQuery::for_user(user_id)
        };
        let transactions = query_transactions(&query, &connection).unwrap();

        let dates: Vec<time::Date> = transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date!(2024 - 01 - 02), date!(2024 - 01 - 01)]);
    }

    #[test]
    fn count_ignores_limit_and_offset() {
        let (connection, user_id) = get_db_connection_and_user_id();
        insert_expense(1.0, "Food", date!(2024 - 01 - 01), user_id, &connection);
        insert_expense(2.0, "Food", date!(2024 - 01 - 02), user_id, &connection);

        let query = TransactionQuery {
            limit: Some(1),
            ..TransactionQuery::for_user(user_id)
        };

        assert_eq!(count_transactions(&query, &connection).unwrap(), 2);
    }

    #[test]
    fn update_changes_fields() {
        let (connection, user_id) = get_db_connection_and_user_id();
        let mut transaction =
            insert_expense(9.99, "Food", date!(2024 - 01 - 15), user_id, &connection);

        transaction.amount = 19.99;
        transaction.category = "Transport".to_owned();
        transaction.transaction_type = TransactionType::Expense;
        update_transaction(&transaction, &connection).unwrap();

        let selected = get_transaction(transaction.id, user_id, &connection).unwrap();
        assert_eq!(selected, transaction);
    }

    #[test]
    fn update_fails_for_other_users_transaction() {
        let (connection, user_id) = get_db_connection_and_user_id();
        let mut transaction =
            insert_expense(9.99, "Food", date!(2024 - 01 - 15), user_id, &connection);
        transaction.user_id = UserID::new(user_id.as_i64() + 1);

        let result = update_transaction(&transaction, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_transaction() {
        let (connection, user_id) = get_db_connection_and_user_id();
        let transaction = insert_expense(9.99, "Food", date!(2024 - 01 - 15), user_id, &connection);

        delete_transaction(transaction.id, user_id, &connection).unwrap();

        assert_eq!(
            get_transaction(transaction.id, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_on_missing_transaction() {
        let (connection, user_id) = get_db_connection_and_user_id();

        let result = delete_transaction(1337, user_id, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }
}
