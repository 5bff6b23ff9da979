//! The transaction domain types, the core data of the application.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, user::UserID};

/// Alias for the integer type used for transaction IDs.
pub type TransactionID = i64;

/// The maximum length of a transaction description in characters.
pub const DESCRIPTION_LIMIT: usize = 200;

/// Whether a transaction brought money in or sent it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string stored in the database for this transaction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse a transaction type from its database representation.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringPeriod {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Repeats every year.
    Yearly,
}

impl RecurringPeriod {
    /// The string stored in the database for this period.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringPeriod::Daily => "daily",
            RecurringPeriod::Weekly => "weekly",
            RecurringPeriod::Monthly => "monthly",
            RecurringPeriod::Yearly => "yearly",
        }
    }

    /// Parse a period from its database representation.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(RecurringPeriod::Daily),
            "weekly" => Some(RecurringPeriod::Weekly),
            "monthly" => Some(RecurringPeriod::Monthly),
            "yearly" => Some(RecurringPeriod::Yearly),
            _ => None,
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Owned by exactly one user; every query is scoped by the owner's ID.
///
/// To create a new transaction, use [Transaction::build] and
/// [crate::transaction::create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The transaction's ID in the application database.
    pub id: TransactionID,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// The amount of money that changed hands. Always positive; the direction
    /// is recorded in `transaction_type`.
    pub amount: f64,
    /// Whether this transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A user-defined, free-text category such as "Food".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// Whether this transaction repeats.
    pub recurring: bool,
    /// How often the transaction repeats, when it does.
    pub recurring_type: Option<RecurringPeriod>,
    /// Free-form labels attached to the transaction.
    pub tags: Vec<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
        user_id: UserID,
    ) -> Result<TransactionBuilder, Error> {
        TransactionBuilder::new(amount, transaction_type, category, user_id)
    }
}

/// Builder for creating a new [Transaction].
///
/// The builder validates each field as it is set, so an invalid transaction
/// can never reach the database. Finalize it with
/// [crate::transaction::create_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) user_id: UserID,
    pub(crate) amount: f64,
    pub(crate) transaction_type: TransactionType,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) date: Date,
    pub(crate) recurring: bool,
    pub(crate) recurring_type: Option<RecurringPeriod>,
    pub(crate) tags: Vec<String>,
}

impl TransactionBuilder {
    /// Start building a transaction with the required fields.
    ///
    /// The date defaults to today, the description to an empty string.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::NonPositiveAmount] if `amount` is
    /// zero or negative, or an [Error::EmptyCategory] if `category` is blank.
    pub fn new(
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
        user_id: UserID,
    ) -> Result<Self, Error> {
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        Ok(Self {
            user_id,
            amount,
            transaction_type,
            category: category.to_owned(),
            description: String::new(),
            date: OffsetDateTime::now_utc().date(),
            recurring: false,
            recurring_type: None,
            tags: Vec::new(),
        })
    }

    /// Set the description for the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::DescriptionTooLong] if
    /// `description` is longer than [DESCRIPTION_LIMIT] characters.
    pub fn description(mut self, description: &str) -> Result<Self, Error> {
        let description = description.trim();
        if description.chars().count() > DESCRIPTION_LIMIT {
            return Err(Error::DescriptionTooLong);
        }

        self.description = description.to_owned();
        Ok(self)
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    /// Mark the transaction as recurring with the given period.
    pub fn recurring(mut self, period: Option<RecurringPeriod>) -> Self {
        self.recurring = true;
        self.recurring_type = period;
        self
    }

    /// Set the tags for the transaction. Tags are trimmed and empty tags
    /// dropped.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags
            .into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }
}
