//! The budget domain types.

use serde::Serialize;

use crate::{Error, user::UserID};

/// Alias for the integer type used for budget IDs.
pub type BudgetID = i64;

/// The colour assigned to budgets that do not choose one.
pub const DEFAULT_COLOR: &str = "#667eea";

/// The earliest year a budget can be created for.
pub const MIN_YEAR: i32 = 2020;

/// The latest year a budget can be created for.
pub const MAX_YEAR: i32 = 2030;

/// A spending limit for one category in one calendar month.
///
/// At most one budget exists per `(user, category, month, year)`; setting a
/// budget for an existing combination updates it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The budget's ID in the application database.
    pub id: BudgetID,
    /// The ID of the user that owns this budget.
    pub user_id: UserID,
    /// The category the limit applies to.
    pub category: String,
    /// The spending limit. Zero is allowed and means "spend nothing".
    pub amount: f64,
    /// The calendar month the limit applies to, 1-12.
    pub month: u8,
    /// The calendar year the limit applies to.
    pub year: i32,
    /// The colour the client should render this budget with.
    pub color: String,
}

/// A validated budget that has not been saved yet.
#[derive(Debug, PartialEq)]
pub struct NewBudget {
    pub(crate) user_id: UserID,
    pub(crate) category: String,
    pub(crate) amount: f64,
    pub(crate) month: u8,
    pub(crate) year: i32,
    pub(crate) color: String,
}

impl NewBudget {
    /// Validate the fields for a new budget.
    ///
    /// # Errors
    ///
    /// This function will return an error if the category is blank, the
    /// amount is negative, the month is outside 1-12, or the year is outside
    /// [MIN_YEAR]-[MAX_YEAR].
    pub fn new(
        category: &str,
        amount: f64,
        month: u8,
        year: i32,
        color: Option<String>,
        user_id: UserID,
    ) -> Result<Self, Error> {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        if amount < 0.0 {
            return Err(Error::NegativeBudgetAmount);
        }

        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(month));
        }

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::YearOutOfRange(year));
        }

        Ok(Self {
            user_id,
            category: category.to_owned(),
            amount,
            month,
            year,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
        })
    }
}
