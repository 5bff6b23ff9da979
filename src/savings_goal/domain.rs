//! The savings goal domain types.

use serde::Serialize;
use time::Date;

use crate::{Error, user::UserID};

/// Alias for the integer type used for savings goal IDs.
pub type SavingsGoalID = i64;

/// The maximum length of a goal name in characters.
pub const NAME_LIMIT: usize = 100;

/// The maximum length of a goal description in characters.
pub const DESCRIPTION_LIMIT: usize = 500;

/// The colour assigned to goals that do not choose one.
pub const DEFAULT_COLOR: &str = "#10B981";

/// A savings target with a deadline. Each user has at most one.
///
/// `current_amount` is recomputed from the year's transactions on every read;
/// `is_completed` latches to `true` once the amount first reaches the target
/// and never reverts on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// The goal's ID in the application database.
    pub id: SavingsGoalID,
    /// The ID of the user that owns this goal.
    pub user_id: UserID,
    /// The amount the user wants to save.
    pub goal_amount: f64,
    /// How much has been saved so far.
    pub current_amount: f64,
    /// When the user wants to reach the goal.
    pub target_date: Date,
    /// A short name such as "Emergency fund".
    pub name: String,
    /// A longer description of the goal.
    pub description: String,
    /// The colour the client should render this goal with.
    pub color: String,
    /// Whether the goal has ever been reached.
    pub is_completed: bool,
    /// The day the goal was created, the starting point of the progress
    /// series.
    pub created_at: Date,
}

/// A validated savings goal that has not been saved yet.
#[derive(Debug, PartialEq)]
pub struct NewSavingsGoal {
    pub(crate) user_id: UserID,
    pub(crate) goal_amount: f64,
    pub(crate) target_date: Date,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) color: String,
    pub(crate) created_at: Date,
}

impl NewSavingsGoal {
    /// Validate the fields for a new savings goal.
    ///
    /// The target date is not checked against today: a goal may be created
    /// with a deadline that has already passed, in which case the whole
    /// amount is reported as immediately due.
    ///
    /// # Errors
    ///
    /// This function will return an error if the amount is not positive, the
    /// name is blank or too long, or the description is too long.
    pub fn new(
        goal_amount: f64,
        target_date: Date,
        name: &str,
        description: Option<&str>,
        color: Option<String>,
        user_id: UserID,
        created_at: Date,
    ) -> Result<Self, Error> {
        if goal_amount <= 0.0 {
            return Err(Error::NonPositiveGoalAmount);
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyGoalName);
        }
        if name.chars().count() > NAME_LIMIT {
            return Err(Error::GoalNameTooLong);
        }

        let description = description.unwrap_or_default().trim();
        if description.chars().count() > DESCRIPTION_LIMIT {
            return Err(Error::GoalDescriptionTooLong);
        }

        Ok(Self {
            user_id,
            goal_amount,
            target_date,
            name: name.to_owned(),
            description: description.to_owned(),
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
            created_at,
        })
    }
}
