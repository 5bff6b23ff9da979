//! The savings goal: a single per-user target amount with pace tracking.

mod db;
mod delete;
mod domain;
mod edit;
mod get;
mod progress;
mod set;

pub use db::{
    create_savings_goal_table, delete_savings_goal, get_savings_goal, update_savings_goal,
    upsert_savings_goal,
};
pub use delete::delete_savings_goal_endpoint;
pub use domain::{NewSavingsGoal, SavingsGoal, SavingsGoalID};
pub use edit::edit_savings_goal;
pub use get::get_savings_goal_endpoint;
pub use progress::get_savings_progress;
pub use set::set_savings_goal;
