//! The API endpoint URIs.

/// The root route which reports the API name and version.
pub const ROOT: &str = "/";
/// The health check route.
pub const HEALTH: &str = "/health";
/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for fetching the current user's profile.
pub const ME: &str = "/api/auth/me";
/// The route for updating the current user's profile.
pub const PROFILE: &str = "/api/auth/profile";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the monthly statistics overview.
pub const STATS_OVERVIEW: &str = "/api/transactions/stats/overview";
/// The route for per-category expense statistics.
pub const STATS_CATEGORIES: &str = "/api/transactions/stats/categories";
/// The route for exporting transactions as CSV or JSON.
pub const EXPORT_TRANSACTIONS: &str = "/api/transactions/export";
/// The route to list and upsert budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to delete a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route for budget recommendations based on past spending.
pub const BUDGET_RECOMMENDATIONS: &str = "/api/budgets/recommendations";
/// The route to get, set, update and delete the savings goal.
pub const SAVINGS: &str = "/api/savings";
/// The route for the cumulative savings progress series.
pub const SAVINGS_PROGRESS: &str = "/api/savings/progress";
