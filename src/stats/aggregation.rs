//! Pure aggregation over time-windowed financial records.
//!
//! Every function in this module is a stateless computation over
//! caller-supplied slices: no database handles, no clock reads, no side
//! effects. The controllers fetch a snapshot of the owner's records, bound
//! the date window, and hand both in. Degenerate inputs (empty slices, zero
//! denominators) produce zeros rather than NaN or infinity.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    budget::Budget,
    savings_goal::SavingsGoal,
    transaction::{Transaction, TransactionType},
};

/// The totals and series for one calendar month of transactions.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOverview {
    /// Sum of income amounts in the window.
    pub total_income: f64,
    /// Sum of expense amounts in the window.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub net_savings: f64,
    /// `net_savings / total_income` as a percentage, 0 when there is no income.
    pub savings_rate: f64,
    /// Total expenses per category.
    pub category_spending: HashMap<String, f64>,
    /// Total expenses per day, ascending by date. Days without expenses are
    /// omitted.
    pub daily_spending: Vec<DailySpend>,
    /// The number of days in the window without a single expense.
    pub no_spend_days: u32,
    /// The number of days in the window.
    pub days_in_month: u32,
    /// The number of days in the window with at least one expense.
    pub expense_days: u32,
}

/// The total spent on one calendar day.
#[derive(Debug, PartialEq, Serialize)]
pub struct DailySpend {
    /// The day the money was spent.
    pub date: Date,
    /// The total expense amount for that day.
    pub amount: f64,
}

/// Aggregate one month of transactions into totals, a category breakdown and
/// a daily spending series.
///
/// `transactions` should already be filtered to dates in
/// `[month_start, month_end)`; the window bounds are only used for the day
/// counts.
pub fn monthly_overview(
    transactions: &[Transaction],
    month_start: Date,
    month_end: Date,
) -> MonthlyOverview {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut category_spending: HashMap<String, f64> = HashMap::new();
    let mut daily_totals: HashMap<Date, f64> = HashMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => {
                total_expenses += transaction.amount;
                *category_spending
                    .entry(transaction.category.clone())
                    .or_insert(0.0) += transaction.amount;
                *daily_totals.entry(transaction.date).or_insert(0.0) += transaction.amount;
            }
        }
    }

    let net_savings = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        net_savings / total_income * 100.0
    } else {
        0.0
    };

    let mut daily_spending: Vec<DailySpend> = daily_totals
        .into_iter()
        .map(|(date, amount)| DailySpend { date, amount })
        .collect();
    daily_spending.sort_by_key(|entry| entry.date);

    let days_in_month = count_days(month_start, month_end);
    let expense_days = daily_spending.len() as u32;

    MonthlyOverview {
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        category_spending,
        daily_spending,
        no_spend_days: days_in_month.saturating_sub(expense_days),
        days_in_month,
        expense_days,
    }
}

/// Count the days in `[start, end)` by walking one day at a time.
fn count_days(start: Date, end: Date) -> u32 {
    let mut count = 0;
    let mut date = start;

    while date < end {
        count += 1;
        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
    }

    count
}

/// The expense total and transaction count for one category.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The total spent in this category.
    pub total_amount: f64,
    /// The number of expenses in this category.
    pub count: u32,
}

/// Total the expenses per category, sorted by descending amount.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, (f64, u32)> = HashMap::new();

    for transaction in transactions {
        if transaction.transaction_type != TransactionType::Expense {
            continue;
        }

        let entry = totals.entry(transaction.category.as_str()).or_insert((0.0, 0));
        entry.0 += transaction.amount;
        entry.1 += 1;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, (total_amount, count))| CategoryTotal {
            category: category.to_owned(),
            total_amount,
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));

    breakdown
}

/// A budget joined with the amount actually spent in its category.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    /// The budget itself, flattened into the same JSON object.
    #[serde(flatten)]
    pub budget: Budget,
    /// The total spent in the budget's category this month.
    pub spent: f64,
    /// How much of the budget is left, never negative.
    pub remaining: f64,
    /// `spent / amount` as a percentage, 0 when the budget amount is 0.
    pub usage_percent: f64,
    /// Whether more was spent than budgeted. A zero budget with any spending
    /// is over budget even though its usage percentage is 0.
    pub is_over_budget: bool,
}

/// The spending summary across all budgets and categories.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Sum of all budget amounts.
    pub total_budget: f64,
    /// Sum of spending across all categories, budgeted or not.
    pub total_spent: f64,
    /// `total_budget - total_spent`, never negative.
    pub total_remaining: f64,
    /// `total_spent / total_budget` as a percentage, 0 when nothing is
    /// budgeted.
    pub overall_usage: f64,
}

/// The budgets joined with usage, plus the overall summary.
#[derive(Debug, PartialEq, Serialize)]
pub struct BudgetReport {
    /// One entry per budget.
    pub budgets: Vec<BudgetUsage>,
    /// The overall summary.
    pub summary: BudgetSummary,
}

/// Join each budget with the spending in its category and compute the
/// overall summary.
///
/// `category_totals` is the expense total per category for the same month the
/// budgets apply to, e.g. the `category_spending` field of
/// [MonthlyOverview].
pub fn budget_usage(budgets: Vec<Budget>, category_totals: &HashMap<String, f64>) -> BudgetReport {
    let total_budget: f64 = budgets.iter().map(|budget| budget.amount).sum();
    let total_spent: f64 = category_totals.values().sum();

    let budgets = budgets
        .into_iter()
        .map(|budget| {
            let spent = category_totals.get(&budget.category).copied().unwrap_or(0.0);
            let remaining = (budget.amount - spent).max(0.0);
            let usage_percent = if budget.amount > 0.0 {
                spent / budget.amount * 100.0
            } else {
                0.0
            };
            let is_over_budget = spent > budget.amount;

            BudgetUsage {
                budget,
                spent,
                remaining,
                usage_percent,
                is_over_budget,
            }
        })
        .collect();

    BudgetReport {
        budgets,
        summary: BudgetSummary {
            total_budget,
            total_spent,
            total_remaining: (total_budget - total_spent).max(0.0),
            overall_usage: if total_budget > 0.0 {
                total_spent / total_budget * 100.0
            } else {
                0.0
            },
        },
    }
}

/// The cumulative income minus expenses over `transactions`, floored at zero.
///
/// Callers pass the current calendar year's transactions to get the savings
/// balance a goal is measured against.
pub fn year_to_date_savings(transactions: &[Transaction]) -> f64 {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expenses += transaction.amount,
        }
    }

    (income - expenses).max(0.0)
}

/// Write the recomputed savings balance into `goal`, latching completion.
///
/// Completion is a one-way transition: once the balance has reached the goal
/// amount the goal stays completed, even if the balance later drops.
pub fn apply_current_savings(goal: &mut SavingsGoal, current_savings: f64) {
    goal.current_amount = current_savings;

    if current_savings >= goal.goal_amount {
        goal.is_completed = true;
    }
}

/// The derived pace figures for a savings goal.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    /// `current_amount / goal_amount` as a percentage, capped at 100.
    pub progress: f64,
    /// Days until the target date, floored at 0 for display.
    pub days_remaining: i64,
    /// `goal_amount - current_amount`, never negative.
    pub amount_needed: f64,
    /// The daily amount needed to reach the goal by the target date. When the
    /// target date has passed, the entire shortfall is due immediately.
    pub daily_savings_needed: f64,
    /// Whether the required future pace is within the average pace achieved
    /// so far. A rough heuristic, not a trend projection.
    pub is_on_track: bool,
}

/// Project how a goal is pacing towards its target date.
///
/// `today` is passed in so the computation stays a pure function of its
/// inputs.
pub fn savings_projection(goal: &SavingsGoal, today: Date) -> SavingsProjection {
    let progress = if goal.goal_amount > 0.0 {
        (goal.current_amount / goal.goal_amount * 100.0).min(100.0)
    } else {
        0.0
    };

    let days_remaining = (goal.target_date - today).whole_days();
    let amount_needed = (goal.goal_amount - goal.current_amount).max(0.0);

    let daily_savings_needed = if days_remaining > 0 {
        amount_needed / days_remaining as f64
    } else {
        amount_needed
    };

    let achieved_daily_pace = goal.current_amount / days_remaining.max(1) as f64;

    SavingsProjection {
        progress,
        days_remaining: days_remaining.max(0),
        amount_needed,
        daily_savings_needed,
        is_on_track: daily_savings_needed <= achieved_daily_pace,
    }
}

/// One month of the cumulative savings progress series.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    /// The calendar year of this entry.
    pub year: i32,
    /// The calendar month of this entry, 1-12.
    pub month: u8,
    /// Income minus expenses for just this month.
    pub savings: f64,
    /// The running savings total up to and including this month, floored at
    /// zero at each step.
    pub cumulative_savings: f64,
    /// `cumulative_savings / goal_amount` as a percentage, capped at 100.
    pub progress: f64,
}

/// Fold monthly savings deltas into a cumulative progress series.
///
/// `transactions` should cover the period since the goal was created. The
/// running total is floored at zero at each step, so a deficit in one month
/// does not drag later months below zero.
pub fn progress_series(transactions: &[Transaction], goal_amount: f64) -> Vec<MonthlyProgress> {
    let mut monthly_totals: HashMap<(i32, u8), (f64, f64)> = HashMap::new();

    for transaction in transactions {
        let key = (transaction.date.year(), u8::from(transaction.date.month()));
        let entry = monthly_totals.entry(key).or_insert((0.0, 0.0));

        match transaction.transaction_type {
            TransactionType::Income => entry.0 += transaction.amount,
            TransactionType::Expense => entry.1 += transaction.amount,
        }
    }

    let mut months: Vec<(i32, u8)> = monthly_totals.keys().copied().collect();
    months.sort();

    let mut cumulative = 0.0;
    months
        .into_iter()
        .map(|(year, month)| {
            let (income, expenses) = monthly_totals[&(year, month)];
            let savings = income - expenses;
            cumulative = (cumulative + savings).max(0.0);

            MonthlyProgress {
                year,
                month,
                savings,
                cumulative_savings: cumulative,
                progress: if goal_amount > 0.0 {
                    (cumulative / goal_amount * 100.0).min(100.0)
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// A suggested budget amount for one category.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecommendation {
    /// The category the recommendation applies to.
    pub category: String,
    /// The suggested monthly budget: the historical average plus a 10% buffer,
    /// rounded to the nearest whole amount.
    pub recommended_amount: f64,
    /// The average monthly spending observed in this category.
    pub historical_average: f64,
}

/// Suggest a budget per category from past spending.
///
/// Expenses are summed per `(category, year, month)` group and averaged over
/// the months in which the category saw any spending. There is no outlier
/// rejection and no seasonality modelling; the 10% buffer is the entire
/// safety margin.
pub fn recommend_budgets(past_transactions: &[Transaction]) -> Vec<BudgetRecommendation> {
    let mut monthly_sums: HashMap<(&str, i32, u8), f64> = HashMap::new();

    for transaction in past_transactions {
        if transaction.transaction_type != TransactionType::Expense {
            continue;
        }

        let key = (
            transaction.category.as_str(),
            transaction.date.year(),
            u8::from(transaction.date.month()),
        );
        *monthly_sums.entry(key).or_insert(0.0) += transaction.amount;
    }

    let mut per_category: HashMap<&str, (f64, u32)> = HashMap::new();
    for ((category, _, _), sum) in monthly_sums {
        let entry = per_category.entry(category).or_insert((0.0, 0));
        entry.0 += sum;
        entry.1 += 1;
    }

    let mut recommendations: Vec<BudgetRecommendation> = per_category
        .into_iter()
        .map(|(category, (total, month_count))| {
            let historical_average = total / f64::from(month_count);

            BudgetRecommendation {
                category: category.to_owned(),
                recommended_amount: (historical_average * 1.1).round(),
                historical_average,
            }
        })
        .collect();
    recommendations.sort_by(|a, b| a.category.cmp(&b.category));

    recommendations
}
