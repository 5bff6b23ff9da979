//! The monthly statistics overview endpoint.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    calendar::{month_window, resolve_month},
    response::ApiResponse,
    stats::aggregation::{DailySpend, monthly_overview},
    transaction::{TransactionQuery, query_transactions},
};

/// The query parameters accepted by the statistics endpoints.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    /// The month to aggregate, defaulting to the current month.
    pub month: Option<u8>,
    /// The year to aggregate, defaulting to the current year.
    pub year: Option<i32>,
}

/// The income/expense totals block of the overview response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of income amounts.
    pub income: f64,
    /// Sum of expense amounts.
    pub expenses: f64,
    /// Income minus expenses.
    pub net_savings: f64,
    /// Net savings as a percentage of income, 0 without income.
    pub savings_rate: f64,
}

/// The response body for the statistics overview endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    /// The income/expense totals for the month.
    pub totals: Totals,
    /// Total expenses per category.
    pub category_spending: HashMap<String, f64>,
    /// Total expenses per day, ascending, for the spending trend chart.
    pub daily_spending: Vec<DailySpend>,
    /// The number of days in the month without any expense, for the calendar
    /// heat map.
    pub no_spend_days: u32,
    /// The number of days in the month.
    pub days_in_month: u32,
    /// The number of days with at least one expense.
    pub expense_days: u32,
}

/// Handle requests for the monthly statistics overview.
pub async fn get_stats_overview(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<StatsParams>,
) -> Result<Json<ApiResponse<StatsOverview>>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let (year, month) = resolve_month(params.month, params.year, today);
    let (month_start, month_end) = month_window(year, month)?;

    let transactions = {
        let connection = state.lock_connection()?;

        query_transactions(
            &TransactionQuery {
                date_from: Some(month_start),
                date_before: Some(month_end),
                ..TransactionQuery::for_user(claims.sub)
            },
            &connection,
        )?
    };

    let overview = monthly_overview(&transactions, month_start, month_end);

    Ok(Json(ApiResponse::new(StatsOverview {
        totals: Totals {
            income: overview.total_income,
            expenses: overview.total_expenses,
            net_savings: overview.net_savings,
            savings_rate: overview.savings_rate,
        },
        category_spending: overview.category_spending,
        daily_spending: overview.daily_spending,
        no_spend_days: overview.no_spend_days,
        days_in_month: overview.days_in_month,
        expense_days: overview.expense_days,
    })))
}

#[cfg(test)]
mod stats_overview_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, pagination::PaginationConfig};

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "42", PaginationConfig::default())
            .expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    async fn register_and_get_token(server: &TestServer) -> String {
        let response = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Foo Bar",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("Register response should contain a token")
            .to_owned()
    }

    async fn post_transaction(
        server: &TestServer,
        token: &str,
        amount: f64,
        transaction_type: &str,
        category: &str,
        date: &str,
    ) {
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "amount": amount,
                "type": transaction_type,
                "category": category,
                "date": date,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn overview_reports_totals_and_no_spend_days() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;
        post_transaction(&server, &token, 100.0, "income", "Salary", "2024-01-01").await;
        post_transaction(&server, &token, 40.0, "expense", "Food", "2024-01-01").await;
        post_transaction(&server, &token, 20.0, "expense", "Food", "2024-01-03").await;

        let response = server
            .get(&format!("{}?month=1&year=2024", endpoints::STATS_OVERVIEW))
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["data"]["totals"],
            json!({
                "income": 100.0,
                "expenses": 60.0,
                "netSavings": 40.0,
                "savingsRate": 40.0,
            })
        );
        assert_eq!(body["data"]["categorySpending"], json!({"Food": 60.0}));
        assert_eq!(
            body["data"]["dailySpending"],
            json!([
                {"date": "2024-01-01", "amount": 40.0},
                {"date": "2024-01-03", "amount": 20.0},
            ])
        );
        assert_eq!(body["data"]["noSpendDays"], json!(29));
        assert_eq!(body["data"]["daysInMonth"], json!(31));
        assert_eq!(body["data"]["expenseDays"], json!(2));
    }

    #[tokio::test]
    async fn overview_ignores_other_months_and_other_users() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;
        post_transaction(&server, &token, 40.0, "expense", "Food", "2024-02-10").await;

        let other = server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Bar Baz",
                "email": "bar@baz.qux",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .json::<Value>()["data"]["token"]
            .as_str()
            .unwrap()
            .to_owned();
        post_transaction(&server, &other, 999.0, "expense", "Food", "2024-01-15").await;

        let response = server
            .get(&format!("{}?month=1&year=2024", endpoints::STATS_OVERVIEW))
            .authorization_bearer(token)
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["data"]["totals"]["expenses"], json!(0.0));
        assert_eq!(body["data"]["noSpendDays"], json!(31));
    }

    #[tokio::test]
    async fn overview_rejects_invalid_month() {
        let server = get_test_server();
        let token = register_and_get_token(&server).await;

        server
            .get(&format!("{}?month=13&year=2024", endpoints::STATS_OVERVIEW))
            .authorization_bearer(token)
            .await
            .assert_status_bad_request();
    }
}
