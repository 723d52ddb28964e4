//! HTTP handlers for period totals and charts.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Error,
    auth::UserID,
    period::{Period, PeriodQuery},
    summary::{
        MonthlyTotals, PeriodTotals, SummaryRow, expenses_chart, get_summary_rows,
        monthly_totals, summarize,
    },
    timezone::local_today,
};

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The year to compute monthly totals for. Defaults to the current year.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// The calendar year, e.g. 2025.
    pub year: Option<i32>,
}

fn load_rows(
    state: &SummaryState,
    user_id: UserID,
    period: Option<Period>,
) -> Result<Vec<SummaryRow>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_summary_rows(user_id, period, &connection)
}

/// Income, expense and per-category totals for a month or year.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PeriodTotals>, Error> {
    let period = query.to_period()?;
    let rows = load_rows(&state, user_id, period)?;

    Ok(Json(summarize(&rows)))
}

/// The totals of each month of a year.
pub async fn get_monthly_totals_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<MonthlyTotals>>, Error> {
    let year = match query.year {
        Some(year) => year,
        None => local_today(&state.local_timezone)?.year(),
    };

    let rows = load_rows(&state, user_id, Some(Period::Year(year)))?;

    Ok(Json(monthly_totals(year, &rows)))
}

/// ECharts options for the expense distribution of a month or year.
pub async fn get_expenses_chart_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Value>, Error> {
    let period = query.to_period()?;
    let rows = load_rows(&state, user_id, period)?;
    let chart = expenses_chart(&summarize(&rows));

    let options = serde_json::to_value(&chart)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(Json(options))
}
