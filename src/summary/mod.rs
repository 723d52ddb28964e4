//! Income, expense and per-category totals for a period.
//!
//! The aggregation functions are pure and work on [SummaryRow]s read from the
//! database, so they can be tested without a connection.

mod aggregation;
mod charts;
mod handlers;
mod rows;

pub use aggregation::{
    CategoryTotal, MonthlyTotals, PeriodTotals, SummaryRow, monthly_totals, summarize,
};
pub use charts::expenses_chart;
pub use handlers::{get_expenses_chart_endpoint, get_monthly_totals_endpoint, get_summary_endpoint};
pub use rows::get_summary_rows;
