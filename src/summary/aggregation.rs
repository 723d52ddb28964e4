//! Reduces transactions to income, expense and per-category totals.
//!
//! Income is the sum of [Category::Income] amounts. Expenses are the sum of
//! the amounts of every other category except [Category::Ignore], so they are
//! negative. Rows with a category that is not known to this version of the
//! application are logged and left out.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::Category;

/// The parts of a transaction needed for totals.
///
/// The category is kept as the raw stored text so that a row with an unknown
/// category can be skipped instead of failing the whole query.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// When the transaction happened.
    pub date: Date,
    /// The signed amount, negative for expenses.
    pub amount: f64,
    /// The stored category name.
    pub category: String,
}

/// The money spent in one expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The display label of the category, e.g. "Groceries".
    pub name: &'static str,
    /// The amount spent as a positive number.
    pub total: f64,
    /// The chart color of the category.
    pub color: &'static str,
}

/// The totals for a period.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PeriodTotals {
    /// The sum of income amounts, zero or positive.
    pub income_total: f64,
    /// The sum of expense amounts, zero or negative.
    pub expenses_total: f64,
    /// `income_total + expenses_total`.
    pub profit: f64,
    /// Expense categories with a non-zero total, largest first.
    pub per_category_totals: Vec<CategoryTotal>,
}

/// The totals for one month of a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The month number, 1 for January.
    pub month: u8,
    /// The sum of income amounts in the month.
    pub income_total: f64,
    /// The sum of expense amounts in the month, zero or negative.
    pub expenses_total: f64,
    /// `income_total + expenses_total`.
    pub profit: f64,
}

fn parse_category(row: &SummaryRow) -> Option<Category> {
    row.category
        .parse()
        .inspect_err(|error| tracing::warn!("Skipping transaction dated {}: {error}", row.date))
        .ok()
}

/// Compute the income, expense and per-category totals of `rows`.
///
/// Categories in `per_category_totals` are sorted by descending total, with
/// ties kept in the order of [Category::EXPENSES].
pub fn summarize(rows: &[SummaryRow]) -> PeriodTotals {
    let mut income_total = 0.0;
    let mut expenses_total = 0.0;
    let mut category_sums: HashMap<Category, f64> = HashMap::new();

    for row in rows {
        let Some(category) = parse_category(row) else {
            continue;
        };

        match category {
            Category::Income => income_total += row.amount,
            Category::Ignore => {}
            category => {
                expenses_total += row.amount;
                *category_sums.entry(category).or_insert(0.0) += row.amount;
            }
        }
    }

    let mut per_category_totals: Vec<CategoryTotal> = Category::EXPENSES
        .iter()
        .filter_map(|category| {
            let total = -category_sums.get(category).copied()?;
            if total == 0.0 {
                return None;
            }

            let metadata = category.metadata();
            Some(CategoryTotal {
                name: metadata.label,
                total,
                color: metadata.color,
            })
        })
        .collect();

    // Stable sort keeps ties in display order.
    per_category_totals.sort_by(|a, b| b.total.total_cmp(&a.total));

    PeriodTotals {
        income_total,
        expenses_total,
        profit: income_total + expenses_total,
        per_category_totals,
    }
}

/// Compute the totals of each month of `year`, January first.
///
/// Always returns twelve entries. Rows from other years are ignored.
pub fn monthly_totals(year: i32, rows: &[SummaryRow]) -> Vec<MonthlyTotals> {
    let mut totals: Vec<MonthlyTotals> = (1..=12)
        .map(|month| MonthlyTotals {
            month,
            income_total: 0.0,
            expenses_total: 0.0,
            profit: 0.0,
        })
        .collect();

    for row in rows.iter().filter(|row| row.date.year() == year) {
        let Some(category) = parse_category(row) else {
            continue;
        };

        let month = &mut totals[usize::from(u8::from(row.date.month())) - 1];
        match category {
            Category::Income => month.income_total += row.amount,
            Category::Ignore => {}
            _ => month.expenses_total += row.amount,
        }
    }

    for month in &mut totals {
        month.profit = month.income_total + month.expenses_total;
    }

    totals
}
