//! The closed set of categories a transaction can belong to.
//!
//! Every transaction has exactly one category. Display metadata (label and
//! chart color) lives in a single lookup table, [Category::metadata].

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Recurring bills, e.g. rent, power, phone.
    Bills,
    /// Movies, concerts, subscriptions.
    Entertainment,
    /// Supermarkets and food shopping.
    Groceries,
    /// Transactions that should not count towards income or expenses, e.g.
    /// transfers between a user's own accounts.
    Ignore,
    /// Money coming in.
    Income,
    /// Eating out.
    Restaurant,
    /// Fuel, public transport, taxis.
    Transportation,
    /// Travel and holidays.
    Vacation,
    /// The category of a transaction that has not been categorized yet.
    #[default]
    Uncategorized,
}

/// How a category is displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMetadata {
    /// The human readable name of the category.
    pub label: &'static str,
    /// The hex color used for the category in charts.
    pub color: &'static str,
}

impl Category {
    /// Every category.
    pub const ALL: [Category; 9] = [
        Category::Bills,
        Category::Entertainment,
        Category::Groceries,
        Category::Restaurant,
        Category::Transportation,
        Category::Vacation,
        Category::Uncategorized,
        Category::Income,
        Category::Ignore,
    ];

    /// The categories that count as expenses, in display order.
    ///
    /// This order is used to break ties when sorting categories by total.
    pub const EXPENSES: [Category; 7] = [
        Category::Bills,
        Category::Entertainment,
        Category::Groceries,
        Category::Restaurant,
        Category::Transportation,
        Category::Vacation,
        Category::Uncategorized,
    ];

    /// The lowercase name used for serialization and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bills => "bills",
            Category::Entertainment => "entertainment",
            Category::Groceries => "groceries",
            Category::Ignore => "ignore",
            Category::Income => "income",
            Category::Restaurant => "restaurant",
            Category::Transportation => "transportation",
            Category::Vacation => "vacation",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// The label and chart color for the category.
    pub fn metadata(&self) -> CategoryMetadata {
        let (label, color) = match self {
            Category::Bills => ("Bills", "#004CA3"),
            Category::Entertainment => ("Entertainment", "#8A51A5"),
            Category::Groceries => ("Groceries", "#CB5E99"),
            Category::Restaurant => ("Restaurant", "#F47B89"),
            Category::Transportation => ("Transportation", "#FFA47E"),
            Category::Vacation => ("Vacation", "#FFD286"),
            Category::Uncategorized => ("Uncategorized", "#FFFFA6"),
            Category::Income => ("Income", "#2F9E44"),
            Category::Ignore => ("Ignore", "#868E96"),
        };

        CategoryMetadata { label, color }
    }

    /// Whether transactions in this category count towards expenses.
    pub fn is_expense(&self) -> bool {
        !matches!(self, Category::Income | Category::Ignore)
    }

    /// Give `amount` the sign implied by the category.
    ///
    /// Income is always positive and expenses are always negative. Ignored
    /// transactions keep their sign.
    pub fn normalize_amount(&self, amount: f64) -> f64 {
        match self {
            Category::Ignore => amount,
            Category::Income => amount.abs(),
            _ => -amount.abs(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
