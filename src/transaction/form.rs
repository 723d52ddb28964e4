//! Validation of the transaction details sent by the client.

use serde::Deserialize;
use time::Date;

use crate::{
    Category, Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, collapse_whitespace},
};

/// The details of a transaction entered by hand.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// When the transaction happened, e.g. "2025-01-31".
    pub date: Date,
    /// What the transaction was for.
    pub name: String,
    /// The lowercase category name, e.g. "groceries".
    pub category: String,
    /// The amount as typed by the user, e.g. "-12.50". The sign is ignored.
    pub amount: String,
}

/// The details of an existing transaction to replace.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTransactionForm {
    /// The transaction to replace.
    pub transaction_id: TransactionId,
    /// The new date.
    pub date: Date,
    /// The new name.
    pub name: String,
    /// The new category name.
    pub category: String,
    /// The new amount as typed by the user.
    pub amount: String,
}

impl From<UpdateTransactionForm> for TransactionForm {
    fn from(form: UpdateTransactionForm) -> Self {
        Self {
            date: form.date,
            name: form.name,
            category: form.category,
            amount: form.amount,
        }
    }
}

/// A new category for a single transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    /// The transaction to recategorize.
    pub transaction_id: TransactionId,
    /// The new category name.
    pub category: String,
}

impl TransactionForm {
    /// Check the form and turn it into a builder for a user created transaction.
    ///
    /// # Errors
    ///
    /// This function will return an:
    /// - [Error::EmptyTransactionName] if the name is blank,
    /// - [Error::FutureDate] if the date is after `today`,
    /// - [Error::UnknownCategory] if the category is not one of [Category::ALL],
    /// - [Error::InvalidAmount] or [Error::ZeroAmount] if the amount is not a non-zero number.
    pub fn validate(self, today: Date) -> Result<TransactionBuilder, Error> {
        let name = collapse_whitespace(&self.name);
        if name.is_empty() {
            return Err(Error::EmptyTransactionName);
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        let category: Category = self.category.parse()?;
        let amount = parse_amount(&self.amount)?;

        Ok(Transaction::build(self.date, &name, amount)
            .category(category)
            .user_created(true))
    }
}

/// Parse the magnitude of an amount typed by the user.
///
/// The sign is dropped since it is derived from the category.
///
/// # Errors
/// Returns an [Error::InvalidAmount] if `raw` is not a finite number and an
/// [Error::ZeroAmount] if it is zero.
pub fn parse_amount(raw: &str) -> Result<f64, Error> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(raw.to_owned()))?;

    if !amount.is_finite() {
        return Err(Error::InvalidAmount(raw.to_owned()));
    }

    if amount == 0.0 {
        return Err(Error::ZeroAmount);
    }

    Ok(amount.abs())
}
