//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The JSON endpoints for listing, editing and exporting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export;
mod form;
mod list_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionState, collapse_whitespace, create_transaction,
    create_transaction_table, get_transaction_years, get_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{update_category_endpoint, update_transaction_endpoint};
pub use export::export_transactions_endpoint;
pub use form::{CategoryForm, TransactionForm, UpdateTransactionForm};
pub use list_endpoint::get_transactions_endpoint;
