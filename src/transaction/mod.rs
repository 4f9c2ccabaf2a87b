//! Transactions: the individual expenses and incomes on the ledger.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and settling transactions
//! - Handlers for editing, deleting and toggling the status of a transaction

mod core;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod query;
mod status_endpoint;

pub use core::{
    TRANSACTION_COLUMNS, Transaction, TransactionBuilder, TransactionStatus, TransactionType,
    TransactionUpdate, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, map_transaction_row, set_transaction_status, update_transaction,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{EditTransactionForm, edit_transaction_endpoint};
pub use edit_page::{TransactionState, get_edit_transaction_page};
pub use query::{SortOrder, TransactionQuery, query_transactions};
pub use status_endpoint::toggle_transaction_status_endpoint;
