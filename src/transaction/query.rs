//! Filtered and sorted selection of transactions.

use std::ops::RangeInclusive;

use rusqlite::{Connection, ToSql, params_from_iter};
use time::Date;

use crate::Error;

use super::core::{TRANSACTION_COLUMNS, Transaction, TransactionStatus, map_transaction_row};

/// The order to sort transactions in a query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[default]
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// Defines which transactions to select and how to order them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions within this inclusive date range, or all dates if `None`.
    pub date_range: Option<RangeInclusive<Date>>,
    /// Include only transactions with this status, or any status if `None`.
    pub status: Option<TransactionStatus>,
    /// The order to sort transactions by date.
    pub sort_date: SortOrder,
}

/// Get the transactions matching `query`.
///
/// Transactions on the same date are ordered by ID so the order stays stable after edits.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped to a [Transaction].
pub fn query_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut where_clauses = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if let Some(date_range) = &query.date_range {
        where_clauses.push(format!(
            "date BETWEEN ?{} AND ?{}",
            params.len() + 1,
            params.len() + 2
        ));
        params.push(date_range.start());
        params.push(date_range.end());
    }

    if let Some(status) = &query.status {
        where_clauses.push(format!("status = ?{}", params.len() + 1));
        params.push(status);
    }

    let where_clause = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let order_clause = match query.sort_date {
        SortOrder::Ascending => "ORDER BY date ASC, id ASC",
        SortOrder::Descending => "ORDER BY date DESC, id ASC",
    };

    let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_clause} {order_clause}");

    connection
        .prepare(&sql)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
