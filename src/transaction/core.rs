//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, account::AccountId, category::Category, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in or went out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    #[default]
    Expense,
}

impl TransactionType {
    /// The identifier stored in the database and used in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// +1 for income and -1 for expenses.
    pub fn sign(self) -> f64 {
        match self {
            TransactionType::Income => 1.0,
            TransactionType::Expense => -1.0,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_lowercase().as_str() {
            "income" | "receita" | "credit" => Ok(TransactionType::Income),
            "expense" | "despesa" | "debit" => Ok(TransactionType::Expense),
            _ => Err(()),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Whether a transaction has been settled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Not settled yet.
    #[default]
    Pending,
    /// Settled.
    Paid,
}

impl TransactionStatus {
    /// The identifier stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
        }
    }

    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            TransactionStatus::Pending => TransactionStatus::Paid,
            TransactionStatus::Paid => TransactionStatus::Pending,
        }
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "pending" => Ok(TransactionStatus::Pending),
            "paid" => Ok(TransactionStatus::Paid),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub type_: TransactionType,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// When the money is due or was moved.
    pub date: Date,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
    /// Whether the transaction was generated from a recurring entry.
    pub is_recurring: bool,
    /// The hash of the CSV row this transaction was imported from, if any.
    pub import_id: Option<i64>,
}

impl Transaction {
    /// Create a new pending expense.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        date: Date,
        description: &str,
        account_id: AccountId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            description: description.to_owned(),
            amount,
            type_: TransactionType::default(),
            category: Category::default(),
            date,
            account_id,
            status: TransactionStatus::default(),
            is_recurring: false,
            import_id: None,
        }
    }

    /// The amount with the sign of the transaction type, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        self.type_.sign() * self.amount
    }

    /// Whether the transaction is a pending expense that was due before `today`.
    ///
    /// Lateness is never stored, it changes as time passes.
    pub fn is_late(&self, today: Date) -> bool {
        self.status == TransactionStatus::Pending
            && self.type_ == TransactionType::Expense
            && self.date < today
    }
}

/// A builder for creating [Transaction] instances.
///
/// The defaults are a pending, non-recurring expense in [Category::Other].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A text description of what the transaction is for.
    pub description: String,
    /// The amount of money, greater than zero.
    pub amount: f64,
    /// Whether the money is earned or spent.
    pub type_: TransactionType,
    /// The category of the transaction.
    pub category: Category,
    /// When the money is due or was moved.
    pub date: Date,
    /// The account the money moves in or out of.
    pub account_id: AccountId,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
    /// Whether the transaction was generated from a recurring entry.
    pub is_recurring: bool,
    /// Used to skip rows that were already imported from a CSV file.
    pub import_id: Option<i64>,
}

impl TransactionBuilder {
    /// Set whether the transaction is income or an expense.
    pub fn type_(mut self, type_: TransactionType) -> Self {
        self.type_ = type_;
        self
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the status.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the transaction as generated from a recurring entry.
    pub fn recurring(mut self, is_recurring: bool) -> Self {
        self.is_recurring = is_recurring;
        self
    }

    /// Set the import ID of the CSV row the transaction came from.
    pub fn import_id(mut self, import_id: Option<i64>) -> Self {
        self.import_id = import_id;
        self
    }
}

/// The fields of a transaction that can be changed by editing it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// The new description.
    pub description: String,
    /// The new amount, greater than zero.
    pub amount: f64,
    /// The new type.
    pub type_: TransactionType,
    /// The new category.
    pub category: Category,
    /// The new date.
    pub date: Date,
    /// The new account.
    pub account_id: AccountId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

type RowsAffected = usize;

/// The columns read by [map_transaction_row], in order.
pub const TRANSACTION_COLUMNS: &str =
    "id, description, amount, type, category, date, account_id, status, is_recurring, import_id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAccount] if the account ID does not refer to a real account,
/// - or [Error::DuplicateImportId] if a transaction with the specified import ID already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: &TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare_cached(&format!(
            "INSERT INTO \"transaction\"
                (description, amount, type, category, date, account_id, status, is_recurring, import_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                builder.description,
                builder.amount,
                builder.type_,
                builder.category,
                builder.date,
                builder.account_id,
                builder.status,
                builder.is_recurring,
                builder.import_id,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(builder.account_id)),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateImportId,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite the editable fields of the transaction `id`.
///
/// The status, recurring flag and import ID are left unchanged.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// [Error::InvalidAccount] if the account does not exist, or [Error::SqlError].
pub fn update_transaction(
    id: TransactionId,
    update: &TransactionUpdate,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected: RowsAffected = connection
        .execute(
            "UPDATE \"transaction\"
             SET description = ?1, amount = ?2, type = ?3, category = ?4, date = ?5, account_id = ?6
             WHERE id = ?7",
            rusqlite::params![
                update.description,
                update.amount,
                update.type_,
                update.category,
                update.date,
                update.account_id,
                id,
            ],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(update.account_id)),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction(id));
    }

    Ok(())
}

/// Set the status of the transaction `id`.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if `id` does not refer to a transaction.
pub fn set_transaction_status(
    id: TransactionId,
    status: TransactionStatus,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected: RowsAffected = connection.execute(
        "UPDATE \"transaction\" SET status = ?1 WHERE id = ?2",
        (status, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction(id));
    }

    Ok(())
}

/// Delete the transaction `id`.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if `id` does not refer to a transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected: RowsAffected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction(id));
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL DEFAULT 'other',
                date TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'paid')),
                is_recurring INTEGER NOT NULL DEFAULT 0,
                import_id INTEGER UNIQUE,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    // The dashboard selects transactions by date range.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [TRANSACTION_COLUMNS] to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        type_: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
        account_id: row.get(6)?,
        status: row.get(7)?,
        is_recurring: row.get(8)?,
        import_id: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
