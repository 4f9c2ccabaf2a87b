//! Defines recurrence rules, the templates for monthly obligations, and their database queries.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    category::Category,
    database_id::RecurrenceRuleId,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

// ============================================================================
// MODELS
// ============================================================================

/// A template that produces one transaction per calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRule {
    /// The ID of the rule.
    pub id: RecurrenceRuleId,
    /// The description of each generated transaction.
    pub description: String,
    /// The amount of each generated transaction.
    pub amount: f64,
    /// Whether the generated transactions are income or expenses.
    pub type_: TransactionType,
    /// The category of each generated transaction.
    pub category: Category,
    /// The account each generated transaction belongs to.
    pub account_id: AccountId,
    /// The day of the month the transaction is due, 1 to 31.
    ///
    /// Days past the end of a short month roll over into the next month.
    pub day_of_month: u8,
    /// Only active rules generate transactions. Deactivation is permanent.
    pub active: bool,
    /// The due date of the most recently generated transaction.
    pub last_generated_date: Option<Date>,
}

impl RecurrenceRule {
    /// A builder for the pending, recurring transaction due on `date`.
    pub fn occurrence(&self, date: Date) -> TransactionBuilder {
        Transaction::build(self.amount, date, &self.description, self.account_id)
            .type_(self.type_)
            .category(self.category)
            .recurring(true)
    }
}

/// The fields needed to create a [RecurrenceRule].
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRuleBuilder {
    /// The description of each generated transaction.
    pub description: String,
    /// The amount of each generated transaction.
    pub amount: f64,
    /// Whether the generated transactions are income or expenses.
    pub type_: TransactionType,
    /// The category of each generated transaction.
    pub category: Category,
    /// The account each generated transaction belongs to.
    pub account_id: AccountId,
    /// The day of the month each transaction is due, 1 to 31.
    pub day_of_month: u8,
    /// The due date of the latest generated transaction.
    pub last_generated_date: Option<Date>,
}

impl RecurrenceRuleBuilder {
    /// A rule that repeats `transaction` on the same day every month.
    ///
    /// The transaction counts as the first occurrence, so it becomes the watermark.
    pub fn from_first_occurrence(transaction: &TransactionBuilder) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount,
            type_: transaction.type_,
            category: transaction.category,
            account_id: transaction.account_id,
            day_of_month: transaction.date.day(),
            last_generated_date: Some(transaction.date),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

type RowsAffected = usize;

const RECURRENCE_RULE_COLUMNS: &str = "id, description, amount, type, category, account_id, \
    day_of_month, active, last_generated_date";

/// Create the recurrence rule table and its index.
pub fn create_recurrence_rule_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurrence_rule (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL DEFAULT 'other',
                account_id INTEGER NOT NULL,
                day_of_month INTEGER NOT NULL CHECK (day_of_month BETWEEN 1 AND 31),
                active INTEGER NOT NULL DEFAULT 1,
                last_generated_date TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_recurrence_rule_active ON recurrence_rule(active);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with the recurrence rule columns to a [RecurrenceRule].
pub fn map_recurrence_rule_row(row: &Row) -> Result<RecurrenceRule, rusqlite::Error> {
    Ok(RecurrenceRule {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        type_: row.get(3)?,
        category: row.get(4)?,
        account_id: row.get(5)?,
        day_of_month: row.get(6)?,
        active: row.get(7)?,
        last_generated_date: row.get(8)?,
    })
}

/// Create an active recurrence rule.
///
/// # Errors
/// Returns [Error::InvalidAccount] if the account does not exist, or
/// [Error::SqlError] for other SQL errors, e.g. a day of month outside 1 to 31.
pub fn create_recurrence_rule(
    builder: &RecurrenceRuleBuilder,
    connection: &Connection,
) -> Result<RecurrenceRule, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO recurrence_rule
                (description, amount, type, category, account_id, day_of_month, last_generated_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {RECURRENCE_RULE_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                builder.description,
                builder.amount,
                builder.type_,
                builder.category,
                builder.account_id,
                builder.day_of_month,
                builder.last_generated_date,
            ],
            map_recurrence_rule_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(builder.account_id)),
            error => error.into(),
        })
}

/// Record `date` as the due date of the latest transaction generated by rule `id`.
///
/// # Errors
/// Returns [Error::UpdateMissingRecurrenceRule] if `id` does not refer to a rule.
pub fn set_recurrence_watermark(
    id: RecurrenceRuleId,
    date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected: RowsAffected = connection.execute(
        "UPDATE recurrence_rule SET last_generated_date = ?1 WHERE id = ?2",
        (date, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurrenceRule(id));
    }

    Ok(())
}

/// Stop rule `id` from generating any more transactions.
///
/// Deactivating an inactive rule is not an error.
///
/// # Errors
/// Returns [Error::UpdateMissingRecurrenceRule] if `id` does not refer to a rule.
pub fn deactivate_recurrence_rule(
    id: RecurrenceRuleId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected: RowsAffected =
        connection.execute("UPDATE recurrence_rule SET active = 0 WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurrenceRule(id));
    }

    Ok(())
}

/// Get the rules that still generate transactions, ordered by ID.
pub fn get_active_recurrence_rules(connection: &Connection) -> Result<Vec<RecurrenceRule>, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECURRENCE_RULE_COLUMNS} FROM recurrence_rule WHERE active = 1 ORDER BY id ASC"
        ))?
        .query_map([], map_recurrence_rule_row)?
        .map(|rule| rule.map_err(Error::from))
        .collect()
}

/// Get every rule, active ones first, then by day of month.
pub fn get_all_recurrence_rules(connection: &Connection) -> Result<Vec<RecurrenceRule>, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECURRENCE_RULE_COLUMNS} FROM recurrence_rule \
            ORDER BY active DESC, day_of_month ASC, id ASC"
        ))?
        .query_map([], map_recurrence_rule_row)?
        .map(|rule| rule.map_err(Error::from))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
