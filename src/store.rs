//! The ledger store, the seam between the recurring entry and entry expansion
//! logic and the database.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::{Account, get_all_accounts},
    database_id::{RecurrenceRuleId, TransactionId},
    recurrence::{
        RecurrenceRule, RecurrenceRuleBuilder, create_recurrence_rule, deactivate_recurrence_rule,
        get_active_recurrence_rules, set_recurrence_watermark,
    },
    transaction::{
        Transaction, TransactionBuilder, TransactionQuery, TransactionStatus, TransactionUpdate,
        create_transaction, delete_transaction, get_transaction, query_transactions,
        set_transaction_status, update_transaction,
    },
};

/// Durable storage for transactions, recurrence rules and accounts.
pub trait LedgerStore {
    /// Run `operation` so that either all of its writes are kept or none are.
    ///
    /// The writes are discarded if `operation` returns an error.
    fn atomically<T>(&self, operation: impl FnOnce(&Self) -> Result<T, Error>) -> Result<T, Error>;

    /// Insert the transactions in order, returning them with their new IDs.
    fn insert_transactions(&self, builders: &[TransactionBuilder]) -> Result<Vec<Transaction>, Error>;

    /// Get a transaction by its ID, [Error::NotFound] if there is none.
    fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Overwrite the editable fields of a transaction.
    fn update_transaction(&self, id: TransactionId, update: &TransactionUpdate) -> Result<(), Error>;

    /// Mark a transaction as paid or pending.
    fn set_transaction_status(&self, id: TransactionId, status: TransactionStatus) -> Result<(), Error>;

    /// Remove a transaction.
    fn delete_transaction(&self, id: TransactionId) -> Result<(), Error>;

    /// Retrieve transactions in the way defined by `query`.
    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Insert a recurrence rule, returning it with its new ID.
    fn insert_recurrence_rule(&self, builder: &RecurrenceRuleBuilder) -> Result<RecurrenceRule, Error>;

    /// Record the due date of the latest transaction generated by a rule.
    fn set_recurrence_watermark(&self, id: RecurrenceRuleId, date: Date) -> Result<(), Error>;

    /// Stop a rule from generating transactions. This cannot be undone.
    fn deactivate_recurrence_rule(&self, id: RecurrenceRuleId) -> Result<(), Error>;

    /// The rules that still generate transactions.
    fn query_active_recurrence_rules(&self) -> Result<Vec<RecurrenceRule>, Error>;

    /// Every account, ordered by name.
    fn query_accounts(&self) -> Result<Vec<Account>, Error>;
}

/// A [LedgerStore] backed by a SQLite connection.
#[derive(Debug, Clone, Copy)]
pub struct SQLiteLedgerStore<'c> {
    connection: &'c Connection,
}

impl<'c> SQLiteLedgerStore<'c> {
    /// A store that reads and writes through `connection`.
    pub fn new(connection: &'c Connection) -> Self {
        Self { connection }
    }
}

const SAVEPOINT: &str = "ledger_store";

impl LedgerStore for SQLiteLedgerStore<'_> {
    fn atomically<T>(&self, operation: impl FnOnce(&Self) -> Result<T, Error>) -> Result<T, Error> {
        // Savepoints nest, so this also works inside an open SQLite transaction.
        self.connection
            .execute_batch(&format!("SAVEPOINT {SAVEPOINT}"))?;

        match operation(self) {
            Ok(value) => {
                self.connection
                    .execute_batch(&format!("RELEASE {SAVEPOINT}"))?;
                Ok(value)
            }
            Err(error) => {
                self.connection
                    .execute_batch(&format!("ROLLBACK TO {SAVEPOINT}; RELEASE {SAVEPOINT}"))
                    .inspect_err(|rollback_error| {
                        tracing::error!("could not roll back after {error}: {rollback_error}")
                    })?;
                Err(error)
            }
        }
    }

    fn insert_transactions(&self, builders: &[TransactionBuilder]) -> Result<Vec<Transaction>, Error> {
        builders
            .iter()
            .map(|builder| create_transaction(builder, self.connection))
            .collect()
    }

    fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        get_transaction(id, self.connection)
    }

    fn update_transaction(&self, id: TransactionId, update: &TransactionUpdate) -> Result<(), Error> {
        update_transaction(id, update, self.connection)
    }

    fn set_transaction_status(&self, id: TransactionId, status: TransactionStatus) -> Result<(), Error> {
        set_transaction_status(id, status, self.connection)
    }

    fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        delete_transaction(id, self.connection)
    }

    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        query_transactions(query, self.connection)
    }

    fn insert_recurrence_rule(&self, builder: &RecurrenceRuleBuilder) -> Result<RecurrenceRule, Error> {
        create_recurrence_rule(builder, self.connection)
    }

    fn set_recurrence_watermark(&self, id: RecurrenceRuleId, date: Date) -> Result<(), Error> {
        set_recurrence_watermark(id, date, self.connection)
    }

    fn deactivate_recurrence_rule(&self, id: RecurrenceRuleId) -> Result<(), Error> {
        deactivate_recurrence_rule(id, self.connection)
    }

    fn query_active_recurrence_rules(&self) -> Result<Vec<RecurrenceRule>, Error> {
        get_active_recurrence_rules(self.connection)
    }

    fn query_accounts(&self) -> Result<Vec<Account>, Error> {
        get_all_accounts(self.connection)
    }
}
