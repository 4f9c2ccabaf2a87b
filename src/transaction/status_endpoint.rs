//! Defines the endpoint for marking a transaction as paid or pending.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    dashboard::{DashboardView, dashboard_url},
    database_id::TransactionId,
    period::Period,
    store::{LedgerStore, SQLiteLedgerStore},
    transaction::edit_page::TransactionState,
};

/// A route handler that flips a transaction between pending and paid.
pub async fn toggle_transaction_status_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = SQLiteLedgerStore::new(&connection).atomically(|store| {
        let transaction = store
            .get_transaction(transaction_id)
            .map_err(|error| match error {
                Error::NotFound => Error::UpdateMissingTransaction(transaction_id),
                error => error,
            })?;
        let status = transaction.status.toggled();
        tracing::debug!("marking transaction {transaction_id} as {}", status.as_str());

        store.set_transaction_status(transaction_id, status)?;
        Ok(transaction.date)
    });

    match result {
        Ok(date) => (
            HxRedirect(dashboard_url(Period::containing(date), DashboardView::List)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not change status of transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
