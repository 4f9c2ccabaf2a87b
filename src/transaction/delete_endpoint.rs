//! Defines the endpoint for deleting a transaction.

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

/// A route handler for deleting a transaction.
///
/// Redirects the client to the dashboard for the month the transaction was in.
/// Deleting a transaction generated by a recurring entry does not stop the
/// entry from recurring.
pub async fn delete_transaction_endpoint(
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
                Error::NotFound => Error::DeleteMissingTransaction(transaction_id),
                error => error,
            })?;

        store.delete_transaction(transaction_id)?;
        Ok(transaction.date)
    });

    match result {
        Ok(date) => (
            HxRedirect(dashboard_url(Period::containing(date), DashboardView::List)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{assert_alert, assert_hx_redirect, get_test_connection, must_create_account},
        transaction::{Transaction, create_transaction, edit_page::TransactionState, get_transaction},
    };

    use super::delete_transaction_endpoint;

    #[tokio::test]
    async fn deletes_transaction() {
        let connection = get_test_connection();
        let account = must_create_account("Checking", &connection);
        let transaction = create_transaction(
            &Transaction::build(30.0, date!(2025 - 09 - 15), "Gym", account.id),
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(State(state.clone()), Path(transaction.id)).await;

        assert_hx_redirect(&response, "/dashboard?period=2025-09");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_transaction_endpoint(State(state), Path(3)).await;

        assert_alert(response, StatusCode::NOT_FOUND, "Could not delete transaction").await;
    }
}
