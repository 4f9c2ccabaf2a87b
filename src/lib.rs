//! Sentinel Ledger is a web app for tracking personal finances month by month.
//!
//! Entries can be one-off, split into monthly installments or repeated every
//! month. Each calendar month is shown as a dashboard with balances, pending
//! payments and category breakdowns.
//!
//! This library provides an HTTP server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod amount;
mod app_state;
mod category;
mod csv_import;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod entry;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod period;
mod recurrence;
mod routing;
mod store;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use account::{Account, AccountId, create_account};
pub use app_state::{AppState, DEFAULT_HISTORY_MONTHS, DashboardConfig};
pub use category::Category;
pub use db::initialize as initialize_db;
pub use entry::{EntryInput, create_entry};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use recurrence::{MaterializeReport, materialize_recurrences};
pub use routing::build_router;
pub use store::{LedgerStore, SQLiteLedgerStore};
pub use timezone::local_today;
pub use transaction::{TransactionStatus, TransactionType};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
