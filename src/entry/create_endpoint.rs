//! Defines the endpoint for creating a new entry.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error,
    dashboard::{DashboardView, dashboard_url},
    entry::{EntryForm, EntryInput, create_entry, create_page::EntryState},
    period::Period,
    store::SQLiteLedgerStore,
};

/// A route handler for creating a new entry.
///
/// On success the client is redirected to the dashboard for the month of the
/// entry (or of its first installment).
pub async fn create_entry_endpoint(
    State(state): State<EntryState>,
    Form(form): Form<EntryForm>,
) -> Response {
    let input = match EntryInput::try_from(form) {
        Ok(input) => input,
        Err(error) => {
            tracing::debug!("rejected entry form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_entry(&SQLiteLedgerStore::new(&connection), &input) {
        Ok(_) => (
            HxRedirect(dashboard_url(
                Period::containing(input.date),
                DashboardView::List,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            if error.is_validation_error() {
                tracing::debug!("rejected entry {input:?}: {error}");
            } else {
                tracing::error!("could not create entry {input:?}: {error}");
            }

            error.into_alert_response()
        }
    }
}
