//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{create_account_endpoint, get_accounts_page},
    csv_import::{get_import_page, import_transactions},
    dashboard::get_dashboard_page,
    endpoints,
    entry::{create_entry_endpoint, get_new_entry_page},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    recurrence::{deactivate_recurrence_endpoint, get_recurrences_page},
    transaction::{
        delete_transaction_endpoint, edit_transaction_endpoint, get_edit_transaction_page,
        toggle_transaction_status_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::NEW_ENTRY_VIEW, get(get_new_entry_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::RECURRENCES_VIEW, get(get_recurrences_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::IMPORT_VIEW, get(get_import_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes respond with alerts on errors and the HX-REDIRECT header on success.
    let api_routes = Router::new()
        .route(endpoints::ENTRIES_API, post(create_entry_endpoint))
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_STATUS,
            post(toggle_transaction_status_endpoint),
        )
        .route(
            endpoints::DEACTIVATE_RECURRENCE,
            post(deactivate_recurrence_endpoint),
        )
        .route(endpoints::ACCOUNTS_API, post(create_account_endpoint))
        .route(endpoints::IMPORT_API, post(import_transactions));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
