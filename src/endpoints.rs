//! The URIs of the pages and API endpoints.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard showing a period's balances and transactions.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for creating a new entry.
pub const NEW_ENTRY_VIEW: &str = "/entries/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page listing recurring entries.
pub const RECURRENCES_VIEW: &str = "/recurrences";
/// The page listing accounts.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for importing transactions from CSV files.
pub const IMPORT_VIEW: &str = "/import";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create an entry, which may expand into several transactions.
pub const ENTRIES_API: &str = "/api/entries";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to toggle a transaction between pending and paid.
pub const TRANSACTION_STATUS: &str = "/api/transactions/{transaction_id}/status";
/// The route to stop a recurring entry from generating transactions.
pub const DEACTIVATE_RECURRENCE: &str = "/api/recurrences/{rule_id}/deactivate";
/// The route to create an account.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route to upload CSV files for importing transactions.
pub const IMPORT_API: &str = "/api/import";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{transaction_id}' in '/api/transactions/{transaction_id}'. Only the first
/// parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the original `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::NEW_ENTRY_VIEW,
            endpoints::RECURRENCES_VIEW,
            endpoints::ACCOUNTS_VIEW,
            endpoints::IMPORT_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::ENTRIES_API,
            endpoints::ACCOUNTS_API,
            endpoints::IMPORT_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn formatted_endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::TRANSACTION,
            endpoints::TRANSACTION_STATUS,
            endpoints::DEACTIVATE_RECURRENCE,
        ] {
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 1));
        }
    }

    #[test]
    fn replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::TRANSACTION_STATUS, 42),
            "/api/transactions/42/status"
        );
        assert_eq!(
            format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, 7),
            "/transactions/7/edit"
        );
    }

    #[test]
    fn returns_path_without_parameter_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::DASHBOARD_VIEW, 1),
            endpoints::DASHBOARD_VIEW
        );
    }
}
