//! Defines the endpoint for creating a new account.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    account::{accounts_page::AccountState, create_account},
    endpoints,
};

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account name, e.g. "Checking".
    pub name: String,
}

/// A route handler for creating a new account, redirects to the accounts view on success.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_account(&form.name, &connection) {
        Ok(account) => {
            tracing::info!("created account {} ({})", account.id, account.name);

            (
                HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("could not create account {:?}: {error}", form.name);
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;

    use crate::{
        account::{accounts_page::AccountState, get_all_accounts},
        endpoints,
        test_utils::{assert_alert, assert_hx_redirect, get_test_connection, must_create_account},
    };

    use super::{AccountForm, create_account_endpoint};

    fn form(name: &str) -> Form<AccountForm> {
        Form(AccountForm {
            name: name.to_owned(),
        })
    }

    #[tokio::test]
    async fn creates_account_and_redirects() {
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = create_account_endpoint(State(state.clone()), form("  Savings ")).await;

        assert_hx_redirect(&response, endpoints::ACCOUNTS_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let names: Vec<String> = get_all_accounts(&connection)
            .unwrap()
            .into_iter()
            .map(|account| account.name)
            .collect();
        assert_eq!(names, vec!["Savings"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_name() {
        let connection = get_test_connection();
        must_create_account("Savings", &connection);
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = create_account_endpoint(State(state), form("Savings")).await;

        assert_alert(response, StatusCode::BAD_REQUEST, "already exists").await;
    }

    #[tokio::test]
    async fn rejects_empty_name() {
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = create_account_endpoint(State(state), form("   ")).await;

        assert_alert(response, StatusCode::BAD_REQUEST, "cannot be empty").await;
    }
}
