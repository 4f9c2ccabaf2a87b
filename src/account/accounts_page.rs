//! Lists the accounts money is kept in and the form for adding one.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the accounts page and creating accounts.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for reading and creating accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the accounts and a form for creating a new one.
pub async fn get_accounts_page(State(state): State<AccountState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(accounts_view(&accounts).into_response())
}

fn create_account_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::ACCOUNTS_API)
            hx-target-error="#alert-container"
            class="flex flex-col sm:flex-row gap-4 items-end w-full"
        {
            div class="flex-1 w-full"
            {
                label for="name" class=(FORM_LABEL_STYLE) { "New Account" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Checking, Wallet, Credit Card"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="w-full sm:w-auto"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Account" }
            }
        }
    }
}

fn accounts_view(accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full max-w-2xl"
            {
                h1 class="text-xl font-bold" { "Accounts" }

                (create_account_form())

                @if accounts.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No accounts yet. Add one above before creating entries."
                    }
                } @else {
                    div class="overflow-x-auto rounded-lg shadow"
                    {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                }
                            }

                            tbody
                            {
                                @for account in accounts {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        th
                                            scope="row"
                                            class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                        {
                                            (account.name)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Accounts", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_status, assert_submit_button,
            assert_valid_html, get_test_connection, must_create_account, must_get_form,
            parse_html_document, select_text,
        },
    };

    use super::{AccountState, get_accounts_page};

    #[tokio::test]
    async fn lists_accounts_by_name() {
        let connection = get_test_connection();
        must_create_account("Wallet", &connection);
        must_create_account("Checking", &connection);
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "tbody th"), vec!["Checking", "Wallet"]);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::ACCOUNTS_API, "hx-post");
        assert_form_input(&form, "name", "text", true);
        assert_submit_button(&form, "Add Account");
    }

    #[tokio::test]
    async fn shows_message_without_accounts() {
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_accounts_page(State(state)).await.unwrap();
        let html = parse_html_document(response).await;

        assert!(select_text(&html, "table").is_empty());
        assert_eq!(
            select_text(&html, "main p"),
            vec!["No accounts yet. Add one above before creating entries."]
        );
    }
}
