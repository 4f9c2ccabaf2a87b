//! The page for editing a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::Account,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    entry::{EntryFormDefaults, entry_form_fields},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    store::{LedgerStore, SQLiteLedgerStore},
    transaction::Transaction,
};

/// The state needed to edit, delete or settle a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for reading and changing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing the transaction `transaction_id`.
///
/// Responds with the 404 page if the transaction does not exist.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let store = SQLiteLedgerStore::new(&connection);

    let transaction = store.get_transaction(transaction_id).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("could not get transaction {transaction_id}: {error}");
        }
    })?;
    let accounts = store
        .query_accounts()
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(edit_transaction_view(&transaction, &accounts).into_response())
}

fn edit_transaction_view(transaction: &Transaction, accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let defaults = EntryFormDefaults {
        type_: transaction.type_,
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
        category: transaction.category,
        account_id: Some(transaction.account_id),
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Transaction" }

            @if transaction.is_recurring {
                p id="recurring-note" class="mb-4 text-sm text-gray-600 dark:text-gray-400"
                {
                    "This transaction was generated by a recurring entry. "
                    "Changes only apply to this month."
                }
            }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button"
                hx-indicator="#indicator"
                class="w-full space-y-4 md:space-y-6"
            {
                (entry_form_fields(&defaults, accounts))

                button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Update Transaction"
                }
            }
        }
    };

    base("Edit Transaction", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        category::Category,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_status, assert_submit_button,
            assert_valid_html, get_test_connection, must_create_account, must_get_form,
            parse_html_document, select_text,
        },
        transaction::{Transaction, create_transaction},
    };

    use super::{TransactionState, get_edit_transaction_page};

    #[tokio::test]
    async fn renders_form_with_transaction_values() {
        let connection = get_test_connection();
        let account = must_create_account("Checking", &connection);
        let transaction = create_transaction(
            &Transaction::build(45.9, date!(2025 - 11 - 03), "Groceries", account.id)
                .category(Category::Food)
                .recurring(true),
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_transaction_page(State(state), Path(transaction.id))
            .await
            .unwrap();

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format!("/api/transactions/{}", transaction.id),
            "hx-put",
        );
        assert_form_input(&form, "amount", "text", true);
        assert_form_input(&form, "description", "text", true);
        assert_submit_button(&form, "Update Transaction");
        assert!(
            form.select(&Selector::parse("input[name=installments]").unwrap())
                .next()
                .is_none()
        );

        let amount = form
            .select(&Selector::parse("input[name=amount]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .unwrap();
        assert_eq!(amount, "45.90");
        assert_eq!(select_text(&html, "#recurring-note").len(), 1);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = match get_edit_transaction_page(State(state), Path(42)).await {
            Ok(response) => response,
            Err(error) => error.into_response(),
        };

        assert_status(&response, StatusCode::NOT_FOUND);
    }
}
