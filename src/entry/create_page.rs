//! The page for creating a new entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    category::Category,
    endpoints,
    entry::{
        MAX_INSTALLMENTS,
        form::{EntryFormDefaults, entry_form_fields},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, link, loading_spinner,
    },
    navigation::NavBar,
    timezone::local_today,
    transaction::TransactionType,
};

/// The state needed to show the new entry page and create entries.
#[derive(Debug, Clone)]
pub struct EntryState {
    /// The database connection for reading accounts and writing entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for EntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating an entry.
pub async fn get_new_entry_page(State(state): State<EntryState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(new_entry_view(&accounts, today).into_response())
}

fn no_accounts_view() -> Markup {
    html! {
        p id="no-accounts" class="text-center"
        {
            "Entries belong to an account. "
            (link(endpoints::ACCOUNTS_VIEW, "Create an account"))
            " first."
        }
    }
}

fn new_entry_form(accounts: &[Account], today: Date) -> Markup {
    let defaults = EntryFormDefaults {
        type_: TransactionType::Expense,
        amount: None,
        date: today,
        description: None,
        category: Category::Other,
        account_id: accounts.first().map(|account| account.id),
    };

    html! {
        form
            hx-post=(endpoints::ENTRIES_API)
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            (entry_form_fields(&defaults, accounts))

            div
            {
                label for="installments" class=(FORM_LABEL_STYLE) { "Installments" }

                input
                    name="installments"
                    id="installments"
                    type="number"
                    min="1"
                    max=(MAX_INSTALLMENTS)
                    step="1"
                    value="1"
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    "Expenses only. The amount is split into one payment per month."
                }
            }

            div class="flex items-center gap-3"
            {
                input
                    name="recurring"
                    id="recurring"
                    type="checkbox"
                    value="true"
                    class=(FORM_CHECKBOX_STYLE);

                label for="recurring" class="text-sm font-medium" { "Repeat every month" }
            }

            button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Save Entry"
            }
        }
    }
}

fn new_entry_view(accounts: &[Account], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ENTRY_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Entry" }

            @if accounts.is_empty() {
                (no_accounts_view())
            } @else {
                (new_entry_form(accounts, today))
            }
        }
    };

    base("New Entry", &[], &content)
}
