//! Lists the recurring entries with their next due date.

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
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_DELETE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    recurrence::{RecurrenceRule, get_all_recurrence_rules, next_due_date},
    timezone::local_today,
    transaction::TransactionType,
};

/// The state needed for the recurring entries page and deactivating entries.
#[derive(Debug, Clone)]
pub struct RecurrenceState {
    /// The database connection for reading and deactivating rules.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for RecurrenceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display every recurring entry, active ones first.
pub async fn get_recurrences_page(State(state): State<RecurrenceState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rules = get_all_recurrence_rules(&connection)
        .inspect_err(|error| tracing::error!("could not get recurrence rules: {error}"))?;
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(recurrences_view(&rules, &accounts, today).into_response())
}

fn format_optional_date(date: Option<Date>) -> String {
    date.map_or_else(|| "-".to_owned(), |date| date.to_string())
}

fn rule_row(rule: &RecurrenceRule, accounts: &[Account], today: Date) -> Markup {
    let account_name = accounts
        .iter()
        .find(|account| account.id == rule.account_id)
        .map_or("Unknown", |account| account.name.as_str());
    let signed_amount = match rule.type_ {
        TransactionType::Income => rule.amount,
        TransactionType::Expense => -rule.amount,
    };
    let amount_style = if signed_amount < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };
    let option = rule.category.option();

    html! {
        tr
            class=(TABLE_ROW_STYLE)
            data-rule-id=(rule.id)
            data-active=(rule.active)
        {
            th
                scope="row"
                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
            {
                (rule.description)
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class={(BADGE_STYLE) " " (option.badge_style)} { (option.label) }
            }

            td class=(TABLE_CELL_STYLE) { (account_name) }

            td class={(TABLE_CELL_STYLE) " text-right " (amount_style)}
            {
                (format_currency(signed_amount))
            }

            td class=(TABLE_CELL_STYLE) { (rule.day_of_month) }

            td class=(TABLE_CELL_STYLE) { (format_optional_date(next_due_date(rule, today))) }

            td class=(TABLE_CELL_STYLE) { (format_optional_date(rule.last_generated_date)) }

            td class=(TABLE_CELL_STYLE)
            {
                @if rule.active {
                    button
                        hx-post=(format_endpoint(endpoints::DEACTIVATE_RECURRENCE, rule.id))
                        hx-confirm={"Stop repeating '" (rule.description) "'? This cannot be undone."}
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Stop"
                    }
                } @else {
                    span class="text-gray-400" { "Stopped" }
                }
            }
        }
    }
}

fn recurrences_view(rules: &[RecurrenceRule], accounts: &[Account], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECURRENCES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Recurring Entries" }

                @if rules.is_empty() {
                    p id="no-recurrences" class="text-gray-500 dark:text-gray-400"
                    {
                        "Nothing repeats yet. Tick \"Repeat every month\" when "
                        (link(endpoints::NEW_ENTRY_VIEW, "creating an entry"))
                        "."
                    }
                } @else {
                    div class="overflow-x-auto rounded-lg shadow"
                    {
                        table id="recurrences" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                    th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Day" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Next Due" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Last Generated" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                                }
                            }

                            tbody
                            {
                                @for rule in rules {
                                    (rule_row(rule, accounts, today))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Recurring Entries", &[], &content)
}
