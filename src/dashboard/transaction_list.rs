//! The list view of the dashboard: the period's transactions in date order.

use std::collections::HashMap;

use maud::{Markup, html};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    account::{Account, AccountId},
    endpoints::{self, format_endpoint},
    html::{BADGE_STYLE, BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency, link},
    transaction::{Transaction, TransactionStatus, TransactionType},
};

/// The max number of graphemes to display in a row before truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const LATE_ROW_STYLE: &str = "bg-red-50 border-b border-red-200 dark:bg-red-950/40 dark:border-red-900";
const STATUS_PAID_STYLE: &str = "px-2.5 py-1 text-xs font-semibold rounded \
    bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300";
const STATUS_PENDING_STYLE: &str = "px-2.5 py-1 text-xs font-semibold rounded \
    bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-300";
const STATUS_LATE_STYLE: &str = "px-2.5 py-1 text-xs font-semibold rounded \
    bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300";

fn amount_class(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Expense => "text-red-700 dark:text-red-300",
        TransactionType::Income => "text-green-700 dark:text-green-300",
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    if description.graphemes(true).count() <= MAX_DESCRIPTION_GRAPHEMES {
        return (description.to_owned(), None);
    }

    let truncated: String = description
        .graphemes(true)
        .take(MAX_DESCRIPTION_GRAPHEMES - 3)
        .collect();

    (truncated + "...", Some(description))
}

fn weekday_abbreviation(date: Date) -> String {
    date.weekday().to_string().chars().take(3).collect()
}

fn status_toggle(transaction: &Transaction, is_late: bool) -> Markup {
    let (text, style) = match transaction.status {
        TransactionStatus::Paid => ("Paid", STATUS_PAID_STYLE),
        TransactionStatus::Pending if is_late => ("Late", STATUS_LATE_STYLE),
        TransactionStatus::Pending => ("Pending", STATUS_PENDING_STYLE),
    };

    html! {
        button
            type="button"
            hx-post=(format_endpoint(endpoints::TRANSACTION_STATUS, transaction.id))
            hx-target-error="#alert-container"
            title={"Mark as " (transaction.status.toggled().as_str())}
            class={(style) " cursor-pointer"}
            data-status=(transaction.status.as_str())
        {
            (text)
        }
    }
}

fn transaction_row(transaction: &Transaction, account_name: &str, today: Date) -> Markup {
    let is_late = transaction.is_late(today);
    let (description, full_description) = format_description(&transaction.description);
    let category = transaction.category.option();

    html! {
        tr
            class=(if is_late { LATE_ROW_STYLE } else { TABLE_ROW_STYLE })
            data-transaction-id=(transaction.id)
            data-late[is_late]
        {
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
            {
                span class="font-semibold" { (transaction.date.day()) }
                " "
                span class="text-xs text-gray-500 dark:text-gray-400" { (weekday_abbreviation(transaction.date)) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span title=[full_description] { (description) }

                @if transaction.is_recurring {
                    span class="ml-1 text-xs text-blue-600 dark:text-blue-400" title="Recurring" { "↻" }
                }

                div class="flex flex-wrap gap-2 mt-1"
                {
                    span class={(BADGE_STYLE) " " (category.badge_style)} { (category.label) }
                    span class="text-xs text-gray-500 dark:text-gray-400" { (account_name) }
                }
            }

            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap " (amount_class(transaction.type_))}
            {
                (format_currency(transaction.signed_amount()))
            }

            td class=(TABLE_CELL_STYLE)
            {
                (status_toggle(transaction, is_late))
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id)) class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction.id))
                        hx-confirm={"Are you sure you want to delete '" (transaction.description) "'?"}
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Renders the period's transactions as a table.
///
/// `transactions` should already be sorted by date. Pending expenses dated
/// before `today` are highlighted as late.
pub(super) fn transaction_list_view(
    transactions: &[Transaction],
    accounts: &[Account],
    today: Date,
) -> Markup {
    let account_names: HashMap<AccountId, &str> = accounts
        .iter()
        .map(|account| (account.id, account.name.as_str()))
        .collect();

    if transactions.is_empty() {
        return html! {
            p id="transaction-list" class="text-center text-gray-500 dark:text-gray-400 my-8"
            {
                "No transactions in this period. "
                (link(endpoints::NEW_ENTRY_VIEW, "Add an entry"))
                " or "
                (link(endpoints::IMPORT_VIEW, "import a CSV file"))
                "."
            }
        };
    }

    html! {
        div id="transaction-list" class="w-full overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-700 dark:text-gray-300"
            {
                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(
                            transaction,
                            account_names.get(&transaction.account_id).copied().unwrap_or("Unknown account"),
                            today,
                        ))
                    }
                }
            }
        }
    }
}
