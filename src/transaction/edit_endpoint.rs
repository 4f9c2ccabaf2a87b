//! Defines the endpoint for updating a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    account::{Account, AccountId},
    amount::parse_amount,
    category::Category,
    dashboard::{DashboardView, dashboard_url},
    database_id::TransactionId,
    entry::{parse_date, validate_fields},
    period::Period,
    store::{LedgerStore, SQLiteLedgerStore},
    transaction::{TransactionType, TransactionUpdate, edit_page::TransactionState},
};

/// The form data for editing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct EditTransactionForm {
    /// The new description.
    pub description: String,
    /// The amount as typed, e.g. "1.234,56" or "1,234.56".
    pub amount: String,
    /// Whether the money is earned or spent.
    pub type_: TransactionType,
    /// The category identifier or label, [Category::Other] if empty.
    pub category: Option<String>,
    /// The date in the format YYYY-MM-DD.
    pub date: String,
    /// The account the money moves in or out of.
    pub account_id: Option<AccountId>,
}

/// A route handler for updating a transaction.
///
/// On success the client is redirected to the dashboard for the month of the
/// updated transaction.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<EditTransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let store = SQLiteLedgerStore::new(&connection);

    let update = store
        .query_accounts()
        .and_then(|accounts| parse_update(&form, &accounts));
    let update = match update {
        Ok(update) => update,
        Err(error) => {
            if error.is_validation_error() {
                tracing::debug!("rejected update for transaction {transaction_id}: {error}");
            } else {
                tracing::error!("could not get accounts: {error}");
            }

            return error.into_alert_response();
        }
    };

    match store.update_transaction(transaction_id, &update) {
        Ok(()) => (
            HxRedirect(dashboard_url(
                Period::containing(update.date),
                DashboardView::List,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn parse_update(
    form: &EditTransactionForm,
    accounts: &[Account],
) -> Result<TransactionUpdate, Error> {
    let amount = parse_amount(&form.amount)?;
    let date = parse_date(&form.date)?;
    let category = match form.category.as_deref().map(str::trim) {
        None | Some("") => Category::default(),
        Some(category) => category.parse()?,
    };
    let (description, account_id) =
        validate_fields(&form.description, amount, form.account_id, accounts)?;

    Ok(TransactionUpdate {
        description: description.to_owned(),
        amount,
        type_: form.type_,
        category,
        date,
        account_id,
    })
}
