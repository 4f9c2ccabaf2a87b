//! Defines the endpoint for stopping a recurring entry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    database_id::RecurrenceRuleId,
    endpoints,
    recurrence::recurrences_page::RecurrenceState,
    store::{LedgerStore, SQLiteLedgerStore},
};

/// A route handler that stops the recurring entry `rule_id` from generating
/// new transactions.
///
/// Transactions it already generated are kept.
pub async fn deactivate_recurrence_endpoint(
    State(state): State<RecurrenceState>,
    Path(rule_id): Path<RecurrenceRuleId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match SQLiteLedgerStore::new(&connection).deactivate_recurrence_rule(rule_id) {
        Ok(()) => {
            tracing::info!("deactivated recurrence rule {rule_id}");

            (
                HxRedirect(endpoints::RECURRENCES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not deactivate recurrence rule {rule_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        endpoints,
        recurrence::{
            RecurrenceRuleBuilder, create_recurrence_rule, get_all_recurrence_rules,
            recurrences_page::RecurrenceState,
        },
        test_utils::{assert_alert, assert_hx_redirect, get_test_connection, must_create_account},
        transaction::Transaction,
    };

    use super::deactivate_recurrence_endpoint;

    fn get_test_state() -> RecurrenceState {
        RecurrenceState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn deactivates_rule() {
        let state = get_test_state();
        let rule = {
            let connection = state.db_connection.lock().unwrap();
            let account = must_create_account("Checking", &connection);
            create_recurrence_rule(
                &RecurrenceRuleBuilder::from_first_occurrence(&Transaction::build(
                    9.9,
                    date!(2025 - 06 - 12),
                    "Streaming",
                    account.id,
                )),
                &connection,
            )
            .unwrap()
        };

        let response = deactivate_recurrence_endpoint(State(state.clone()), Path(rule.id)).await;

        assert_hx_redirect(&response, endpoints::RECURRENCES_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let rules = get_all_recurrence_rules(&connection).unwrap();
        assert!(!rules[0].active);
    }

    #[tokio::test]
    async fn missing_rule_is_not_found() {
        let response = deactivate_recurrence_endpoint(State(get_test_state()), Path(5)).await;

        assert_alert(
            response,
            StatusCode::NOT_FOUND,
            "Could not update recurring entry",
        )
        .await;
    }
}
