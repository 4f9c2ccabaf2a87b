//! Generates the transactions for recurring entries, at most once per calendar month.

use time::Date;

use crate::{
    Error, database_id::RecurrenceRuleId, period::Period, recurrence::RecurrenceRule,
    store::LedgerStore, transaction::Transaction,
};

/// What happened when recurring entries were materialized.
#[derive(Debug, Default, PartialEq)]
pub struct MaterializeReport {
    /// The transactions that were created.
    pub generated: Vec<Transaction>,
    /// The number of rules that already had a transaction for the month.
    pub skipped: usize,
    /// The rules that could not be materialized.
    pub failures: Vec<RuleFailure>,
}

/// A rule that could not be materialized and why.
#[derive(Debug, PartialEq)]
pub struct RuleFailure {
    /// The rule that could not be materialized.
    pub rule_id: RecurrenceRuleId,
    /// Why it failed.
    pub error: Error,
}

/// Create this month's transaction for every active recurrence rule that does
/// not have one yet.
///
/// Each generated transaction is pending, marked as recurring and due on the
/// rule's day of the month. Days past the end of the month roll over into the
/// next month, e.g. day 31 in November is due on the 1st of December. The
/// rule's watermark is then set to the due date.
///
/// A rule is skipped when its watermark falls in the current month or later,
/// so running this any number of times in a month generates at most one
/// transaction per rule.
///
/// Failures are isolated per rule: they are logged and collected in
/// [MaterializeReport::failures] and do not stop the remaining rules. A rule
/// whose transaction was created but whose watermark could not be updated
/// has the transaction removed again.
///
/// # Errors
/// Returns an error only if the active rules cannot be retrieved.
pub fn materialize_recurrences(
    store: &impl LedgerStore,
    today: Date,
) -> Result<MaterializeReport, Error> {
    let rules = store
        .query_active_recurrence_rules()
        .inspect_err(|error| tracing::error!("could not get active recurrence rules: {error}"))?;

    let current_period = Period::containing(today);
    let mut report = MaterializeReport::default();

    for rule in rules {
        if is_materialized(&rule, current_period) {
            report.skipped += 1;
            continue;
        }

        let due_date = current_period.day_rollover(rule.day_of_month);

        match materialize_rule(store, &rule, due_date) {
            Ok(transaction) => {
                tracing::debug!(
                    "generated transaction {} for recurrence rule {} due on {due_date}",
                    transaction.id,
                    rule.id
                );
                report.generated.push(transaction);
            }
            Err(error) => {
                tracing::error!("could not materialize recurrence rule {}: {error}", rule.id);
                report.failures.push(RuleFailure {
                    rule_id: rule.id,
                    error,
                });
            }
        }
    }

    if !report.generated.is_empty() || !report.failures.is_empty() {
        tracing::info!(
            "materialized recurring entries for {current_period}: {} generated, {} skipped, {} failed",
            report.generated.len(),
            report.skipped,
            report.failures.len()
        );
    }

    Ok(report)
}

/// The date of the next transaction rule will generate, as seen on `today`.
///
/// Returns `None` for inactive rules.
pub fn next_due_date(rule: &RecurrenceRule, today: Date) -> Option<Date> {
    if !rule.active {
        return None;
    }

    let current_period = Period::containing(today);
    let period = match rule.last_generated_date.map(Period::containing) {
        Some(last_period) if last_period >= current_period => last_period.next()?,
        _ => current_period,
    };

    Some(period.day_rollover(rule.day_of_month))
}

fn is_materialized(rule: &RecurrenceRule, current_period: Period) -> bool {
    rule.last_generated_date
        .is_some_and(|last_generated| Period::containing(last_generated) >= current_period)
}

fn materialize_rule(
    store: &impl LedgerStore,
    rule: &RecurrenceRule,
    due_date: Date,
) -> Result<Transaction, Error> {
    store.atomically(|store| {
        let transaction = store
            .insert_transactions(&[rule.occurrence(due_date)])?
            .into_iter()
            .next()
            .ok_or(Error::NotFound)?;

        store.set_recurrence_watermark(rule.id, due_date)?;

        Ok(transaction)
    })
}
