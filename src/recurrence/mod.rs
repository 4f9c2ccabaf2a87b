//! Recurring entries: rules that generate one transaction per month.
//!
//! This module contains:
//! - The `RecurrenceRule` model and its database functions
//! - The materializer that turns due rules into transactions
//! - The page listing rules and the endpoint for stopping one

mod core;
mod deactivate_endpoint;
mod materialize;
mod recurrences_page;

pub use core::{
    RecurrenceRule, RecurrenceRuleBuilder, create_recurrence_rule, create_recurrence_rule_table,
    deactivate_recurrence_rule, get_active_recurrence_rules, get_all_recurrence_rules,
    map_recurrence_rule_row, set_recurrence_watermark,
};
pub use deactivate_endpoint::deactivate_recurrence_endpoint;
pub use materialize::{MaterializeReport, RuleFailure, materialize_recurrences, next_due_date};
pub use recurrences_page::{RecurrenceState, get_recurrences_page};
