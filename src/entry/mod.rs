//! Entries are what the user types in: one form that becomes a single
//! transaction, a series of monthly installments, or a recurring obligation.

mod create_endpoint;
mod create_page;
mod expand;
mod form;

pub use create_endpoint::create_entry_endpoint;
pub use create_page::{EntryState, get_new_entry_page};
pub use expand::{
    AppliedEntry, EntryForm, EntryInput, ExpansionPlan, MAX_INSTALLMENTS, apply_plan,
    create_entry, expand, parse_date, validate_fields,
};
pub(crate) use form::{EntryFormDefaults, entry_form_fields};
