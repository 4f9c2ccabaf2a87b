//! Bulk import of transactions from CSV exports.

mod csv;
mod import_page;
mod import_transactions;

pub use csv::{ParseCSVResult, SkippedLine, create_import_id, parse_csv};
pub use import_page::get_import_page;
pub use import_transactions::{ImportReport, ImportState, import_transactions};
