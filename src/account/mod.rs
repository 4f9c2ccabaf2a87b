//! Accounts: named places money is kept, and their page and endpoint.

mod accounts_page;
mod core;
mod create_endpoint;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountId, create_account, create_account_table, get_all_accounts,
    map_row_to_account,
};
pub use create_endpoint::create_account_endpoint;
