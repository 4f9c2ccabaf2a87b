//! Fixtures and assertions shared by the unit tests.
#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::{
    account::{Account, create_account},
    db::initialize,
};

pub(crate) use form::{
    assert_form_input, assert_hx_endpoint, assert_select_options, assert_submit_button,
    must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{assert_alert, assert_hx_redirect, assert_status, get_header};

/// An in-memory database with the schema in place.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("could not open in-memory database");
    initialize(&connection).expect("could not initialize database");
    connection
}

#[track_caller]
pub(crate) fn must_create_account(name: &str, connection: &Connection) -> Account {
    create_account(name, connection).expect("could not create account")
}
