//! The page for uploading CSV files.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    account::{Account, get_all_accounts},
    csv_import::import_transactions::ImportState,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        link, loading_spinner,
    },
    navigation::NavBar,
};

/// Route handler for the import CSV page.
pub async fn get_import_page(State(state): State<ImportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(import_view(&accounts).into_response())
}

fn import_form_view(accounts: &[Account]) -> Markup {
    html! {
        form
            hx-post=(endpoints::IMPORT_API)
            enctype="multipart/form-data"
            hx-disabled-elt="#files, #submit-button"
            hx-indicator="#indicator"
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

                select name="account_id" id="account_id" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for account in accounts {
                        option value=(account.id) { (account.name) }
                    }
                }
            }

            div
            {
                label for="files" class=(FORM_LABEL_STYLE) { "Choose file(s) to upload" }

                input
                    id="files"
                    type="file"
                    name="files"
                    accept=".csv,text/csv"
                    multiple
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    "Columns: date, description, amount, category, type. "
                    "Separated by commas or semicolons, with a header line."
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                " Upload Files"
            }
        }
    }
}

fn import_view(accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::IMPORT_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Import Transactions" }

            @if accounts.is_empty() {
                p id="no-accounts" class="text-center"
                {
                    "Imported transactions belong to an account. "
                    (link(endpoints::ACCOUNTS_VIEW, "Create an account"))
                    " first."
                }
            } @else {
                (import_form_view(accounts))
            }
        }
    };

    base("Import Transactions", &[], &content)
}

#[cfg(test)]
mod import_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use scraper::{ElementRef, Selector};

    use crate::{
        csv_import::import_transactions::ImportState,
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_select_options, assert_status,
            assert_valid_html, get_test_connection, must_create_account, must_get_form,
            parse_html_document, select_text,
        },
    };

    use super::get_import_page;

    #[tokio::test]
    async fn render_page() {
        let connection = get_test_connection();
        let account = must_create_account("Checking", &connection);
        let state = ImportState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_import_page(State(state)).await.unwrap();

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::IMPORT_API, "hx-post");
        assert_form_enctype(&form, "multipart/form-data");
        assert_form_input(&form, "files", "file", true);
        assert_select_options(&form, "account_id", &[&account.id.to_string()]);
        assert!(
            form.select(&Selector::parse("input[name=files][multiple]").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn links_to_accounts_without_accounts() {
        let state = ImportState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_import_page(State(state)).await.unwrap();
        let html = parse_html_document(response).await;

        assert_eq!(
            select_text(&html, "#no-accounts"),
            vec!["Imported transactions belong to an account. Create an account first."]
        );
    }

    #[track_caller]
    fn assert_form_enctype(form: &ElementRef, enctype: &str) {
        let form_enctype = form
            .value()
            .attr("enctype")
            .expect("enctype attribute missing");

        assert_eq!(
            form_enctype, enctype,
            "want form with attribute enctype=\"{enctype}\", got {form_enctype:?}"
        );
    }
}
