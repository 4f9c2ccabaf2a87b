//! Defines the endpoint for importing transactions from uploaded CSV files.

use std::{
    sync::{Arc, Mutex, OnceLock},
    time::{Duration, Instant},
};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use numfmt::{Formatter, Precision};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, get_all_accounts},
    alert::Alert,
    csv_import::csv::parse_csv,
    transaction::TransactionBuilder,
};

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The outcome of importing one or more CSV files.
#[derive(Debug, Default, PartialEq)]
pub struct ImportReport {
    /// Rows stored as new transactions.
    pub imported: usize,
    /// Rows that had already been imported before.
    pub duplicates: usize,
    /// Malformed lines that were left out.
    pub skipped_lines: usize,
}

/// Route handler for importing transactions from CSV files.
///
/// Expects a multipart form with the target `account_id` and one or more
/// `files`. Imported rows are stored as paid transactions. Rows that were
/// imported before are ignored, so uploading the same file twice is safe.
/// Malformed lines are skipped and reported in a warning.
pub async fn import_transactions(
    State(state): State<ImportState>,
    multipart: Multipart,
) -> Response {
    let start_time = Instant::now();

    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(error) => {
            tracing::debug!("rejected CSV upload: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match import_upload(&upload, &connection) {
        Ok(report) => {
            let duration = start_time.elapsed();
            tracing::info!(
                "imported {} transactions in {}ms: {} duplicates, {} lines skipped",
                report.imported,
                duration.as_millis(),
                report.duplicates,
                report.skipped_lines
            );

            (StatusCode::CREATED, report_alert(&report, duration).into_html()).into_response()
        }
        Err(error) => {
            if error.is_validation_error() || matches!(error, Error::InvalidCSV(_)) {
                tracing::debug!("rejected CSV import: {error}");
            } else {
                tracing::error!("could not import transactions: {error}");
            }

            error.into_alert_response()
        }
    }
}

/// The fields of the import form.
struct Upload {
    account_id: Option<AccountId>,
    files: Vec<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Error> {
    let mut upload = Upload {
        account_id: None,
        files: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        let name = field.name().map(str::to_owned);

        match name.as_deref() {
            Some("account_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|error| Error::MultipartError(error.body_text()))?;
                upload.account_id = text.trim().parse().ok();
            }
            Some("files") => upload.files.push(read_csv_field(field).await?),
            name => tracing::debug!("ignoring multipart field {name:?}"),
        }
    }

    if upload.files.is_empty() {
        return Err(Error::MultipartError("No CSV file was uploaded.".to_owned()));
    }

    Ok(upload)
}

async fn read_csv_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let is_csv = field.content_type() == Some("text/csv")
        || file_name.to_lowercase().ends_with(".csv");

    if !is_csv {
        return Err(Error::NotCSV);
    }

    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

/// Parse every file, then store all rows in one database transaction.
///
/// Either every new row is stored or none are.
fn import_upload(upload: &Upload, connection: &Connection) -> Result<ImportReport, Error> {
    let accounts = get_all_accounts(connection)?;
    let account_id = upload
        .account_id
        .filter(|id| accounts.iter().any(|account| account.id == *id))
        .ok_or(Error::InvalidAccount(upload.account_id))?;

    let mut report = ImportReport::default();
    let mut builders = Vec::new();

    for text in &upload.files {
        let result = parse_csv(text, account_id)?;
        report.skipped_lines += result.skipped_lines.len();
        builders.extend(result.transactions);
    }

    let tx = connection.unchecked_transaction()?;
    report.imported = import_transaction_list(&builders, &tx)?;
    report.duplicates = builders.len() - report.imported;
    tx.commit()?;

    Ok(report)
}

/// Insert transactions, ignoring those with import IDs that already exist.
///
/// Returns the number of transactions inserted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
fn import_transaction_list(
    builders: &[TransactionBuilder],
    connection: &Connection,
) -> Result<usize, Error> {
    let mut statement = connection.prepare(
        "INSERT INTO \"transaction\"
            (description, amount, type, category, date, account_id, status, is_recurring, import_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(import_id) DO NOTHING",
    )?;

    let mut imported = 0;

    for builder in builders {
        imported += statement.execute(rusqlite::params![
            builder.description,
            builder.amount,
            builder.type_,
            builder.category,
            builder.date,
            builder.account_id,
            builder.status,
            builder.is_recurring,
            builder.import_id,
        ])?;
    }

    Ok(imported)
}

fn report_alert(report: &ImportReport, duration: Duration) -> Alert {
    let formatter = get_thousands_separator_formatter();
    let count = |value: usize| match formatter {
        Some(formatter) => formatter.fmt_string(value),
        None => value.to_string(),
    };
    let duration_ms = count(duration.as_millis() as usize);

    let mut details = match report.imported {
        0 => "No new transactions were imported.".to_owned(),
        1 => "Imported 1 transaction.".to_owned(),
        imported => format!("Imported {} transactions.", count(imported)),
    };

    if report.duplicates > 0 {
        details.push_str(&format!(
            " Ignored {} already imported.",
            count(report.duplicates)
        ));
    }

    if report.skipped_lines == 0 {
        details.push_str(&format!(" Completed in {duration_ms}ms."));

        return Alert::Success {
            message: "Import completed successfully!".to_owned(),
            details,
        };
    }

    details.push_str(&format!(
        " Skipped {} malformed line(s).",
        count(report.skipped_lines)
    ));

    Alert::Warning {
        message: "Import completed with warnings".to_owned(),
        details,
    }
}

fn get_thousands_separator_formatter() -> Option<&'static Formatter> {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    FORMATTER
        .get_or_init(|| {
            Formatter::new()
                .separator(',')
                .ok()
                .map(|formatter| formatter.precision(Precision::Decimals(0)))
        })
        .as_ref()
}

#[cfg(test)]
mod import_transactions_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{FromRequest, Multipart, State},
        http::{Request, StatusCode},
    };
    use time::macros::date;

    use crate::{
        account::AccountId,
        endpoints,
        test_utils::{assert_alert, get_test_connection, must_create_account, select_text},
        transaction::{TransactionQuery, TransactionStatus, TransactionType, query_transactions},
    };

    use super::{ImportState, import_transactions};

    const BANK_CSV: &str = "date,description,amount,category,type\n\
        2025-03-01,Salary,5000.00,work,income\n\
        2025-03-02,Groceries,-123.45,food,\n\
        2025-03-03,Bus,4.50,transport,expense";

    const BROKEN_CSV: &str = "Data;Descrição;Valor\n\
        05/04/2025;Aluguel;-1.200,00\n\
        yesterday;Pizza;-45,00";

    fn get_test_state() -> (ImportState, AccountId) {
        let connection = get_test_connection();
        let account = must_create_account("Checking", &connection);

        (
            ImportState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            account.id,
        )
    }

    async fn must_make_multipart(account_id: Option<AccountId>, files: &[(&str, &str)]) -> Multipart {
        let boundary = "MY_BOUNDARY123456789";
        let boundary_start = format!("--{boundary}");
        let boundary_end = format!("--{boundary}--");
        let account_id = account_id.map(|id| id.to_string());

        let mut lines: Vec<&str> = Vec::new();

        if let Some(account_id) = &account_id {
            lines.push(&boundary_start);
            lines.push("Content-Disposition: form-data; name=\"account_id\"");
            lines.push("");
            lines.push(account_id);
        }

        for (content_type, data) in files {
            lines.push(&boundary_start);
            lines.push("Content-Disposition: form-data; name=\"files\"; filename=\"statement\";");
            lines.push(content_type);
            lines.push("");
            lines.push(data);
        }

        lines.push(&boundary_end);

        let data = lines.join("\r\n").into_bytes();

        let request = Request::builder()
            .method("POST")
            .uri(endpoints::IMPORT_API)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(data.into())
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn imports_rows_as_paid_transactions() {
        let (state, account_id) = get_test_state();
        let multipart =
            must_make_multipart(Some(account_id), &[("Content-Type: text/csv", BANK_CSV)]).await;

        let response = import_transactions(State(state.clone()), multipart).await;

        assert_alert(response, StatusCode::CREATED, "Imported 3 transactions.").await;
        let connection = state.db_connection.lock().unwrap();
        let transactions = query_transactions(&TransactionQuery::default(), &connection).unwrap();
        assert_eq!(transactions.len(), 3);
        assert!(
            transactions
                .iter()
                .all(|transaction| transaction.status == TransactionStatus::Paid
                    && !transaction.is_recurring
                    && transaction.account_id == account_id)
        );
        assert_eq!(transactions[1].type_, TransactionType::Expense);
        assert_eq!(transactions[1].amount, 123.45);
        assert_eq!(transactions[1].date, date!(2025 - 03 - 02));
    }

    #[tokio::test]
    async fn reimporting_the_same_file_is_idempotent() {
        let (state, account_id) = get_test_state();

        for _ in 0..2 {
            let multipart =
                must_make_multipart(Some(account_id), &[("Content-Type: text/csv", BANK_CSV)])
                    .await;
            import_transactions(State(state.clone()), multipart).await;
        }
        let multipart =
            must_make_multipart(Some(account_id), &[("Content-Type: text/csv", BANK_CSV)]).await;
        let response = import_transactions(State(state.clone()), multipart).await;

        assert_alert(response, StatusCode::CREATED, "Ignored 3 already imported.").await;
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            query_transactions(&TransactionQuery::default(), &connection)
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn warns_about_skipped_lines() {
        let (state, account_id) = get_test_state();
        let multipart = must_make_multipart(
            Some(account_id),
            &[
                ("Content-Type: text/csv", BANK_CSV),
                ("Content-Type: text/csv", BROKEN_CSV),
            ],
        )
        .await;

        let response = import_transactions(State(state), multipart).await;

        let html = assert_alert(response, StatusCode::CREATED, "Import completed with warnings").await;
        let text = select_text(&html, "[role=alert]").join(" ");
        assert!(text.contains("Imported 4 transactions."), "got {text:?}");
        assert!(text.contains("Skipped 1 malformed line(s)."), "got {text:?}");
    }

    #[tokio::test]
    async fn rejects_non_csv_file() {
        let (state, account_id) = get_test_state();
        let multipart =
            must_make_multipart(Some(account_id), &[("Content-Type: image/png", "PNG")]).await;

        let response = import_transactions(State(state), multipart).await;

        assert_alert(response, StatusCode::BAD_REQUEST, "File type must be CSV.").await;
    }

    #[tokio::test]
    async fn rejects_missing_account() {
        let (state, _) = get_test_state();
        let multipart = must_make_multipart(None, &[("Content-Type: text/csv", BANK_CSV)]).await;

        let response = import_transactions(State(state.clone()), multipart).await;

        assert_alert(response, StatusCode::BAD_REQUEST, "valid account").await;
        let connection = state.db_connection.lock().unwrap();
        assert!(
            query_transactions(&TransactionQuery::default(), &connection)
                .unwrap()
                .is_empty()
        );
    }
}
