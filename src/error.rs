//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    account::AccountId,
    alert::Alert,
    database_id::{RecurrenceRuleId, TransactionId},
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount could not be parsed, was not finite or was not greater than zero.
    #[error("\"{0}\" is not a valid amount, amounts must be numbers greater than zero")]
    InvalidAmount(String),

    /// The description was empty after trimming whitespace.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The account ID was missing or does not refer to an existing account.
    #[error("the account ID {0:?} does not refer to a valid account")]
    InvalidAccount(Option<AccountId>),

    /// The number of installments is zero or above the allowed maximum.
    #[error("{0} is not a valid number of installments")]
    InvalidInstallments(u32),

    /// Splitting the amount into installments would create installments of zero.
    #[error("the amount is too small to split into {0} installments")]
    InstallmentAmountTooSmall(u32),

    /// Only expenses can be split into installments.
    #[error("only expenses can be split into installments")]
    InstallmentsOnIncome,

    /// An entry cannot be both recurring and split into installments.
    #[error("an entry cannot be both recurring and split into installments")]
    RecurringInstallments,

    /// A date could not be parsed or constructed.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// A category string did not match any known category.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A period string was not in the format YYYY-MM.
    #[error("\"{0}\" is not a valid period, expected the format YYYY-MM")]
    InvalidPeriod(String),

    /// An empty string was used to create an account name.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// The specified import ID already exists in the database.
    ///
    /// When importing transactions from a CSV file, an import ID is used to
    /// uniquely identify each row. Rejecting duplicate import IDs avoids
    /// importing the same row twice when the user uploads overlapping files.
    #[error("the import ID already exists in the database")]
    DuplicateImportId,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update transaction {0} which is not in the database")]
    UpdateMissingTransaction(TransactionId),

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete transaction {0} which is not in the database")]
    DeleteMissingTransaction(TransactionId),

    /// Tried to update a recurrence rule that does not exist
    #[error("tried to update recurrence rule {0} which is not in the database")]
    UpdateMissingRecurrenceRule(RecurrenceRuleId),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("transaction.import_id") =>
            {
                Error::DuplicateImportId
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by invalid user input rather than the server.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::EmptyDescription
                | Error::InvalidAccount(_)
                | Error::InvalidInstallments(_)
                | Error::InstallmentAmountTooSmall(_)
                | Error::InstallmentsOnIncome
                | Error::RecurringInstallments
                | Error::InvalidDate(_)
                | Error::InvalidCategory(_)
                | Error::InvalidPeriod(_)
                | Error::EmptyAccountName
                | Error::DuplicateAccountName(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            error if error.is_validation_error() => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid entry".to_owned(),
                    details: capitalize_first(&error.to_string()),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingTransaction(_) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction(_) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingRecurrenceRule(_) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update recurring entry".to_owned(),
                    details: "The recurring entry could not be found.".to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "Try refreshing the page, the item may have been deleted.".to_owned(),
                },
            ),
            Error::NotCSV => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "File type must be CSV.".to_owned(),
                },
            ),
            Error::MultipartError(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the upload".to_owned(),
                    details: reason,
                },
            ),
            Error::InvalidCSV(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Failed to parse CSV".to_owned(),
                    details: reason,
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::InstallmentsOnIncome.into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_transaction_is_not_found() {
        let response = Error::DeleteMissingTransaction(42).into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
