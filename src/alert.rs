//! Alert system for displaying success, warning and error messages to users.
//!
//! Alerts are rendered as HTML fragments which HTMX swaps into the
//! `#alert-container` element of the base page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded.
    Success { message: String, details: String },
    /// The action succeeded, no further details.
    SuccessSimple { message: String },
    /// The action succeeded but some items were skipped or failed.
    Warning { message: String, details: String },
    /// The action failed.
    Error { message: String, details: String },
    /// The action failed, no further details.
    ErrorSimple { message: String },
}

const SUCCESS_STYLE: &str = "text-green-800 border-green-300 bg-green-50 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";
const WARNING_STYLE: &str = "text-yellow-800 border-yellow-300 bg-yellow-50 \
    dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800";
const ERROR_STYLE: &str = "text-red-800 border-red-300 bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, None),
            Alert::Warning { message, details } => (WARNING_STYLE, message, Some(details)),
            Alert::Error { message, details } => (ERROR_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ERROR_STYLE, message, None),
        };

        html! {
            div
                role="alert"
                class={"flex items-start justify-between gap-4 p-4 mb-4 text-sm border rounded-lg " (style)}
            {
                div
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        let status_code = match self {
            Alert::Error { .. } | Alert::ErrorSimple { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };

        (status_code, self.into_html()).into_response()
    }
}
