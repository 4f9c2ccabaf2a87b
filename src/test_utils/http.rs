use axum::{body::Body, http::StatusCode, response::Response};
use scraper::Html;

use super::{html::select_text, parse_html_fragment};

#[track_caller]
pub(crate) fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("headers missing {header_name}"))
        .to_str()
        .expect("header is not valid ASCII")
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// Check that `response` is an alert fragment with `status` whose text contains `message`.
pub(crate) async fn assert_alert(response: Response<Body>, status: StatusCode, message: &str) -> Html {
    assert_eq!(response.status(), status);

    let html = parse_html_fragment(response).await;
    let text = select_text(&html, "[role=alert]").join(" ");
    assert!(
        text.contains(message),
        "want alert containing {message:?}, got {text:?}"
    );

    html
}
