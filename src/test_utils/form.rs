use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("want a form element, got none")
}

/// Check that `form` sends its request to `endpoint` via the HTMX `attribute`, e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// Check that `form` has an input called `name` of type `type_` and whether it is required.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str, required: bool) {
    let selector = Selector::parse(&format!("input[name=\"{name}\"]")).unwrap();
    let inputs: Vec<_> = form.select(&selector).collect();

    assert!(!inputs.is_empty(), "no input named \"{name}\"");

    for input in inputs {
        let got_type = input.value().attr("type").unwrap_or_default();
        assert_eq!(got_type, type_, "input \"{name}\" has the wrong type");
        assert_eq!(
            input.value().attr("required").is_some(),
            required,
            "input \"{name}\" required attribute"
        );
    }
}

/// Check the option values of the select called `name`, in order.
#[track_caller]
pub(crate) fn assert_select_options(form: &ElementRef<'_>, name: &str, want_values: &[&str]) {
    let select = form
        .select(&Selector::parse(&format!("select[name=\"{name}\"]")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("no select named \"{name}\""));

    let got_values: Vec<&str> = select
        .select(&Selector::parse("option").unwrap())
        .filter_map(|option| option.value().attr("value"))
        .collect();

    assert_eq!(got_values, want_values, "options for select \"{name}\"");
}

#[track_caller]
pub(crate) fn assert_submit_button(form: &ElementRef<'_>, text: &str) {
    let button = form
        .select(&Selector::parse("button[type=submit]").unwrap())
        .next()
        .expect("want a submit button, got none");

    let got_text = button.text().collect::<String>();
    assert_eq!(got_text.trim(), text);
}
