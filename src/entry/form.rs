//! The form fields shared by the new entry and edit transaction pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    account::{Account, AccountId},
    category::{CATEGORY_OPTIONS, Category},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::TransactionType,
};

/// The values the form fields start with.
pub struct EntryFormDefaults<'a> {
    /// The checked type radio.
    pub type_: TransactionType,
    /// The amount to prefill, if any.
    pub amount: Option<f64>,
    /// The date to prefill.
    pub date: Date,
    /// The description to prefill, if any.
    pub description: Option<&'a str>,
    /// The selected category.
    pub category: Category,
    /// The selected account, if any.
    pub account_id: Option<AccountId>,
}

fn type_radio(type_: TransactionType, label: &str, is_checked: bool) -> Markup {
    let id = format!("entry-type-{}", type_.as_str());

    html! {
        div class="flex flex-1 items-center gap-3"
        {
            input
                name="type_"
                id=(id)
                type="radio"
                value=(type_.as_str())
                checked[is_checked]
                required
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

/// Type, amount, date, description, category and account fields.
///
/// The amount is a text field so that both "1.234,56" and "1,234.56" can be typed.
pub fn entry_form_fields(defaults: &EntryFormDefaults<'_>, accounts: &[Account]) -> Markup {
    let amount = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (type_radio(TransactionType::Expense, "Expense", defaults.type_ == TransactionType::Expense))
                (type_radio(TransactionType::Income, "Income", defaults.type_ == TransactionType::Income))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="text"
                inputmode="decimal"
                placeholder="0,00"
                required
                autofocus
                value=[amount.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="e.g. Rent"
                value=[defaults.description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category_option in &CATEGORY_OPTIONS {
                    option
                        value=(category_option.category.as_str())
                        selected[category_option.category == defaults.category]
                    {
                        (category_option.label)
                    }
                }
            }
        }

        div
        {
            label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

            select name="account_id" id="account_id" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for account in accounts {
                    option
                        value=(account.id)
                        selected[Some(account.id) == defaults.account_id]
                    {
                        (account.name)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        account::Account,
        category::Category,
        test_utils::{assert_select_options, must_get_form},
        transaction::TransactionType,
    };

    use super::{EntryFormDefaults, entry_form_fields};

    fn render(type_: TransactionType, category: Category, account_id: Option<i64>) -> Html {
        let accounts = [
            Account {
                id: 1,
                name: "Checking".to_owned(),
            },
            Account {
                id: 2,
                name: "Wallet".to_owned(),
            },
        ];
        let fields = entry_form_fields(
            &EntryFormDefaults {
                type_,
                amount: Some(12.5),
                date: date!(2025 - 11 - 05),
                description: Some("Lunch"),
                category,
                account_id,
            },
            &accounts,
        );

        Html::parse_document(&maud::html! { form { (fields) } }.into_string())
    }

    fn selected_value(html: &Html, selector: &str) -> Option<String> {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .and_then(|element| element.value().attr("value"))
            .map(str::to_owned)
    }

    #[test]
    fn checks_selected_type() {
        for (type_, want) in [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ] {
            let html = render(type_, Category::Other, None);

            assert_eq!(
                selected_value(&html, "input[name=type_][checked]").as_deref(),
                Some(want)
            );
        }
    }

    #[test]
    fn lists_categories_and_accounts() {
        let html = render(TransactionType::Expense, Category::Food, Some(2));
        let form = must_get_form(&html);

        assert_select_options(
            &form,
            "category",
            &["housing", "food", "transport", "utilities", "health", "leisure", "work", "other"],
        );
        assert_select_options(&form, "account_id", &["1", "2"]);
        assert_eq!(
            selected_value(&html, "select[name=category] option[selected]").as_deref(),
            Some("food")
        );
        assert_eq!(
            selected_value(&html, "select[name=account_id] option[selected]").as_deref(),
            Some("2")
        );
    }

    #[test]
    fn fills_in_amount_and_description() {
        let html = render(TransactionType::Expense, Category::Other, None);

        assert_eq!(selected_value(&html, "input[name=amount]").as_deref(), Some("12.50"));
        assert_eq!(selected_value(&html, "input[name=description]").as_deref(), Some("Lunch"));
        assert_eq!(selected_value(&html, "input[name=date]").as_deref(), Some("2025-11-05"));
    }
}
