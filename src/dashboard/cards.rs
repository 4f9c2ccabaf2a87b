//! The summary cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{dashboard::aggregation::PeriodMetrics, html::format_currency};

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg shadow \
    bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700";
const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-500 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";
const POSITIVE_STYLE: &str = "text-green-600 dark:text-green-400";
const NEGATIVE_STYLE: &str = "text-red-600 dark:text-red-400";

fn sign_style(amount: f64) -> &'static str {
    if amount < 0.0 {
        NEGATIVE_STYLE
    } else {
        POSITIVE_STYLE
    }
}

fn card(id: &str, title: &str, value: f64, value_style: &str, footnote: Option<String>) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            span class=(CARD_TITLE_STYLE) { (title) }
            span class={(CARD_VALUE_STYLE) " " (value_style)} { (format_currency(value)) }

            @if let Some(footnote) = footnote {
                span class="text-xs text-gray-500 dark:text-gray-400" { (footnote) }
            }
        }
    }
}

/// Renders the real balance, period balance and pending cards.
pub(super) fn summary_cards_view(metrics: &PeriodMetrics) -> Markup {
    let late_note = match metrics.late_count {
        0 => None,
        1 => Some("1 payment is late".to_owned()),
        count => Some(format!("{count} payments are late")),
    };

    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full mb-6"
        {
            (card(
                "real-balance",
                "Real Balance",
                metrics.real_balance,
                sign_style(metrics.real_balance),
                Some("Everything paid so far".to_owned()),
            ))
            (card(
                "period-balance",
                "Period Balance",
                metrics.period_balance,
                sign_style(metrics.period_balance),
                Some("Income minus expenses this month".to_owned()),
            ))
            (card(
                "pending-total",
                "Pending",
                metrics.pending_total,
                if metrics.late_count > 0 { NEGATIVE_STYLE } else { "" },
                late_note,
            ))
        }
    }
}
