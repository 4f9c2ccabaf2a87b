//! Table views for the analytics part of the dashboard.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::{CategoryTotal, FixedVariableSplit, MonthlyTotals},
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

const TABLE_STYLE: &str = "w-full text-sm text-left text-gray-500 dark:text-gray-400";
const TABLE_WRAPPER_STYLE: &str = "overflow-x-auto rounded-lg shadow";
const NUMBER_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Expenses per category with their share of the total.
pub(super) fn category_breakdown_table(categories: &[CategoryTotal]) -> Markup {
    html! {
        div id="category-breakdown"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses by Category" }

            @if categories.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No expenses in this period." }
            } @else {
                div class=(TABLE_WRAPPER_STYLE)
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(NUMBER_CELL_STYLE) { "Total" }
                                th scope="col" class=(NUMBER_CELL_STYLE) { "Share" }
                            }
                        }

                        tbody
                        {
                            @for total in categories {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        span
                                            class="inline-block w-3 h-3 mr-2 rounded-full"
                                            style={"background-color: " (total.category.option().color)}
                                        {}
                                        (total.category.label())
                                    }
                                    td class=(NUMBER_CELL_STYLE) { (format_currency(total.total)) }
                                    td class=(NUMBER_CELL_STYLE)
                                    {
                                        (format!("{:.1}%", total.percent))
                                        div class="w-full h-1.5 mt-1 bg-gray-200 rounded-full dark:bg-gray-700"
                                        {
                                            div
                                                class="h-1.5 rounded-full"
                                                style={
                                                    "width: " (format!("{:.1}", total.percent)) "%; "
                                                    "background-color: " (total.category.option().color)
                                                }
                                            {}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Recurring (fixed) versus one-off (variable) expenses.
pub(super) fn fixed_variable_table(split: FixedVariableSplit) -> Markup {
    let total = split.fixed + split.variable;
    let share = |amount: f64| {
        if total > 0.0 {
            format!("{:.1}%", amount / total * 100.0)
        } else {
            "-".to_owned()
        }
    };

    html! {
        div id="fixed-variable"
        {
            h3 class="text-xl font-semibold mb-4" { "Fixed vs Variable" }

            div class=(TABLE_WRAPPER_STYLE)
            {
                table class=(TABLE_STYLE)
                {
                    tbody
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Fixed" }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(split.fixed)) }
                            td class=(NUMBER_CELL_STYLE) { (share(split.fixed)) }
                        }
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Variable" }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(split.variable)) }
                            td class=(NUMBER_CELL_STYLE) { (share(split.variable)) }
                        }
                    }
                }
            }
        }
    }
}

/// Income, expenses and net result per month, oldest first.
pub(super) fn history_table(history: &[MonthlyTotals]) -> Markup {
    html! {
        div id="history"
        {
            h3 class="text-xl font-semibold mb-4" { "Monthly History" }

            div class=(TABLE_WRAPPER_STYLE)
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class=(NUMBER_CELL_STYLE) { "Income" }
                            th scope="col" class=(NUMBER_CELL_STYLE) { "Expenses" }
                            th scope="col" class=(NUMBER_CELL_STYLE) { "Net" }
                        }
                    }

                    tbody
                    {
                        @for month in history {
                            @let net = month.income - month.expense;

                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) { (month.period) }
                                td class=(NUMBER_CELL_STYLE) { (format_currency(month.income)) }
                                td class=(NUMBER_CELL_STYLE) { (format_currency(month.expense)) }
                                td class={(NUMBER_CELL_STYLE) " " (amount_color_class(net))}
                                {
                                    (format_currency(net))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
