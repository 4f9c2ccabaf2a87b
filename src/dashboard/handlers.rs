//! Dashboard HTTP handler and view rendering.
//!
//! This module contains:
//! - The route handler that materializes recurring entries and displays a period
//! - Period and view selection from the query string
//! - HTML view functions for the page frame, navigator and warning banner

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::Account,
    dashboard::{
        aggregation::{MonthlyTotals, PeriodMetrics, history_series, summarize_period},
        cards::summary_cards_view,
        charts::{DashboardChart, category_chart, charts_script, charts_view, history_chart},
        tables::{category_breakdown_table, fixed_variable_table, history_table},
        transaction_list::transaction_list_view,
    },
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, HeadElement, base},
    navigation::NavBar,
    period::Period,
    recurrence::{MaterializeReport, materialize_recurrences},
    store::{LedgerStore, SQLiteLedgerStore},
    timezone::local_today,
    transaction::{SortOrder, Transaction, TransactionQuery, TransactionStatus},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    /// How many months the history chart and table cover.
    pub history_months: usize,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            history_months: state.dashboard_config.history_months,
        }
    }
}

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month to show as "YYYY-MM", the current month if missing.
    pub period: Option<String>,
    /// Months to move relative to `period`, e.g. -1 for the month before.
    pub offset: Option<i32>,
    /// "list" or "analytics".
    pub view: Option<String>,
}

/// Which part of the dashboard is shown below the cards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    /// The transactions of the period.
    #[default]
    List,
    /// Category breakdown and monthly history.
    Analytics,
}

impl DashboardView {
    fn from_query(view: Option<&str>) -> Self {
        match view {
            Some(view) if view.eq_ignore_ascii_case("analytics") => DashboardView::Analytics,
            _ => DashboardView::List,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DashboardView::List => "list",
            DashboardView::Analytics => "analytics",
        }
    }
}

/// The dashboard URL for `period`, keeping `view` if it is not the default.
pub(crate) fn dashboard_url(period: Period, view: DashboardView) -> String {
    let period = period.to_string();
    let mut params = vec![("period", period.as_str())];

    if view != DashboardView::List {
        params.push(("view", view.as_str()));
    }

    match serde_urlencoded::to_string(params) {
        Ok(query) => format!("{}?{}", endpoints::DASHBOARD_VIEW, query),
        Err(error) => {
            tracing::error!("Could not encode dashboard query for {period}: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

/// Work out which period to show.
///
/// An invalid `period` falls back to the month containing `today`, and an
/// offset that leaves the supported date range is ignored.
fn resolve_period(query: &DashboardQuery, today: Date) -> Period {
    let current = Period::containing(today);

    let base = match query.period.as_deref() {
        Some(text) => text.parse().unwrap_or_else(|error| {
            tracing::warn!("Falling back to the current period: {error}");
            current
        }),
        None => current,
    };

    match query.offset {
        Some(offset) => base.offset(offset).unwrap_or(base),
        None => base,
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    period: Period,
    today: Date,
    view: DashboardView,
    metrics: PeriodMetrics,
    transactions: Vec<Transaction>,
    accounts: Vec<Account>,
    history: Vec<MonthlyTotals>,
    report: MaterializeReport,
}

/// Display the transactions and figures for one period.
///
/// Recurring entries due this month are generated first, so the page always
/// reflects every obligation for the current month.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let store = SQLiteLedgerStore::new(&connection);

    let report = materialize_recurrences(&store, today)?;
    let period = resolve_period(&query, today);
    let view = DashboardView::from_query(query.view.as_deref());

    let data = build_dashboard_data(&store, period, today, view, state.history_months, report)?;

    Ok(dashboard_view(data).into_response())
}

fn build_dashboard_data(
    store: &impl LedgerStore,
    period: Period,
    today: Date,
    view: DashboardView,
    history_months: usize,
    report: MaterializeReport,
) -> Result<DashboardData, Error> {
    let transactions = store
        .query_transactions(&TransactionQuery {
            date_range: Some(period.date_range()),
            status: None,
            sort_date: SortOrder::Ascending,
        })
        .inspect_err(|error| tracing::error!("could not get transactions for {period}: {error}"))?;

    let paid_transactions = store
        .query_transactions(&TransactionQuery {
            date_range: None,
            status: Some(TransactionStatus::Paid),
            sort_date: SortOrder::Ascending,
        })
        .inspect_err(|error| tracing::error!("could not get paid transactions: {error}"))?;

    let accounts = store
        .query_accounts()
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let metrics = summarize_period(&transactions, &paid_transactions, today);

    let history = match view {
        DashboardView::List => Vec::new(),
        DashboardView::Analytics => {
            let months = history_months.max(1);
            let first_day = period
                .trailing(months)
                .first()
                .map_or(period.first_day(), Period::first_day);
            let history_transactions = store
                .query_transactions(&TransactionQuery {
                    date_range: Some(first_day..=period.last_day()),
                    status: None,
                    sort_date: SortOrder::Ascending,
                })
                .inspect_err(|error| tracing::error!("could not get history: {error}"))?;

            history_series(&history_transactions, period, months)
        }
    };

    Ok(DashboardData {
        period,
        today,
        view,
        metrics,
        transactions,
        accounts,
        history,
        report,
    })
}

fn materialize_warning_view(report: &MaterializeReport) -> Markup {
    if report.failures.is_empty() {
        return html! {};
    }

    let failure_count = report.failures.len();

    html! {
        div
            id="materialize-warning"
            role="alert"
            class="w-full p-4 mb-4 text-sm rounded-lg border text-yellow-800 border-yellow-300
                bg-yellow-50 dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800"
        {
            span class="font-medium"
            {
                (failure_count)
                @if failure_count == 1 { " recurring entry" } @else { " recurring entries" }
                " could not be generated this month."
            }
            " The rest of the page is up to date. Check the server logs for details."
        }
    }
}

fn period_navigator_view(period: Period, today: Date, view: DashboardView) -> Markup {
    let current = Period::containing(today);

    html! {
        nav id="period-navigator" class="flex items-center justify-between w-full mb-4" aria-label="Period"
        {
            @if let Some(previous) = period.previous() {
                a href=(dashboard_url(previous, view)) class=(BUTTON_SECONDARY_STYLE) rel="prev" { "‹ Previous" }
            } @else {
                span {}
            }

            div class="flex flex-col items-center"
            {
                h2 class="text-lg font-bold tracking-wide" { (period.label()) }

                @if period != current {
                    a href=(dashboard_url(current, view)) class="text-xs text-blue-600 dark:text-blue-400"
                    {
                        "Back to this month"
                    }
                }
            }

            @if let Some(next) = period.next() {
                a href=(dashboard_url(next, view)) class=(BUTTON_SECONDARY_STYLE) rel="next" { "Next ›" }
            } @else {
                span {}
            }
        }
    }
}

fn view_switch(period: Period, view: DashboardView) -> Markup {
    const ACTIVE_STYLE: &str = "px-4 py-2 text-sm font-medium text-white bg-blue-600 rounded";
    const INACTIVE_STYLE: &str = "px-4 py-2 text-sm font-medium text-gray-700 rounded \
        hover:bg-gray-100 dark:text-gray-300 dark:hover:bg-gray-700";

    html! {
        div id="view-switch" class="flex gap-2 mb-4" role="tablist"
        {
            @for option in [DashboardView::List, DashboardView::Analytics] {
                @let is_selected = option == view;

                a
                    href=(dashboard_url(period, option))
                    role="tab"
                    aria-selected=(if is_selected { "true" } else { "false" })
                    class=(if is_selected { ACTIVE_STYLE } else { INACTIVE_STYLE })
                {
                    @match option {
                        DashboardView::List => "Transactions",
                        DashboardView::Analytics => "Analytics",
                    }
                }
            }
        }
    }
}

fn dashboard_view(data: DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let charts = match data.view {
        DashboardView::List => Vec::new(),
        DashboardView::Analytics => vec![
            DashboardChart {
                id: "history-chart",
                options: history_chart(&data.history).to_string(),
            },
            DashboardChart {
                id: "category-chart",
                options: category_chart(&data.metrics.categories).to_string(),
            },
        ],
    };

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white pb-24 lg:pb-8"
        {
            (materialize_warning_view(&data.report))
            (period_navigator_view(data.period, data.today, data.view))
            (summary_cards_view(&data.metrics))
            (view_switch(data.period, data.view))

            @match data.view {
                DashboardView::List => {
                    (transaction_list_view(&data.transactions, &data.accounts, data.today))
                }
                DashboardView::Analytics => {
                    (charts_view(&charts))

                    div class="grid grid-cols-1 xl:grid-cols-2 gap-6 w-full"
                    {
                        (category_breakdown_table(&data.metrics.categories))
                        (fixed_variable_table(data.metrics.fixed_variable))
                        (history_table(&data.history))
                    }
                }
            }
        }
    );

    let scripts = match data.view {
        DashboardView::List => Vec::new(),
        DashboardView::Analytics => vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&charts),
        ],
    };

    base("Dashboard", &scripts, &content)
}
