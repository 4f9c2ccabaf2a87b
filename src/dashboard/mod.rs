//! Dashboard module
//!
//! Shows one period at a time: summary cards, the period's transactions and an
//! analytics view with category breakdowns and monthly history.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;
mod transaction_list;

pub use aggregation::{
    CategoryTotal, FixedVariableSplit, MonthlyTotals, PeriodMetrics, category_breakdown,
    fixed_variable_split, history_series, late_count, pending_total, period_balance,
    real_balance, summarize_period,
};
pub(crate) use handlers::{DashboardView, dashboard_url};
pub use handlers::{DashboardQuery, DashboardState, get_dashboard_page};
