//! Balances and breakdowns derived from transactions.
//!
//! Every function here is pure: the same transactions (and `today`) always
//! give the same result. Sums are computed in whole cents, widened to `i128`
//! so that totals neither drift nor overflow.

use std::collections::BTreeMap;

use time::Date;

use crate::{
    amount::{from_cents, to_cents},
    category::Category,
    period::Period,
    transaction::{Transaction, TransactionStatus, TransactionType},
};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category the expenses belong to.
    pub category: Category,
    /// The sum of the expenses in the category.
    pub total: f64,
    /// Share of all expenses, 0 to 100.
    pub percent: f64,
}

/// Expenses split by whether they came from a recurring entry.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FixedVariableSplit {
    /// Expenses generated by recurring entries.
    pub fixed: f64,
    /// All other expenses.
    pub variable: f64,
}

/// Income and expenses for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotals {
    /// The month the totals are for.
    pub period: Period,
    /// The sum of income in the month.
    pub income: f64,
    /// The sum of expenses in the month.
    pub expense: f64,
}

/// The figures shown on the dashboard for a period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMetrics {
    /// Paid income minus paid expenses over all time.
    pub real_balance: f64,
    /// Income minus expenses in the period, paid or not.
    pub period_balance: f64,
    /// Expenses in the period that are yet to be paid.
    pub pending_total: f64,
    /// The number of pending expenses in the period that are overdue.
    pub late_count: usize,
    /// Expense totals per category, largest first.
    pub categories: Vec<CategoryTotal>,
    /// Expenses split into recurring and one-off.
    pub fixed_variable: FixedVariableSplit,
}

fn cents(transaction: &Transaction) -> i128 {
    i128::from(to_cents(transaction.amount))
}

fn sum_cents<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> i128 {
    transactions.map(cents).sum()
}

fn balance_cents<'a>(transactions: impl Iterator<Item = &'a Transaction> + Clone) -> i128 {
    let income = sum_cents(transactions.clone().filter(|t| t.type_ == TransactionType::Income));
    let expense = sum_cents(transactions.filter(|t| t.type_ == TransactionType::Expense));

    income - expense
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> + Clone {
    transactions
        .iter()
        .filter(|transaction| transaction.type_ == TransactionType::Expense)
}

/// Income minus expenses over the paid transactions only.
pub fn real_balance(transactions: &[Transaction]) -> f64 {
    from_cents(balance_cents(
        transactions
            .iter()
            .filter(|transaction| transaction.status == TransactionStatus::Paid),
    ))
}

/// Income minus expenses over every transaction, paid or pending.
pub fn period_balance(transactions: &[Transaction]) -> f64 {
    from_cents(balance_cents(transactions.iter()))
}

/// The sum of pending expenses.
pub fn pending_total(transactions: &[Transaction]) -> f64 {
    from_cents(sum_cents(
        expenses(transactions).filter(|transaction| transaction.status == TransactionStatus::Pending),
    ))
}

/// The number of pending expenses that were due before `today`.
pub fn late_count(transactions: &[Transaction], today: Date) -> usize {
    transactions
        .iter()
        .filter(|transaction| transaction.is_late(today))
        .count()
}

/// Expense totals per category, largest first.
///
/// Categories without expenses are left out. Equal totals keep the category
/// order. Percentages are 0 when there are no expenses.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut cents_by_category: BTreeMap<Category, i128> = BTreeMap::new();

    for transaction in expenses(transactions) {
        *cents_by_category.entry(transaction.category).or_default() += cents(transaction);
    }

    let total_cents: i128 = cents_by_category.values().sum();

    let mut totals: Vec<(Category, i128)> = cents_by_category.into_iter().collect();
    // Stable sort, so ties stay in category order.
    totals.sort_by(|(_, a), (_, b)| b.cmp(a));

    totals
        .into_iter()
        .map(|(category, category_cents)| CategoryTotal {
            category,
            total: from_cents(category_cents),
            percent: if total_cents == 0 {
                0.0
            } else {
                category_cents as f64 / total_cents as f64 * 100.0
            },
        })
        .collect()
}

/// Split expenses into recurring (fixed) and everything else (variable).
pub fn fixed_variable_split(transactions: &[Transaction]) -> FixedVariableSplit {
    let (fixed, variable): (Vec<&Transaction>, Vec<&Transaction>) =
        expenses(transactions).partition(|transaction| transaction.is_recurring);

    FixedVariableSplit {
        fixed: from_cents(sum_cents(fixed.into_iter())),
        variable: from_cents(sum_cents(variable.into_iter())),
    }
}

/// Income and expense totals for the `months` months ending with `end`, oldest first.
///
/// Months without transactions are included with zero totals, so the result
/// always has `months` entries. Transactions outside the window are ignored.
pub fn history_series(transactions: &[Transaction], end: Period, months: usize) -> Vec<MonthlyTotals> {
    let periods = end.trailing(months);
    let mut cents_by_period: BTreeMap<Period, (i128, i128)> =
        periods.iter().map(|period| (*period, (0, 0))).collect();

    for transaction in transactions {
        if let Some((income, expense)) = cents_by_period.get_mut(&Period::containing(transaction.date)) {
            match transaction.type_ {
                TransactionType::Income => *income += cents(transaction),
                TransactionType::Expense => *expense += cents(transaction),
            }
        }
    }

    cents_by_period
        .into_iter()
        .map(|(period, (income, expense))| MonthlyTotals {
            period,
            income: from_cents(income),
            expense: from_cents(expense),
        })
        .collect()
}

/// Compute the dashboard figures.
///
/// `period_rows` are the transactions dated within the period, `paid_rows`
/// are all paid transactions regardless of date.
pub fn summarize_period(
    period_rows: &[Transaction],
    paid_rows: &[Transaction],
    today: Date,
) -> PeriodMetrics {
    PeriodMetrics {
        real_balance: real_balance(paid_rows),
        period_balance: period_balance(period_rows),
        pending_total: pending_total(period_rows),
        late_count: late_count(period_rows, today),
        categories: category_breakdown(period_rows),
        fixed_variable: fixed_variable_split(period_rows),
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month, macros::date};

    use crate::{
        amount::MAX_AMOUNT,
        category::Category,
        period::Period,
        transaction::{Transaction, TransactionStatus, TransactionType},
    };

    use super::{
        CategoryTotal, FixedVariableSplit, MonthlyTotals, category_breakdown,
        fixed_variable_split, history_series, late_count, pending_total, period_balance,
        real_balance, summarize_period,
    };

    fn transaction(
        amount: f64,
        type_: TransactionType,
        status: TransactionStatus,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            description: String::new(),
            amount,
            type_,
            category: Category::Other,
            date,
            account_id: 1,
            status,
            is_recurring: false,
            import_id: None,
        }
    }

    fn expense(amount: f64, category: Category) -> Transaction {
        Transaction {
            category,
            ..transaction(
                amount,
                TransactionType::Expense,
                TransactionStatus::Paid,
                date!(2025 - 11 - 10),
            )
        }
    }

    #[test]
    fn real_balance_ignores_pending() {
        let rows = [
            transaction(1000.0, TransactionType::Income, TransactionStatus::Paid, date!(2025 - 11 - 01)),
            transaction(300.0, TransactionType::Expense, TransactionStatus::Paid, date!(2025 - 11 - 02)),
            transaction(500.0, TransactionType::Expense, TransactionStatus::Pending, date!(2025 - 11 - 03)),
        ];

        assert_eq!(real_balance(&rows), 700.0);
        assert_eq!(period_balance(&rows), 200.0);
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let row = transaction(
            MAX_AMOUNT,
            TransactionType::Expense,
            TransactionStatus::Pending,
            date!(2025 - 11 - 01),
        );
        // 10^19 cents in total, more than fits in an i64.
        let rows = vec![row; 100_000];

        assert_eq!(pending_total(&rows), 1e17);
        assert_eq!(period_balance(&rows), -1e17);
        assert_eq!(category_breakdown(&rows)[0].percent, 100.0);
    }

    #[test]
    fn toggling_to_paid_moves_real_balance_only() {
        let pending = [transaction(
            50.0,
            TransactionType::Expense,
            TransactionStatus::Pending,
            date!(2025 - 11 - 03),
        )];
        let paid = [Transaction {
            status: TransactionStatus::Paid,
            ..pending[0].clone()
        }];

        assert_eq!(real_balance(&paid) - real_balance(&pending), -50.0);
        assert_eq!(period_balance(&paid), period_balance(&pending));
    }

    #[test]
    fn pending_total_counts_pending_expenses() {
        let rows = [
            transaction(20.0, TransactionType::Expense, TransactionStatus::Pending, date!(2025 - 11 - 01)),
            transaction(30.0, TransactionType::Expense, TransactionStatus::Paid, date!(2025 - 11 - 01)),
            transaction(40.0, TransactionType::Income, TransactionStatus::Pending, date!(2025 - 11 - 01)),
        ];

        assert_eq!(pending_total(&rows), 20.0);
    }

    #[test]
    fn sums_do_not_drift() {
        let rows: Vec<_> = (0..10)
            .map(|_| transaction(0.1, TransactionType::Income, TransactionStatus::Paid, date!(2025 - 11 - 01)))
            .collect();

        assert_eq!(real_balance(&rows), 1.0);
    }

    #[test]
    fn counts_late_expenses() {
        let rows = [
            transaction(20.0, TransactionType::Expense, TransactionStatus::Pending, date!(2025 - 11 - 01)),
            transaction(20.0, TransactionType::Expense, TransactionStatus::Pending, date!(2025 - 11 - 20)),
            transaction(20.0, TransactionType::Expense, TransactionStatus::Paid, date!(2025 - 11 - 01)),
            transaction(20.0, TransactionType::Income, TransactionStatus::Pending, date!(2025 - 11 - 01)),
        ];

        assert_eq!(late_count(&rows, date!(2025 - 11 - 20)), 1);
    }

    #[test]
    fn breakdown_is_sorted_with_percentages() {
        let rows = [
            expense(25.0, Category::Food),
            expense(50.0, Category::Housing),
            expense(25.0, Category::Food),
            expense(100.0, Category::Transport),
            transaction(999.0, TransactionType::Income, TransactionStatus::Paid, date!(2025 - 11 - 01)),
        ];

        let got = category_breakdown(&rows);

        assert_eq!(
            got,
            vec![
                CategoryTotal { category: Category::Transport, total: 100.0, percent: 50.0 },
                CategoryTotal { category: Category::Housing, total: 50.0, percent: 25.0 },
                CategoryTotal { category: Category::Food, total: 50.0, percent: 25.0 },
            ]
        );
    }

    #[test]
    fn breakdown_percentages_sum_to_100() {
        let rows = [
            expense(10.0, Category::Food),
            expense(20.0, Category::Health),
            expense(33.33, Category::Leisure),
            expense(0.01, Category::Other),
        ];

        let total: f64 = category_breakdown(&rows).iter().map(|c| c.percent).sum();

        assert!((total - 100.0).abs() < 1e-9, "got {total}");
    }

    #[test]
    fn breakdown_without_expenses_is_empty() {
        let rows = [transaction(
            10.0,
            TransactionType::Income,
            TransactionStatus::Paid,
            date!(2025 - 11 - 01),
        )];

        assert_eq!(category_breakdown(&rows), vec![]);
        assert_eq!(category_breakdown(&[]), vec![]);
    }

    #[test]
    fn splits_fixed_and_variable() {
        let rows = [
            Transaction {
                is_recurring: true,
                ..expense(1200.0, Category::Housing)
            },
            expense(80.0, Category::Food),
            transaction(5000.0, TransactionType::Income, TransactionStatus::Paid, date!(2025 - 11 - 01)),
        ];

        assert_eq!(
            fixed_variable_split(&rows),
            FixedVariableSplit {
                fixed: 1200.0,
                variable: 80.0
            }
        );
    }

    #[test]
    fn history_is_zero_filled_and_chronological() {
        let rows = [
            transaction(100.0, TransactionType::Income, TransactionStatus::Paid, date!(2025 - 09 - 15)),
            transaction(40.0, TransactionType::Expense, TransactionStatus::Pending, date!(2025 - 11 - 01)),
            transaction(60.0, TransactionType::Expense, TransactionStatus::Paid, date!(2025 - 11 - 30)),
            // Outside the window
            transaction(1.0, TransactionType::Expense, TransactionStatus::Paid, date!(2025 - 12 - 01)),
        ];
        let end = Period::new(2025, Month::November).unwrap();

        let got = history_series(&rows, end, 3);

        assert_eq!(
            got,
            vec![
                MonthlyTotals { period: Period::new(2025, Month::September).unwrap(), income: 100.0, expense: 0.0 },
                MonthlyTotals { period: Period::new(2025, Month::October).unwrap(), income: 0.0, expense: 0.0 },
                MonthlyTotals { period: end, income: 0.0, expense: 100.0 },
            ]
        );
    }

    #[test]
    fn summary_is_deterministic() {
        let period_rows = [
            expense(10.0, Category::Food),
            transaction(20.0, TransactionType::Expense, TransactionStatus::Pending, date!(2025 - 11 - 01)),
        ];
        let paid_rows = [expense(10.0, Category::Food)];
        let today = date!(2025 - 11 - 15);

        let first = summarize_period(&period_rows, &paid_rows, today);
        let second = summarize_period(&period_rows, &paid_rows, today);

        assert_eq!(first, second);
        assert_eq!(first.real_balance, -10.0);
        assert_eq!(first.period_balance, -30.0);
        assert_eq!(first.pending_total, 20.0);
        assert_eq!(first.late_count, 1);
    }
}
