//! Expands one user-submitted entry into the transactions and recurrence rule it stands for.

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    account::{Account, AccountId},
    amount::{from_cents, is_valid_amount, parse_amount, to_cents},
    category::Category,
    period::add_months_clamped,
    recurrence::{RecurrenceRule, RecurrenceRuleBuilder},
    store::LedgerStore,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The most installments a single entry may be split into.
pub const MAX_INSTALLMENTS: u32 = 120;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// The form data for a new entry, exactly as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryForm {
    /// What the entry is for.
    pub description: String,
    /// The amount as typed, e.g. "1.234,56" or "1,234.56".
    pub amount: String,
    /// Whether money comes in or goes out.
    pub type_: TransactionType,
    /// The category identifier or label, [Category::Other] if empty.
    pub category: Option<String>,
    /// The date in the format YYYY-MM-DD.
    pub date: String,
    /// The account the money moves in or out of.
    pub account_id: Option<AccountId>,
    /// Defaults to a single installment.
    pub installments: Option<u32>,
    /// Whether the entry repeats every month.
    #[serde(default)]
    pub recurring: bool,
}

/// A parsed entry, ready to be expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    /// The untrimmed description.
    pub description: String,
    /// The total amount, greater than zero.
    pub amount: f64,
    /// Whether money comes in or goes out.
    pub type_: TransactionType,
    /// The category of every transaction the entry creates.
    pub category: Category,
    /// The date of the entry, or of the first installment.
    pub date: Date,
    /// The account, validated against the stored accounts.
    pub account_id: Option<AccountId>,
    /// 1 for a plain entry.
    pub installments: u32,
    /// Repeat the entry every month on the same day.
    pub recurring: bool,
}

impl TryFrom<EntryForm> for EntryInput {
    type Error = Error;

    fn try_from(form: EntryForm) -> Result<Self, Self::Error> {
        let category = match form.category.as_deref().map(str::trim) {
            None | Some("") => Category::default(),
            Some(category) => category.parse()?,
        };

        Ok(Self {
            amount: parse_amount(&form.amount)?,
            date: parse_date(&form.date)?,
            description: form.description,
            type_: form.type_,
            category,
            account_id: form.account_id,
            installments: form.installments.unwrap_or(1),
            recurring: form.recurring,
        })
    }
}

/// Parse a date in the format YYYY-MM-DD.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Everything an entry writes to the store, computed before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionPlan {
    /// The transactions to insert, in date order.
    pub transactions: Vec<TransactionBuilder>,
    /// The rule to insert for a recurring entry.
    pub recurrence_rule: Option<RecurrenceRuleBuilder>,
}

/// What was written for an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEntry {
    /// The inserted transactions with their IDs.
    pub transactions: Vec<Transaction>,
    /// The inserted rule, if the entry repeats.
    pub recurrence_rule: Option<RecurrenceRule>,
}

// ============================================================================
// EXPANSION
// ============================================================================

/// Check the fields shared by new and edited entries.
///
/// Returns the trimmed description.
///
/// # Errors
/// Returns [Error::InvalidAmount] for an amount that is not a whole number of
/// cents between one cent and [MAX_AMOUNT](crate::amount::MAX_AMOUNT), [Error::EmptyDescription] for a blank description and
/// [Error::InvalidAccount] if `account_id` is missing or not one of `accounts`.
pub fn validate_fields<'a>(
    description: &'a str,
    amount: f64,
    account_id: Option<AccountId>,
    accounts: &[Account],
) -> Result<(&'a str, AccountId), Error> {
    if !is_valid_amount(amount) {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    let description = description.trim();
    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }

    let account_id = account_id
        .filter(|id| accounts.iter().any(|account| account.id == *id))
        .ok_or(Error::InvalidAccount(account_id))?;

    Ok((description, account_id))
}

/// Work out the transactions, and the recurrence rule if any, for `input`.
///
/// - Installments: one pending expense per month starting on the entry date,
///   the description suffixed with e.g. " (2/3)". The amount is split in
///   cents and the last installment absorbs the remainder, so the
///   installments always add up to the entry amount. Dates past the end of a
///   shorter month are moved back to its last day.
/// - Recurring: one pending, recurring transaction plus a rule due on the
///   same day each month, with the entry date as the watermark.
/// - Otherwise a single pending transaction.
///
/// Nothing is written to the store.
///
/// # Errors
/// Returns a validation error if the input is invalid, see [validate_fields].
/// Installments must be between 1 and [MAX_INSTALLMENTS], are only allowed
/// for expenses and cannot be combined with a recurring entry.
pub fn expand(input: &EntryInput, accounts: &[Account]) -> Result<ExpansionPlan, Error> {
    let (description, account_id) =
        validate_fields(&input.description, input.amount, input.account_id, accounts)?;

    if input.installments == 0 || input.installments > MAX_INSTALLMENTS {
        return Err(Error::InvalidInstallments(input.installments));
    }

    if input.installments > 1 {
        if input.type_ != TransactionType::Expense {
            return Err(Error::InstallmentsOnIncome);
        }

        if input.recurring {
            return Err(Error::RecurringInstallments);
        }

        return Ok(ExpansionPlan {
            transactions: split_installments(input, description, account_id)?,
            recurrence_rule: None,
        });
    }

    let transaction = Transaction::build(input.amount, input.date, description, account_id)
        .type_(input.type_)
        .category(input.category)
        .recurring(input.recurring);

    let recurrence_rule = input
        .recurring
        .then(|| RecurrenceRuleBuilder::from_first_occurrence(&transaction));

    Ok(ExpansionPlan {
        transactions: vec![transaction],
        recurrence_rule,
    })
}

fn split_installments(
    input: &EntryInput,
    description: &str,
    account_id: AccountId,
) -> Result<Vec<TransactionBuilder>, Error> {
    let count = input.installments;
    let total_cents = to_cents(input.amount);
    let installment_cents = total_cents / i64::from(count);

    if installment_cents == 0 {
        return Err(Error::InstallmentAmountTooSmall(count));
    }

    let last_installment_cents = total_cents - installment_cents * i64::from(count - 1);

    (0..count)
        .map(|i| {
            let months = i32::try_from(i).map_err(|_| Error::InvalidInstallments(count))?;
            let date = add_months_clamped(input.date, months)
                .ok_or_else(|| Error::InvalidDate(input.date.to_string()))?;
            let cents = if i + 1 == count {
                last_installment_cents
            } else {
                installment_cents
            };

            Ok(Transaction::build(
                from_cents(cents),
                date,
                &format!("{description} ({}/{count})", i + 1),
                account_id,
            )
            .type_(input.type_)
            .category(input.category))
        })
        .collect()
}

/// Write `plan` to the store, all or nothing.
pub fn apply_plan(store: &impl LedgerStore, plan: &ExpansionPlan) -> Result<AppliedEntry, Error> {
    store.atomically(|store| {
        let transactions = store.insert_transactions(&plan.transactions)?;

        let recurrence_rule = plan
            .recurrence_rule
            .as_ref()
            .map(|rule| store.insert_recurrence_rule(rule))
            .transpose()?;

        Ok(AppliedEntry {
            transactions,
            recurrence_rule,
        })
    })
}

/// Validate, expand and store a new entry.
pub fn create_entry(store: &impl LedgerStore, input: &EntryInput) -> Result<AppliedEntry, Error> {
    let accounts = store.query_accounts()?;
    let plan = expand(input, &accounts)?;
    let applied = apply_plan(store, &plan)?;

    tracing::info!(
        "created entry \"{}\" with {} transaction(s){}",
        input.description.trim(),
        applied.transactions.len(),
        if applied.recurrence_rule.is_some() {
            " and a recurrence rule"
        } else {
            ""
        }
    );

    Ok(applied)
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod form_tests {
    use time::macros::date;

    use crate::{Error, category::Category, transaction::TransactionType};

    use super::{EntryForm, EntryInput};

    fn form() -> EntryForm {
        EntryForm {
            description: "Groceries".to_owned(),
            amount: "1.234,56".to_owned(),
            type_: TransactionType::Expense,
            category: Some("food".to_owned()),
            date: "2025-10-05".to_owned(),
            account_id: Some(1),
            installments: None,
            recurring: false,
        }
    }

    #[test]
    fn parses_form() {
        let input = EntryInput::try_from(form()).unwrap();

        assert_eq!(
            input,
            EntryInput {
                description: "Groceries".to_owned(),
                amount: 1234.56,
                type_: TransactionType::Expense,
                category: Category::Food,
                date: date!(2025 - 10 - 05),
                account_id: Some(1),
                installments: 1,
                recurring: false,
            }
        );
    }

    #[test]
    fn missing_category_is_other() {
        let input = EntryInput::try_from(EntryForm {
            category: None,
            ..form()
        })
        .unwrap();

        assert_eq!(input.category, Category::Other);
    }

    #[test]
    fn rejects_bad_amount_and_date() {
        assert_eq!(
            EntryInput::try_from(EntryForm {
                amount: "abc".to_owned(),
                ..form()
            }),
            Err(Error::InvalidAmount("abc".to_owned()))
        );
        assert_eq!(
            EntryInput::try_from(EntryForm {
                date: "2025-02-30".to_owned(),
                ..form()
            }),
            Err(Error::InvalidDate("2025-02-30".to_owned()))
        );
    }

    #[test]
    fn decodes_urlencoded_form() {
        let form: EntryForm = serde_html_form::from_str(
            "description=Rent&amount=1200&type_=expense&category=housing\
            &date=2025-10-05&account_id=1&installments=1&recurring=true",
        )
        .unwrap();

        assert_eq!(form.amount, "1200");
        assert_eq!(form.type_, TransactionType::Expense);
        assert_eq!(form.account_id, Some(1));
        assert!(form.recurring);
    }
}

#[cfg(test)]
mod store_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::create_account,
        category::Category,
        db::initialize,
        recurrence::materialize_recurrences,
        store::{LedgerStore, SQLiteLedgerStore},
        transaction::{TransactionQuery, TransactionStatus, TransactionType},
    };

    use super::{EntryInput, apply_plan, create_entry, expand};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Checking", &conn).unwrap();
        conn
    }

    fn rent() -> EntryInput {
        EntryInput {
            description: "Rent".to_owned(),
            amount: 1200.0,
            type_: TransactionType::Expense,
            category: Category::Housing,
            date: date!(2025 - 10 - 05),
            account_id: Some(1),
            installments: 1,
            recurring: true,
        }
    }

    #[test]
    fn recurring_rent_scenario() {
        let conn = get_test_connection();
        let store = SQLiteLedgerStore::new(&conn);

        let applied = create_entry(&store, &rent()).unwrap();
        assert!(applied.recurrence_rule.is_some());

        let first = materialize_recurrences(&store, date!(2025 - 11 - 20)).unwrap();
        let second = materialize_recurrences(&store, date!(2025 - 11 - 25)).unwrap();

        assert_eq!(first.generated.len(), 1);
        assert_eq!(second.generated.len(), 0);
        let dates: Vec<_> = store
            .query_transactions(&TransactionQuery::default())
            .unwrap()
            .into_iter()
            .map(|transaction| (transaction.date, transaction.status, transaction.is_recurring))
            .collect();
        assert_eq!(
            dates,
            vec![
                (date!(2025 - 10 - 05), TransactionStatus::Pending, true),
                (date!(2025 - 11 - 05), TransactionStatus::Pending, true),
            ]
        );
    }

    #[test]
    fn installment_scenario_is_stored() {
        let conn = get_test_connection();
        let store = SQLiteLedgerStore::new(&conn);

        let applied = create_entry(
            &store,
            &EntryInput {
                description: "Phone".to_owned(),
                amount: 300.0,
                date: date!(2025 - 01 - 10),
                installments: 3,
                recurring: false,
                ..rent()
            },
        )
        .unwrap();

        assert_eq!(applied.recurrence_rule, None);
        let stored = store.query_transactions(&TransactionQuery::default()).unwrap();
        assert_eq!(stored, applied.transactions);
        assert_eq!(stored.len(), 3);
        assert_eq!(store.query_active_recurrence_rules().unwrap(), vec![]);
    }

    #[test]
    fn invalid_entry_writes_nothing() {
        let conn = get_test_connection();
        let store = SQLiteLedgerStore::new(&conn);

        let result = create_entry(
            &store,
            &EntryInput {
                description: String::new(),
                ..rent()
            },
        );

        assert!(result.is_err());
        assert_eq!(store.query_transactions(&TransactionQuery::default()).unwrap(), vec![]);
        assert_eq!(store.query_active_recurrence_rules().unwrap(), vec![]);
    }

    #[test]
    fn plan_is_applied_all_or_nothing() {
        let conn = get_test_connection();
        let store = SQLiteLedgerStore::new(&conn);
        let mut plan = expand(&rent(), &store.query_accounts().unwrap()).unwrap();
        // The rule refers to an account that does not exist, so inserting it fails.
        if let Some(rule) = plan.recurrence_rule.as_mut() {
            rule.account_id = 99;
        }

        let result = apply_plan(&store, &plan);

        assert!(result.is_err());
        assert_eq!(store.query_transactions(&TransactionQuery::default()).unwrap(), vec![]);
    }
}
