//! Parses delimited text exports into transactions.
//!
//! The first line is a header. Every following record is read by position:
//! date, description, amount, category and type. Category and type may be
//! left out.

use csv::{ReaderBuilder, StringRecord, Trim};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    account::AccountId,
    amount::parse_signed_amount,
    category::Category,
    transaction::{Transaction, TransactionBuilder, TransactionStatus, TransactionType},
};

const DATE_COLUMN: usize = 0;
const DESCRIPTION_COLUMN: usize = 1;
const AMOUNT_COLUMN: usize = 2;
const CATEGORY_COLUMN: usize = 3;
const TYPE_COLUMN: usize = 4;

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const DAY_FIRST_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// The transactions found in a CSV document and the lines that were left out.
#[derive(Debug, PartialEq)]
pub struct ParseCSVResult {
    /// Paid transactions in file order, may be empty.
    pub transactions: Vec<TransactionBuilder>,
    /// Records that could not be parsed, in file order.
    pub skipped_lines: Vec<SkippedLine>,
}

/// A record that could not be turned into a transaction.
#[derive(Debug, PartialEq)]
pub struct SkippedLine {
    /// One-based line number in the file.
    pub line_number: u64,
    /// Why the record was left out.
    pub reason: String,
}

/// Parse `text` into paid transactions for `account_id`.
///
/// The delimiter is either a comma or a semicolon, whichever appears more often
/// in the header. Dates may be written as YYYY-MM-DD or DD/MM/YYYY. The sign of
/// the amount decides the type when the type column is empty. Unknown
/// categories fall back to [Category::Other].
///
/// Malformed records are skipped and listed in [ParseCSVResult::skipped_lines]
/// instead of failing the whole file.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the text is empty or the header has fewer
/// than three columns.
pub fn parse_csv(text: &str, account_id: AccountId) -> Result<ParseCSVResult, Error> {
    let header = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| Error::InvalidCSV("the file is empty".to_owned()))?;
    let delimiter = sniff_delimiter(header);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let column_count = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(format!("could not read the header: {error}")))?
        .len();
    if column_count <= AMOUNT_COLUMN {
        return Err(Error::InvalidCSV(format!(
            "expected at least the columns date, description and amount, got {column_count} column(s)"
        )));
    }

    let mut result = ParseCSVResult {
        transactions: Vec::new(),
        skipped_lines: Vec::new(),
    };

    for record in reader.records() {
        let parsed = record
            .map_err(|error| {
                let line_number = error.position().map_or(0, |position| position.line());
                (line_number, error.to_string())
            })
            .and_then(|record| {
                let line_number = record.position().map_or(0, |position| position.line());
                parse_record(&record, delimiter, account_id)
                    .map_err(|reason| (line_number, reason))
            });

        match parsed {
            Ok(transaction) => result.transactions.push(transaction),
            Err((line_number, reason)) => {
                tracing::warn!("skipping CSV line {line_number}: {reason}");
                result.skipped_lines.push(SkippedLine {
                    line_number,
                    reason,
                });
            }
        }
    }

    Ok(result)
}

fn sniff_delimiter(header: &str) -> u8 {
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

fn parse_record(
    record: &StringRecord,
    delimiter: u8,
    account_id: AccountId,
) -> Result<TransactionBuilder, String> {
    let field = |index: usize| record.get(index).filter(|value| !value.is_empty());

    let date = field(DATE_COLUMN).ok_or("missing date")?;
    let date = parse_import_date(date).ok_or_else(|| format!("\"{date}\" is not a valid date"))?;

    let description = field(DESCRIPTION_COLUMN).ok_or("missing description")?;

    let amount = field(AMOUNT_COLUMN).ok_or("missing amount")?;
    let amount = parse_signed_amount(amount).map_err(|error| error.to_string())?;
    if amount == 0.0 {
        return Err("the amount is zero".to_owned());
    }

    let category = field(CATEGORY_COLUMN)
        .map(|category| category.parse().unwrap_or(Category::Other))
        .unwrap_or_default();

    let type_ = match field(TYPE_COLUMN) {
        Some(text) => parse_type(text).ok_or_else(|| format!("\"{text}\" is not a valid type"))?,
        None if amount < 0.0 => TransactionType::Expense,
        None => TransactionType::Income,
    };

    let normalized_line = record
        .iter()
        .collect::<Vec<_>>()
        .join(&char::from(delimiter).to_string());

    Ok(
        Transaction::build(amount.abs(), date, description, account_id)
            .type_(type_)
            .category(category)
            .status(TransactionStatus::Paid)
            .import_id(Some(create_import_id(account_id, &normalized_line))),
    )
}

fn parse_import_date(text: &str) -> Option<Date> {
    Date::parse(text, ISO_DATE_FORMAT)
        .or_else(|_| Date::parse(text, DAY_FIRST_DATE_FORMAT))
        .ok()
}

fn parse_type(text: &str) -> Option<TransactionType> {
    match text.to_lowercase().as_str() {
        "income" | "credit" | "receita" => Some(TransactionType::Income),
        "expense" | "debit" | "despesa" => Some(TransactionType::Expense),
        _ => None,
    }
}

/// Creates a hash identifying a CSV record imported into `account_id`.
///
/// The same record imported into two accounts gets two different IDs.
pub fn create_import_id(account_id: AccountId, csv_line: &str) -> i64 {
    let hash_128 = md5::compute(format!("{account_id}:{csv_line}"));
    let mut hash_64 = [0; 8];
    hash_64.copy_from_slice(&hash_128[0..8]);
    i64::from_le_bytes(hash_64)
}

#[cfg(test)]
mod parse_csv_tests {
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        transaction::{Transaction, TransactionStatus, TransactionType},
    };

    use super::{create_import_id, parse_csv};

    #[test]
    fn parses_comma_separated_records() {
        let text = "date,description,amount,category,type\n\
            2025-03-01,Salary,5000.00,work,income\n\
            2025-03-02,\"Groceries, weekly\",-123.45,food,\n\
            2025-03-03,Bus,4.50,transport,expense\n";

        let result = parse_csv(text, 1).unwrap();

        assert_eq!(result.skipped_lines, vec![]);
        assert_eq!(
            result.transactions,
            vec![
                Transaction::build(5000.0, date!(2025 - 03 - 01), "Salary", 1)
                    .type_(TransactionType::Income)
                    .category(Category::Work)
                    .status(TransactionStatus::Paid)
                    .import_id(Some(create_import_id(
                        1,
                        "2025-03-01,Salary,5000.00,work,income"
                    ))),
                Transaction::build(123.45, date!(2025 - 03 - 02), "Groceries, weekly", 1)
                    .type_(TransactionType::Expense)
                    .category(Category::Food)
                    .status(TransactionStatus::Paid)
                    .import_id(Some(create_import_id(
                        1,
                        "2025-03-02,Groceries, weekly,-123.45,food,"
                    ))),
                Transaction::build(4.5, date!(2025 - 03 - 03), "Bus", 1)
                    .type_(TransactionType::Expense)
                    .category(Category::Transport)
                    .status(TransactionStatus::Paid)
                    .import_id(Some(create_import_id(
                        1,
                        "2025-03-03,Bus,4.50,transport,expense"
                    ))),
            ]
        );
    }

    #[test]
    fn sniffs_semicolons_and_local_formats() {
        let text = "Data;Descrição;Valor;Categoria\n\
            05/04/2025;Aluguel;-1.200,00;Moradia\n\
            06/04/2025;Cinema;R$ 32,50;Lazer\n";

        let result = parse_csv(text, 2).unwrap();

        assert_eq!(result.transactions.len(), 2);
        let rent = &result.transactions[0];
        assert_eq!(rent.date, date!(2025 - 04 - 05));
        assert_eq!(rent.amount, 1200.0);
        assert_eq!(rent.type_, TransactionType::Expense);
        assert_eq!(rent.category, Category::Housing);
        assert_eq!(rent.account_id, 2);
        let cinema = &result.transactions[1];
        assert_eq!(cinema.amount, 32.5);
        assert_eq!(cinema.type_, TransactionType::Income);
        assert_eq!(cinema.category, Category::Leisure);
    }

    #[test]
    fn skips_and_counts_malformed_lines() {
        let text = "date,description,amount,category,type\n\
            2025-03-01,Salary,5000,work,income\n\
            not a date,Coffee,3.50,,\n\
            2025-03-02,,10,,\n\
            2025-03-03,Lunch\n\
            2025-03-04,Tea,abc,,\n\
            2025-03-05,Refund,0,,\n\
            2025-03-06,Gift,20,,gift\n\
            2025-03-07,Snack,2.5,snacks,expense\n";

        let result = parse_csv(text, 1).unwrap();

        let line_numbers: Vec<u64> = result
            .skipped_lines
            .iter()
            .map(|line| line.line_number)
            .collect();
        assert_eq!(line_numbers, vec![3, 4, 5, 6, 7, 8]);
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.transactions[1].description, "Snack");
        assert_eq!(result.transactions[1].category, Category::Other);
    }

    #[test]
    fn skips_sub_cent_and_oversized_amounts() {
        let text = "date,description,amount\n\
            2025-03-01,Rounding,0.004\n\
            2025-03-02,Typo,-100000000000000000\n\
            2025-03-03,Fee,-0.016\n";

        let result = parse_csv(text, 1).unwrap();

        let line_numbers: Vec<u64> = result
            .skipped_lines
            .iter()
            .map(|line| line.line_number)
            .collect();
        assert_eq!(line_numbers, vec![2, 3]);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].amount, 0.02);
        assert_eq!(result.transactions[0].type_, TransactionType::Expense);
    }

    #[test]
    fn rejects_empty_file_and_short_header() {
        assert!(matches!(parse_csv("", 1), Err(Error::InvalidCSV(_))));
        assert!(matches!(
            parse_csv("date,description\n2025-01-01,Coffee\n", 1),
            Err(Error::InvalidCSV(_))
        ));
    }

    #[test]
    fn import_id_depends_on_line_and_account() {
        let line = "2025-03-01,Salary,5000.00,work,income";

        assert_eq!(create_import_id(1, line), create_import_id(1, line));
        assert_ne!(create_import_id(1, line), create_import_id(2, line));
        assert_ne!(
            create_import_id(1, line),
            create_import_id(1, "2025-03-01,Salary,5000.01,work,income")
        );
    }
}
