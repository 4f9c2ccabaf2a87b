use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use sentinel_ledger::{
    AccountId, Category, EntryInput, SQLiteLedgerStore, TransactionType, create_account,
    create_entry, initialize_db, materialize_recurrences,
};

/// A utility for creating a demo database for the Sentinel Ledger server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating accounts...");
    let checking = create_account("Checking", &conn)?;
    let credit_card = create_account("Credit Card", &conn)?;

    let today = OffsetDateTime::now_utc().date();
    let month_start = today.replace_day(1)?;
    let last_month = month_start - Duration::days(1);

    println!("Creating entries...");
    let store = SQLiteLedgerStore::new(&conn);

    let entries = [
        EntryInput {
            type_: TransactionType::Income,
            recurring: true,
            ..entry("Salary", 5200.0, Category::Work, month_start, checking.id)
        },
        EntryInput {
            recurring: true,
            ..entry("Rent", 1800.0, Category::Housing, month_start, checking.id)
        },
        entry("Groceries", 412.35, Category::Food, today, credit_card.id),
        EntryInput {
            installments: 12,
            ..entry("Laptop", 3600.0, Category::Other, last_month, credit_card.id)
        },
        entry("Pharmacy", 58.9, Category::Health, today, checking.id),
    ];

    for input in &entries {
        let applied = create_entry(&store, input)?;
        println!(
            "  {}: {} transaction(s){}",
            input.description,
            applied.transactions.len(),
            if applied.recurrence_rule.is_some() {
                ", recurring"
            } else {
                ""
            }
        );
    }

    let report = materialize_recurrences(&store, today)?;
    println!(
        "Materialized {} recurring transaction(s).",
        report.generated.len()
    );

    println!("Success!");

    Ok(())
}

/// A single expense.
fn entry(
    description: &str,
    amount: f64,
    category: Category,
    date: Date,
    account_id: AccountId,
) -> EntryInput {
    EntryInput {
        description: description.to_owned(),
        amount,
        type_: TransactionType::Expense,
        category,
        date,
        account_id: Some(account_id),
        installments: 1,
        recurring: false,
    }
}
