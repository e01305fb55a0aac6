//! Revenue Report - CLI tool for filtering, charting and exporting dashboard transactions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use revenue_dashboard::{
    chart::prepare_chart_data,
    csv_format::export_transactions_to_csv,
    download::{FileSystemHost, ObjectUrlDownloader},
    filter::{filter_transactions, Clock, FilterState, FixedClock, Period, SystemClock},
    format::{format_currency, format_date, DateStyle},
    read_json, read_transactions,
    summary::{available_balance, balance_items, user_initials},
    transform::transform_transactions,
    DisplayTransaction, Result, Transaction, TransactionStatus, TransactionType, User, Wallet,
};

#[derive(Parser)]
#[command(name = "revenue_report")]
#[command(about = "Filter, chart and export revenue dashboard transactions", long_about = None)]
struct Cli {
    /// Transactions JSON file (or stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    #[command(flatten)]
    filter: FilterArgs,

    /// Reference day for relative periods and export names (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FilterArgs {
    /// Filter state JSON file; the flags below override its fields
    #[arg(long = "filter")]
    filter_file: Option<String>,

    /// Inclusive lower bound (YYYY-MM-DD)
    #[arg(long = "start-date")]
    start_date: Option<NaiveDate>,

    /// Inclusive upper bound (YYYY-MM-DD)
    #[arg(long = "end-date")]
    end_date: Option<NaiveDate>,

    /// Relative period (Today, "Last 7 days", "This month", "Last 3 months")
    #[arg(long)]
    period: Option<Period>,

    /// Transaction type to keep (deposit, withdrawal); repeatable
    #[arg(long = "type")]
    types: Vec<TransactionType>,

    /// Transaction status to keep (successful, pending, failed); repeatable
    #[arg(long = "status")]
    statuses: Vec<TransactionStatus>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the transactions table
    Table,

    /// Print the daily net cash-flow series
    Chart {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Export the filtered transactions as CSV
    Export {
        /// Directory the CSV file is saved into
        #[arg(long = "output-dir", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Print the balance panel
    Summary {
        /// Wallet JSON file
        #[arg(long)]
        wallet: String,

        /// User JSON file
        #[arg(long)]
        user: Option<String>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let clock: Box<dyn Clock> = match cli.today {
        Some(day) => Box::new(FixedClock(day)),
        None => Box::new(SystemClock),
    };
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Summary { wallet, user } => {
            let wallet: Wallet = read_json(&mut File::open(wallet)?)?;
            let user: Option<User> = match user {
                Some(path) => Some(read_json(&mut File::open(path)?)?),
                None => None,
            };
            write_summary(&mut stdout, &wallet, user.as_ref())
        }
        Command::Chart { json } => {
            let transactions = load_transactions(cli.input.as_deref())?;
            write_chart(&mut stdout, &transactions, json)
        }
        Command::Table => {
            let transactions = load_transactions(cli.input.as_deref())?;
            let state = build_filter_state(&cli.filter)?;
            let rows = display_rows(&transactions, &state, clock.as_ref());
            write_table(&mut stdout, &rows)
        }
        Command::Export { output_dir } => {
            let transactions = load_transactions(cli.input.as_deref())?;
            let state = build_filter_state(&cli.filter)?;
            let rows = display_rows(&transactions, &state, clock.as_ref());

            let mut downloader = ObjectUrlDownloader::new(FileSystemHost::new(output_dir));
            export_transactions_to_csv(&rows, &mut downloader, clock.as_ref())?;
            for path in downloader.host().saved_files() {
                writeln!(stdout, "{}", path.display())?;
            }
            Ok(())
        }
    }
}

fn load_transactions(input: Option<&str>) -> Result<Vec<Transaction>> {
    match input {
        Some(input_path) => {
            let mut file = File::open(input_path)?;
            read_transactions(&mut file)
        }
        None => {
            let mut stdin = io::stdin();
            read_transactions(&mut stdin)
        }
    }
}

fn build_filter_state(args: &FilterArgs) -> Result<FilterState> {
    let mut state = match args.filter_file {
        Some(ref path) => read_json(&mut File::open(path)?)?,
        None => FilterState::new(),
    };

    if args.start_date.is_some() {
        state.start_date = args.start_date;
    }
    if args.end_date.is_some() {
        state.end_date = args.end_date;
    }
    if args.period.is_some() {
        state.selected_period = args.period;
    }
    if !args.types.is_empty() {
        state.transaction_types = args.types.iter().copied().collect();
    }
    if !args.statuses.is_empty() {
        state.transaction_statuses = args.statuses.iter().copied().collect();
    }

    Ok(state)
}

fn display_rows(
    transactions: &[Transaction],
    state: &FilterState,
    clock: &dyn Clock,
) -> Vec<DisplayTransaction> {
    let kept: Vec<Transaction> = filter_transactions(transactions, state, clock)
        .into_iter()
        .cloned()
        .collect();
    transform_transactions(&kept)
}

fn write_table<W: Write>(writer: &mut W, rows: &[DisplayTransaction]) -> Result<()> {
    writeln!(writer, "{} Transactions", rows.len())?;
    if rows.is_empty() {
        writeln!(writer, "No matching transactions")?;
        return Ok(());
    }

    for (index, row) in rows.iter().enumerate() {
        writeln!(
            writer,
            "{:<12} {:<8} {:<28} {:<20} {:>18} {}",
            row.row_key(index),
            row.display_type.label(),
            row.title,
            row.secondary_label().text,
            format_currency(row.transaction.amount),
            format_date(&row.transaction.date, DateStyle::Table),
        )?;
    }
    Ok(())
}

fn write_chart<W: Write>(writer: &mut W, transactions: &[Transaction], json: bool) -> Result<()> {
    let points = prepare_chart_data(transactions);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &points)?;
        writeln!(writer)?;
        return Ok(());
    }

    for point in &points {
        writeln!(writer, "{:<14} {:>18}", point.formatted_date, format_currency(point.amount))?;
    }
    Ok(())
}

fn write_summary<W: Write>(writer: &mut W, wallet: &Wallet, user: Option<&User>) -> Result<()> {
    if let Some(user) = user {
        writeln!(writer, "[{}] {} {}", user_initials(user), user.first_name, user.last_name)?;
    }

    let headline = available_balance(wallet);
    writeln!(writer, "{}: {}", headline.label, headline.value)?;
    for item in balance_items(wallet) {
        writeln!(writer, "  {:<16} {}", item.label, item.value)?;
    }
    Ok(())
}
