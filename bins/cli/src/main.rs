//! Tripsplit command line
//!
//! Reads and writes trip snapshots on disk and prints balances and
//! settlement suggestions.

mod commands;
mod identity;
mod render;
mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripsplit_rates::RateService;
use tripsplit_shared::{AppConfig, AppResult};
use tripsplit_shared::types::{Currency, TripId};

use crate::commands::{Context, EditArgs, ExpenseArgs};
use crate::identity::CliIdentity;
use crate::render::render_error;
use crate::store::JsonSnapshotStore;

#[derive(Parser)]
#[command(
    name = "tripsplit",
    version,
    about = "Split shared trip expenses and settle up",
    long_about = "Tripsplit keeps a shared ledger per trip in one base currency, \
                  splits each expense to the exact cent and suggests who should \
                  pay whom to settle up."
)]
struct Cli {
    /// Directory holding trip files
    #[arg(long, env = "TRIPSPLIT_DATA_DIR", default_value = "trips", global = true)]
    data_dir: PathBuf,

    /// Participant running the command
    #[arg(long = "as", env = "TRIPSPLIT_AS", global = true)]
    as_participant: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a trip
    Init {
        /// Trip name
        #[arg(long)]
        name: String,
        /// Base currency (defaults to ledger.default_currency)
        #[arg(long)]
        currency: Option<Currency>,
        /// IANA timezone for expense dates
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Join a trip with an invite token
    Join {
        /// Trip ID
        trip: TripId,
        /// Invite token
        #[arg(long)]
        token: String,
    },

    /// Show or rotate the invite token (admins only)
    Invite {
        /// Trip ID
        trip: TripId,
        /// Replace the token, invalidating shared links
        #[arg(long)]
        rotate: bool,
    },

    /// Record an expense
    #[command(alias = "add")]
    Expense(ExpenseArgs),

    /// Replace an expense with new values
    Edit(EditArgs),

    /// Show balances and suggested transfers
    Summary {
        /// Trip ID
        trip: TripId,
    },

    /// Convert an amount between currencies
    Convert {
        /// Amount in major units
        amount: String,
        /// Source currency
        #[arg(long)]
        from: Currency,
        /// Target currency
        #[arg(long)]
        to: Currency,
        /// Rate to use instead of the day's default
        #[arg(long)]
        rate: Option<Decimal>,
        /// Day of the default rate (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a payment between two members
    Settle {
        /// Trip ID
        trip: TripId,
        /// Who paid (defaults to the acting participant)
        #[arg(long)]
        from: Option<String>,
        /// Who received
        #[arg(long)]
        to: String,
        /// Amount in the trip currency
        #[arg(long)]
        amount: String,
        /// Day of the payment (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripsplit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !err.is_user_facing() {
                tracing::error!(code = err.error_code(), error = %err, "Command failed");
            }
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load()?;
    let rates = RateService::from_config(&config.rates)?;

    let ctx = Context {
        config,
        store: JsonSnapshotStore::new(cli.data_dir),
        identity: CliIdentity::new(cli.as_participant.as_deref()),
        rates,
    };

    match cli.command {
        Commands::Init {
            name,
            currency,
            timezone,
        } => commands::init(&ctx, &name, currency, timezone.as_deref()),
        Commands::Join { trip, token } => commands::join(&ctx, trip, &token),
        Commands::Invite { trip, rotate } => commands::invite(&ctx, trip, rotate),
        Commands::Expense(args) => commands::expense(&ctx, args).await,
        Commands::Edit(args) => commands::edit(&ctx, args).await,
        Commands::Summary { trip } => commands::summary(&ctx, trip),
        Commands::Convert {
            amount,
            from,
            to,
            rate,
            date,
        } => commands::convert_amount(&ctx, &amount, from, to, rate, date).await,
        Commands::Settle {
            trip,
            from,
            to,
            amount,
            date,
        } => commands::settle(&ctx, trip, from.as_deref(), &to, &amount, date),
    }
}
