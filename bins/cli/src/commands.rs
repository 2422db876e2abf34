//! Command handlers.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use tripsplit_core::ValidationError;
use tripsplit_core::allocation::SplitPolicy;
use tripsplit_core::currency::{convert, resolve_rate};
use tripsplit_core::ledger::{Expense, ExpenseDraft, Settlement};
use tripsplit_core::money::{format_minor, parse_minor};
use tripsplit_core::trip::{ParticipantContext, SnapshotSource, Trip, TripSnapshot, summarize};
use tripsplit_rates::RateService;
use tripsplit_shared::{AppConfig, AppError, AppResult};
use tripsplit_shared::types::{Currency, ExpenseId, ParticipantId, TripId};

use crate::identity::{CliIdentity, require_participant};
use crate::render::render_summary;
use crate::store::JsonSnapshotStore;

/// Everything a command needs.
pub struct Context {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Trip files.
    pub store: JsonSnapshotStore,
    /// Acting participant.
    pub identity: CliIdentity,
    /// Default-rate lookup.
    pub rates: RateService,
}

/// How an expense is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    /// Evenly, leftover units to the first participants.
    Equal,
    /// Amounts given per participant in the expense currency.
    Exact,
    /// Percentages adding up to 100.
    Percent,
    /// Relative weights.
    Weights,
}

/// Arguments of `tripsplit expense`.
#[derive(Debug, Args)]
pub struct ExpenseArgs {
    /// Trip ID
    pub trip: TripId,
    /// What was bought
    #[arg(long)]
    pub title: String,
    /// Amount in major units, e.g. 1000 or 12,50
    #[arg(long)]
    pub amount: String,
    /// Currency paid in (defaults to the trip currency)
    #[arg(long)]
    pub currency: Option<Currency>,
    /// Rate to the trip currency; fetched when omitted
    #[arg(long)]
    pub rate: Option<Decimal>,
    /// Expense date (YYYY-MM-DD, defaults to today in the trip timezone)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Who paid (defaults to the acting participant)
    #[arg(long)]
    pub paid_by: Option<String>,
    /// Split policy
    #[arg(long, value_enum, default_value_t = SplitArg::Equal)]
    pub split: SplitArg,
    /// Participants sharing the expense, comma separated
    #[arg(long, value_delimiter = ',')]
    pub involved: Vec<String>,
    /// Per-participant value as id=value; repeat for each participant
    #[arg(long = "share")]
    pub shares: Vec<String>,
}

/// Creates a trip with the acting participant as admin.
pub fn init(
    ctx: &Context,
    name: &str,
    currency: Option<Currency>,
    timezone: Option<&str>,
) -> AppResult<()> {
    let creator = require_participant(&ctx.identity)?;
    let currency = currency.unwrap_or(ctx.config.ledger.default_currency);

    let mut trip = Trip::create(name, currency, creator)?;
    if let Some(timezone) = timezone {
        trip.set_timezone(timezone)?;
    }
    let token = trip.ensure_invite_token().to_string();
    let snapshot = TripSnapshot::new(trip);
    ctx.store.save(&snapshot)?;

    tracing::info!(trip_id = %snapshot.trip.id, %currency, "Created trip");
    println!("Created trip {} ({currency})", snapshot.trip.id);
    println!("Invite token: {token}");
    Ok(())
}

/// Joins a trip with an invite token.
pub fn join(ctx: &Context, trip_id: TripId, token: &str) -> AppResult<()> {
    let participant = require_participant(&ctx.identity)?;
    let mut snapshot = ctx.store.load_snapshot(trip_id)?;

    if snapshot.trip.join(participant.clone(), token)? {
        ctx.store.save(&snapshot)?;
        tracing::info!(%trip_id, %participant, "Joined trip");
        println!("{participant} joined {}", snapshot.trip.name);
    } else {
        println!("{participant} is already a member of {}", snapshot.trip.name);
    }
    Ok(())
}

/// Shows the invite token, optionally replacing it.
pub fn invite(ctx: &Context, trip_id: TripId, rotate: bool) -> AppResult<()> {
    let participant = require_participant(&ctx.identity)?;
    let mut snapshot = ctx.store.load_snapshot(trip_id)?;
    snapshot.trip.require_admin(&participant)?;

    let had_token = snapshot.trip.invite_token.is_some();
    let token = if rotate {
        snapshot.trip.rotate_invite_token().to_string()
    } else {
        snapshot.trip.ensure_invite_token().to_string()
    };
    if rotate || !had_token {
        ctx.store.save(&snapshot)?;
    }
    println!("Invite token: {token}");
    Ok(())
}

/// Arguments of `tripsplit edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Expense to replace
    #[arg(long)]
    pub expense: ExpenseId,
    /// New contents of the expense
    #[command(flatten)]
    pub fields: ExpenseArgs,
}

/// Records an expense.
pub async fn expense(ctx: &Context, args: ExpenseArgs) -> AppResult<()> {
    let author = require_participant(&ctx.identity)?;
    let trip_id = args.trip;
    let mut snapshot = ctx.store.load_snapshot(trip_id)?;

    let (draft, default_rate) = build_draft(ctx, &snapshot.trip, args, &author).await?;
    let date = draft.date;
    let expense = rate_hint(Expense::compute(draft, &snapshot.trip, default_rate, &author), date)?;

    print_expense("Recorded", &expense);
    tracing::info!(%trip_id, expense_id = %expense.id, "Recorded expense");
    snapshot.expenses.items.push(expense);
    ctx.store.save(&snapshot)?;
    Ok(())
}

/// Replaces an expense with newly entered values, keeping its ID and author.
pub async fn edit(ctx: &Context, args: EditArgs) -> AppResult<()> {
    let editor = require_participant(&ctx.identity)?;
    let trip_id = args.fields.trip;
    let mut snapshot = ctx.store.load_snapshot(trip_id)?;

    let Some(index) = snapshot.expenses.items.iter().position(|e| e.id == args.expense) else {
        return Err(AppError::NotFound(format!(
            "Expense {} in trip {trip_id}",
            args.expense
        )));
    };

    let (draft, default_rate) = build_draft(ctx, &snapshot.trip, args.fields, &editor).await?;
    let date = draft.date;
    let revised = rate_hint(
        snapshot.expenses.items[index].revise(draft, &snapshot.trip, default_rate, &editor),
        date,
    )?;

    print_expense("Updated", &revised);
    tracing::info!(%trip_id, expense_id = %revised.id, editor = %editor, "Edited expense");
    snapshot.expenses.items[index] = revised;
    ctx.store.save(&snapshot)?;
    Ok(())
}

/// Turns command arguments into a draft plus the day's default rate.
async fn build_draft(
    ctx: &Context,
    trip: &Trip,
    args: ExpenseArgs,
    author: &ParticipantId,
) -> AppResult<(ExpenseDraft, Option<Decimal>)> {
    let currency = args.currency.unwrap_or(trip.base_currency);
    let amount_minor = parse_minor(&args.amount, currency)?;
    let date = match args.date {
        Some(date) => date,
        None => trip.local_date(Utc::now())?,
    };
    let paid_by = args
        .paid_by
        .as_deref()
        .map_or_else(|| author.clone(), ParticipantId::from);

    let shares = parse_shares(&args.shares)?;
    let involved = if args.involved.is_empty() {
        if shares.is_empty() {
            trip.members.clone()
        } else {
            shares.iter().map(|(p, _)| p.clone()).collect()
        }
    } else {
        args.involved.iter().map(|p| ParticipantId::from(p.trim())).collect()
    };
    let policy = build_policy(args.split, &shares, currency)?;

    // Only consult the rate service when the user left the rate out
    let default_rate = if args.rate.is_none() && currency != trip.base_currency {
        ctx.rates.default_rate(currency, trip.base_currency, date).await
    } else {
        None
    };

    let draft = ExpenseDraft {
        title: args.title,
        date,
        currency,
        amount_minor,
        rate: args.rate,
        paid_by,
        involved,
        policy,
    };
    Ok((draft, default_rate))
}

/// Points the user at `--rate` when no rate could be found.
fn rate_hint(result: Result<Expense, ValidationError>, date: NaiveDate) -> AppResult<Expense> {
    match result {
        Err(ValidationError::MissingRate { from, to }) => Err(AppError::Validation(format!(
            "No exchange rate for {from} to {to} on {date}; enter one with --rate"
        ))),
        other => other.map_err(AppError::from),
    }
}

fn print_expense(verb: &str, expense: &Expense) {
    println!(
        "{verb} {} ({} -> {} at {})",
        expense.title,
        format_minor(expense.amount_original_minor, expense.expense_currency),
        format_minor(expense.base_amount_minor, expense.base_currency),
        expense.rate_to_base
    );
    for (participant, share) in &expense.split_base {
        println!("  {participant}  {}", format_minor(*share, expense.base_currency));
    }
}

/// Prints balances and suggested transfers.
pub fn summary(ctx: &Context, trip_id: TripId) -> AppResult<()> {
    let snapshot = ctx.store.load_snapshot(trip_id)?;
    let viewer = ctx.identity.current_participant_id();
    let summary = summarize(&snapshot, viewer.as_ref()).inspect_err(|err| {
        tracing::warn!(%trip_id, code = err.error_code(), "Trip cannot be summarized");
    })?;
    print!("{}", render_summary(&snapshot.trip, &summary));
    Ok(())
}

/// Converts an amount between currencies.
pub async fn convert_amount(
    ctx: &Context,
    amount: &str,
    from: Currency,
    to: Currency,
    rate: Option<Decimal>,
    date: Option<NaiveDate>,
) -> AppResult<()> {
    let amount_minor = parse_minor(amount, from)?;
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let default_rate = if rate.is_none() {
        ctx.rates.default_rate(from, to, date).await
    } else {
        None
    };

    let Some(rate) = resolve_rate(rate, default_rate) else {
        println!("No exchange rate for {from} to {to} on {date}; enter one with --rate");
        return Ok(());
    };
    let conversion = convert(amount_minor, from, to, Some(rate))?;
    println!(
        "{} = {} (rate {})",
        format_minor(amount_minor, from),
        format_minor(conversion.amount_minor, to),
        conversion.rate
    );
    Ok(())
}

/// Records a real payment between two members.
pub fn settle(
    ctx: &Context,
    trip_id: TripId,
    from: Option<&str>,
    to: &str,
    amount: &str,
    date: Option<NaiveDate>,
) -> AppResult<()> {
    let recorder = require_participant(&ctx.identity)?;
    let mut snapshot = ctx.store.load_snapshot(trip_id)?;
    let trip = &snapshot.trip;
    trip.require_member(&recorder)?;

    let from = from.map_or_else(|| recorder.clone(), ParticipantId::from);
    let to = ParticipantId::from(to);
    trip.require_member(&from)?;
    trip.require_member(&to)?;

    let amount_minor = parse_minor(amount, trip.base_currency)?;
    let mut settlement = Settlement::new(from, to, amount_minor, trip.base_currency, recorder)?;
    if let Some(date) = date {
        settlement = settlement.on(date);
    }

    println!(
        "Recorded {} -> {}  {}",
        settlement.from,
        settlement.to,
        format_minor(settlement.amount_minor, settlement.currency)
    );
    tracing::info!(%trip_id, settlement_id = %settlement.id, "Recorded settlement");
    snapshot.settlements.items.push(settlement);
    ctx.store.save(&snapshot)?;
    Ok(())
}

/// Parses `id=value` pairs, keeping the order they were given in.
fn parse_shares(raw: &[String]) -> AppResult<Vec<(ParticipantId, String)>> {
    let mut shares: Vec<(ParticipantId, String)> = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some((id, value)) = entry.split_once('=') else {
            return Err(AppError::Validation(format!(
                "Share {entry:?} must look like id=value"
            )));
        };
        let id = ParticipantId::from(id.trim());
        if shares.iter().any(|(seen, _)| *seen == id) {
            return Err(ValidationError::DuplicateParticipant(id).into());
        }
        shares.push((id, value.trim().to_string()));
    }
    Ok(shares)
}

fn build_policy(
    split: SplitArg,
    shares: &[(ParticipantId, String)],
    currency: Currency,
) -> AppResult<SplitPolicy> {
    if split == SplitArg::Equal {
        if !shares.is_empty() {
            return Err(AppError::Validation(
                "--share is not used with an equal split".to_string(),
            ));
        }
        return Ok(SplitPolicy::Equal);
    }

    let policy = match split {
        SplitArg::Exact => SplitPolicy::Exact(
            shares
                .iter()
                .map(|(p, v)| Ok((p.clone(), parse_minor(v, currency)?)))
                .collect::<Result<BTreeMap<_, _>, ValidationError>>()?,
        ),
        SplitArg::Percent => SplitPolicy::Percent(parse_decimals(shares)?),
        SplitArg::Weights | SplitArg::Equal => SplitPolicy::Weights(parse_decimals(shares)?),
    };
    Ok(policy)
}

fn parse_decimals(
    shares: &[(ParticipantId, String)],
) -> AppResult<BTreeMap<ParticipantId, Decimal>> {
    let values = shares
        .iter()
        .map(|(p, v)| {
            Decimal::from_str(&v.replace(',', "."))
                .map(|value| (p.clone(), value))
                .map_err(|_| ValidationError::InvalidAmount(v.clone()))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Ok(values)
}
