//! Plain-text rendering of summaries and errors.

use std::fmt::Write;

use tripsplit_core::ledger::Transfer;
use tripsplit_core::money::format_minor;
use tripsplit_core::trip::{Trip, TripSummary};
use tripsplit_shared::AppError;
use tripsplit_shared::types::Currency;

/// Renders balances, the settlement plan and the viewer's own position.
pub fn render_summary(trip: &Trip, summary: &TripSummary) -> String {
    let currency = summary.currency;
    let width = summary
        .balances
        .iter()
        .map(|(p, _)| p.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{} ({currency})", trip.name);
    let _ = writeln!(out);
    let _ = writeln!(out, "Balances:");
    for (participant, balance) in summary.balances.iter() {
        let sign = if balance > 0 { "+" } else { "" };
        let _ = writeln!(
            out,
            "  {:<width$}  {sign}{}",
            participant.as_str(),
            format_minor(balance, currency)
        );
    }

    let _ = writeln!(out);
    if summary.transfers.is_empty() {
        let _ = writeln!(out, "Everyone is settled up.");
    } else {
        let _ = writeln!(out, "Suggested transfers:");
        for transfer in &summary.transfers {
            let _ = writeln!(out, "  {}", render_transfer(transfer, currency));
        }
    }

    if let Some(viewer) = &summary.viewer {
        let _ = writeln!(out);
        let position = match viewer.net_minor {
            0 => "you are settled up".to_string(),
            net if net > 0 => format!("you are owed {}", format_minor(net, currency)),
            net => format!("you owe {}", format_minor(-net, currency)),
        };
        let _ = writeln!(out, "{}: {position}", viewer.participant);
        for transfer in viewer.owes.iter().chain(&viewer.owed) {
            let _ = writeln!(out, "  {}", render_transfer(transfer, currency));
        }
    }
    out
}

/// Renders one transfer as `from -> to  amount`.
pub fn render_transfer(transfer: &Transfer, currency: Currency) -> String {
    format!(
        "{} -> {}  {}",
        transfer.from,
        transfer.to,
        format_minor(transfer.amount_minor, currency)
    )
}

/// Message shown to the user when a command fails.
///
/// Rejected input and missing trips are shown as they are. Other failures
/// only name their error code; the details go to the log.
pub fn render_error(err: &AppError) -> String {
    if err.is_user_facing() {
        return format!("error: {err}");
    }
    let what = match err {
        AppError::DataIntegrity(_) => "Trip data failed an integrity check",
        AppError::ExternalService(_) => "An external service failed",
        AppError::Configuration(_) => "Configuration could not be loaded",
        _ => "Something went wrong",
    };
    format!("error: {what} ({}); see the log for details", err.error_code())
}
