//! Trip record and membership rules.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ParticipantId, TripId};

use crate::error::ValidationError;

/// Timezone new trips are created in.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Random bytes in an invite token (rendered as hex).
const INVITE_TOKEN_BYTES: usize = 16;

/// A trip: the ledger currency and the people sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Trip ID.
    pub id: TripId,
    /// Display name.
    pub name: String,
    /// Ledger currency every balance is kept in.
    pub base_currency: Currency,
    /// IANA timezone name used for expense dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Participants allowed to manage the trip.
    #[serde(default)]
    pub admins: Vec<ParticipantId>,
    /// Participants sharing expenses.
    pub members: Vec<ParticipantId>,
    /// Secret part of the invite link.
    #[serde(default)]
    pub invite_token: Option<String>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Trip {
    /// Creates a trip with `creator` as its only admin and member.
    pub fn create(
        name: &str,
        base_currency: Currency,
        creator: ParticipantId,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Blank("Trip name"));
        }
        Ok(Self {
            id: TripId::new(),
            name: name.to_string(),
            base_currency,
            timezone: default_timezone(),
            admins: vec![creator.clone()],
            members: vec![creator],
            invite_token: Some(generate_invite_token()),
        })
    }

    /// Returns true if `participant` shares this trip's expenses.
    #[must_use]
    pub fn is_member(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    /// Returns true if `participant` manages this trip.
    #[must_use]
    pub fn is_admin(&self, participant: &ParticipantId) -> bool {
        self.admins.contains(participant)
    }

    /// Fails with `NotAMember` unless `participant` is a member.
    pub fn require_member(&self, participant: &ParticipantId) -> Result<(), ValidationError> {
        if self.is_member(participant) {
            Ok(())
        } else {
            Err(ValidationError::NotAMember(participant.clone()))
        }
    }

    /// Fails with `NotAnAdmin` unless `participant` manages the trip.
    pub fn require_admin(&self, participant: &ParticipantId) -> Result<(), ValidationError> {
        if self.is_admin(participant) {
            Ok(())
        } else {
            Err(ValidationError::NotAnAdmin(participant.clone()))
        }
    }

    /// Changes the trip timezone to an IANA name such as `Europe/Stockholm`.
    pub fn set_timezone(&mut self, timezone: &str) -> Result<(), ValidationError> {
        let tz = parse_timezone(timezone)?;
        self.timezone = tz.name().to_string();
        Ok(())
    }

    /// The calendar day `now` falls on in the trip timezone.
    ///
    /// Expense dates default to this day.
    pub fn local_date(&self, now: DateTime<Utc>) -> Result<NaiveDate, ValidationError> {
        let tz = parse_timezone(&self.timezone)?;
        Ok(now.with_timezone(&tz).date_naive())
    }

    /// Adds `participant` if `token` matches the invite token.
    ///
    /// Joining twice is a no-op. Returns `true` if the participant was added.
    pub fn join(&mut self, participant: ParticipantId, token: &str) -> Result<bool, ValidationError> {
        match self.invite_token.as_deref() {
            Some(expected) if !token.is_empty() && expected == token => {}
            _ => return Err(ValidationError::InvalidInvite),
        }
        if self.is_member(&participant) {
            return Ok(false);
        }
        self.members.push(participant);
        Ok(true)
    }

    /// Returns the invite token, issuing one if the trip has none yet.
    pub fn ensure_invite_token(&mut self) -> &str {
        self.invite_token.get_or_insert_with(generate_invite_token)
    }

    /// Replaces the invite token, invalidating links already shared.
    pub fn rotate_invite_token(&mut self) -> &str {
        self.invite_token.insert(generate_invite_token())
    }
}

fn parse_timezone(name: &str) -> Result<Tz, ValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimezone(name.to_string()))
}

fn generate_invite_token() -> String {
    let bytes: [u8; INVITE_TOKEN_BYTES] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
