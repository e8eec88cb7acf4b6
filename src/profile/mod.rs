//! Unified reputation profile model.
//!
//! One profile per queried address, assembled fresh on every fetch:
//! - `availability` says, per provider, whether data was obtained
//! - `ethos` / `talent` sections are present iff their availability
//!   flag is `available`
//!
//! Field names serialize camelCase; availability values snake_case
//! (`not_found`, not `NotFound`) to match the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-provider data availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Provider returned data for this address.
    Available,
    /// Provider has never seen this address.
    NotFound,
    /// Provider knows the address but it is not linked to a profile.
    Unlinked,
    /// Provider call failed (network, bad status, parse).
    Error,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }

    /// Human-readable badge label.
    pub fn label(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::NotFound => "Not found",
            Availability::Unlinked => "Unlinked",
            Availability::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// EIP-55 checksummed form of the queried address.
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAvailability {
    pub ethos: Availability,
    pub talent: Availability,
}

/// Review counts from the trust network, by sentiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl ReviewCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthosData {
    pub score: i64,
    pub vouches_received: u64,
    pub reviews: ReviewCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthosSignals {
    pub has_negative_reviews: bool,
    pub has_vouches: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthosMeta {
    pub first_seen_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    /// Whole days since `first_seen_at`, if known.
    pub active_since_days: Option<i64>,
}

/// Trust-network section: raw data plus derived signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthosSection {
    pub data: EthosData,
    pub signals: EthosSignals,
    pub meta: EthosMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentData {
    pub builder_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentSignals {
    pub verified_builder: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentMeta {
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentSection {
    pub data: TalentData,
    pub signals: TalentSignals,
    pub meta: TalentMeta,
}

/// The aggregated profile for one address. Immutable once built;
/// a refetch replaces the whole value, never patches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedProfile {
    pub identity: Identity,
    pub availability: ProviderAvailability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethos: Option<EthosSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talent: Option<TalentSection>,
}

impl UnifiedProfile {
    /// True when neither provider produced data.
    pub fn is_bare(&self) -> bool {
        !self.availability.ethos.is_available() && !self.availability.talent.is_available()
    }
}
