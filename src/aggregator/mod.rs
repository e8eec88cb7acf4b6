//! Profile aggregation: one address in, one `UnifiedProfile` out.
//!
//! Both providers are queried concurrently and their outcomes folded
//! into per-provider availability flags. A provider failing is data
//! (`availability: error`), not an error return; the profile still
//! carries whatever the other provider produced. No retries and no
//! caching here; that policy belongs to the fetch client.

pub mod ethos;
pub mod talent;

use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use crate::config::{EthosConfig, TalentConfig};
use crate::profile::{
    Availability, EthosData, EthosMeta, EthosSection, EthosSignals, Identity,
    ProviderAvailability, TalentData, TalentMeta, TalentSection, TalentSignals, UnifiedProfile,
};
use ethos::{EthosClient, EthosRaw};
use talent::{TalentClient, TalentRaw};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{provider} API returned status {status}")]
    Status { provider: &'static str, status: u16 },
}

/// Per-provider fetch outcome before it is folded into availability.
#[derive(Debug, Clone)]
pub enum ProviderOutcome<T> {
    Fetched(T),
    NotFound,
    Unlinked,
}

/// Seam between the HTTP endpoint and the aggregation internals.
/// The endpoint only depends on this trait.
#[async_trait]
pub trait ProfileAggregator: Send + Sync {
    async fn unified_profile(&self, address: Address) -> anyhow::Result<UnifiedProfile>;
}

/// The real aggregator: Ethos + Talent over HTTP.
pub struct HttpAggregator {
    ethos: EthosClient,
    talent: TalentClient,
}

impl HttpAggregator {
    pub fn new(ethos: &EthosConfig, talent: &TalentConfig) -> Self {
        Self {
            ethos: EthosClient::new(ethos.base_url.clone(), ethos.client_id.clone()),
            talent: TalentClient::new(talent.base_url.clone(), talent.api_key.clone()),
        }
    }
}

#[async_trait]
impl ProfileAggregator for HttpAggregator {
    async fn unified_profile(&self, address: Address) -> anyhow::Result<UnifiedProfile> {
        let addr = address.to_string();
        let (ethos, talent) = tokio::join!(self.ethos.fetch(&addr), self.talent.fetch(&addr));
        Ok(assemble(address, ethos, talent))
    }
}

/// Fold a provider result into an availability flag plus optional data.
fn fold<T>(
    provider: &'static str,
    result: Result<ProviderOutcome<T>, ProviderError>,
) -> (Availability, Option<T>) {
    match result {
        Ok(ProviderOutcome::Fetched(data)) => (Availability::Available, Some(data)),
        Ok(ProviderOutcome::NotFound) => (Availability::NotFound, None),
        Ok(ProviderOutcome::Unlinked) => (Availability::Unlinked, None),
        Err(e) => {
            warn!(provider = provider, error = %e, "provider fetch failed");
            (Availability::Error, None)
        }
    }
}

/// Build the profile from both provider results. The provider sections
/// are populated iff the matching availability flag is `available`;
/// this is the only place that invariant is established.
pub fn assemble(
    address: Address,
    ethos: Result<ProviderOutcome<EthosRaw>, ProviderError>,
    talent: Result<ProviderOutcome<TalentRaw>, ProviderError>,
) -> UnifiedProfile {
    let (ethos_availability, ethos_raw) = fold("ethos", ethos);
    let (talent_availability, talent_raw) = fold("talent", talent);

    let ethos_section = ethos_raw.map(|raw| EthosSection {
        signals: EthosSignals {
            has_negative_reviews: raw.reviews.negative > 0,
            has_vouches: raw.vouches_received > 0,
        },
        meta: EthosMeta {
            first_seen_at: raw.first_seen_at,
            last_updated_at: raw.last_updated_at,
            active_since_days: raw.first_seen_at.map(|t| (Utc::now() - t).num_days()),
        },
        data: EthosData {
            score: raw.score,
            vouches_received: raw.vouches_received,
            reviews: raw.reviews,
        },
    });

    let talent_section = talent_raw.map(|raw| TalentSection {
        data: TalentData {
            builder_score: raw.builder_score,
        },
        signals: TalentSignals {
            verified_builder: raw.verified,
        },
        meta: TalentMeta {
            last_updated_at: raw.last_calculated_at,
        },
    });

    UnifiedProfile {
        identity: Identity {
            // EIP-55 checksum form regardless of input case
            address: address.to_string(),
        },
        availability: ProviderAvailability {
            ethos: ethos_availability,
            talent: talent_availability,
        },
        ethos: ethos_section,
        talent: talent_section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ReviewCounts;
    use std::str::FromStr;

    fn addr() -> Address {
        Address::from_str("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap()
    }

    fn ethos_raw(score: i64, negative: u64, vouches: u64) -> EthosRaw {
        EthosRaw {
            score,
            vouches_received: vouches,
            reviews: ReviewCounts {
                positive: 10,
                neutral: 2,
                negative,
            },
            first_seen_at: None,
            last_updated_at: None,
        }
    }

    #[test]
    fn section_present_iff_available() {
        let profile = assemble(
            addr(),
            Ok(ProviderOutcome::Fetched(ethos_raw(1500, 0, 3))),
            Ok(ProviderOutcome::NotFound),
        );
        assert_eq!(profile.availability.ethos, Availability::Available);
        assert_eq!(profile.availability.talent, Availability::NotFound);
        assert!(profile.ethos.is_some());
        assert!(profile.talent.is_none());
    }

    #[test]
    fn provider_error_folds_to_error_availability() {
        let profile = assemble(
            addr(),
            Err(ProviderError::Status {
                provider: "ethos",
                status: 502,
            }),
            Ok(ProviderOutcome::Fetched(TalentRaw {
                builder_score: 87,
                verified: true,
                last_calculated_at: None,
            })),
        );
        assert_eq!(profile.availability.ethos, Availability::Error);
        assert!(profile.ethos.is_none());
        // The other provider's data survives
        assert_eq!(profile.availability.talent, Availability::Available);
        assert_eq!(profile.talent.as_ref().unwrap().data.builder_score, 87);
        assert!(profile.talent.as_ref().unwrap().signals.verified_builder);
    }

    #[test]
    fn signals_derived_from_counts() {
        let profile = assemble(
            addr(),
            Ok(ProviderOutcome::Fetched(ethos_raw(900, 1, 0))),
            Ok(ProviderOutcome::Unlinked),
        );
        let ethos = profile.ethos.unwrap();
        assert!(ethos.signals.has_negative_reviews);
        assert!(!ethos.signals.has_vouches);
        assert_eq!(profile.availability.talent, Availability::Unlinked);
    }

    #[test]
    fn address_is_checksummed() {
        let lower = Address::from_str("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        let profile = assemble(
            lower,
            Ok(ProviderOutcome::NotFound),
            Ok(ProviderOutcome::NotFound),
        );
        assert_eq!(
            profile.identity.address,
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
        assert!(profile.is_bare());
    }
}
