//! Ethos Network API client.
//!
//! Fetches the trust profile for an address:
//! `GET {base_url}/api/v2/users/by/address/{address}` with an
//! `X-Ethos-Client` header identifying the calling app.
//!
//! Outcome mapping:
//! - 200 with a profile id → data
//! - 200 with a null profile id → address known but unlinked
//! - 404 → address unknown to Ethos

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{ProviderError, ProviderOutcome};
use crate::profile::ReviewCounts;

const CLIENT_HEADER: &str = "X-Ethos-Client";

/// What the aggregator needs from Ethos, flattened out of the wire shape.
#[derive(Debug, Clone)]
pub struct EthosRaw {
    pub score: i64,
    pub vouches_received: u64,
    pub reviews: ReviewCounts,
    pub first_seen_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Ethos user response (subset of fields we need).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EthosUser {
    #[serde(default)]
    profile_id: Option<i64>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    stats: EthosStats,
    #[serde(default)]
    first_seen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct EthosStats {
    #[serde(default)]
    review: EthosReviewStats,
    #[serde(default)]
    vouch: EthosVouchStats,
}

#[derive(Debug, Default, Deserialize)]
struct EthosReviewStats {
    #[serde(default)]
    received: ReviewCounts,
}

#[derive(Debug, Default, Deserialize)]
struct EthosVouchStats {
    #[serde(default)]
    received: EthosVouchReceived,
}

#[derive(Debug, Default, Deserialize)]
struct EthosVouchReceived {
    #[serde(default)]
    count: u64,
}

pub struct EthosClient {
    base_url: String,
    client_id: String,
    http: reqwest::Client,
}

impl EthosClient {
    pub fn new(base_url: String, client_id: String) -> Self {
        Self {
            base_url,
            client_id,
            http: reqwest::Client::new(),
        }
    }

    pub async fn fetch(&self, address: &str) -> Result<ProviderOutcome<EthosRaw>, ProviderError> {
        let url = format!("{}/api/v2/users/by/address/{}", self.base_url, address);

        let resp = self
            .http
            .get(&url)
            .header(CLIENT_HEADER, &self.client_id)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(address = %address, "ethos: address not found");
            return Ok(ProviderOutcome::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                provider: "ethos",
                status: resp.status().as_u16(),
            });
        }

        let user: EthosUser = resp.json().await?;

        // An address Ethos has seen but that no profile claims.
        if user.profile_id.is_none() {
            debug!(address = %address, "ethos: address unlinked");
            return Ok(ProviderOutcome::Unlinked);
        }

        debug!(address = %address, score = user.score, "ethos: profile fetched");
        Ok(ProviderOutcome::Fetched(EthosRaw {
            score: user.score,
            vouches_received: user.stats.vouch.received.count,
            reviews: user.stats.review.received,
            first_seen_at: user.first_seen_at,
            last_updated_at: user.last_updated_at,
        }))
    }
}
