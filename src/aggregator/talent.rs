//! Talent Protocol API client.
//!
//! Fetches the builder score for an address:
//! `GET {base_url}/score?id={address}` with an `X-API-KEY` header.
//! The key is passed through as configured; an empty key is sent as-is
//! and rejected upstream, not validated here.
//!
//! Outcome mapping:
//! - 200 with a score object → data
//! - 200 with a null score → address known but no linked builder profile
//! - 404 → address unknown to Talent

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{ProviderError, ProviderOutcome};

const API_KEY_HEADER: &str = "X-API-KEY";

/// What the aggregator needs from Talent.
#[derive(Debug, Clone)]
pub struct TalentRaw {
    pub builder_score: i64,
    pub verified: bool,
    pub last_calculated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TalentScoreResponse {
    #[serde(default)]
    score: Option<TalentScore>,
}

#[derive(Debug, Deserialize)]
struct TalentScore {
    #[serde(default)]
    points: i64,
    #[serde(default)]
    human_checkmark: bool,
    #[serde(default)]
    last_calculated_at: Option<DateTime<Utc>>,
}

pub struct TalentClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl TalentClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    pub async fn fetch(&self, address: &str) -> Result<ProviderOutcome<TalentRaw>, ProviderError> {
        let url = format!("{}/score", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[("id", address)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(address = %address, "talent: address not found");
            return Ok(ProviderOutcome::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                provider: "talent",
                status: resp.status().as_u16(),
            });
        }

        let body: TalentScoreResponse = resp.json().await?;

        let Some(score) = body.score else {
            debug!(address = %address, "talent: address unlinked");
            return Ok(ProviderOutcome::Unlinked);
        };

        debug!(address = %address, points = score.points, "talent: score fetched");
        Ok(ProviderOutcome::Fetched(TalentRaw {
            builder_score: score.points,
            verified: score.human_checkmark,
            last_calculated_at: score.last_calculated_at,
        }))
    }
}
