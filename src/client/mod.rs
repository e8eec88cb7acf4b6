//! Client for the profile API.
//!
//! Wraps `GET /api/profile/{address}` with the fetch policy the UI
//! relies on:
//! - per-address cache, 5 minutes by default; a fresh entry short-circuits
//!   the network entirely
//! - exactly one automatic retry before a failure is surfaced
//! - single-flight per address: a concurrent request for an address that
//!   is already being fetched gets `Pending` instead of a second call
//!
//! Cache entries are replaced whole on refetch, never mutated.

use alloy::primitives::Address;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::profile::UnifiedProfile;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
}

/// Result of asking for a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileFetch {
    /// Served from cache or freshly fetched.
    Ready(UnifiedProfile),
    /// Another request for this address is already in flight.
    Pending,
}

/// Error envelope the API uses for 4xx/5xx bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

struct CacheEntry {
    profile: UnifiedProfile,
    fetched_at: Instant,
}

pub struct ProfileClient {
    base_url: String,
    http: reqwest::Client,
    cache: DashMap<String, CacheEntry>,
    in_flight: DashMap<String, ()>,
    ttl: Duration,
}

/// Removes the in-flight marker when the fetch finishes, error paths included.
struct InFlightGuard<'a> {
    map: &'a DashMap<String, ()>,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

impl ProfileClient {
    pub fn new(base_url: String, ttl: Duration) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
            cache: DashMap::new(),
            in_flight: DashMap::new(),
            ttl,
        }
    }

    /// Fresh cache entry for this address, if any.
    pub fn cached(&self, address: &Address) -> Option<UnifiedProfile> {
        let key = address.to_string();
        let entry = self.cache.get(&key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.profile.clone())
        } else {
            None
        }
    }

    /// True while a fetch for this address is in flight.
    pub fn in_flight(&self, address: &Address) -> bool {
        self.in_flight.contains_key(&address.to_string())
    }

    /// Get the profile for an address: cache first, then the API with a
    /// single retry. Only addresses that already parsed can get here, so
    /// no network call is ever made for malformed input.
    pub async fn profile(&self, address: Address) -> Result<ProfileFetch, ClientError> {
        let key = address.to_string();

        if let Some(profile) = self.cached(&address) {
            debug!(address = %key, "profile served from cache");
            return Ok(ProfileFetch::Ready(profile));
        }

        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => {
                debug!(address = %key, "fetch already in flight");
                return Ok(ProfileFetch::Pending);
            }
            Entry::Vacant(v) => {
                v.insert(());
            }
        }
        let _guard = InFlightGuard {
            map: &self.in_flight,
            key: key.clone(),
        };

        let profile = match self.fetch_once(&key).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(address = %key, error = %e, "profile fetch failed, retrying once");
                self.fetch_once(&key).await?
            }
        };

        self.cache.insert(
            key,
            CacheEntry {
                profile: profile.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(ProfileFetch::Ready(profile))
    }

    async fn fetch_once(&self, address: &str) -> Result<UnifiedProfile, ClientError> {
        let url = format!("{}/api/profile/{}", self.base_url, address);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            // Prefer the API's own error message over a generic one
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| "failed to fetch profile".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json::<UnifiedProfile>().await?)
    }
}
