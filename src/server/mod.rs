//! Axum HTTP layer.
//!
//! Provides:
//!   GET /                        → HTML search page
//!   GET /api/profile/{address}   → UnifiedProfile JSON
//!
//! The API route is a thin gate in front of the aggregator: validate the
//! address, delegate, and collapse any delegation failure into one fixed
//! 500 envelope. The cause is logged here and never leaks to the caller.
//! No caching or retries at this layer; the fetch client owns that.

use alloy::primitives::Address;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::aggregator::ProfileAggregator;
use crate::client::{ProfileClient, ProfileFetch};
use crate::view::{self, ViewState};

const INVALID_ADDRESS: &str = "Invalid Ethereum address";
const FETCH_FAILED: &str = "Failed to fetch profile data";

/// Shared state for the routes.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<dyn ProfileAggregator>,
    /// Client for this server's own profile API, used by the search page.
    pub client: Arc<ProfileClient>,
}

/// Build the Axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/api/profile/{address}", get(api_profile))
        .with_state(state)
}

/// Bind and serve. The page's fetch client is pointed at the bound
/// address, so an ephemeral port (`:0`) works too.
pub async fn serve(
    aggregator: Arc<dyn ProfileAggregator>,
    bind_addr: &str,
    cache_ttl: Duration,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let client = Arc::new(ProfileClient::new(format!("http://{}", local_addr), cache_ttl));
    let app = build_router(AppState { aggregator, client });
    info!(addr = %local_addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// --- API ---

async fn api_profile(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    let Ok(address) = Address::from_str(&address) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": INVALID_ADDRESS })),
        )
            .into_response();
    };

    match state.aggregator.unified_profile(address).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => {
            error!(address = %address, error = %e, "profile aggregation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": FETCH_FAILED })),
            )
                .into_response()
        }
    }
}

// --- Search page ---

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    address: Option<String>,
}

async fn search_page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Html<String> {
    let input = query.address.unwrap_or_default();
    let trimmed = input.trim();

    let (hint, view_state) = if trimmed.is_empty() {
        (None, ViewState::Empty)
    } else {
        match Address::from_str(trimmed) {
            // Malformed input never reaches the fetch client
            Err(_) => (
                Some("Please enter a valid Ethereum address"),
                ViewState::Empty,
            ),
            Ok(address) => match state.client.profile(address).await {
                Ok(ProfileFetch::Ready(profile)) => (None, ViewState::Populated(profile)),
                Ok(ProfileFetch::Pending) => (None, ViewState::Loading),
                Err(e) => (None, ViewState::Error(e.to_string())),
            },
        }
    };

    Html(view::render_page(trimmed, hint, &view_state))
}
