//! Profile lookup CLI.
//!
//! Fetches a unified reputation profile through a running basecred
//! server and prints a summary (or the raw JSON).
//!
//! Usage:
//!   cargo run --bin lookup -- 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045
//!   cargo run --bin lookup -- 0xd8dA... --server http://127.0.0.1:3000
//!   cargo run --bin lookup -- 0xd8dA... --json

use alloy::primitives::Address;
use basecred::client::{ProfileClient, ProfileFetch, DEFAULT_CACHE_TTL};
use basecred::profile::UnifiedProfile;
use basecred::view::{positive_percentage, score_tier, truncate_address};
use std::str::FromStr;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin lookup -- <address> [--server URL] [--json]");
    eprintln!("Example: cargo run --bin lookup -- 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut address_arg: Option<String> = None;
    let mut server = DEFAULT_SERVER.to_string();
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => match args.next() {
                Some(url) => server = url,
                None => usage(),
            },
            "--json" => json = true,
            _ if address_arg.is_none() => address_arg = Some(arg),
            _ => usage(),
        }
    }

    let Some(raw) = address_arg else { usage() };
    let address = Address::from_str(&raw)
        .map_err(|_| anyhow::anyhow!("'{}' is not a valid Ethereum address", raw))?;

    eprintln!("Fetching profile for {} from {}...", address, server);
    let client = ProfileClient::new(server, DEFAULT_CACHE_TTL);

    let profile = match client.profile(address).await? {
        ProfileFetch::Ready(profile) => profile,
        // A fresh client has nothing in flight; keep the match exhaustive
        ProfileFetch::Pending => anyhow::bail!("fetch already in flight"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_summary(&profile);
    }

    Ok(())
}

fn print_summary(profile: &UnifiedProfile) {
    println!("Profile for {}", truncate_address(&profile.identity.address));

    println!("  Ethos:  {}", profile.availability.ethos.label());
    if let Some(ethos) = &profile.ethos {
        let tier = score_tier(ethos.data.score, ethos.signals.has_negative_reviews);
        println!("    score {} ({})", ethos.data.score, tier);
        let total = ethos.data.reviews.total();
        if total > 0 {
            println!(
                "    {}% positive ({} reviews)",
                positive_percentage(&ethos.data.reviews),
                total,
            );
        }
        println!("    {} vouches", ethos.data.vouches_received);
        if let Some(days) = ethos.meta.active_since_days {
            println!("    active for {} days", days);
        }
    }

    println!("  Talent: {}", profile.availability.talent.label());
    if let Some(talent) = &profile.talent {
        let verified = if talent.signals.verified_builder {
            " (verified)"
        } else {
            ""
        };
        println!("    builder score {}{}", talent.data.builder_score, verified);
    }
}
