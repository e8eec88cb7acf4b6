//! Server-rendered profile views.
//!
//! `ViewState` is the render state machine: exactly one of
//! loading / error / empty / populated renders per request, matched
//! exhaustively in that priority order. Everything in this module is a
//! pure function from values to HTML strings; no I/O.

use crate::profile::{Availability, ReviewCounts, UnifiedProfile};

/// What the profile card renders for the current request.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// A fetch for the selected address is in flight.
    Loading,
    /// The fetch failed; message is user-facing.
    Error(String),
    /// No address selected yet.
    Empty,
    /// Profile fetched and ready to render.
    Populated(UnifiedProfile),
}

/// Trust tier for an Ethos score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// Any negative review overrides the numeric score.
    Negative,
    /// Score 1500 and above.
    Trusted,
    /// Score 1000 and above.
    Positive,
    /// Everything below.
    Neutral,
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreTier::Negative => write!(f, "Negative"),
            ScoreTier::Trusted => write!(f, "Trusted"),
            ScoreTier::Positive => write!(f, "Positive"),
            ScoreTier::Neutral => write!(f, "Neutral"),
        }
    }
}

impl ScoreTier {
    fn color(self) -> &'static str {
        match self {
            ScoreTier::Negative => "#e74c3c",
            ScoreTier::Trusted => "#2ecc71",
            ScoreTier::Positive => "#58d68d",
            ScoreTier::Neutral => "#8b949e",
        }
    }
}

pub fn score_tier(score: i64, has_negative_reviews: bool) -> ScoreTier {
    if has_negative_reviews {
        return ScoreTier::Negative;
    }
    if score >= 1500 {
        return ScoreTier::Trusted;
    }
    if score >= 1000 {
        return ScoreTier::Positive;
    }
    ScoreTier::Neutral
}

/// Share of positive reviews as a rounded percentage. Zero when there
/// are no reviews at all (never divides by zero).
pub fn positive_percentage(reviews: &ReviewCounts) -> u32 {
    let total = reviews.total();
    if total == 0 {
        return 0;
    }
    ((reviews.positive as f64 / total as f64) * 100.0).round() as u32
}

/// `0xd8dA6BF2...6045` style display form.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

fn availability_color(status: Availability) -> &'static str {
    match status {
        Availability::Available => "#238636",
        Availability::NotFound => "#9e6a03",
        Availability::Unlinked => "#bd561d",
        Availability::Error => "#da3633",
    }
}

fn availability_badge(source: &str, status: Availability) -> String {
    format!(
        "<span class=\"badge\" style=\"background:{}\">{}: {}</span>",
        availability_color(status),
        source,
        status.label(),
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// --- Card fragments ---

/// Score panel: big Ethos score with its tier, builder score underneath.
fn score_display(
    ethos_score: Option<i64>,
    builder_score: Option<i64>,
    has_negative_reviews: bool,
) -> String {
    if ethos_score.is_none() && builder_score.is_none() {
        return "<p class=\"muted center\">No score data available</p>".to_string();
    }

    let mut html = String::new();
    if let Some(score) = ethos_score {
        let tier = score_tier(score, has_negative_reviews);
        html.push_str(&format!(
            "<div class=\"score-block\">\
             <span class=\"score-big\">{}</span>\
             <span class=\"tier\" style=\"color:{}\">{}</span>\
             <span class=\"muted small\">Ethos Score</span>\
             </div>",
            score,
            tier.color(),
            tier,
        ));
    }
    if let Some(score) = builder_score {
        html.push_str(&format!(
            "<div class=\"score-block builder\">\
             <span class=\"score-mid\">{}</span> \
             <span class=\"muted small\">Builder Score</span>\
             </div>",
            score,
        ));
    }
    html
}

/// Review and vouch stats line under the scores.
fn profile_stats(reviews: &ReviewCounts, vouches_received: u64) -> String {
    let mut parts: Vec<String> = Vec::new();

    let total = reviews.total();
    if total > 0 {
        parts.push(format!(
            "<span><b>{}%</b> <span class=\"muted\">positive ({} reviews)</span></span>",
            positive_percentage(reviews),
            total,
        ));
    } else {
        parts.push("<span class=\"muted\">No reviews yet</span>".to_string());
    }

    if vouches_received > 0 {
        let noun = if vouches_received == 1 { "vouch" } else { "vouches" };
        parts.push(format!(
            "<span><b>{}</b> <span class=\"muted\">{}</span></span>",
            vouches_received, noun,
        ));
    } else {
        parts.push("<span class=\"muted\">No vouches yet</span>".to_string());
    }

    format!("<div class=\"stats\">{}</div>", parts.join(" "))
}

fn populated_card(profile: &UnifiedProfile) -> String {
    let initials = profile
        .identity
        .address
        .get(2..4)
        .unwrap_or("")
        .to_uppercase();

    let badges = format!(
        "{} {}",
        availability_badge("Ethos", profile.availability.ethos),
        availability_badge("Talent", profile.availability.talent),
    );

    // Sub-panels render off availability alone; the matching section is
    // guaranteed present when the flag says available.
    let ethos = profile
        .ethos
        .as_ref()
        .filter(|_| profile.availability.ethos.is_available());
    let talent = profile
        .talent
        .as_ref()
        .filter(|_| profile.availability.talent.is_available());

    let body = if profile.is_bare() {
        "<p class=\"muted center\">No reputation data found for this address</p>".to_string()
    } else {
        let scores = score_display(
            ethos.map(|e| e.data.score),
            talent.map(|t| t.data.builder_score),
            ethos.map(|e| e.signals.has_negative_reviews).unwrap_or(false),
        );
        let stats = ethos
            .map(|e| profile_stats(&e.data.reviews, e.data.vouches_received))
            .unwrap_or_default();
        format!("{}{}", scores, stats)
    };

    format!(
        "<div class=\"card profile\">\
         <div class=\"avatar\">{}</div>\
         <div class=\"addr\" title=\"{}\">{}</div>\
         <div class=\"badges\">{}</div>\
         {}\
         </div>",
        initials,
        profile.identity.address,
        truncate_address(&profile.identity.address),
        badges,
        body,
    )
}

/// The one place the state machine renders. Exhaustive on purpose:
/// adding a state forces a decision here.
pub fn profile_card(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "<div class=\"card profile\">\
             <div class=\"skeleton avatar\"></div>\
             <div class=\"skeleton line\"></div>\
             <div class=\"skeleton block\"></div>\
             <p class=\"muted center\">Loading profile&hellip;</p>\
             </div>"
            .to_string(),
        ViewState::Error(message) => format!(
            "<div class=\"card profile\">\
             <p class=\"error center\">Failed to load profile</p>\
             <p class=\"muted center\">{}</p>\
             <p class=\"center\"><a class=\"retry\" href=\"\">Retry</a></p>\
             </div>",
            escape(message),
        ),
        ViewState::Empty => "<div class=\"card profile\">\
             <p class=\"muted center\">Enter an address to view profile</p>\
             </div>"
            .to_string(),
        ViewState::Populated(profile) => populated_card(profile),
    }
}

// --- Full page ---

const EXAMPLE_ADDRESSES: [&str; 2] = [
    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
    "0x849151d7D0bF1F34b70d5caD5149D28CC2308bf1",
];

/// Render the search page around the profile card. `input` is echoed
/// back into the search box; `hint` is the inline validation message.
pub fn render_page(input: &str, hint: Option<&str>, state: &ViewState) -> String {
    // Refresh only while a fetch is in flight, so the loading card
    // resolves without user action.
    let refresh = if matches!(state, ViewState::Loading) {
        "<meta http-equiv=\"refresh\" content=\"1\">"
    } else {
        ""
    };

    let hint_html = hint
        .map(|h| format!("<p class=\"error small\">{}</p>", escape(h)))
        .unwrap_or_default();

    let examples: String = EXAMPLE_ADDRESSES
        .iter()
        .map(|addr| {
            format!(
                "<a class=\"example\" href=\"/?address={}\">{}</a>",
                addr,
                truncate_address(addr),
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
{refresh}
<title>BaseCred Demo</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: 'SF Mono', 'Fira Code', monospace; background: #0d1117; color: #c9d1d9; padding: 40px 20px; display: flex; flex-direction: column; align-items: center; gap: 20px; }}
  h1 {{ color: #58a6ff; font-size: 1.4em; }}
  .sub {{ color: #8b949e; font-size: 0.85em; }}
  form {{ display: flex; gap: 8px; width: 100%; max-width: 440px; }}
  input[type=text] {{ flex: 1; background: #161b22; border: 1px solid #30363d; border-radius: 6px; color: #c9d1d9; padding: 8px 12px; font-family: inherit; font-size: 0.85em; }}
  button {{ background: #238636; border: none; border-radius: 6px; color: #fff; padding: 8px 16px; font-family: inherit; cursor: pointer; }}
  .card {{ background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 24px; width: 100%; max-width: 440px; display: flex; flex-direction: column; align-items: center; gap: 12px; }}
  .avatar {{ width: 64px; height: 64px; border-radius: 50%; background: linear-gradient(135deg, #58a6ff, #8957e5); display: flex; align-items: center; justify-content: center; font-size: 1.3em; font-weight: bold; color: #fff; }}
  .addr {{ font-size: 0.9em; }}
  .badges {{ display: flex; gap: 6px; flex-wrap: wrap; justify-content: center; }}
  .badge {{ display: inline-block; padding: 2px 6px; border-radius: 3px; font-size: 0.7em; font-weight: bold; color: #fff; }}
  .score-block {{ display: flex; flex-direction: column; align-items: center; gap: 2px; }}
  .score-block.builder {{ border-top: 1px solid #21262d; padding-top: 10px; }}
  .score-big {{ font-size: 2.6em; font-weight: bold; }}
  .score-mid {{ font-size: 1.4em; font-weight: bold; }}
  .tier {{ font-size: 0.85em; font-weight: bold; }}
  .stats {{ display: flex; gap: 16px; flex-wrap: wrap; justify-content: center; font-size: 0.85em; }}
  .muted {{ color: #8b949e; }}
  .small {{ font-size: 0.75em; }}
  .center {{ text-align: center; }}
  .error {{ color: #e74c3c; font-weight: bold; }}
  .retry {{ color: #58a6ff; }}
  .examples {{ color: #8b949e; font-size: 0.8em; display: flex; gap: 10px; align-items: center; }}
  .example {{ color: #58a6ff; text-decoration: none; background: #161b22; border: 1px solid #30363d; border-radius: 4px; padding: 2px 8px; }}
  .skeleton {{ background: #21262d; border-radius: 6px; animation: pulse 1.2s ease-in-out infinite; }}
  .skeleton.line {{ width: 140px; height: 14px; }}
  .skeleton.block {{ width: 90px; height: 52px; }}
  @keyframes pulse {{ 50% {{ opacity: 0.4; }} }}
</style>
</head>
<body>
<h1>BaseCred Demo</h1>
<p class="sub">View reputation data from Ethos Network and Talent Protocol</p>
<form method="get" action="/">
  <input type="text" name="address" placeholder="0x..." value="{input}">
  <button type="submit">Search</button>
</form>
{hint}
{card}
<div class="examples"><span>Try these addresses:</span> {examples}</div>
</body>
</html>"#,
        refresh = refresh,
        input = escape(input),
        hint = hint_html,
        card = profile_card(state),
        examples = examples,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{
        EthosData, EthosMeta, EthosSection, EthosSignals, Identity, ProviderAvailability,
        TalentData, TalentMeta, TalentSection, TalentSignals,
    };

    fn ethos_section(score: i64, reviews: ReviewCounts, vouches: u64) -> EthosSection {
        EthosSection {
            data: EthosData {
                score,
                vouches_received: vouches,
                reviews,
            },
            signals: EthosSignals {
                has_negative_reviews: reviews.negative > 0,
                has_vouches: vouches > 0,
            },
            meta: EthosMeta {
                first_seen_at: None,
                last_updated_at: None,
                active_since_days: None,
            },
        }
    }

    fn talent_section(score: i64) -> TalentSection {
        TalentSection {
            data: TalentData {
                builder_score: score,
            },
            signals: TalentSignals {
                verified_builder: false,
            },
            meta: TalentMeta {
                last_updated_at: None,
            },
        }
    }

    fn profile(
        ethos: Option<EthosSection>,
        talent: Option<TalentSection>,
        availability: ProviderAvailability,
    ) -> UnifiedProfile {
        UnifiedProfile {
            identity: Identity {
                address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string(),
            },
            availability,
            ethos,
            talent,
        }
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(score_tier(2000, false), ScoreTier::Trusted);
        assert_eq!(score_tier(1500, false), ScoreTier::Trusted);
        assert_eq!(score_tier(1200, false), ScoreTier::Positive);
        assert_eq!(score_tier(1000, false), ScoreTier::Positive);
        assert_eq!(score_tier(999, false), ScoreTier::Neutral);
        assert_eq!(score_tier(500, false), ScoreTier::Neutral);
        assert_eq!(score_tier(0, false), ScoreTier::Neutral);
    }

    #[test]
    fn negative_reviews_override_any_score() {
        assert_eq!(score_tier(2000, true), ScoreTier::Negative);
        assert_eq!(score_tier(0, true), ScoreTier::Negative);
    }

    #[test]
    fn percentage_zero_when_no_reviews() {
        let reviews = ReviewCounts::default();
        assert_eq!(positive_percentage(&reviews), 0);
    }

    #[test]
    fn percentage_hundred_when_only_positive() {
        let reviews = ReviewCounts {
            positive: 7,
            neutral: 0,
            negative: 0,
        };
        assert_eq!(positive_percentage(&reviews), 100);
    }

    #[test]
    fn percentage_rounds() {
        // 2/3 = 66.67 → 67
        let reviews = ReviewCounts {
            positive: 2,
            neutral: 1,
            negative: 0,
        };
        assert_eq!(positive_percentage(&reviews), 67);
        // 1/3 = 33.33 → 33
        let reviews = ReviewCounts {
            positive: 1,
            neutral: 2,
            negative: 0,
        };
        assert_eq!(positive_percentage(&reviews), 33);
    }

    #[test]
    fn percentage_stays_in_range() {
        for positive in 0..20u64 {
            for negative in 0..20u64 {
                let reviews = ReviewCounts {
                    positive,
                    neutral: 3,
                    negative,
                };
                assert!(positive_percentage(&reviews) <= 100);
            }
        }
    }

    #[test]
    fn truncates_long_addresses_only() {
        assert_eq!(
            truncate_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
            "0xd8dA...6045"
        );
        assert_eq!(truncate_address("0xabc"), "0xabc");
    }

    #[test]
    fn each_state_renders_its_card() {
        assert!(profile_card(&ViewState::Loading).contains("skeleton"));
        assert!(profile_card(&ViewState::Error("boom".into())).contains("Failed to load profile"));
        assert!(profile_card(&ViewState::Empty).contains("Enter an address"));
    }

    #[test]
    fn error_message_is_escaped() {
        let html = profile_card(&ViewState::Error("<script>".into()));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn unlinked_ethos_renders_badge_not_panel() {
        let p = profile(
            None,
            Some(talent_section(87)),
            ProviderAvailability {
                ethos: Availability::Unlinked,
                talent: Availability::Available,
            },
        );
        let html = profile_card(&ViewState::Populated(p));
        assert!(html.contains("Ethos: Unlinked"));
        assert!(html.contains("Talent: Available"));
        assert!(html.contains("Builder Score"));
        assert!(!html.contains("Ethos Score"));
    }

    #[test]
    fn no_data_line_when_both_unavailable() {
        let p = profile(
            None,
            None,
            ProviderAvailability {
                ethos: Availability::NotFound,
                talent: Availability::Error,
            },
        );
        let html = profile_card(&ViewState::Populated(p));
        assert!(html.contains("No reputation data found"));
        assert!(!html.contains("Ethos Score"));
        assert!(!html.contains("Builder Score"));
    }

    #[test]
    fn populated_card_shows_scores_and_stats() {
        let reviews = ReviewCounts {
            positive: 9,
            neutral: 1,
            negative: 0,
        };
        let p = profile(
            Some(ethos_section(1600, reviews, 2)),
            Some(talent_section(120)),
            ProviderAvailability {
                ethos: Availability::Available,
                talent: Availability::Available,
            },
        );
        let html = profile_card(&ViewState::Populated(p));
        assert!(html.contains("1600"));
        assert!(html.contains("Trusted"));
        assert!(html.contains("90%"));
        assert!(html.contains("10 reviews"));
        assert!(html.contains("vouches"));
        assert!(html.contains("Builder Score"));
    }

    #[test]
    fn loading_page_auto_refreshes() {
        let html = render_page("0xabc", None, &ViewState::Loading);
        assert!(html.contains("http-equiv=\"refresh\""));
        let html = render_page("", None, &ViewState::Empty);
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn page_echoes_input_escaped() {
        let html = render_page("\"><img>", Some("Please enter a valid Ethereum address"), &ViewState::Empty);
        assert!(!html.contains("\"><img>"));
        assert!(html.contains("Please enter a valid Ethereum address"));
    }
}
