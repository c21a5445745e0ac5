//! status-pages command - Status pages and third-party outages
//!
//! # Third-Party Outages
//!
//! `third-party` reads a public, unauthenticated JSON feed of provider
//! outages instead of the Datadog API. Providers can be narrowed by a
//! case-insensitive name search and to those with an unresolved outage.
//! Table output adds a 30-day uptime strip, one glyph per day, oldest
//! first.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{destroy, show};
use crate::cli::args::{PageAction, StatusPageAction};
use crate::client::{fetch_public_json, ApiRequest};
use crate::core::agent;
use crate::session::Session;
use crate::ui::output::{table, OutputFormat};

const UPTIME_DAYS: i64 = 30;
const DAY_MS: i64 = 86_400_000;

const DAY_UNMONITORED: char = '·';
const DAY_HEALTHY: char = '▁';
const DAY_OUTAGE: char = '█';

pub async fn run(session: &mut Session, action: StatusPageAction) -> Result<()> {
    match action {
        StatusPageAction::Pages { action } => pages(session, action).await,
        StatusPageAction::ThirdParty { search, active } => {
            third_party(session, search.as_deref(), active).await
        }
    }
}

async fn pages(session: &mut Session, action: PageAction) -> Result<()> {
    match action {
        PageAction::List => {
            let request = ApiRequest::get("/api/v2/status_pages");
            show(session, "status-pages pages list", "list status pages", request).await
        }
        PageAction::Get { page_id } => {
            let request = ApiRequest::get(format!("/api/v2/status_pages/{}", page_id));
            show(session, "status-pages pages get", "get status page", request).await
        }
        PageAction::Delete { page_id } => {
            destroy(
                session,
                "status-pages pages delete",
                &format!("Delete status page {}?", page_id),
                "delete status page",
                ApiRequest::delete(format!("/api/v2/status_pages/{}", page_id)),
                &format!("Status page {} deleted.", page_id),
            )
            .await
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutageFeed {
    data: FeedData,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    attributes: FeedAttributes,
}

#[derive(Debug, Deserialize)]
struct FeedAttributes {
    #[serde(default)]
    provider_data: Vec<Provider>,
}

/// One monitored third-party provider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Provider {
    pub provider_name: String,
    #[serde(default)]
    pub provider_service: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub outages: Vec<Outage>,
    /// Unix ms
    #[serde(default)]
    pub monitoring_start_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
}

/// One outage window, times in unix ms. `end == 0` means still open.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Outage {
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub impacted_region: String,
}

impl Outage {
    fn is_resolved(&self) -> bool {
        self.status == "resolved"
    }
}

impl Provider {
    /// Status of the first unresolved outage, or `operational`.
    pub fn current_status(&self) -> &str {
        self.outages
            .iter()
            .find(|o| !o.is_resolved())
            .map(|o| o.status.as_str())
            .unwrap_or("operational")
    }

    fn matches(&self, search: Option<&str>, active_only: bool) -> bool {
        if let Some(query) = search {
            let query = query.to_lowercase();
            if !self.provider_name.to_lowercase().contains(&query)
                && !self.display_name.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        !active_only || self.outages.iter().any(|o| !o.is_resolved())
    }

    /// One glyph per day for the last 30 days ending at `now_ms`.
    pub fn uptime_strip(&self, now_ms: i64) -> String {
        (0..UPTIME_DAYS)
            .rev()
            .map(|days_ago| {
                let day_start = now_ms - (days_ago + 1) * DAY_MS;
                let day_end = now_ms - days_ago * DAY_MS;
                if day_end <= self.monitoring_start_date {
                    return DAY_UNMONITORED;
                }
                let down = self.outages.iter().any(|o| {
                    let end = if o.end == 0 { now_ms } else { o.end };
                    o.start < day_end && end > day_start
                });
                if down {
                    DAY_OUTAGE
                } else {
                    DAY_HEALTHY
                }
            })
            .collect()
    }
}

/// Keep providers matching `search` and, with `active_only`, an open outage.
pub fn filter_providers(
    providers: Vec<Provider>,
    search: Option<&str>,
    active_only: bool,
) -> Vec<Provider> {
    providers
        .into_iter()
        .filter(|p| p.matches(search, active_only))
        .collect()
}

/// Render providers as a table, or `No results found`.
pub fn render_providers(providers: &[Provider], now_ms: i64) -> String {
    if providers.is_empty() {
        return "No results found".to_string();
    }
    let mut table = table();
    table.set_header(["PROVIDER", "DISPLAY NAME", "SERVICE", "UPTIME (30d)", "STATUS"]);
    for p in providers {
        table.add_row([
            p.provider_name.clone(),
            p.display_name.clone(),
            p.provider_service.clone(),
            p.uptime_strip(now_ms),
            p.current_status().to_string(),
        ]);
    }
    table.to_string()
}

async fn third_party(session: &mut Session, search: Option<&str>, active: bool) -> Result<()> {
    let url = session.third_party_url().to_string();
    let user_agent = agent::user_agent(session.config().agent.as_ref());
    debug!(%url, "fetching third-party outages");

    let raw = fetch_public_json(&url, &user_agent)
        .await
        .context("failed to fetch third-party outages")?;
    let feed: OutageFeed =
        serde_json::from_value(raw).context("unexpected third-party outage feed format")?;
    let providers = filter_providers(feed.data.attributes.provider_data, search, active);

    if session.config().output == OutputFormat::Table && !session.config().agent_mode {
        let now_ms = chrono::Utc::now().timestamp_millis();
        return session.println(render_providers(&providers, now_ms));
    }
    let data = serde_json::to_value(&providers)?;
    session.emit_for("status-pages third-party", &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_717_243_200_000;

    fn outage(start: i64, end: i64, status: &str) -> Outage {
        Outage {
            start,
            end,
            status: status.to_string(),
            impacted_region: String::new(),
        }
    }

    fn provider(name: &str, display: &str, outages: Vec<Outage>) -> Provider {
        Provider {
            provider_name: name.to_string(),
            provider_service: "api".to_string(),
            display_name: display.to_string(),
            outages,
            monitoring_start_date: 0,
            status_url: None,
        }
    }

    mod status {
        use super::*;

        #[test]
        fn operational_without_open_outages() {
            let p = provider("github", "GitHub", vec![outage(1, 2, "resolved")]);
            assert_eq!(p.current_status(), "operational");
            assert_eq!(provider("x", "X", vec![]).current_status(), "operational");
        }

        #[test]
        fn first_open_outage_wins() {
            let p = provider(
                "github",
                "GitHub",
                vec![
                    outage(1, 2, "resolved"),
                    outage(3, 0, "investigating"),
                    outage(4, 0, "identified"),
                ],
            );
            assert_eq!(p.current_status(), "investigating");
        }
    }

    mod filtering {
        use super::*;

        fn sample() -> Vec<Provider> {
            vec![
                provider("github", "GitHub", vec![outage(1, 0, "investigating")]),
                provider("aws-s3", "Amazon S3", vec![outage(1, 2, "resolved")]),
                provider("slack", "Slack", vec![]),
            ]
        }

        #[test]
        fn no_filters_keeps_all() {
            assert_eq!(filter_providers(sample(), None, false).len(), 3);
        }

        #[test]
        fn search_matches_either_name_ignoring_case() {
            let by_name = filter_providers(sample(), Some("GITHUB"), false);
            assert_eq!(by_name.len(), 1);
            let by_display = filter_providers(sample(), Some("amazon"), false);
            assert_eq!(by_display[0].provider_name, "aws-s3");
        }

        #[test]
        fn active_only() {
            let active = filter_providers(sample(), None, true);
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].provider_name, "github");
        }

        #[test]
        fn no_match() {
            assert!(filter_providers(sample(), Some("nope"), false).is_empty());
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn healthy_strip() {
            let strip = provider("x", "X", vec![]).uptime_strip(NOW);
            assert_eq!(strip.chars().count(), 30);
            assert!(strip.chars().all(|c| c == DAY_HEALTHY));
        }

        #[test]
        fn open_outage_marks_today() {
            let p = provider("x", "X", vec![outage(NOW - 3_600_000, 0, "investigating")]);
            let strip = p.uptime_strip(NOW);
            assert_eq!(strip.chars().last(), Some(DAY_OUTAGE));
            assert_eq!(strip.chars().filter(|&c| c == DAY_OUTAGE).count(), 1);
        }

        #[test]
        fn days_before_monitoring_are_dimmed() {
            let mut p = provider("x", "X", vec![]);
            p.monitoring_start_date = NOW - 2 * DAY_MS;
            let strip = p.uptime_strip(NOW);
            assert_eq!(strip.chars().filter(|&c| c == DAY_UNMONITORED).count(), 28);
        }

        #[test]
        fn table_and_empty() {
            assert_eq!(render_providers(&[], NOW), "No results found");
            let rendered = render_providers(&[provider("github", "GitHub", vec![])], NOW);
            assert!(rendered.contains("PROVIDER"));
            assert!(rendered.contains("operational"));
        }
    }

    #[test]
    fn feed_decodes_with_missing_optionals() {
        let raw = serde_json::json!({
            "data": {"attributes": {"provider_data": [
                {"provider_name": "github", "display_name": "GitHub", "monitoring_start_date": 5}
            ]}}
        });
        let feed: OutageFeed = serde_json::from_value(raw).unwrap();
        let providers = feed.data.attributes.provider_data;
        assert_eq!(providers[0].outages.len(), 0);
        assert_eq!(providers[0].provider_service, "");
    }
}
