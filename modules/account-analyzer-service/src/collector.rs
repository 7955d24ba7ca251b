//! Live collector adapter.
//!
//! Wraps an external scraper endpoint reachable over HTTP. The contract
//! is two-outcome: `Some(data)` on a hit, `None` on everything else —
//! endpoint missing, non-success status, empty result, bad payload.
//! True faults are logged before being folded into the miss path; they
//! never escalate past this module.

use account_analyzer_types::{ContentItem, Profile};
use chrono::Utc;
use serde::Deserialize;

pub struct LiveCollector {
    client: reqwest::Client,
    base_url: String,
}

/// Profile payload as the scraper endpoint reports it
#[derive(Debug, Deserialize)]
struct CollectorProfile {
    handle: String,
    #[serde(default)]
    external_id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    follower_count: i64,
    #[serde(default)]
    following_count: i64,
    #[serde(default)]
    content_count: i64,
    #[serde(default)]
    like_count: i64,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

/// Content payload as the scraper endpoint reports it
#[derive(Debug, Deserialize)]
struct CollectorItem {
    content_id: String,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    author_handle: String,
    #[serde(default)]
    author_name: Option<String>,
    body: String,
    #[serde(default)]
    reply_count: i64,
    #[serde(default)]
    like_count: i64,
    #[serde(default)]
    share_count: i64,
    #[serde(default)]
    view_count: i64,
    #[serde(default)]
    hashtags: Option<Vec<String>>,
    #[serde(default)]
    mentions: Option<Vec<String>>,
    #[serde(default)]
    permalink: Option<String>,
}

impl LiveCollector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var("COLLECTOR_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(Self::new)
    }

    pub async fn fetch_profile(&self, handle: &str) -> Option<Profile> {
        let url = format!("{}/profile/{}", self.base_url, handle);
        let body = self.get(&url).await?;
        match serde_json::from_str::<CollectorProfile>(&body) {
            Ok(wire) => Some(wire.into_profile()),
            Err(e) => {
                log::warn!("[COLLECTOR] Unreadable profile payload for @{}: {}", handle, e);
                None
            }
        }
    }

    pub async fn fetch_content(&self, handle: &str, limit: usize) -> Option<Vec<ContentItem>> {
        let url = format!("{}/content/{}?limit={}", self.base_url, handle, limit);
        let body = self.get(&url).await?;
        let items: Vec<CollectorItem> = match serde_json::from_str(&body) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("[COLLECTOR] Unreadable content payload for @{}: {}", handle, e);
                return None;
            }
        };
        if items.is_empty() {
            // Empty result counts as a miss, same as unavailable.
            return None;
        }
        Some(items.into_iter().map(|item| item.into_content()).collect())
    }

    async fn get(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[COLLECTOR] Request to {} failed: {}", url, e);
                return None;
            }
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("[COLLECTOR] Failed to read response from {}: {}", url, e);
                return None;
            }
        };
        if !status.is_success() {
            log::warn!(
                "[COLLECTOR] {} returned {}: {}",
                url,
                status,
                truncate_error(&body)
            );
            return None;
        }
        Some(body)
    }
}

impl CollectorProfile {
    fn into_profile(self) -> Profile {
        Profile {
            handle: self.handle,
            external_id: self.external_id,
            display_name: self.display_name,
            bio: self.bio,
            follower_count: self.follower_count,
            following_count: self.following_count,
            content_count: self.content_count,
            like_count: self.like_count,
            avatar_url: self.avatar_url,
            verified: self.verified,
            created_at: self.created_at,
            location: self.location,
            website: self.website,
            updated_at: String::new(),
        }
    }
}

impl CollectorItem {
    fn into_content(self) -> ContentItem {
        let hashtags = self
            .hashtags
            .unwrap_or_else(|| crate::generator::extract_hashtags(&self.body));
        let mentions = self
            .mentions
            .unwrap_or_else(|| crate::generator::extract_mentions(&self.body));
        let permalink = self.permalink.unwrap_or_else(|| {
            format!(
                "https://twitter.com/{}/status/{}",
                self.author_handle, self.content_id
            )
        });
        ContentItem {
            conversation_id: self.conversation_id.unwrap_or_else(|| self.content_id.clone()),
            content_id: self.content_id,
            created_at: self.created_at.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            time: self.time.unwrap_or_default(),
            timezone: self.timezone.unwrap_or_else(|| "UTC".to_string()),
            author_handle: self.author_handle,
            author_name: self.author_name.unwrap_or_default(),
            body: self.body,
            reply_count: self.reply_count,
            like_count: self.like_count,
            share_count: self.share_count,
            view_count: self.view_count,
            hashtags,
            mentions,
            permalink,
            collected_at: Utc::now().to_rfc3339(),
        }
    }
}

fn truncate_error(s: &str) -> &str {
    if s.len() > 200 { &s[..200] } else { s }
}
