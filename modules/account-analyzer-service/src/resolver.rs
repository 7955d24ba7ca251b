//! Layered data-source resolution: live collector, then curated catalog,
//! then synthetic generation. First hit wins; nothing is merged across
//! tiers. Resolution itself cannot fail — the generator always produces
//! something — so errors only appear later, at persistence.

use crate::catalog;
use crate::collector::LiveCollector;
use crate::generator;
use account_analyzer_types::{ContentItem, DataSource, Profile};
use tokio::sync::RwLock;

pub struct SourceResolver {
    collector: Option<LiveCollector>,
    live_enabled: RwLock<bool>,
}

/// Output of one resolution pass. `source` is the aggregate tag recorded
/// on the task: the content tier when content was requested, else the
/// profile tier.
pub struct Resolved {
    pub profile: Profile,
    pub content: Vec<ContentItem>,
    pub source: DataSource,
}

impl SourceResolver {
    pub fn new(collector: Option<LiveCollector>, live_enabled: bool) -> Self {
        Self {
            collector,
            live_enabled: RwLock::new(live_enabled),
        }
    }

    /// Whether a collector endpoint is configured at all.
    pub fn collector_available(&self) -> bool {
        self.collector.is_some()
    }

    pub async fn live_enabled(&self) -> bool {
        *self.live_enabled.read().await
    }

    /// Controlled runtime reconfiguration of the live tier. Returns the
    /// effective value: enabling without a configured collector still
    /// resolves every request from the fallback tiers.
    pub async fn set_live_enabled(&self, enabled: bool) -> bool {
        *self.live_enabled.write().await = enabled;
        enabled
    }

    pub async fn resolve(&self, handle: &str, want_content: bool, limit: usize) -> Resolved {
        let (profile, profile_source) = match self.live_profile(handle).await {
            Some(profile) => (profile, DataSource::Live),
            None => match catalog::fixture_profile(handle) {
                Some(fixture) => (fixture, DataSource::Curated),
                None => (generator::generate_profile(handle), DataSource::Synthetic),
            },
        };

        let (content, content_source) = if want_content {
            match self.live_content(handle, limit).await {
                Some(items) => (items, DataSource::Live),
                None => {
                    let tier = if catalog::template_bank(handle).is_some() {
                        DataSource::Curated
                    } else {
                        DataSource::Synthetic
                    };
                    (generator::generate_content(handle, limit), tier)
                }
            }
        } else {
            (Vec::new(), profile_source)
        };

        let source = if want_content {
            content_source
        } else {
            profile_source
        };

        log::debug!(
            "Resolved @{} via {} ({} content items)",
            handle,
            source.as_str(),
            content.len()
        );

        Resolved {
            profile,
            content,
            source,
        }
    }

    async fn live_profile(&self, handle: &str) -> Option<Profile> {
        if !self.live_enabled().await {
            return None;
        }
        self.collector.as_ref()?.fetch_profile(handle).await
    }

    async fn live_content(&self, handle: &str, limit: usize) -> Option<Vec<ContentItem>> {
        if !self.live_enabled().await {
            return None;
        }
        self.collector.as_ref()?.fetch_content(handle, limit).await
    }
}
