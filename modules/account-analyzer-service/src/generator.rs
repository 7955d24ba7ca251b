//! Synthetic profile and content generation.
//!
//! Always succeeds: any handle gets a plausible profile and a batch of
//! content items built from the catalog's template banks. Recognized
//! handles use their styled bank and the curated fixture profile;
//! everyone else gets the generic bank and a randomized profile.

use crate::catalog;
use account_analyzer_types::{ContentItem, Profile};
use chrono::{Duration, Utc};
use rand::Rng;

/// Left-to-right whitespace tokens starting with `prefix`, duplicates and
/// casing preserved.
fn extract_prefixed(body: &str, prefix: char) -> Vec<String> {
    body.split_whitespace()
        .filter(|word| word.starts_with(prefix))
        .map(|word| word.to_string())
        .collect()
}

pub fn extract_hashtags(body: &str) -> Vec<String> {
    extract_prefixed(body, '#')
}

pub fn extract_mentions(body: &str) -> Vec<String> {
    extract_prefixed(body, '@')
}

/// Capitalize the first letter of each alphanumeric run.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut boundary = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

/// Profile for a handle. Recognized handles get the curated fixture
/// unchanged; unrecognized handles get a randomized best-effort profile
/// whose bio names the handle.
pub fn generate_profile(handle: &str) -> Profile {
    if let Some(fixture) = catalog::fixture_profile(handle) {
        return fixture;
    }

    let mut rng = rand::thread_rng();
    Profile {
        handle: handle.to_string(),
        external_id: Some(rng.gen_range(10_000_000i64..=99_999_999).to_string()),
        display_name: Some(format!("{} User", title_case(handle))),
        bio: Some(format!(
            "This is the bio for @{}. Exploring digital horizons and sharing insights.",
            handle
        )),
        follower_count: rng.gen_range(1_000..=1_000_000),
        following_count: rng.gen_range(100..=5_000),
        content_count: rng.gen_range(100..=10_000),
        like_count: rng.gen_range(500..=50_000),
        avatar_url: Some(format!("https://picsum.photos/seed/{}/200/200.jpg", handle)),
        verified: rng.gen_bool(0.5),
        created_at: Some("2020-01-01T00:00:00.000Z".to_string()),
        location: Some("Digital World".to_string()),
        website: Some(format!("https://twitter.com/{}", handle)),
        updated_at: String::new(),
    }
}

/// Content batch for a handle: min(limit, bank size) items, most recent
/// first. Identifiers are drawn from a wide random range (collisions
/// improbable, not impossible); timestamps decrease strictly with the
/// item index.
pub fn generate_content(handle: &str, limit: usize) -> Vec<ContentItem> {
    let bank = catalog::template_bank(handle).unwrap_or(catalog::GENERIC_BANK);
    let count = limit.min(bank.len());
    let author_name = catalog::fixture_profile(handle)
        .and_then(|p| p.display_name)
        .unwrap_or_else(|| title_case(handle));
    let high_profile = catalog::is_high_profile(handle);

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut items = Vec::with_capacity(count);

    for (i, template) in bank.iter().take(count).enumerate() {
        let body = template.replace("{handle}", handle);
        let content_id = rng
            .gen_range(1_000_000_000_000_000_000u64..=9_999_999_999_999_999_999)
            .to_string();

        // 2h cadence with sub-cadence jitter keeps items strictly ordered.
        let offset_minutes = (i as i64) * 120 + rng.gen_range(1..=119);
        let created = now - Duration::minutes(offset_minutes);

        let (reply_count, like_count, share_count, view_count) = if high_profile {
            (
                rng.gen_range(100..=2_000),
                rng.gen_range(5_000..=100_000),
                rng.gen_range(500..=10_000),
                rng.gen_range(50_000..=1_000_000),
            )
        } else {
            (
                rng.gen_range(0..=50),
                rng.gen_range(10..=500),
                rng.gen_range(1..=100),
                rng.gen_range(100..=5_000),
            )
        };

        items.push(ContentItem {
            hashtags: extract_hashtags(&body),
            mentions: extract_mentions(&body),
            permalink: format!("https://twitter.com/{}/status/{}", handle, content_id),
            conversation_id: content_id.clone(),
            content_id,
            created_at: created.to_rfc3339(),
            date: created.format("%Y-%m-%d").to_string(),
            time: created.format("%H:%M:%S").to_string(),
            timezone: "UTC".to_string(),
            author_handle: handle.to_string(),
            author_name: author_name.clone(),
            body,
            reply_count,
            like_count,
            share_count,
            view_count,
            collected_at: Utc::now().to_rfc3339(),
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn extraction_preserves_order_duplicates_and_casing() {
        let body = "Go #Rust with @alice and @Alice again #rust #Rust today";
        assert_eq!(extract_hashtags(body), vec!["#Rust", "#rust", "#Rust"]);
        assert_eq!(extract_mentions(body), vec!["@alice", "@Alice"]);
    }

    #[test]
    fn extraction_of_plain_text_is_empty() {
        assert!(extract_hashtags("nothing tagged here").is_empty());
        assert!(extract_mentions("nothing tagged here").is_empty());
    }

    #[test]
    fn generated_tokens_match_their_body() {
        for item in generate_content("nasa", 10) {
            assert_eq!(item.hashtags, extract_hashtags(&item.body));
            assert_eq!(item.mentions, extract_mentions(&item.body));
        }
    }

    #[test]
    fn batch_length_is_min_of_limit_and_bank() {
        assert_eq!(generate_content("unknown_user_123", 100).len(), 10);
        assert_eq!(generate_content("unknown_user_123", 3).len(), 3);
        assert_eq!(generate_content("nasa", 100).len(), 5);
        assert!(generate_content("nasa", 0).is_empty());
    }

    #[test]
    fn timestamps_strictly_decrease() {
        let items = generate_content("unknown_user_123", 10);
        let times: Vec<_> = items
            .iter()
            .map(|i| DateTime::parse_from_rfc3339(&i.created_at).unwrap())
            .collect();
        for pair in times.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn permalink_composed_from_handle_and_id() {
        let items = generate_content("someone", 1);
        assert_eq!(
            items[0].permalink,
            format!("https://twitter.com/someone/status/{}", items[0].content_id)
        );
    }

    #[test]
    fn generic_bank_substitutes_the_handle() {
        let items = generate_content("someone", 10);
        assert!(items.iter().any(|i| i.mentions.contains(&"@someone".to_string())));
    }

    #[test]
    fn unknown_profile_references_the_handle() {
        let profile = generate_profile("unknown_user_123");
        assert!(profile.bio.as_deref().unwrap().contains("unknown_user_123"));
        assert_eq!(
            profile.display_name.as_deref(),
            Some("Unknown_User_123 User")
        );
    }

    #[test]
    fn recognized_profile_is_the_fixture_unchanged() {
        let profile = generate_profile("nasa");
        assert_eq!(profile, crate::catalog::fixture_profile("nasa").unwrap());
    }

    #[test]
    fn engagement_tiers_differ_by_category() {
        for item in generate_content("nasa", 5) {
            assert!(item.like_count >= 5_000);
        }
        for item in generate_content("someone", 10) {
            assert!(item.like_count <= 500);
        }
    }
}
