//! Curated sample catalog: profile fixtures and styled content template
//! banks for a small set of recognized handles, plus the generic bank
//! everyone else falls back to.
//!
//! Lookup is by lowercase-normalized handle. Fixture counters are fixed
//! values, not randomized; `updated_at` is left empty because the store
//! stamps it on write.

use account_analyzer_types::Profile;

const NASA_BANK: &[&str] = &[
    "🚀 Today's #AstronautPhoto: The Earth from space is always breathtaking. Our astronauts captured this stunning view from the ISS. #Space #EarthFromSpace",
    "🌍 New data from our climate satellites show unprecedented changes in Arctic ice coverage. Climate change is real and we must act. #ClimateAction",
    "🔭 The James Webb Space Telescope has discovered the most distant galaxy ever observed! This changes our understanding of the early universe. #JWST #Astronomy",
    "👨‍🚀 Applications are now open for the next astronaut class! Do you have what it takes to explore the cosmos? #BeAnAstronaut #NASA",
    "🛰️ Our Perseverance rover has collected another fascinating rock sample on Mars. Each sample brings us closer to understanding if life ever existed there. #Mars2024",
];

const ELONMUSK_BANK: &[&str] = &[
    "Starship will make humanity multiplanetary. First stop: Mars. Full self-driving on Earth, then full self-driving to Mars. 🚀",
    "Tesla is accelerating the world's transition to sustainable energy. Every day matters. The future is electric! 🌍⚡",
    "X is the everything app. Payments, social media, news, entertainment - all in one place. The future is decentralized.",
    "The Tesla bot (Optimus) will eventually be able to do basically anything humans don't want to do. Manufacturing, household chores, etc.",
    "Neuralink is working on brain-computer interfaces to help people with paralysis. First applications will help restore movement and communication.",
];

const TWITTER_BANK: &[&str] = &[
    "What's happening?! Here are today's top trending topics from around the world. 🌍 #Trending",
    "Safety is our top priority. We're constantly working to make Twitter a safer place for healthy conversation. #TwitterSafety",
    "New feature alert! You can now add polls to your Spaces. Let your community have their say. 🎤 #TwitterSpaces",
    "From breaking news to meaningful conversations, Twitter is where the world talks. Join the conversation! 💬",
    "Pro tip: Use threads to tell longer stories. Your followers will thank you! 📖 #TwitterTips",
];

/// Generic inspirational bank for unrecognized handles. `{handle}` is
/// substituted by the generator before token extraction.
pub const GENERIC_BANK: &[&str] = &[
    "This is a test post from @{handle}",
    "Exploring new technologies and innovations #tech #innovation",
    "Working on exciting projects that will change the world! 🚀",
    "The future is here and it's amazing! Check this out...",
    "Just had an incredible meeting about our next big thing",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
    "Innovation distinguishes between a leader and a follower.",
    "The only way to do great work is to love what you do.",
    "Your time is limited, don't waste it living someone else's life.",
    "Stay hungry, stay foolish. #motivation #inspiration",
];

/// Styled template bank for a recognized handle, if any.
pub fn template_bank(handle: &str) -> Option<&'static [&'static str]> {
    match handle.to_lowercase().as_str() {
        "nasa" => Some(NASA_BANK),
        "elonmusk" => Some(ELONMUSK_BANK),
        "twitter" => Some(TWITTER_BANK),
        _ => None,
    }
}

/// Whether the handle belongs to the high-profile engagement tier.
pub fn is_high_profile(handle: &str) -> bool {
    matches!(
        handle.to_lowercase().as_str(),
        "nasa" | "elonmusk" | "twitter"
    )
}

/// Curated fixture profile for a recognized handle, if any.
pub fn fixture_profile(handle: &str) -> Option<Profile> {
    match handle.to_lowercase().as_str() {
        "elonmusk" => Some(Profile {
            handle: "elonmusk".to_string(),
            external_id: Some("44196397".to_string()),
            display_name: Some("Elon Musk".to_string()),
            bio: Some("Chief Twit @X".to_string()),
            follower_count: 196_000_000,
            following_count: 500,
            content_count: 30_000,
            like_count: 50_000,
            avatar_url: Some(
                "https://pbs.twimg.com/profile_images/1683325380441128964/yWrRRqyS_400x400.jpg"
                    .to_string(),
            ),
            verified: true,
            created_at: Some("2009-06-02T20:12:29.000Z".to_string()),
            location: Some("Austin, TX".to_string()),
            website: Some("http://tesla.com".to_string()),
            updated_at: String::new(),
        }),
        "nasa" => Some(Profile {
            handle: "NASA".to_string(),
            external_id: Some("11348282".to_string()),
            display_name: Some("NASA".to_string()),
            bio: Some(
                "Explore the universe and discover our home planet with @NASA.".to_string(),
            ),
            follower_count: 53_000_000,
            following_count: 280,
            content_count: 60_000,
            like_count: 2_500_000,
            avatar_url: Some(
                "https://pbs.twimg.com/profile_images/1468070244680155141/P44wqM-E_400x400.jpg"
                    .to_string(),
            ),
            verified: true,
            created_at: Some("2008-12-23T20:27:15.000Z".to_string()),
            location: Some("Washington, DC".to_string()),
            website: Some("http://nasa.gov".to_string()),
            updated_at: String::new(),
        }),
        "twitter" => Some(Profile {
            handle: "twitter".to_string(),
            external_id: Some("783214".to_string()),
            display_name: Some("Twitter".to_string()),
            bio: Some("What's happening?!".to_string()),
            follower_count: 67_000_000,
            following_count: 1_000,
            content_count: 15_000,
            like_count: 5_000_000,
            avatar_url: Some(
                "https://pbs.twimg.com/profile_images/1488548719063672832/6ytGsJx_400x400.jpg"
                    .to_string(),
            ),
            verified: true,
            created_at: Some("2007-02-20T14:35:54.000Z".to_string()),
            location: Some("Global".to_string()),
            website: Some("https://about.twitter.com".to_string()),
            updated_at: String::new(),
        }),
        _ => None,
    }
}
