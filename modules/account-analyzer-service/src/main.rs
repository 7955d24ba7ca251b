//! Account Analyzer Service — standalone binary for on-demand analysis of
//! social accounts.
//!
//! Accepts analysis requests, runs them as background jobs against a
//! layered data-source chain (live collector → curated catalog →
//! synthetic generator), and serves the persisted results.
//! Default: http://127.0.0.1:9106/

mod catalog;
mod collector;
mod db;
mod generator;
mod resolver;
mod routes;
mod worker;

use routes::AppState;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let port: u16 = std::env::var("ACCOUNT_ANALYZER_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9106);

    let db_path = std::env::var("ACCOUNT_ANALYZER_DB_PATH")
        .unwrap_or_else(|_| "./account_analyzer.db".to_string());

    // Live collection stays off unless explicitly enabled; the catalog and
    // generator tiers cover every request either way.
    let live_enabled = std::env::var("COLLECTOR_LIVE_ENABLED")
        .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    log::info!("Opening database at: {}", db_path);
    let database = Arc::new(db::Db::open(&db_path).expect("Failed to open database"));

    let live_collector = collector::LiveCollector::from_env();
    match (&live_collector, live_enabled) {
        (Some(_), true) => log::info!("Live collector configured and enabled"),
        (Some(_), false) => log::info!("Live collector configured but disabled"),
        (None, _) => log::warn!("No collector endpoint set — resolving from catalog/synthetic only"),
    }

    let resolver = Arc::new(resolver::SourceResolver::new(live_collector, live_enabled));

    let state = Arc::new(AppState {
        db: database,
        resolver,
        start_time: Instant::now(),
    });

    let cors = tower_http::cors::CorsLayer::permissive();

    let app = axum::Router::new()
        // Analysis
        .route("/rpc/analyze", axum::routing::post(routes::analyze_submit))
        .route(
            "/rpc/analyze/:task_id",
            axum::routing::get(routes::analysis_result),
        )
        // Tasks
        .route("/rpc/tasks", axum::routing::get(routes::tasks_list))
        .route(
            "/rpc/tasks/:task_id",
            axum::routing::get(routes::task_status),
        )
        // Profiles
        .route(
            "/rpc/profiles/:handle",
            axum::routing::get(routes::profile_get),
        )
        // Service
        .route("/rpc/status", axum::routing::get(routes::status))
        .route(
            "/rpc/config/collector",
            axum::routing::post(routes::config_collector),
        )
        .with_state(state)
        .layer(cors);

    let addr = format!("127.0.0.1:{}", port);
    log::info!("Account Analyzer Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
