//! Axum route handlers for the account analyzer RPC API.

use crate::db::Db;
use crate::resolver::SourceResolver;
use crate::worker;
use account_analyzer_types::*;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

/// How many stored content items a completed-task result returns at most.
const RESULT_CONTENT_LIMIT: usize = 50;

pub struct AppState {
    pub db: Arc<Db>,
    pub resolver: Arc<SourceResolver>,
    pub start_time: Instant,
}

// =====================================================
// Analysis Endpoints
// =====================================================

// POST /rpc/analyze
pub async fn analyze_submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> (StatusCode, Json<RpcResponse<AnalyzeAccepted>>) {
    let handle = req.handle.trim_start_matches('@').trim().to_string();
    if handle.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(RpcResponse::err("Handle must not be empty")),
        );
    }

    let task_id = uuid::Uuid::new_v4().to_string();
    if let Err(e) = state.db.create_task(&task_id, &handle) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RpcResponse::err(format!("Failed to create task: {}", e))),
        );
    }

    let request = AnalyzeRequest { handle, ..req };
    // Detached on purpose; the task row is how callers observe completion.
    let _job = worker::dispatch(state.clone(), task_id.clone(), request);

    (StatusCode::OK, Json(RpcResponse::ok(AnalyzeAccepted { task_id })))
}

// GET /rpc/tasks/:task_id
pub async fn task_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> (StatusCode, Json<RpcResponse<AnalysisTask>>) {
    match state.db.get_task(&task_id) {
        Ok(Some(task)) => (StatusCode::OK, Json(RpcResponse::ok(task))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(RpcResponse::err(format!("Task {} not found", task_id))),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RpcResponse::err(format!("Failed to read task: {}", e))),
        ),
    }
}

// GET /rpc/analyze/:task_id
pub async fn analysis_result(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> (StatusCode, Json<RpcResponse<AnalysisResult>>) {
    let task = match state.db.get_task(&task_id) {
        Ok(Some(task)) => task,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(RpcResponse::err(format!("Task {} not found", task_id))),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::err(format!("Failed to read task: {}", e))),
            )
        }
    };

    if task.status != TaskStatus::Completed {
        // Not ready (or failed): return the task record alone, the caller
        // inspects status/error_message.
        let result = AnalysisResult {
            task,
            profile: None,
            content: Vec::new(),
        };
        return (StatusCode::OK, Json(RpcResponse::ok(result)));
    }

    let profile = match state.db.get_profile(&task.handle) {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::err(format!("Failed to read profile: {}", e))),
            )
        }
    };
    let content = match state.db.get_recent_content(&task.handle, RESULT_CONTENT_LIMIT) {
        Ok(items) => items,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::err(format!("Failed to read content: {}", e))),
            )
        }
    };

    let result = AnalysisResult {
        task,
        profile,
        content,
    };
    (StatusCode::OK, Json(RpcResponse::ok(result)))
}

// =====================================================
// Profile / Task Listing Endpoints
// =====================================================

// GET /rpc/profiles/:handle
pub async fn profile_get(
    State(state): State<Arc<AppState>>,
    Path(handle): Path<String>,
) -> (StatusCode, Json<RpcResponse<Profile>>) {
    match state.db.get_profile(&handle) {
        Ok(Some(profile)) => (StatusCode::OK, Json(RpcResponse::ok(profile))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(RpcResponse::err(format!("No profile stored for @{}", handle))),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RpcResponse::err(format!("Failed to read profile: {}", e))),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub limit: Option<usize>,
}

// GET /rpc/tasks?limit=N
pub async fn tasks_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TaskListParams>,
) -> (StatusCode, Json<RpcResponse<Vec<AnalysisTask>>>) {
    let limit = params.limit.unwrap_or(100).min(500);
    match state.db.list_tasks(limit) {
        Ok(tasks) => (StatusCode::OK, Json(RpcResponse::ok(tasks))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RpcResponse::err(format!("Failed to list tasks: {}", e))),
        ),
    }
}

// =====================================================
// Service Endpoints
// =====================================================

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    let stats = state.db.store_stats().ok();

    let status = ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        profiles: stats.as_ref().map(|s| s.profiles).unwrap_or(0),
        content_items: stats.as_ref().map(|s| s.content_items).unwrap_or(0),
        total_tasks: stats.as_ref().map(|s| s.total_tasks).unwrap_or(0),
        completed_tasks: stats.as_ref().map(|s| s.completed_tasks).unwrap_or(0),
        failed_tasks: stats.as_ref().map(|s| s.failed_tasks).unwrap_or(0),
        collector_available: state.resolver.collector_available(),
        live_enabled: state.resolver.live_enabled().await,
    };

    (StatusCode::OK, Json(RpcResponse::ok(status)))
}

// POST /rpc/config/collector
pub async fn config_collector(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CollectorConfigRequest>,
) -> (StatusCode, Json<RpcResponse<CollectorConfig>>) {
    let live_enabled = state.resolver.set_live_enabled(req.live_enabled).await;
    log::info!(
        "Live collection {} via config endpoint",
        if live_enabled { "enabled" } else { "disabled" }
    );
    let config = CollectorConfig {
        collector_available: state.resolver.collector_available(),
        live_enabled,
    };
    (StatusCode::OK, Json(RpcResponse::ok(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use account_analyzer_types::TaskStatus;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            db: Arc::new(Db::open(":memory:").expect("in-memory db")),
            resolver: Arc::new(SourceResolver::new(None, false)),
            start_time: Instant::now(),
        })
    }

    #[tokio::test]
    async fn submit_creates_pending_task_and_strips_at_sign() {
        let state = test_state();
        let req = AnalyzeRequest {
            handle: "@nasa".to_string(),
            include_content: true,
            content_limit: 10,
        };

        let (code, Json(response)) = analyze_submit(State(state.clone()), Json(req)).await;
        assert_eq!(code, StatusCode::OK);
        let task_id = response.data.unwrap().task_id;

        // The task row exists immediately, whatever the background job is
        // up to; its handle has no @ prefix.
        let task = state.db.get_task(&task_id).unwrap().unwrap();
        assert_eq!(task.handle, "nasa");
        assert!(matches!(
            task.status,
            TaskStatus::Pending | TaskStatus::Running | TaskStatus::Completed
        ));
    }

    #[tokio::test]
    async fn submit_rejects_empty_handle() {
        let state = test_state();
        let req = AnalyzeRequest {
            handle: "@".to_string(),
            include_content: false,
            content_limit: 0,
        };
        let (code, Json(response)) = analyze_submit(State(state), Json(req)).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(!response.success);
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let state = test_state();
        let (code, Json(response)) =
            task_status(State(state.clone()), Path("missing".to_string())).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
        assert!(!response.success);

        let (code, _) = analysis_result(State(state), Path("missing".to_string())).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn result_is_bare_until_completed() {
        let state = test_state();
        state.db.create_task("t-wait", "nasa").unwrap();

        let (code, Json(response)) =
            analysis_result(State(state), Path("t-wait".to_string())).await;
        assert_eq!(code, StatusCode::OK);
        let result = response.data.unwrap();
        assert_eq!(result.task.status, TaskStatus::Pending);
        assert!(result.profile.is_none());
        assert!(result.content.is_empty());
    }

    #[tokio::test]
    async fn result_returns_profile_and_content_once_completed() {
        let state = test_state();
        state.db.create_task("t-done", "nasa").unwrap();
        worker::dispatch(
            state.clone(),
            "t-done".to_string(),
            AnalyzeRequest {
                handle: "nasa".to_string(),
                include_content: true,
                content_limit: 100,
            },
        )
        .await
        .unwrap();

        let (code, Json(response)) =
            analysis_result(State(state), Path("t-done".to_string())).await;
        assert_eq!(code, StatusCode::OK);
        let result = response.data.unwrap();
        assert_eq!(result.task.status, TaskStatus::Completed);
        assert_eq!(result.profile.unwrap().follower_count, 53_000_000);
        assert_eq!(result.content.len(), 5);
    }

    #[tokio::test]
    async fn config_endpoint_flips_live_mode() {
        let state = test_state();
        let (code, Json(response)) = config_collector(
            State(state.clone()),
            Json(CollectorConfigRequest { live_enabled: true }),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        let config = response.data.unwrap();
        assert!(config.live_enabled);
        assert!(!config.collector_available);
        assert!(state.resolver.live_enabled().await);
    }
}
