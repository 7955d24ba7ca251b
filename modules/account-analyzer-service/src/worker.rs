//! Background analysis jobs.
//!
//! Each submitted task gets its own spawned job running the
//! resolve → persist → finalize pipeline. Jobs are independent and
//! unordered; the only ordering guarantee is within one job: profile
//! write, then content writes, then the terminal status write.

use crate::routes::AppState;
use account_analyzer_types::{AnalyzeRequest, DataSource};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Schedule the analysis pipeline for one task without blocking the
/// caller. The returned handle completes once the task has reached a
/// terminal state; exactly one terminal write happens even when the
/// pipeline errors.
pub fn dispatch(state: Arc<AppState>, task_id: String, request: AnalyzeRequest) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = state.db.mark_running(&task_id) {
            log::error!("[ANALYZER] Failed to mark task {} running: {}", task_id, e);
        }

        match run_analysis(&state, &request).await {
            Ok(source) => {
                match state.db.mark_completed(&task_id, source) {
                    Ok(true) => log::info!(
                        "[ANALYZER] Task {} completed for @{} (source: {})",
                        task_id,
                        request.handle,
                        source.as_str()
                    ),
                    Ok(false) => log::warn!(
                        "[ANALYZER] Task {} was already terminal at completion",
                        task_id
                    ),
                    Err(e) => log::error!(
                        "[ANALYZER] Failed to record completion of task {}: {}",
                        task_id,
                        e
                    ),
                }
            }
            Err((message, source)) => {
                log::warn!(
                    "[ANALYZER] Task {} failed for @{}: {}",
                    task_id,
                    request.handle,
                    message
                );
                if let Err(e) = state.db.mark_failed(&task_id, &message, source) {
                    log::error!(
                        "[ANALYZER] Failed to record failure of task {}: {}",
                        task_id,
                        e
                    );
                }
            }
        }
    })
}

/// Resolve the data for one request and persist it: profile first, then
/// the content batch. A storage failure carries the source tag resolved
/// so far into the task record.
async fn run_analysis(
    state: &AppState,
    request: &AnalyzeRequest,
) -> Result<DataSource, (String, DataSource)> {
    let resolved = state
        .resolver
        .resolve(&request.handle, request.include_content, request.content_limit)
        .await;
    let source = resolved.source;

    state
        .db
        .upsert_profile(&resolved.profile)
        .map_err(|e| (format!("Profile write failed: {}", e), source))?;

    if !resolved.content.is_empty() {
        state
            .db
            .upsert_content(&resolved.content)
            .map_err(|e| (format!("Content write failed: {}", e), source))?;
    }

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::resolver::SourceResolver;
    use account_analyzer_types::TaskStatus;
    use std::time::Instant;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            db: Arc::new(Db::open(":memory:").expect("in-memory db")),
            resolver: Arc::new(SourceResolver::new(None, false)),
            start_time: Instant::now(),
        })
    }

    fn request(handle: &str, include_content: bool, limit: usize) -> AnalyzeRequest {
        AnalyzeRequest {
            handle: handle.to_string(),
            include_content,
            content_limit: limit,
        }
    }

    #[tokio::test]
    async fn curated_task_completes_with_fixture_data() {
        let state = test_state();
        state.db.create_task("t-nasa", "nasa").unwrap();

        dispatch(state.clone(), "t-nasa".to_string(), request("nasa", true, 100))
            .await
            .unwrap();

        let task = state.db.get_task("t-nasa").unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.data_source, Some(DataSource::Curated));
        assert!(task.completed_at.is_some());

        let profile = state.db.get_profile("nasa").unwrap().unwrap();
        assert!(profile.verified);
        assert_eq!(profile.follower_count, 53_000_000);
        assert_eq!(state.db.count_content_for_handle("nasa").unwrap(), 5);
    }

    #[tokio::test]
    async fn unknown_handle_task_completes_synthetically() {
        let state = test_state();
        state.db.create_task("t-u", "unknown_user_123").unwrap();

        dispatch(
            state.clone(),
            "t-u".to_string(),
            request("unknown_user_123", true, 100),
        )
        .await
        .unwrap();

        let task = state.db.get_task("t-u").unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.data_source, Some(DataSource::Synthetic));

        let profile = state.db.get_profile("unknown_user_123").unwrap().unwrap();
        assert!(profile.bio.unwrap().contains("unknown_user_123"));
        // Generic bank holds 10 templates; the limit of 100 does not
        // inflate the batch.
        assert_eq!(
            state.db.count_content_for_handle("unknown_user_123").unwrap(),
            10
        );
    }

    #[tokio::test]
    async fn profile_only_task_persists_no_content() {
        let state = test_state();
        state.db.create_task("t-p", "nasa").unwrap();

        dispatch(state.clone(), "t-p".to_string(), request("nasa", false, 100))
            .await
            .unwrap();

        let task = state.db.get_task("t-p").unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.data_source, Some(DataSource::Curated));
        assert!(state.db.get_profile("nasa").unwrap().is_some());
        assert_eq!(state.db.count_content_for_handle("nasa").unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_same_handle_tasks_both_terminate() {
        let state = test_state();
        state.db.create_task("t-1", "someone").unwrap();
        state.db.create_task("t-2", "someone").unwrap();

        let h1 = dispatch(state.clone(), "t-1".to_string(), request("someone", true, 10));
        let h2 = dispatch(state.clone(), "t-2".to_string(), request("someone", true, 10));
        h1.await.unwrap();
        h2.await.unwrap();

        for id in ["t-1", "t-2"] {
            let task = state.db.get_task(id).unwrap().unwrap();
            assert!(task.status.is_terminal());
            assert_eq!(task.status, TaskStatus::Completed);
        }
        // Whole-row replaces: the surviving profile row is one job's
        // write, never a blend.
        let profile = state.db.get_profile("someone").unwrap().unwrap();
        assert!(profile.bio.unwrap().contains("someone"));
    }
}
