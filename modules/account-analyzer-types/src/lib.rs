//! Shared types for the account analyzer service and its RPC clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A tracked social account profile, keyed by handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub handle: String,
    pub external_id: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
    pub content_count: i64,
    pub like_count: i64,
    pub avatar_url: Option<String>,
    pub verified: bool,
    pub created_at: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub updated_at: String,
}

/// A single captured or generated post, keyed by content_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub content_id: String,
    pub conversation_id: String,
    pub created_at: String,
    pub date: String,
    pub time: String,
    pub timezone: String,
    pub author_handle: String,
    pub author_name: String,
    pub body: String,
    pub reply_count: i64,
    pub like_count: i64,
    pub share_count: i64,
    pub view_count: i64,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub permalink: String,
    pub collected_at: String,
}

/// Lifecycle state of an analysis task.
///
/// `pending -> (running) -> {completed, failed}`; both terminal states
/// are sinks and `running` may be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "running" => Some(TaskStatus::Running),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Which tier of the fallback chain produced the data for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Curated,
    Synthetic,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Curated => "curated",
            DataSource::Synthetic => "synthetic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "live" => Some(DataSource::Live),
            "curated" => Some(DataSource::Curated),
            "synthetic" => Some(DataSource::Synthetic),
            _ => None,
        }
    }
}

/// One asynchronous unit of analysis work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub task_id: String,
    pub handle: String,
    pub status: TaskStatus,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub error_message: Option<String>,
    pub data_source: Option<DataSource>,
}

// =====================================================
// RPC Request Types
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub handle: String,
    #[serde(default = "default_include_content")]
    pub include_content: bool,
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,
}

fn default_include_content() -> bool {
    true
}

fn default_content_limit() -> usize {
    100
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectorConfigRequest {
    pub live_enabled: bool,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeAccepted {
    pub task_id: String,
}

/// Completed-task payload: the task record plus whatever the store holds
/// for its handle
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub task: AnalysisTask,
    pub profile: Option<Profile>,
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub collector_available: bool,
    pub live_enabled: bool,
}

// =====================================================
// Store / Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStats {
    pub profiles: i64,
    pub content_items: i64,
    pub total_tasks: i64,
    pub pending_tasks: i64,
    pub running_tasks: i64,
    pub completed_tasks: i64,
    pub failed_tasks: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub profiles: i64,
    pub content_items: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub failed_tasks: i64,
    pub collector_available: bool,
    pub live_enabled: bool,
}
