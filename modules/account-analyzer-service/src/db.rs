//! SQLite storage for the account analyzer service.
//!
//! Holds three tables: profiles (keyed by handle), content_items (keyed by
//! content_id) and analysis_tasks (keyed by task_id). Profile and content
//! writes are whole-row replaces on the natural key, never field merges.

use account_analyzer_types::*;
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::Mutex;

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> SqliteResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                handle TEXT NOT NULL UNIQUE COLLATE NOCASE,
                external_id TEXT,
                display_name TEXT,
                bio TEXT,
                follower_count INTEGER NOT NULL DEFAULT 0,
                following_count INTEGER NOT NULL DEFAULT 0,
                content_count INTEGER NOT NULL DEFAULT 0,
                like_count INTEGER NOT NULL DEFAULT 0,
                avatar_url TEXT,
                verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                location TEXT,
                website TEXT,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS content_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content_id TEXT NOT NULL UNIQUE,
                conversation_id TEXT,
                created_at TEXT,
                date TEXT,
                time TEXT,
                timezone TEXT,
                author_handle TEXT NOT NULL COLLATE NOCASE,
                author_name TEXT,
                body TEXT NOT NULL,
                reply_count INTEGER NOT NULL DEFAULT 0,
                like_count INTEGER NOT NULL DEFAULT 0,
                share_count INTEGER NOT NULL DEFAULT 0,
                view_count INTEGER NOT NULL DEFAULT 0,
                hashtags TEXT,
                mentions TEXT,
                permalink TEXT,
                collected_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_content_author_time
             ON content_items(author_handle, collected_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS analysis_tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id TEXT NOT NULL UNIQUE,
                handle TEXT NOT NULL COLLATE NOCASE,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                completed_at TEXT,
                error_message TEXT,
                data_source TEXT
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_created
             ON analysis_tasks(created_at DESC)",
            [],
        )?;

        Ok(())
    }

    // =====================================================
    // Profile Operations
    // =====================================================

    /// Whole-row upsert keyed by handle. `updated_at` is stamped here on
    /// every write, whatever the caller passed in.
    pub fn upsert_profile(&self, profile: &Profile) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR REPLACE INTO profiles
                (handle, external_id, display_name, bio, follower_count,
                 following_count, content_count, like_count, avatar_url,
                 verified, created_at, location, website, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
                profile.handle,
                profile.external_id,
                profile.display_name,
                profile.bio,
                profile.follower_count,
                profile.following_count,
                profile.content_count,
                profile.like_count,
                profile.avatar_url,
                profile.verified,
                profile.created_at,
                profile.location,
                profile.website,
                now
            ],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, handle: &str) -> SqliteResult<Option<Profile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT handle, external_id, display_name, bio, follower_count,
                    following_count, content_count, like_count, avatar_url,
                    verified, created_at, location, website, updated_at
             FROM profiles WHERE handle = ?1",
        )?;
        let mut rows = stmt.query_map([handle], |row| row_to_profile(row))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    // =====================================================
    // Content Operations
    // =====================================================

    /// Item-by-item batch upsert keyed by content_id. A failure partway
    /// leaves earlier rows committed and stops at the first error; callers
    /// get the count written so far in the error path via the task record,
    /// not from here.
    pub fn upsert_content(&self, items: &[ContentItem]) -> SqliteResult<usize> {
        let conn = self.conn.lock().unwrap();
        let mut written = 0usize;
        for item in items {
            let hashtags = serde_json::to_string(&item.hashtags).unwrap_or_default();
            let mentions = serde_json::to_string(&item.mentions).unwrap_or_default();
            conn.execute(
                "INSERT OR REPLACE INTO content_items
                    (content_id, conversation_id, created_at, date, time,
                     timezone, author_handle, author_name, body, reply_count,
                     like_count, share_count, view_count, hashtags, mentions,
                     permalink, collected_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                         ?13, ?14, ?15, ?16, ?17)",
                rusqlite::params![
                    item.content_id,
                    item.conversation_id,
                    item.created_at,
                    item.date,
                    item.time,
                    item.timezone,
                    item.author_handle,
                    item.author_name,
                    item.body,
                    item.reply_count,
                    item.like_count,
                    item.share_count,
                    item.view_count,
                    hashtags,
                    mentions,
                    item.permalink,
                    item.collected_at
                ],
            )?;
            written += 1;
        }
        Ok(written)
    }

    pub fn get_recent_content(&self, handle: &str, limit: usize) -> SqliteResult<Vec<ContentItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT content_id, conversation_id, created_at, date, time,
                    timezone, author_handle, author_name, body, reply_count,
                    like_count, share_count, view_count, hashtags, mentions,
                    permalink, collected_at
             FROM content_items
             WHERE author_handle = ?1
             ORDER BY collected_at DESC, id DESC
             LIMIT ?2",
        )?;
        let entries = stmt
            .query_map(rusqlite::params![handle, limit as i64], |row| {
                row_to_content(row)
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    pub fn count_content_for_handle(&self, handle: &str) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM content_items WHERE author_handle = ?1",
            [handle],
            |row| row.get(0),
        )
    }

    // =====================================================
    // Task Operations
    // =====================================================
    //
    // The task rows are only ever mutated through the methods below; the
    // terminal writes carry a status guard in the WHERE clause so a task
    // never leaves completed/failed once it gets there.

    pub fn create_task(&self, task_id: &str, handle: &str) -> SqliteResult<AnalysisTask> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO analysis_tasks (task_id, handle, status, created_at)
             VALUES (?1, ?2, 'pending', ?3)",
            rusqlite::params![task_id, handle, now],
        )?;
        Ok(AnalysisTask {
            task_id: task_id.to_string(),
            handle: handle.to_string(),
            status: TaskStatus::Pending,
            created_at: now,
            completed_at: None,
            error_message: None,
            data_source: None,
        })
    }

    /// Optional transition; no-op once the task is terminal.
    pub fn mark_running(&self, task_id: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE analysis_tasks SET status = 'running'
             WHERE task_id = ?1 AND status = 'pending'",
            [task_id],
        )?;
        Ok(rows > 0)
    }

    pub fn mark_completed(&self, task_id: &str, source: DataSource) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE analysis_tasks
             SET status = 'completed', completed_at = ?1, data_source = ?2
             WHERE task_id = ?3 AND status IN ('pending', 'running')",
            rusqlite::params![now, source.as_str(), task_id],
        )?;
        Ok(rows > 0)
    }

    pub fn mark_failed(
        &self,
        task_id: &str,
        error_message: &str,
        source: DataSource,
    ) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE analysis_tasks
             SET status = 'failed', completed_at = ?1, error_message = ?2,
                 data_source = ?3
             WHERE task_id = ?4 AND status IN ('pending', 'running')",
            rusqlite::params![now, error_message, source.as_str(), task_id],
        )?;
        Ok(rows > 0)
    }

    pub fn get_task(&self, task_id: &str) -> SqliteResult<Option<AnalysisTask>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT task_id, handle, status, created_at, completed_at,
                    error_message, data_source
             FROM analysis_tasks WHERE task_id = ?1",
        )?;
        let mut rows = stmt.query_map([task_id], |row| row_to_task(row))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    pub fn list_tasks(&self, limit: usize) -> SqliteResult<Vec<AnalysisTask>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT task_id, handle, status, created_at, completed_at,
                    error_message, data_source
             FROM analysis_tasks
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let entries = stmt
            .query_map([limit as i64], |row| row_to_task(row))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    // =====================================================
    // Stats
    // =====================================================

    pub fn store_stats(&self) -> SqliteResult<StoreStats> {
        let conn = self.conn.lock().unwrap();
        let count = |sql: &str| -> i64 {
            conn.query_row(sql, [], |row| row.get(0)).unwrap_or(0)
        };
        Ok(StoreStats {
            profiles: count("SELECT COUNT(*) FROM profiles"),
            content_items: count("SELECT COUNT(*) FROM content_items"),
            total_tasks: count("SELECT COUNT(*) FROM analysis_tasks"),
            pending_tasks: count("SELECT COUNT(*) FROM analysis_tasks WHERE status = 'pending'"),
            running_tasks: count("SELECT COUNT(*) FROM analysis_tasks WHERE status = 'running'"),
            completed_tasks: count(
                "SELECT COUNT(*) FROM analysis_tasks WHERE status = 'completed'",
            ),
            failed_tasks: count("SELECT COUNT(*) FROM analysis_tasks WHERE status = 'failed'"),
        })
    }
}

// =====================================================
// Row Mapping Functions
// =====================================================

fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        handle: row.get(0)?,
        external_id: row.get(1)?,
        display_name: row.get(2)?,
        bio: row.get(3)?,
        follower_count: row.get(4)?,
        following_count: row.get(5)?,
        content_count: row.get(6)?,
        like_count: row.get(7)?,
        avatar_url: row.get(8)?,
        verified: row.get(9)?,
        created_at: row.get(10)?,
        location: row.get(11)?,
        website: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn row_to_content(row: &rusqlite::Row) -> rusqlite::Result<ContentItem> {
    let hashtags: Option<String> = row.get(13)?;
    let mentions: Option<String> = row.get(14)?;
    Ok(ContentItem {
        content_id: row.get(0)?,
        conversation_id: row.get(1)?,
        created_at: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        timezone: row.get(5)?,
        author_handle: row.get(6)?,
        author_name: row.get(7)?,
        body: row.get(8)?,
        reply_count: row.get(9)?,
        like_count: row.get(10)?,
        share_count: row.get(11)?,
        view_count: row.get(12)?,
        hashtags: decode_tokens(hashtags),
        mentions: decode_tokens(mentions),
        permalink: row.get(15)?,
        collected_at: row.get(16)?,
    })
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<AnalysisTask> {
    let status: String = row.get(2)?;
    let source: Option<String> = row.get(6)?;
    Ok(AnalysisTask {
        task_id: row.get(0)?,
        handle: row.get(1)?,
        status: TaskStatus::parse(&status).unwrap_or(TaskStatus::Pending),
        created_at: row.get(3)?,
        completed_at: row.get(4)?,
        error_message: row.get(5)?,
        data_source: source.as_deref().and_then(DataSource::parse),
    })
}

/// Hashtag/mention columns hold JSON arrays; anything unreadable decodes
/// to an empty sequence.
fn decode_tokens(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Db {
        Db::open(":memory:").expect("in-memory db")
    }

    fn sample_profile(handle: &str, followers: i64) -> Profile {
        Profile {
            handle: handle.to_string(),
            external_id: Some("12345678".to_string()),
            display_name: Some(format!("{} User", handle)),
            bio: Some(format!("Bio for @{}", handle)),
            follower_count: followers,
            following_count: 100,
            content_count: 50,
            like_count: 500,
            avatar_url: None,
            created_at: Some("2020-01-01T00:00:00.000Z".to_string()),
            verified: false,
            location: Some("Digital World".to_string()),
            website: None,
            updated_at: String::new(),
        }
    }

    fn sample_item(content_id: &str, handle: &str, collected_at: &str) -> ContentItem {
        ContentItem {
            content_id: content_id.to_string(),
            conversation_id: content_id.to_string(),
            created_at: "2024-05-01T12:00:00+00:00".to_string(),
            date: "2024-05-01".to_string(),
            time: "12:00:00".to_string(),
            timezone: "UTC".to_string(),
            author_handle: handle.to_string(),
            author_name: handle.to_string(),
            body: format!("Post {} from @{} #test", content_id, handle),
            reply_count: 1,
            like_count: 2,
            share_count: 3,
            view_count: 4,
            hashtags: vec!["#test".to_string()],
            mentions: vec![format!("@{}", handle)],
            permalink: format!("https://twitter.com/{}/status/{}", handle, content_id),
            collected_at: collected_at.to_string(),
        }
    }

    #[test]
    fn upsert_profile_replaces_whole_row() {
        let db = test_db();
        db.upsert_profile(&sample_profile("alice", 100)).unwrap();
        let mut second = sample_profile("alice", 999);
        second.bio = None;
        db.upsert_profile(&second).unwrap();

        let stored = db.get_profile("alice").unwrap().unwrap();
        assert_eq!(stored.follower_count, 999);
        // Replace, not merge: the dropped bio does not survive from the
        // first write.
        assert_eq!(stored.bio, None);
        assert_eq!(db.store_stats().unwrap().profiles, 1);
    }

    #[test]
    fn handle_is_case_insensitive() {
        let db = test_db();
        db.upsert_profile(&sample_profile("NASA", 1)).unwrap();
        db.upsert_profile(&sample_profile("nasa", 2)).unwrap();
        assert_eq!(db.store_stats().unwrap().profiles, 1);
        let stored = db.get_profile("Nasa").unwrap().unwrap();
        assert_eq!(stored.follower_count, 2);
    }

    #[test]
    fn recent_content_ordering_and_limit() {
        let db = test_db();
        db.upsert_content(&[
            sample_item("1", "alice", "2024-05-01T10:00:00+00:00"),
            sample_item("2", "alice", "2024-05-01T11:00:00+00:00"),
            sample_item("3", "alice", "2024-05-01T12:00:00+00:00"),
            sample_item("4", "bob", "2024-05-01T13:00:00+00:00"),
        ])
        .unwrap();

        let recent = db.get_recent_content("alice", 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content_id, "3");
        assert_eq!(recent[1].content_id, "2");
        assert_eq!(recent[0].hashtags, vec!["#test"]);
    }

    #[test]
    fn content_upsert_replaces_by_content_id() {
        let db = test_db();
        db.upsert_content(&[sample_item("7", "alice", "2024-05-01T10:00:00+00:00")])
            .unwrap();
        let mut replacement = sample_item("7", "alice", "2024-05-01T10:00:00+00:00");
        replacement.body = "rewritten".to_string();
        replacement.hashtags = vec![];
        db.upsert_content(&[replacement]).unwrap();

        let stored = db.get_recent_content("alice", 10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].body, "rewritten");
        assert!(stored[0].hashtags.is_empty());
    }

    #[test]
    fn task_lifecycle_terminal_states_are_sinks() {
        let db = test_db();
        let task = db.create_task("t-1", "alice").unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        assert!(db.mark_running("t-1").unwrap());
        assert!(db.mark_completed("t-1", DataSource::Curated).unwrap());

        // Second terminal write is a no-op.
        assert!(!db.mark_failed("t-1", "boom", DataSource::Synthetic).unwrap());
        assert!(!db.mark_completed("t-1", DataSource::Live).unwrap());
        assert!(!db.mark_running("t-1").unwrap());

        let stored = db.get_task("t-1").unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.data_source, Some(DataSource::Curated));
        assert!(stored.completed_at.is_some());
        assert_eq!(stored.error_message, None);
    }

    #[test]
    fn failed_task_keeps_error_message() {
        let db = test_db();
        db.create_task("t-2", "bob").unwrap();
        assert!(db.mark_failed("t-2", "storage exploded", DataSource::Synthetic).unwrap());

        let stored = db.get_task("t-2").unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("storage exploded"));
        assert_eq!(stored.data_source, Some(DataSource::Synthetic));
    }

    #[test]
    fn unknown_task_is_none() {
        let db = test_db();
        assert!(db.get_task("nope").unwrap().is_none());
    }

    #[test]
    fn list_tasks_newest_first() {
        let db = test_db();
        db.create_task("t-a", "alice").unwrap();
        db.create_task("t-b", "bob").unwrap();
        db.create_task("t-c", "carol").unwrap();

        let tasks = db.list_tasks(2).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_id, "t-c");
        assert_eq!(tasks[1].task_id, "t-b");
    }
}
