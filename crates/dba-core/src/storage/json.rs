use crate::session::{is_valid_session_id, Message, SessionRecord, SessionSummary};
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// One JSON file per session under `base_path`.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    base_path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base_path).await
    }

    pub async fn save(&self, session_id: &str, messages: &[Message]) -> io::Result<()> {
        self.save_at(session_id, messages, Utc::now()).await
    }

    /// Write the full record with an explicit `last_update`.
    ///
    /// The record is written to a unique temporary file and renamed into place,
    /// so concurrent writers to the same id leave exactly one of their records.
    pub async fn save_at(
        &self,
        session_id: &str,
        messages: &[Message],
        last_update: DateTime<Utc>,
    ) -> io::Result<()> {
        if !is_valid_session_id(session_id) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid session id: {:?}", session_id),
            ));
        }

        fs::create_dir_all(&self.base_path).await?;

        let record = SessionRecord::new(session_id, messages.to_vec(), last_update);
        let json = serde_json::to_string_pretty(&record)?;

        let tmp_path = self
            .base_path
            .join(format!(".{}.{}.tmp", session_id, Uuid::new_v4()));
        fs::write(&tmp_path, json).await?;
        if let Err(error) = fs::rename(&tmp_path, self.session_path(session_id)).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(error);
        }

        Ok(())
    }

    /// Load the stored record, `None` when missing or unreadable.
    pub async fn load_record(&self, session_id: &str) -> Option<SessionRecord> {
        if !is_valid_session_id(session_id) {
            log::warn!("Rejected invalid session id on load: {:?}", session_id);
            return None;
        }

        let path = self.session_path(session_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return None,
            Err(error) => {
                log::warn!("[{}] Failed to read session record: {}", session_id, error);
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&content) {
            Ok(record) => {
                if record.has_partial_turn() {
                    log::warn!(
                        "[{}] Session record holds an incomplete turn ({} messages)",
                        session_id,
                        record.messages.len()
                    );
                }
                Some(record)
            }
            Err(error) => {
                log::warn!(
                    "[{}] Corrupt session record at {:?}, treating as empty: {}",
                    session_id,
                    path,
                    error
                );
                None
            }
        }
    }

    pub async fn load(&self, session_id: &str) -> Vec<Message> {
        self.load_record(session_id)
            .await
            .map(|record| record.messages)
            .unwrap_or_default()
    }

    pub async fn delete(&self, session_id: &str) -> io::Result<bool> {
        if !is_valid_session_id(session_id) {
            return Ok(false);
        }

        match fs::remove_file(self.session_path(session_id)).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error),
        }
    }

    pub async fn list(&self) -> io::Result<Vec<SessionSummary>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(error) => {
                    log::warn!("Skipping unreadable session file {:?}: {}", path, error);
                    continue;
                }
            };

            match serde_json::from_str::<SessionRecord>(&content) {
                Ok(record) => summaries.push(record.summary()),
                Err(error) => {
                    log::warn!("Skipping corrupt session file {:?}: {}", path, error);
                }
            }
        }

        summaries.sort_by(|a, b| b.last_update.cmp(&a.last_update));
        Ok(summaries)
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", session_id))
    }
}

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session_id: &str, messages: &[Message]) -> io::Result<()>;
    async fn load(&self, session_id: &str) -> Vec<Message>;
    async fn delete(&self, session_id: &str) -> io::Result<bool>;
    async fn list(&self) -> io::Result<Vec<SessionSummary>>;
}

#[async_trait::async_trait]
impl SessionStore for JsonSessionStore {
    async fn save(&self, session_id: &str, messages: &[Message]) -> io::Result<()> {
        JsonSessionStore::save(self, session_id, messages).await
    }

    async fn load(&self, session_id: &str) -> Vec<Message> {
        JsonSessionStore::load(self, session_id).await
    }

    async fn delete(&self, session_id: &str) -> io::Result<bool> {
        JsonSessionStore::delete(self, session_id).await
    }

    async fn list(&self) -> io::Result<Vec<SessionSummary>> {
        JsonSessionStore::list(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DEFAULT_TITLE;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn turn(question: &str, answer: &str) -> Vec<Message> {
        vec![Message::user(question), Message::assistant(answer)]
    }

    #[tokio::test]
    async fn load_returns_what_was_saved() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        let messages = turn("Why is the buffer cache hit ratio low?", "Check db_cache_size.");

        store.save("session-1", &messages).await?;

        assert_eq!(store.load("session-1").await, messages);
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        let mut messages = turn("first", "one");
        store.save("session-1", &messages).await?;

        messages.extend(turn("second", "two"));
        store.save("session-1", &messages).await?;

        assert_eq!(store.load("session-1").await.len(), 4);
        let record = store.load_record("session-1").await.unwrap();
        assert_eq!(record.title, "first");
        Ok(())
    }

    #[tokio::test]
    async fn save_creates_missing_directory() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path().join("nested").join("sessions"));

        store.save("session-1", &turn("q", "a")).await?;

        assert_eq!(store.load("session-1").await.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn save_rejects_path_like_ids() {
        let dir = tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path());

        let error = store.save("../escape", &turn("q", "a")).await.unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn load_missing_session_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path());

        assert!(store.load("never-saved").await.is_empty());
    }

    #[tokio::test]
    async fn load_corrupt_record_is_empty() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        std::fs::write(dir.path().join("broken.json"), "{ not json")?;

        assert!(store.load("broken").await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn load_keeps_incomplete_turn() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        store.save("half", &[Message::user("unanswered")]).await?;

        let record = store.load_record("half").await.unwrap();

        assert!(record.has_partial_turn());
        assert_eq!(store.load("half").await, vec![Message::user("unanswered")]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_whether_record_existed() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        store.save("session-1", &turn("q", "a")).await?;

        assert!(store.delete("session-1").await?);
        assert!(!store.delete("session-1").await?);
        assert!(!store.delete("never-saved").await?);
        assert!(store.load("session-1").await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_orders_newest_first() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap();

        store.save_at("middle", &turn("b", "b"), t2).await?;
        store.save_at("newest", &turn("c", "c"), t3).await?;
        store.save_at("oldest", &turn("a", "a"), t1).await?;

        let ids: Vec<String> = store.list().await?.into_iter().map(|s| s.id).collect();

        assert_eq!(ids, vec!["newest", "middle", "oldest"]);
        Ok(())
    }

    #[tokio::test]
    async fn list_skips_corrupt_and_foreign_files() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        store.save("good", &[]).await?;
        std::fs::write(dir.path().join("bad.json"), "[]")?;
        std::fs::write(dir.path().join("notes.txt"), "hello")?;

        let summaries = store.list().await?;

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "good");
        assert_eq!(summaries[0].title, DEFAULT_TITLE);
        Ok(())
    }

    #[tokio::test]
    async fn list_without_directory_is_empty() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path().join("missing"));

        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_saves_leave_one_complete_record() -> io::Result<()> {
        let dir = tempdir()?;
        let store = JsonSessionStore::new(dir.path());
        let first = turn("from writer one", "reply one");
        let second = [turn("from writer two", "reply two"), turn("more", "more")].concat();

        for _ in 0..20 {
            let (a, b) = tokio::join!(
                store.save("shared", &first),
                store.save("shared", &second)
            );
            a?;
            b?;

            let stored = store.load("shared").await;
            assert!(stored == first || stored == second);
        }

        let leftovers = std::fs::read_dir(dir.path())?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
        Ok(())
    }
}
