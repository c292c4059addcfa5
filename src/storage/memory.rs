//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::notices::Notice;

use super::CreateNoticeValues;
use super::Error;
use super::Result;
use super::Storage;

/// Notices and the ID sequence, guarded together
#[derive(Debug, Default)]
struct Notices {
    /// All notices in storage, ordered by ID
    entries: BTreeMap<i64, Notice>,

    /// Last handed out ID, never decreases
    last_id: i64,
}

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All notices in storage
    notices: Arc<Mutex<Notices>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for Memory {
    async fn find_all_notices(&self) -> Result<Vec<Notice>> {
        Ok(self
            .notices
            .lock()
            .await
            .entries
            .values()
            .cloned()
            .collect())
    }

    async fn find_single_notice_by_id(&self, id: i64) -> Result<Option<Notice>> {
        Ok(self.notices.lock().await.entries.get(&id).cloned())
    }

    async fn create_notice(&self, values: &CreateNoticeValues<'_>) -> Result<Notice> {
        let mut notices = self.notices.lock().await;

        notices.last_id += 1;

        let now = Utc::now();
        let notice = Notice {
            id: notices.last_id,
            title: values.title.to_string(),
            content: values.content.to_string(),
            is_pinned: values.is_pinned,
            is_published: values.is_published,
            author: values.author.map(ToString::to_string),
            created_at: now,
            updated_at: now,
            published_at: values.is_published.then_some(now),
        };

        notices.entries.insert(notice.id, notice.clone());

        Ok(notice)
    }

    async fn update_notice(&self, notice: &Notice) -> Result<Notice> {
        self.notices
            .lock()
            .await
            .entries
            .get_mut(&notice.id)
            .map(|stored| {
                stored.title.clone_from(&notice.title);
                stored.content.clone_from(&notice.content);
                stored.is_pinned = notice.is_pinned;
                stored.is_published = notice.is_published;
                stored.author.clone_from(&notice.author);
                stored.published_at = notice.published_at;

                // the wall clock may go back, `updated_at` may not
                stored.updated_at = Utc::now().max(stored.created_at);

                stored.clone()
            })
            .ok_or(Error::NotFound(notice.id))
    }

    async fn delete_notice(&self, id: i64) -> Result<bool> {
        Ok(self.notices.lock().await.entries.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn values(title: &str) -> CreateNoticeValues<'_> {
        CreateNoticeValues {
            title,
            content: "Some content",
            is_pinned: false,
            is_published: false,
            author: Some("office"),
        }
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let storage = Memory::new();

        let first = storage.create_notice(&values("First")).await.unwrap();
        let second = storage.create_notice(&values("Second")).await.unwrap();
        assert_eq!(1, first.id);
        assert_eq!(2, second.id);

        assert!(storage.delete_notice(second.id).await.unwrap());
        assert!(!storage.delete_notice(second.id).await.unwrap());

        let third = storage.create_notice(&values("Third")).await.unwrap();
        assert_eq!(3, third.id);

        let ids = storage
            .find_all_notices()
            .await
            .unwrap()
            .iter()
            .map(|notice| notice.id)
            .collect::<Vec<i64>>();
        assert_eq!(vec![1, 3], ids);
    }

    #[tokio::test]
    async fn test_create_stamps_timestamps() {
        let storage = Memory::new();

        let notice = storage.create_notice(&values("Stamped")).await.unwrap();
        assert_eq!(notice.created_at, notice.updated_at);
        assert_eq!(Some("office".to_string()), notice.author);
        assert_eq!(
            Some(notice.clone()),
            storage.find_single_notice_by_id(notice.id).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_published_stamps_published_at() {
        let storage = Memory::new();

        let values = CreateNoticeValues {
            is_published: true,
            ..values("Live")
        };
        let notice = storage.create_notice(&values).await.unwrap();
        assert_eq!(Some(notice.created_at), notice.published_at);
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let storage = Memory::new();

        let notice = storage.create_notice(&values("Stamped")).await.unwrap();
        let mut previous = notice.updated_at;

        for title in ["Once", "Twice"] {
            tokio::time::sleep(Duration::from_millis(2)).await;

            let mut changed = storage
                .find_single_notice_by_id(notice.id)
                .await
                .unwrap()
                .unwrap();
            changed.title = title.to_string();

            let updated = storage.update_notice(&changed).await.unwrap();
            assert!(updated.updated_at > previous);
            assert_eq!(notice.created_at, updated.created_at);

            previous = updated.updated_at;
        }
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let storage = Memory::new();

        let notice = storage.create_notice(&values("Before")).await.unwrap();

        let mut changed = notice.clone();
        changed.title = "After".to_string();
        changed.created_at = notice.created_at - chrono::Duration::days(1);

        let updated = storage.update_notice(&changed).await.unwrap();
        assert_eq!("After", updated.title);
        assert_eq!(notice.created_at, updated.created_at);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_notice() {
        let storage = Memory::new();

        let notice = storage.create_notice(&values("Gone")).await.unwrap();
        storage.delete_notice(notice.id).await.unwrap();

        let result = storage.update_notice(&notice).await;
        assert!(matches!(result, Err(Error::NotFound(1))));
        assert_eq!(None, storage.find_single_notice_by_id(1).await.unwrap());
    }
}
