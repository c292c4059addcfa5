//! Notice service
//!
//! Business rules on top of the storage: publish transitions and the list query

use core::fmt;

use chrono::Utc;

use crate::storage;
use crate::storage::CreateNoticeValues;
use crate::storage::Storage;

use super::ListQuery;
use super::Notice;
use super::NoticeValues;
use super::query;

/// Service errors
#[derive(Debug)]
pub enum Error {
    /// The requested notice does not exist
    NotFound,

    /// The storage failed
    Storage(storage::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound => None,
            Error::Storage(err) => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "Notice not found"),
            Error::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl From<storage::Error> for Error {
    fn from(err: storage::Error) -> Self {
        match err {
            storage::Error::NotFound(_) => Error::NotFound,
            err => Error::Storage(err),
        }
    }
}

/// Result type for all service interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Notice service
///
/// Cheap to clone, all clones share the same storage
#[derive(Clone)]
pub struct NoticeService<S: Storage> {
    /// Storage of the notices
    storage: S,
}

impl<S: Storage> NoticeService<S> {
    /// Create a service on top of a storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// List a page of notices and the total number of matching notices
    pub async fn list(&self, query: &ListQuery) -> Result<(Vec<Notice>, usize)> {
        let notices = self.storage.find_all_notices().await?;

        Ok(query::apply(notices, query))
    }

    /// Get a single notice
    pub async fn get(&self, id: i64) -> Result<Notice> {
        self.storage
            .find_single_notice_by_id(id)
            .await?
            .map_or_else(
                || {
                    tracing::debug!("Notice {id} not found");

                    Err(Error::NotFound)
                },
                Ok,
            )
    }

    /// Create a notice
    ///
    /// Published notices get their `published_at` right away
    pub async fn create(&self, values: &NoticeValues<'_>) -> Result<Notice> {
        let values = CreateNoticeValues {
            title: values.title,
            content: values.content,
            is_pinned: values.is_pinned,
            is_published: values.is_published,
            author: values.author,
        };

        let notice = self.storage.create_notice(&values).await?;

        tracing::debug!("Created notice {}", notice.id);

        Ok(notice)
    }

    /// Replace all user provided fields of a notice
    pub async fn update(&self, id: i64, values: &NoticeValues<'_>) -> Result<Notice> {
        let mut notice = self.get(id).await?;

        notice.publish_transition(values.is_published, Utc::now());
        notice.title = values.title.to_string();
        notice.content = values.content.to_string();
        notice.is_pinned = values.is_pinned;
        notice.author = values.author.map(ToString::to_string);

        self.save(&notice).await
    }

    /// Pin or unpin a notice
    pub async fn set_pinned(&self, id: i64, is_pinned: bool) -> Result<Notice> {
        let mut notice = self.get(id).await?;

        notice.is_pinned = is_pinned;

        self.save(&notice).await
    }

    /// Publish or unpublish a notice
    pub async fn set_published(&self, id: i64, is_published: bool) -> Result<Notice> {
        let mut notice = self.get(id).await?;

        notice.publish_transition(is_published, Utc::now());

        self.save(&notice).await
    }

    /// Delete a notice for good
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.storage.delete_notice(id).await? {
            tracing::debug!("Deleted notice {id}");

            Ok(())
        } else {
            tracing::debug!("Notice {id} not found, nothing to delete");

            Err(Error::NotFound)
        }
    }

    async fn save(&self, notice: &Notice) -> Result<Notice> {
        let notice = self.storage.update_notice(notice).await?;

        tracing::debug!("Updated notice {}", notice.id);

        Ok(notice)
    }
}
