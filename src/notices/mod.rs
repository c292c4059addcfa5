//! Notices
//!
//! The one and only entity of the notice board

use chrono::DateTime;
use chrono::Utc;

pub use query::ListQuery;
pub use query::Order;
pub use service::NoticeService;

pub mod query;
pub mod service;

/// A single announcement
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Notice {
    /// Notice ID, assigned by the storage
    pub id: i64,

    /// Short title, 1 to 150 characters
    pub title: String,

    /// Body of the notice
    pub content: String,

    /// Pinned notices are listed before the others
    pub is_pinned: bool,

    /// Visible to the public
    pub is_published: bool,

    /// Free-form author name
    pub author: Option<String>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,

    /// Moment the notice was last published, `None` while unpublished
    pub published_at: Option<DateTime<Utc>>,
}

impl Notice {
    /// Move the notice to the requested publish state
    ///
    /// Publishing an unpublished notice stamps `published_at` with `now`,
    /// unpublishing clears it and staying published keeps the original moment.
    pub fn publish_transition(&mut self, is_published: bool, now: DateTime<Utc>) {
        if !is_published {
            self.published_at = None;
        } else if !self.is_published {
            self.published_at = Some(now);
        }

        self.is_published = is_published;
    }

    /// Does the (already lowercased) needle occur in the title or content?
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Values provided by a user to create or fully replace a notice
#[derive(Clone, Copy, Debug)]
pub struct NoticeValues<'a> {
    /// Title of the notice
    pub title: &'a str,

    /// Content of the notice
    pub content: &'a str,

    /// Pin the notice
    pub is_pinned: bool,

    /// Publish the notice
    pub is_published: bool,

    /// Optional author
    pub author: Option<&'a str>,
}
