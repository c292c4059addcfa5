//! Notices API endpoints
//!
//! Everything related to the notice management

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::notices::ListQuery;
use crate::notices::Notice;
use crate::notices::NoticeService;
use crate::notices::NoticeValues;
use crate::notices::Order;
use crate::notices::query::DEFAULT_LIMIT;
use crate::notices::query::MAX_LIMIT;
use crate::notices::service;
use crate::storage::Storage;

use super::Error;
use super::FieldError;
use super::Form;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::Validate;
use super::request::validate_length;

/// Maximum number of characters in a title
const MAX_TITLE_LENGTH: usize = 150;

impl From<service::Error> for Error {
    fn from(err: service::Error) -> Self {
        match err {
            service::Error::NotFound => Error::not_found("Notice not found"),
            service::Error::Storage(err) => {
                tracing::error!("Storage failure: {err}");

                Error::internal_server_error(err)
            }
        }
    }
}

/// Notice response going to the user
#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    /// Notice ID
    pub id: i64,

    /// Title
    pub title: String,

    /// Content
    pub content: String,

    /// Pinned notices are listed first
    pub is_pinned: bool,

    /// Publish state
    pub is_published: bool,

    /// Optional author
    pub author: Option<String>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,

    /// Last published at
    pub published_at: Option<DateTime<Utc>>,
}

impl NoticeResponse {
    /// Create a response from a [`Notice`](Notice)
    fn from_notice(notice: Notice) -> Self {
        Self {
            id: notice.id,
            title: notice.title,
            content: notice.content,
            is_pinned: notice.is_pinned,
            is_published: notice.is_published,
            author: notice.author,
            created_at: notice.created_at,
            updated_at: notice.updated_at,
            published_at: notice.published_at,
        }
    }

    /// Create a response from multiple [`Notice`](Notice)s
    fn from_notice_multiple(notices: Vec<Notice>) -> Vec<Self> {
        notices.into_iter().map(Self::from_notice).collect()
    }
}

/// Pagination details of a list
#[derive(Debug, Serialize)]
pub struct PageMeta {
    /// Number of notices matching the filters
    pub total: usize,

    /// Requested page size
    pub limit: usize,

    /// Requested offset
    pub offset: usize,
}

/// A page of notices
#[derive(Debug, Serialize)]
pub struct NoticeListResponse {
    /// Notices on this page, in the requested order
    pub items: Vec<NoticeResponse>,

    /// Paging information
    pub meta: PageMeta,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Query parameters of the list
#[derive(Debug, Deserialize)]
pub struct ListParameters {
    /// Case-insensitive search in title and content
    q: Option<String>,

    /// Only published or only unpublished notices
    is_published: Option<bool>,

    /// Sort order, pinned first by default
    #[serde(default)]
    order: Order,

    /// Page size
    #[serde(default = "default_limit")]
    limit: usize,

    /// Number of notices to skip
    #[serde(default)]
    offset: usize,
}

impl Validate for ListParameters {
    fn validate(&self) -> Vec<FieldError> {
        if (1..=MAX_LIMIT).contains(&self.limit) {
            Vec::new()
        } else {
            vec![FieldError::new(
                "limit",
                format!("Should be between 1 and {MAX_LIMIT}"),
            )]
        }
    }
}

impl ListParameters {
    fn into_query(self) -> ListQuery {
        ListQuery {
            q: self.q,
            is_published: self.is_published,
            order: self.order,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// List notices
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:8000/api/v1/notice?q=office&order=latest&limit=10'
/// ```
///
/// Response:
/// ```json
/// { "items": [ { "id": 1, "title": "Office closed" ... } ], "meta": { "total": 1, "limit": 10, "offset": 0 } }
/// ```
pub async fn list<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    QueryParameters(parameters): QueryParameters<ListParameters>,
) -> Result<Success<NoticeListResponse>, Error> {
    let query = parameters.into_query();

    let (notices, total) = service.list(&query).await?;

    Ok(Success::ok(NoticeListResponse {
        items: NoticeResponse::from_notice_multiple(notices),
        meta: PageMeta {
            total,
            limit: query.limit,
            offset: query.offset,
        },
    }))
}

/// Get a single notice
pub async fn single<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    PathParameters(notice_id): PathParameters<i64>,
) -> Result<Success<NoticeResponse>, Error> {
    let notice = service.get(notice_id).await?;

    Ok(Success::ok(NoticeResponse::from_notice(notice)))
}

/// Body to create or replace a notice
#[derive(Debug, Deserialize)]
pub struct NoticeForm {
    /// Title, 1 to 150 characters
    title: String,

    /// Content, not empty
    content: String,

    /// Pin the notice, defaults to `false`
    #[serde(default)]
    is_pinned: bool,

    /// Publish the notice, defaults to `false`
    #[serde(default)]
    is_published: bool,

    /// Optional author
    #[serde(default)]
    author: Option<String>,
}

impl NoticeForm {
    fn values(&self) -> NoticeValues<'_> {
        NoticeValues {
            title: &self.title,
            content: &self.content,
            is_pinned: self.is_pinned,
            is_published: self.is_published,
            author: self.author.as_deref(),
        }
    }
}

impl Validate for NoticeForm {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        validate_length("title", &self.title, 1, Some(MAX_TITLE_LENGTH), &mut errors);
        validate_length("content", &self.content, 1, None, &mut errors);

        errors
    }
}

/// Create a notice
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "title": "Office closed", "content": "Friday the office is closed", "is_pinned": true }' \
///     http://localhost:8000/api/v1/notice
/// ```
///
/// Response:
/// ```json
/// { "id": 1, "title": "Office closed", "is_pinned": true, "published_at": null ... }
/// ```
pub async fn create<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    Form(form): Form<NoticeForm>,
) -> Result<Success<NoticeResponse>, Error> {
    let notice = service.create(&form.values()).await?;

    Ok(Success::created(NoticeResponse::from_notice(notice)))
}

/// Replace a notice
pub async fn update<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    PathParameters(notice_id): PathParameters<i64>,
    Form(form): Form<NoticeForm>,
) -> Result<Success<NoticeResponse>, Error> {
    let notice = service.update(notice_id, &form.values()).await?;

    Ok(Success::ok(NoticeResponse::from_notice(notice)))
}

/// Body to pin or unpin a notice
#[derive(Debug, Deserialize)]
pub struct PinForm {
    /// New pin state
    is_pinned: bool,
}

impl Validate for PinForm {}

/// Pin or unpin a notice
pub async fn pin<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    PathParameters(notice_id): PathParameters<i64>,
    Form(form): Form<PinForm>,
) -> Result<Success<NoticeResponse>, Error> {
    let notice = service.set_pinned(notice_id, form.is_pinned).await?;

    Ok(Success::ok(NoticeResponse::from_notice(notice)))
}

/// Body to publish or unpublish a notice
#[derive(Debug, Deserialize)]
pub struct PublishForm {
    /// New publish state
    is_published: bool,
}

impl Validate for PublishForm {}

/// Publish or unpublish a notice
pub async fn publish<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    PathParameters(notice_id): PathParameters<i64>,
    Form(form): Form<PublishForm>,
) -> Result<Success<NoticeResponse>, Error> {
    let notice = service.set_published(notice_id, form.is_published).await?;

    Ok(Success::ok(NoticeResponse::from_notice(notice)))
}

/// Delete a notice
pub async fn delete<S: Storage>(
    Extension(service): Extension<NoticeService<S>>,
    PathParameters(notice_id): PathParameters<i64>,
) -> Result<Success<NoticeResponse>, Error> {
    service.delete(notice_id).await?;

    Ok(Success::no_content())
}
