//! All things related to the storage of notices

use core::fmt;

use sqlx::PgPool;

pub use Config as StorageConfig;
pub use memory::Memory;
pub use postgres::Postgres;

use crate::notices::Notice;

mod memory;
mod postgres;

/// Storage errors
#[derive(Debug)]
pub enum Error {
    /// A connection error with the storage
    Connection(String),

    /// The notice to update does not exist (anymore)
    NotFound(i64),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
            Error::NotFound(id) => write!(f, "Notice {id} does not exist"),
        }
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage configuration
pub enum Config {
    /// Detect configuration from environment
    ///
    /// Postgres when `DATABASE_URL` is set, memory otherwise
    DetectConfig,

    /// Always use the memory storage
    Memory,

    /// Use existing Postgres connection
    #[allow(dead_code)] // used by the Postgres tests
    ExistingConnection(PgPool),
}

/// Values to create a Notice
///
/// There is no ID, the storage hands out the next one. A published notice gets its
/// `published_at` from the same moment as `created_at`.
pub struct CreateNoticeValues<'a> {
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

/// Storage with all supported operations
///
/// `created_at` and `updated_at` are owned by the storage, values provided by callers are
/// ignored.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find all notices, in order of creation
    fn find_all_notices(&self) -> impl Future<Output = Result<Vec<Notice>>> + Send;

    /// Find a single notice by its ID
    fn find_single_notice_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Notice>>> + Send;

    /// Create a notice with the next ID
    fn create_notice(
        &self,
        values: &CreateNoticeValues<'_>,
    ) -> impl Future<Output = Result<Notice>> + Send;

    /// Replace all mutable fields of an existing notice
    ///
    /// Fails with [`Error::NotFound`] when the notice does not exist
    fn update_notice(&self, notice: &Notice) -> impl Future<Output = Result<Notice>> + Send;

    /// Hard-delete a notice
    ///
    /// Returns `false` if there was nothing to delete
    fn delete_notice(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;
}

/// Utility function for mapping any error into a connection error
fn connection_error<E>(err: E) -> Error
where
    E: fmt::Display,
{
    Error::Connection(err.to_string())
}
