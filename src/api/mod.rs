//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::patch;

pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use request::Validate;
pub use response::Error;
pub use response::FieldError;
pub use response::Success;

use crate::storage::Storage;

mod notices;
mod request;
mod response;

/// Get the Axum router for all API routes
///
/// Expects the [`NoticeService`](crate::notices::NoticeService) as extension
pub fn router<S: Storage>() -> Router {
    let notices = Router::new()
        .route(
            "/notice",
            get(notices::list::<S>).post(notices::create::<S>),
        )
        .route(
            "/notice/{notice}",
            get(notices::single::<S>)
                .put(notices::update::<S>)
                .delete(notices::delete::<S>),
        )
        // pinning is exposed on GET for existing clients, PATCH for everybody else
        .route(
            "/notice/{notice}/pin",
            get(notices::pin::<S>).patch(notices::pin::<S>),
        )
        .route("/notice/{notice}/publish", patch(notices::publish::<S>));

    Router::new().nest("/v1", notices)
}
