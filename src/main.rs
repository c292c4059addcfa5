#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::notices::NoticeService;
use crate::storage::Memory;
use crate::storage::Postgres;
use crate::storage::Storage;
use crate::storage::StorageConfig;
use crate::utils::env_var;
use crate::utils::env_var_or_else;

mod api;
mod graceful_shutdown;
mod notices;
mod root;
mod storage;
mod utils;

const DEFAULT_RUST_LOG: &str = "notice_board=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app(StorageConfig::DetectConfig).await?;

    let address = setup_address()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if the storage fails to load:
/// - Database connection
/// - Migrations
pub async fn setup_app(config: StorageConfig) -> Result<Router> {
    let app = match config {
        StorageConfig::DetectConfig => {
            if let Some(database_url) = env_var("DATABASE_URL") {
                tracing::info!("Using Postgres storage");

                create_router(Postgres::connect(&database_url).await?)
            } else {
                tracing::info!("`DATABASE_URL` is not set, using memory storage");

                create_router(Memory::new())
            }
        }
        StorageConfig::Memory => create_router(Memory::new()),
        StorageConfig::ExistingConnection(pool) => {
            create_router(Postgres::new_with_pool(pool).await?)
        }
    };

    Ok(app)
}

/// Create the router for the notice board
fn create_router<S: Storage>(storage: S) -> Router {
    let service = NoticeService::new(storage);

    Router::new()
        .route("/", get(root::health))
        .route("/health", get(root::health))
        .nest("/api", router::<S>())
        .fallback(root::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(service))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(env_var_or_else("RUST_LOG", || {
            DEFAULT_RUST_LOG.into()
        })))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Some(port) = env_var("PORT") {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}
