use axum::Router;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{errors::Result, routes::inbox_route::inbox_router, state::AppState};

pub mod consts;
pub mod errors;
pub mod inbox;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod stores;
pub mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing::subscriber::set_global_default(FmtSubscriber::default()).unwrap();
    let state = AppState::init().await?;

    const PORT: &str = "4076";

    info!("Starting inbox service");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", PORT)).await?;
    info!("Serving inbox at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/inbox", inbox_router(state.clone()))
        .with_state(state)
}
