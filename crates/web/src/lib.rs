pub use crate::common::RouteResult;

use std::{net::SocketAddr, sync::Arc};

use axum::{extract::FromRef, routing::on, Router};
use ride_api::RideServer;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracking::TrackerHandle;

pub mod analytics;
pub mod api;
pub mod assistant;
pub mod common;
pub mod config;
pub mod feed;
pub mod planning;

use crate::{
    analytics::AnalyticsStore,
    common::{route_not_found, METHOD_FILTER_ALL},
};

#[derive(Clone, FromRef)]
pub struct WebState {
    pub tracker: TrackerHandle,
    pub ride_server: Arc<dyn RideServer>,
    pub analytics: AnalyticsStore,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .layer(TraceLayer::new_for_http())
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

pub async fn start_web_server(address: SocketAddr, state: WebState) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    log::info!("Dashboard listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}
