use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, on, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use futures::stream::Stream;
use model::vehicle::VehicleState;
use serde_json::Value;
use tokio_stream::{wrappers::WatchStream, StreamExt as _};
use tracking::{
    metrics::Metrics, sidebar::Sidebar, view::MapView, TrackerEvent, TrackerHandle,
    TrackerSnapshot,
};
use utility::id::Id;

use crate::{
    common::{route_not_found, schema_no_example, RouteResult, VecResponse, METHOD_FILTER_ALL},
    WebState,
};

/// Name of the server-sent event carrying a full snapshot.
const SNAPSHOT_EVENT: &str = "snapshot";

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(snapshot))
        .route("/schema", get(schema_no_example::<TrackerSnapshot>))
        .route("/map", get(map))
        .route("/vehicles", get(vehicles))
        .route("/sidebar", get(sidebar))
        .route("/metrics", get(metrics))
        .route("/view", get(view))
        .route("/stream", get(stream))
        .route("/focus/:vehicle_id", post(focus))
        .route("/center", post(center))
        .route("/clear", post(clear))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn snapshot(
    State(tracker): State<TrackerHandle>,
) -> RouteResult<Json<Arc<TrackerSnapshot>>> {
    Ok(Json(tracker.snapshot().await?))
}

/// GeoJSON of all markers and paths.
async fn map(State(tracker): State<TrackerHandle>) -> RouteResult<Json<Value>> {
    Ok(Json(tracker.snapshot().await?.map.clone()))
}

async fn vehicles(
    State(tracker): State<TrackerHandle>,
) -> RouteResult<Json<VecResponse<VehicleState>>> {
    let snapshot = tracker.snapshot().await?;
    Ok(VecResponse::new(snapshot.vehicles.clone()).json())
}

async fn sidebar(State(tracker): State<TrackerHandle>) -> RouteResult<Json<Sidebar>> {
    Ok(Json(tracker.snapshot().await?.sidebar.clone()))
}

async fn metrics(State(tracker): State<TrackerHandle>) -> RouteResult<Json<Metrics>> {
    Ok(Json(tracker.snapshot().await?.metrics.clone()))
}

async fn view(State(tracker): State<TrackerHandle>) -> RouteResult<Json<MapView>> {
    Ok(Json(tracker.snapshot().await?.view.clone()))
}

async fn apply(
    tracker: &TrackerHandle,
    event: TrackerEvent,
) -> RouteResult<Json<Arc<TrackerSnapshot>>> {
    tracker.dispatch(event).await?;
    Ok(Json(tracker.snapshot().await?))
}

async fn focus(
    State(tracker): State<TrackerHandle>,
    Path(vehicle_id): Path<String>,
) -> RouteResult<Json<Arc<TrackerSnapshot>>> {
    apply(&tracker, TrackerEvent::Focus(Id::from(vehicle_id.as_str()))).await
}

async fn center(State(tracker): State<TrackerHandle>) -> RouteResult<Json<Arc<TrackerSnapshot>>> {
    apply(&tracker, TrackerEvent::CenterMap).await
}

async fn clear(State(tracker): State<TrackerHandle>) -> RouteResult<Json<Arc<TrackerSnapshot>>> {
    apply(&tracker, TrackerEvent::Clear).await
}

/// Pushes the current snapshot on connect and a new one after every change.
async fn stream(
    user_agent: Option<TypedHeader<headers::UserAgent>>,
    State(tracker): State<TrackerHandle>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    match user_agent {
        Some(TypedHeader(user_agent)) => log::info!("`{}` connected", user_agent.as_str()),
        None => log::info!("viewer connected"),
    }

    let stream = WatchStream::new(tracker.subscribe()).filter_map(|snapshot| {
        match Event::default().event(SNAPSHOT_EVENT).json_data(snapshot.as_ref()) {
            Ok(event) => Some(Ok(event)),
            Err(why) => {
                log::error!("could not encode snapshot: {}", why);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
