use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, on, post},
    Json, Router,
};
use model::analytics::AnalyticsReport;
use ride_api::RideServer;

use crate::{
    analytics::{
        charts::ChartSet,
        trips::{self, TripTable},
        AnalyticsBoard, AnalyticsStore, Statistics, ANALYTICS_FAILED_ALERT,
    },
    common::{
        route_not_found, schema, schema_no_example, RouteErrorResponse, RouteResult,
        METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(board))
        .route("/schema", get(schema_no_example::<AnalyticsBoard>))
        .route("/report/schema", get(schema::<AnalyticsReport>))
        .route("/refresh", post(refresh))
        .route("/statistics", get(statistics))
        .route("/charts", get(charts))
        .route("/trips", get(trip_table))
        .route("/export.csv", get(export))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn current(
    store: &AnalyticsStore,
    ride_server: &Arc<dyn RideServer>,
) -> RouteResult<Arc<AnalyticsBoard>> {
    store.get_or_refresh(ride_server.as_ref()).await.map_err(|why| {
        log::error!("Error loading analytics: {}", why);
        RouteErrorResponse::from(why)
            .with_message("Could not load analytics.")
            .with_alert(ANALYTICS_FAILED_ALERT)
    })
}

async fn board(
    State(store): State<AnalyticsStore>,
    State(ride_server): State<Arc<dyn RideServer>>,
) -> RouteResult<Json<Arc<AnalyticsBoard>>> {
    Ok(Json(current(&store, &ride_server).await?))
}

async fn refresh(
    State(store): State<AnalyticsStore>,
    State(ride_server): State<Arc<dyn RideServer>>,
) -> RouteResult<Json<Arc<AnalyticsBoard>>> {
    let board = store.refresh(ride_server.as_ref()).await.map_err(|why| {
        log::error!("Error refreshing analytics: {}", why);
        RouteErrorResponse::from(why)
            .with_message("Could not refresh analytics.")
            .with_alert(ANALYTICS_FAILED_ALERT)
    })?;
    Ok(Json(board))
}

async fn statistics(
    State(store): State<AnalyticsStore>,
    State(ride_server): State<Arc<dyn RideServer>>,
) -> RouteResult<Json<Statistics>> {
    Ok(Json(current(&store, &ride_server).await?.statistics.clone()))
}

async fn charts(
    State(store): State<AnalyticsStore>,
    State(ride_server): State<Arc<dyn RideServer>>,
) -> RouteResult<Json<ChartSet>> {
    Ok(Json(current(&store, &ride_server).await?.charts.clone()))
}

async fn trip_table(
    State(store): State<AnalyticsStore>,
    State(ride_server): State<Arc<dyn RideServer>>,
) -> RouteResult<Json<TripTable>> {
    Ok(Json(current(&store, &ride_server).await?.trips.clone()))
}

async fn export(
    State(store): State<AnalyticsStore>,
    State(ride_server): State<Arc<dyn RideServer>>,
) -> RouteResult<impl IntoResponse> {
    let board = current(&store, &ride_server).await?;
    let csv = trips::export_csv(&board.report.trips).map_err(|why| {
        RouteErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
            .with_message("Could not export trips.")
            .with_detailed_information(why.to_string())
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", trips::CSV_FILE_NAME),
            ),
        ],
        csv,
    ))
}
