use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, on, post},
    Json, Router,
};
use ride_api::RideServer;

use crate::{
    common::{
        route_not_found, schema, schema_no_example, RouteErrorResponse, RouteResult,
        METHOD_FILTER_ALL,
    },
    planning::{
        PlanningDefaults, PredictionView, RouteForm, SimulationForm, SimulationStarted,
        PREDICTION_FAILED_ALERT, SIMULATION_FAILED_ALERT,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(defaults))
        .route("/predict", post(predict))
        .route("/predict/schema", get(schema::<PredictionView>))
        .route("/simulations", post(start_simulation))
        .route("/simulations/schema", get(schema_no_example::<SimulationStarted>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Initial vehicle id and the route presets.
async fn defaults() -> Json<PlanningDefaults> {
    Json(PlanningDefaults::default())
}

async fn predict(
    State(ride_server): State<Arc<dyn RideServer>>,
    Json(form): Json<RouteForm>,
) -> RouteResult<Json<PredictionView>> {
    let route = form.validate()?;
    let response = ride_server.predict(&route).await.map_err(|why| {
        log::error!("Error getting prediction: {}", why);
        RouteErrorResponse::from(why).with_alert(PREDICTION_FAILED_ALERT)
    })?;

    match response.into_prediction() {
        Some(prediction) => Ok(Json(PredictionView::from(&prediction))),
        None => Err(RouteErrorResponse::new(StatusCode::BAD_GATEWAY)
            .with_message("The ride server could not predict this route.")
            .with_alert(PREDICTION_FAILED_ALERT)),
    }
}

async fn start_simulation(
    State(ride_server): State<Arc<dyn RideServer>>,
    Json(form): Json<SimulationForm>,
) -> RouteResult<Json<SimulationStarted>> {
    let request = form.validate()?;
    let response = ride_server.start_simulation(&request).await.map_err(|why| {
        log::error!("Error starting tracking: {}", why);
        RouteErrorResponse::from(why).with_alert(SIMULATION_FAILED_ALERT)
    })?;

    match SimulationStarted::new(&request.vehicle_id, &response) {
        Some(started) => {
            log::info!("{}", started.message);
            Ok(Json(started))
        }
        None => Err(RouteErrorResponse::new(StatusCode::BAD_GATEWAY)
            .with_message(
                response
                    .message
                    .unwrap_or_else(|| "The ride server did not start the trip.".to_owned()),
            )
            .with_alert(SIMULATION_FAILED_ALERT)),
    }
}
