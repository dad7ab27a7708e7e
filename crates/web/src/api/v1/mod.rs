use axum::{
    extract::State,
    routing::{get, on, post},
    Json, Router,
};

use crate::{
    assistant::{self, VoiceRequest, VoiceResponse},
    common::{route_not_found, schema_no_example, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

mod analytics;
mod live_map;
mod planning;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/voice", post(voice))
        .route("/voice/schema", get(schema_no_example::<VoiceResponse>))
        .nest_service("/tracking", live_map::routes(state.clone()))
        .nest_service("/analytics", analytics::routes(state.clone()))
        .nest_service("/planning", planning::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn voice(
    State(state): State<WebState>,
    Json(request): Json<VoiceRequest>,
) -> RouteResult<Json<VoiceResponse>> {
    Ok(Json(assistant::handle(&state, request).await?))
}
