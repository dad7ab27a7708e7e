//! The dashboard's side of voice commands.

use ride_api::RideServer;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracking::{TrackerEvent, TrackerHandle};
use utility::id::Id;
use voice::{CityFilter, Controls, RecognitionError, TranscriptSegment, VoiceAssistant};

use crate::{
    analytics::{AnalyticsStore, ANALYTICS_FAILED_ALERT},
    common::RouteResult,
    WebState,
};

/// Something a voice command asked the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DashboardAction {
    FocusVehicle { vehicle_id: String },
    ShowAnalytics,
    FilterCity { city: CityFilter },
    RefreshAnalytics,
}

/// Records actions while a command runs. Controls the dashboard has no
/// counterpart for keep their no-op defaults.
#[derive(Debug, Clone, Default)]
pub struct DashboardControls {
    pub actions: Vec<DashboardAction>,
}

impl Controls for DashboardControls {
    fn track_vehicle(&mut self, vehicle_id: &str) {
        self.actions.push(DashboardAction::FocusVehicle {
            vehicle_id: vehicle_id.to_owned(),
        });
    }

    fn show_analytics(&mut self) {
        self.actions.push(DashboardAction::ShowAnalytics);
    }

    fn filter_city(&mut self, city: CityFilter) {
        self.actions.push(DashboardAction::FilterCity { city });
    }

    fn refresh(&mut self) {
        self.actions.push(DashboardAction::RefreshAnalytics);
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VoiceRequest {
    /// Path of the page the assistant runs on, used to pick the role.
    pub path: Option<String>,
    pub role: Option<voice::Role>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    pub error: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoiceResponse {
    pub assistant: VoiceAssistant,
    pub speech: Vec<String>,
    pub actions: Vec<DashboardAction>,
    /// Set when an action could not be carried out.
    pub alert: Option<String>,
}

impl VoiceRequest {
    fn assistant(&self) -> VoiceAssistant {
        match (self.role, &self.path) {
            (Some(role), _) => VoiceAssistant::new(role),
            (None, Some(path)) => VoiceAssistant::for_path(path),
            (None, None) => VoiceAssistant::new(voice::Role::default()),
        }
    }
}

/// Runs one recognizer result and carries out the dashboard actions it
/// produced.
pub async fn handle(state: &WebState, request: VoiceRequest) -> RouteResult<VoiceResponse> {
    let mut assistant = request.assistant();
    let mut controls = DashboardControls::default();

    let speech = match &request.error {
        Some(code) => assistant
            .on_error(&RecognitionError::from(code.as_str()))
            .into_iter()
            .collect(),
        None => {
            assistant.start();
            let speech = assistant.on_result(&request.segments, &mut controls);
            assistant.on_end();
            speech
        }
    };

    let mut alert = None;
    for action in &controls.actions {
        if let Some(failed) =
            perform(action, &state.tracker, &state.analytics, state.ride_server.as_ref()).await?
        {
            alert = Some(failed.to_owned());
        }
    }

    Ok(VoiceResponse {
        assistant,
        speech,
        actions: controls.actions,
        alert,
    })
}

/// Returns the alert to show when the action failed on the ride server.
async fn perform(
    action: &DashboardAction,
    tracker: &TrackerHandle,
    analytics: &AnalyticsStore,
    ride_server: &dyn RideServer,
) -> RouteResult<Option<&'static str>> {
    match action {
        DashboardAction::FocusVehicle { vehicle_id } => {
            tracker
                .dispatch(TrackerEvent::Focus(Id::from(vehicle_id.as_str())))
                .await?;
        }
        DashboardAction::RefreshAnalytics => {
            if let Err(why) = analytics.refresh(ride_server).await {
                log::warn!("voice refresh of analytics failed: {}", why);
                return Ok(Some(ANALYTICS_FAILED_ALERT));
            }
        }
        // handled by the page itself
        DashboardAction::ShowAnalytics | DashboardAction::FilterCity { .. } => {}
    }
    Ok(None)
}
