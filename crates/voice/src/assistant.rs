use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{controls::match_location, CityFilter, Command, Controls, Role};

const IDLE_TRANSCRIPT: &str = "Click the microphone to speak";
const NOT_UNDERSTOOD: &str = "I didn't understand that command. Say help for available commands.";

/// One result of the speech recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    NoSpeech,
    NotAllowed,
    Other(String),
}

impl RecognitionError {
    pub fn code(&self) -> &str {
        match self {
            RecognitionError::NoSpeech => "no-speech",
            RecognitionError::NotAllowed => "not-allowed",
            RecognitionError::Other(code) => code.as_str(),
        }
    }

    pub fn feedback(&self) -> Option<&'static str> {
        match self {
            RecognitionError::NoSpeech => Some("I didn't hear anything. Please try again."),
            RecognitionError::NotAllowed => {
                Some("Microphone access is required for voice commands.")
            }
            RecognitionError::Other(_) => None,
        }
    }
}

impl From<&str> for RecognitionError {
    fn from(code: &str) -> Self {
        match code {
            "no-speech" => RecognitionError::NoSpeech,
            "not-allowed" => RecognitionError::NotAllowed,
            other => RecognitionError::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Listening state and transcript panel of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAssistant {
    role: Role,
    listening: bool,
    transcript: String,
    status: String,
}

impl VoiceAssistant {
    pub fn new(role: Role) -> Self {
        log::debug!("Voice assistant initialized for {role} role");
        Self {
            role,
            listening: false,
            transcript: IDLE_TRANSCRIPT.to_owned(),
            status: "Ready".to_owned(),
        }
    }

    pub fn for_path(path: &str) -> Self {
        Self::new(Role::from_path(path))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn start(&mut self) {
        self.listening = true;
        self.transcript = "Listening...".to_owned();
        self.status = "Speak now".to_owned();
    }

    /// The recognizer finished a session.
    pub fn on_end(&mut self) {
        self.listening = false;
        self.status = "Finished".to_owned();
    }

    pub fn on_error(&mut self, error: &RecognitionError) -> Option<String> {
        log::warn!("Speech recognition error: {error}");
        self.status = format!("Error: {error}");
        error.feedback().map(str::to_owned)
    }

    /// Shows interim text and runs the command once a final result arrives.
    /// Returns what the assistant says, in order.
    pub fn on_result<C: Controls + ?Sized>(
        &mut self,
        segments: &[TranscriptSegment],
        controls: &mut C,
    ) -> Vec<String> {
        let (finals, interims): (Vec<_>, Vec<_>) =
            segments.iter().partition(|segment| segment.is_final);
        let final_text: String = finals.iter().map(|segment| segment.text.as_str()).collect();
        let interim_text: String = interims
            .iter()
            .map(|segment| segment.text.as_str())
            .collect();

        self.transcript = if interim_text.is_empty() {
            final_text.clone()
        } else {
            interim_text
        };

        if final_text.is_empty() {
            return vec![];
        }
        self.handle(&final_text, controls)
    }

    /// Parses and carries out a final transcript.
    pub fn handle<C: Controls + ?Sized>(&self, transcript: &str, controls: &mut C) -> Vec<String> {
        let command = Command::parse(self.role, transcript);
        log::info!("Processing command: {command:?}");
        self.execute(&command, controls)
    }

    pub fn execute<C: Controls + ?Sized>(&self, command: &Command, controls: &mut C) -> Vec<String> {
        let say = |text: &str| vec![text.to_owned()];
        match command {
            Command::BookRide { from, to } => book_ride(from, to, controls),
            Command::MissingLocations => say("Please specify both pickup and dropoff locations"),
            Command::ShowNearby => {
                controls.show_nearby_vehicles();
                say("Showing nearby available vehicles")
            }
            Command::CancelRide => {
                controls.cancel_ride();
                say("Canceling your ride")
            }
            Command::AcceptRide => {
                let mut speech = say("Accepting the ride");
                if !controls.accept_ride() {
                    speech.push("No pending ride to accept".to_owned());
                }
                speech
            }
            Command::RejectRide => {
                controls.reject_ride();
                say("Rejecting the ride")
            }
            Command::StartTrip => {
                controls.start_trip();
                say("Starting the trip")
            }
            Command::CompleteTrip => {
                controls.complete_trip();
                say("Completing the trip")
            }
            Command::GoOnline => {
                if controls.is_online() == Some(false) {
                    controls.set_online(true);
                }
                say("Going online")
            }
            Command::GoOffline => {
                if controls.is_online() == Some(true) {
                    controls.set_online(false);
                }
                say("Going offline")
            }
            Command::TrackVehicle { vehicle_id } => {
                controls.track_vehicle(vehicle_id);
                vec![format!("Tracking vehicle {vehicle_id}")]
            }
            Command::MissingVehicleNumber => say("Please specify the vehicle number"),
            Command::ShowAnalytics => {
                controls.show_analytics();
                say("Showing analytics dashboard")
            }
            Command::Filter { city } => {
                controls.filter_city(*city);
                match city {
                    CityFilter::All => say("Showing all cities"),
                    other => vec![format!("Filtering by {}", other.label())],
                }
            }
            Command::Refresh => {
                controls.refresh();
                say("Refreshing dashboard data")
            }
            Command::Help => say(self.role.help()),
            Command::Unknown => say(NOT_UNDERSTOOD),
        }
    }
}

fn book_ride<C: Controls + ?Sized>(from: &str, to: &str, controls: &mut C) -> Vec<String> {
    let (Some(pickups), Some(dropoffs)) = (controls.pickup_options(), controls.dropoff_options())
    else {
        return vec![];
    };

    match (match_location(&pickups, from), match_location(&dropoffs, to)) {
        (Some(pickup), Some(dropoff)) => {
            controls.book_ride(pickup, dropoff);
            vec![format!("Booking ride from {} to {}", pickup.text, dropoff.text)]
        }
        _ => vec!["Could not find those locations. Please try again.".to_owned()],
    }
}
