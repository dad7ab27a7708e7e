use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CityFilter {
    Bangalore,
    Porto,
    All,
}

impl CityFilter {
    pub fn label(&self) -> &'static str {
        match self {
            CityFilter::Bangalore => "Bangalore",
            CityFilter::Porto => "Porto",
            CityFilter::All => "all cities",
        }
    }
}

/// What a final transcript asks for, already resolved against the role of the
/// page it was spoken on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // customer
    BookRide { from: String, to: String },
    MissingLocations,
    ShowNearby,
    CancelRide,

    // driver
    AcceptRide,
    RejectRide,
    StartTrip,
    CompleteTrip,
    GoOnline,
    GoOffline,

    // admin
    TrackVehicle { vehicle_id: String },
    MissingVehicleNumber,
    ShowAnalytics,
    Filter { city: CityFilter },
    Refresh,

    Help,
    Unknown,
}

fn route_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"from\s+([a-z\s]+?)\s+to\s+([a-z\s]+?)\s*$").unwrap())
}

fn vehicle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)track vehicle\s+([a-z0-9\-]+)").unwrap())
}

impl Command {
    /// Parses a final transcript. The transcript is lower-cased and trimmed
    /// here so callers can pass the recognizer output as is.
    pub fn parse(role: Role, transcript: &str) -> Self {
        let command = transcript.trim().to_lowercase();
        match role {
            Role::Customer => Self::parse_customer(&command),
            Role::Driver => Self::parse_driver(&command),
            Role::Admin => Self::parse_admin(&command),
        }
    }

    fn parse_customer(command: &str) -> Self {
        if command.contains("book ride") || command.contains("book a ride") {
            match route_pattern().captures(command) {
                Some(captures) => Command::BookRide {
                    from: captures[1].trim().to_owned(),
                    to: captures[2].trim().to_owned(),
                },
                None => Command::MissingLocations,
            }
        } else if command.contains("show nearby") || command.contains("nearby vehicles") {
            Command::ShowNearby
        } else if command.contains("cancel") {
            Command::CancelRide
        } else if command.contains("help") {
            Command::Help
        } else {
            Command::Unknown
        }
    }

    fn parse_driver(command: &str) -> Self {
        if command.contains("accept") {
            Command::AcceptRide
        } else if command.contains("reject") {
            Command::RejectRide
        } else if command.contains("start trip") || command.contains("start ride") {
            Command::StartTrip
        } else if command.contains("complete trip") || command.contains("complete ride") {
            Command::CompleteTrip
        } else if command.contains("go online") {
            Command::GoOnline
        } else if command.contains("go offline") {
            Command::GoOffline
        } else if command.contains("help") {
            Command::Help
        } else {
            Command::Unknown
        }
    }

    fn parse_admin(command: &str) -> Self {
        let filter = command.contains("filter");
        if command.contains("track vehicle") {
            match vehicle_pattern().captures(command) {
                Some(captures) => Command::TrackVehicle {
                    vehicle_id: captures[1].to_uppercase(),
                },
                None => Command::MissingVehicleNumber,
            }
        } else if command.contains("analytics") {
            Command::ShowAnalytics
        } else if filter && command.contains("bangalore") {
            Command::Filter {
                city: CityFilter::Bangalore,
            }
        } else if filter && command.contains("porto") {
            Command::Filter {
                city: CityFilter::Porto,
            }
        } else if command.contains("show all") || (filter && command.contains("all")) {
            Command::Filter {
                city: CityFilter::All,
            }
        } else if command.contains("refresh") {
            Command::Refresh
        } else if command.contains("help") {
            Command::Help
        } else {
            Command::Unknown
        }
    }
}
