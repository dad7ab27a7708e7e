use model::analytics::TripRecord;
use schemars::JsonSchema;
use serde::Serialize;
use utility::format;

pub const EMPTY_MESSAGE: &str = "No trip data available";
pub const CSV_FILE_NAME: &str = "trip_data.csv";
const CSV_HEADER: [&str; 6] = [
    "Vehicle ID",
    "Date & Time",
    "Distance (km)",
    "Duration (min)",
    "Avg Speed (km/h)",
    "Status",
];

const COMPLETED_COLOR: &str = "#10b981";
const CANCELLED_COLOR: &str = "#ef4444";
const OTHER_COLOR: &str = "#f59e0b";

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripRow {
    pub vehicle_id: String,
    pub date: String,
    pub distance: String,
    pub duration: String,
    pub speed: String,
    pub status_label: String,
    pub status_color: String,
}

impl From<&TripRecord> for TripRow {
    fn from(trip: &TripRecord) -> Self {
        let status = trip.status.as_deref();
        Self {
            vehicle_id: trip
                .vehicle_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| "-".to_owned()),
            date: trip.date.clone(),
            distance: format!("{:.2}", trip.distance),
            duration: format!("{:.1}", trip.duration),
            speed: format!("{:.2}", trip.speed),
            status_label: status
                .filter(|status| !status.is_empty())
                .map(format::capitalize)
                .unwrap_or_else(|| "Unknown".to_owned()),
            status_color: match status {
                Some("completed") => COMPLETED_COLOR,
                Some("cancelled") => CANCELLED_COLOR,
                _ => OTHER_COLOR,
            }
            .to_owned(),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripTable {
    pub rows: Vec<TripRow>,
    pub empty_message: Option<String>,
}

impl TripTable {
    pub fn new(trips: &[TripRecord]) -> Self {
        Self {
            rows: trips.iter().map(TripRow::from).collect(),
            empty_message: trips.is_empty().then(|| EMPTY_MESSAGE.to_owned()),
        }
    }
}

/// Raw trip values as a CSV document, one line per trip.
pub fn export_csv(trips: &[TripRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;
    for trip in trips {
        writer.write_record([
            trip.vehicle_id.clone().unwrap_or_default(),
            trip.date.clone(),
            trip.distance.to_string(),
            trip.duration.to_string(),
            trip.speed.to_string(),
            trip.status.clone().unwrap_or_default(),
        ])?;
    }
    let data = writer
        .into_inner()
        .map_err(|why| csv::Error::from(why.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
