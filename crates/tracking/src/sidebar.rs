use model::vehicle::{VehicleId, VehicleStatus};
use schemars::JsonSchema;
use serde::Serialize;

use crate::table::VehicleTable;

pub const EMPTY_MESSAGE: &str = "No active vehicles";

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    pub vehicle_id: VehicleId,
    pub status: VehicleStatus,
    pub status_label: String,
    /// Width of the progress bar in percent.
    pub progress: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub entries: Vec<SidebarEntry>,
    pub empty_message: Option<String>,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            entries: vec![],
            empty_message: Some(EMPTY_MESSAGE.to_owned()),
        }
    }
}

/// Projects the table into the sidebar list, in first-seen order.
pub fn project(table: &VehicleTable) -> Sidebar {
    if table.is_empty() {
        return Sidebar::default();
    }

    let entries = table
        .iter()
        .map(|vehicle| SidebarEntry {
            vehicle_id: vehicle.id.clone(),
            status: vehicle.status,
            status_label: vehicle.status.label().to_owned(),
            progress: vehicle.progress,
        })
        .collect();

    Sidebar {
        entries,
        empty_message: None,
    }
}
