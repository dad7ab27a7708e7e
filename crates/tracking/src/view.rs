use model::{preset::DEFAULT_CENTER, vehicle::VehicleId};
use schemars::JsonSchema;
use serde::Serialize;
use utility::geo::{Bounds, LatLng};

use crate::map::MapLayers;

pub const DEFAULT_ZOOM: u8 = 13;
pub const FOCUS_ZOOM: u8 = 15;
/// Pixels kept free around the markers when fitting the map to them.
pub const FIT_PADDING: u16 = 50;

/// What part of the map the viewer should show.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum MapView {
    #[serde(rename_all = "camelCase")]
    Center {
        center: LatLng,
        zoom: u8,
        focused: Option<VehicleId>,
    },
    #[serde(rename_all = "camelCase")]
    FitBounds { bounds: Bounds, padding: u16 },
}

impl Default for MapView {
    fn default() -> Self {
        MapView::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            focused: None,
        }
    }
}

impl MapView {
    /// Zooms onto the marker of `id` and opens its popup. Leaves the view
    /// alone if the vehicle has no marker.
    pub fn focus(&mut self, layers: &mut MapLayers, id: &VehicleId) -> bool {
        match layers.open_popup(id) {
            Some(position) => {
                *self = MapView::Center {
                    center: position,
                    zoom: FOCUS_ZOOM,
                    focused: Some(id.clone()),
                };
                true
            }
            None => false,
        }
    }

    /// Fits the view to all markers, or goes back to the default view if the
    /// map is empty.
    pub fn center_on_markers(&mut self, layers: &MapLayers) {
        *self = match Bounds::of(&layers.marker_positions()) {
            Some(bounds) => MapView::FitBounds {
                bounds,
                padding: FIT_PADDING,
            },
            None => MapView::default(),
        };
    }
}
