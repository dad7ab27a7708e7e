use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::CityFilter;

/// One entry of a pickup or dropoff selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationOption {
    pub value: String,
    pub text: String,
}

impl LocationOption {
    pub fn new<V: Into<String>, T: Into<String>>(value: V, text: T) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Finds the first option whose text contains `spoken`, ignoring case.
pub fn match_location<'a>(options: &'a [LocationOption], spoken: &str) -> Option<&'a LocationOption> {
    let spoken = spoken.to_lowercase();
    options
        .iter()
        .find(|option| option.text.to_lowercase().contains(&spoken))
}

/// The page controls voice commands act on.
///
/// Every method defaults to a no-op so a page only implements the controls it
/// actually has.
pub trait Controls {
    /// `None` if the page has no pickup list.
    fn pickup_options(&self) -> Option<Vec<LocationOption>> {
        None
    }

    /// `None` if the page has no dropoff list.
    fn dropoff_options(&self) -> Option<Vec<LocationOption>> {
        None
    }

    fn book_ride(&mut self, _pickup: &LocationOption, _dropoff: &LocationOption) {}

    fn show_nearby_vehicles(&mut self) {}

    fn cancel_ride(&mut self) {}

    /// Returns false if there is no pending ride to accept.
    fn accept_ride(&mut self) -> bool {
        false
    }

    fn reject_ride(&mut self) {}

    fn start_trip(&mut self) {}

    fn complete_trip(&mut self) {}

    /// `None` if the page has no online toggle.
    fn is_online(&self) -> Option<bool> {
        None
    }

    fn set_online(&mut self, _online: bool) {}

    fn track_vehicle(&mut self, _vehicle_id: &str) {}

    fn show_analytics(&mut self) {}

    fn filter_city(&mut self, _city: CityFilter) {}

    fn refresh(&mut self) {}
}

/// A page without any controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoControls;

impl Controls for NoControls {}
