//! Voice command layer for the dashboard pages.
//!
//! A final transcript is parsed into a [`Command`] for the role of the page
//! it was spoken on and then carried out through the page's [`Controls`].
//! Every outcome is reported back as spoken feedback.

pub mod assistant;
pub mod command;
pub mod controls;
pub mod role;

pub use assistant::{RecognitionError, TranscriptSegment, VoiceAssistant};
pub use command::{CityFilter, Command};
pub use controls::{Controls, LocationOption};
pub use role::Role;
