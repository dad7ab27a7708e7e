pub use serde_with;

pub mod analytics;
pub mod event;
pub mod preset;
pub mod trip_planning;
pub mod vehicle;

pub trait ExampleData {
    fn example_data() -> Self;
}
