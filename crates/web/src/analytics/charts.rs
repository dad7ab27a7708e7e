//! Chart.js configurations for the four analytics charts.

use model::analytics::{ChartData, Series};
use schemars::JsonSchema;
use serde::Serialize;

const LEGEND_COLOR: &str = "#f8fafc";
const TICK_COLOR: &str = "#cbd5e1";
const GRID_COLOR: &str = "rgba(51, 65, 85, 0.5)";

const BLUE: &str = "rgba(37, 99, 235, 0.8)";
const BLUE_SOLID: &str = "rgba(37, 99, 235, 1)";
const GREEN_FILL: &str = "rgba(16, 185, 129, 0.2)";
const GREEN_SOLID: &str = "rgba(16, 185, 129, 1)";
const PURPLE_FILL: &str = "rgba(168, 85, 247, 0.2)";
const PURPLE_SOLID: &str = "rgba(168, 85, 247, 1)";
const SPEED_COLORS: [&str; 5] = [
    "rgba(239, 68, 68, 0.8)",
    "rgba(245, 158, 11, 0.8)",
    "rgba(16, 185, 129, 0.8)",
    "rgba(37, 99, 235, 0.8)",
    "rgba(168, 85, 247, 0.8)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Colors {
    Single(String),
    PerBar(Vec<String>),
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Colors,
    pub border_color: Option<String>,
    pub border_width: u8,
    pub fill: Option<bool>,
    pub tension: Option<f64>,
    pub point_radius: Option<u8>,
    pub point_hover_radius: Option<u8>,
}

impl Dataset {
    fn new(label: &str, background_color: Colors, border_width: u8) -> Self {
        Self {
            label: label.to_owned(),
            data: vec![],
            background_color,
            border_color: None,
            border_width,
            fill: None,
            tension: None,
            point_radius: None,
            point_hover_radius: None,
        }
    }

    fn border(mut self, color: &str) -> Self {
        self.border_color = Some(color.to_owned());
        self
    }

    /// Filled area under a smoothed line.
    fn area(mut self) -> Self {
        self.fill = Some(true);
        self.tension = Some(0.4);
        self
    }

    fn points(mut self, radius: u8, hover_radius: u8) -> Self {
        self.point_radius = Some(radius);
        self.point_hover_radius = Some(hover_radius);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ChartBody {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ColorOption {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Legend {
    pub labels: ColorOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Plugins {
    pub legend: Legend,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: Option<bool>,
    pub ticks: ColorOption,
    pub grid: ColorOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Scales {
    pub y: Axis,
    pub x: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    pub scales: Scales,
}

impl Default for ChartOptions {
    fn default() -> Self {
        let color = |color: &str| ColorOption {
            color: color.to_owned(),
        };
        let axis = |begin_at_zero| Axis {
            begin_at_zero,
            ticks: color(TICK_COLOR),
            grid: color(GRID_COLOR),
        };
        Self {
            responsive: true,
            maintain_aspect_ratio: true,
            plugins: Plugins {
                legend: Legend {
                    labels: color(LEGEND_COLOR),
                },
            },
            scales: Scales {
                y: axis(Some(true)),
                x: axis(None),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartBody,
    pub options: ChartOptions,
}

impl ChartConfig {
    fn new(kind: ChartKind, dataset: Dataset, series: &Series) -> Self {
        let mut config = Self {
            kind,
            data: ChartBody {
                labels: vec![],
                datasets: vec![dataset],
            },
            options: ChartOptions::default(),
        };
        config.set_series(series);
        config
    }

    /// Swaps in new labels and values, keeping styling untouched.
    pub fn set_series(&mut self, series: &Series) {
        self.data.labels = series.labels.clone();
        if let Some(dataset) = self.data.datasets.first_mut() {
            dataset.data = series.values.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    pub distance: ChartConfig,
    pub duration: ChartConfig,
    pub speed: ChartConfig,
    pub hourly: ChartConfig,
}

impl ChartSet {
    pub fn new(charts: &ChartData) -> Self {
        let distance = Dataset::new("Number of Trips", Colors::Single(BLUE.to_owned()), 2)
            .border(BLUE_SOLID);
        let duration = Dataset::new("Trip Duration", Colors::Single(GREEN_FILL.to_owned()), 3)
            .border(GREEN_SOLID)
            .area();
        let speed = Dataset::new(
            "Speed Range (km/h)",
            Colors::PerBar(SPEED_COLORS.iter().map(|color| color.to_string()).collect()),
            2,
        );
        let hourly = Dataset::new("Trips per Hour", Colors::Single(PURPLE_FILL.to_owned()), 3)
            .border(PURPLE_SOLID)
            .area()
            .points(5, 8);

        Self {
            distance: ChartConfig::new(ChartKind::Bar, distance, &charts.distance_bins),
            duration: ChartConfig::new(ChartKind::Line, duration, &charts.duration_bins),
            speed: ChartConfig::new(ChartKind::Bar, speed, &charts.speed_bins),
            hourly: ChartConfig::new(ChartKind::Line, hourly, &charts.hourly),
        }
    }

    /// Updates every chart in place after a refresh.
    pub fn refresh(&mut self, charts: &ChartData) {
        self.distance.set_series(&charts.distance_bins);
        self.duration.set_series(&charts.duration_bins);
        self.speed.set_series(&charts.speed_bins);
        self.hourly.set_series(&charts.hourly);
    }
}

#[cfg(test)]
mod tests {
    use model::{analytics::AnalyticsReport, ExampleData};

    use super::*;

    #[test]
    fn charts_follow_the_payload() {
        let report = AnalyticsReport::example_data();
        let set = ChartSet::new(&report.charts);
        assert_eq!(set.distance.kind, ChartKind::Bar);
        assert_eq!(set.hourly.kind, ChartKind::Line);
        assert_eq!(set.distance.data.labels, report.charts.distance_bins.labels);
        assert_eq!(
            set.speed.data.datasets[0].data,
            report.charts.speed_bins.values
        );
    }

    #[test]
    fn refresh_keeps_styling() {
        let report = AnalyticsReport::example_data();
        let mut set = ChartSet::new(&report.charts);
        let before = set.hourly.data.datasets[0].clone();

        let mut charts = report.charts.clone();
        charts.hourly = Series {
            labels: vec!["08:00".to_owned()],
            values: vec![4.0],
        };
        set.refresh(&charts);

        let after = &set.hourly.data.datasets[0];
        assert_eq!(set.hourly.data.labels, vec!["08:00"]);
        assert_eq!(after.data, vec![4.0]);
        assert_eq!(after.point_radius, before.point_radius);
        assert_eq!(after.background_color, before.background_color);
    }

    #[test]
    fn serializes_in_chart_js_shape() {
        let set = ChartSet::new(&AnalyticsReport::example_data().charts);
        let value = serde_json::to_value(&set.hourly).unwrap();
        assert_eq!(value["type"], "line");
        let dataset = &value["data"]["datasets"][0];
        assert_eq!(dataset["backgroundColor"], PURPLE_FILL);
        assert_eq!(dataset["pointHoverRadius"], 8);
        assert_eq!(value["options"]["scales"]["y"]["beginAtZero"], true);
        assert!(value["options"]["scales"]["x"].get("beginAtZero").is_none());

        let speed = serde_json::to_value(&set.speed).unwrap();
        assert_eq!(speed["data"]["datasets"][0]["backgroundColor"][0], SPEED_COLORS[0]);
        assert!(speed["data"]["datasets"][0].get("borderColor").is_none());
    }
}
