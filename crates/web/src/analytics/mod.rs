use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local};
use model::analytics::{AnalyticsReport, TripSummary};
use ride_api::{ApiError, RideServer};
use schemars::JsonSchema;
use serde::Serialize;
use tokio::{sync::RwLock, time};

pub mod charts;
pub mod trips;

use charts::ChartSet;
use trips::TripTable;

pub const ANALYTICS_FAILED_ALERT: &str = "Error loading analytics. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_trips: String,
    pub total_distance: String,
    pub total_time: String,
    pub avg_speed: String,
}

impl From<&TripSummary> for Statistics {
    fn from(summary: &TripSummary) -> Self {
        Self {
            total_trips: summary.total_trips.to_string(),
            total_distance: format!("{:.1} km", summary.total_distance_km),
            total_time: format!("{:.1} hrs", summary.total_time_hours),
            avg_speed: format!("{:.1} km/h", summary.avg_speed_kmh),
        }
    }
}

/// Everything the analytics page shows, built from one report.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBoard {
    pub statistics: Statistics,
    pub charts: ChartSet,
    pub trips: TripTable,
    pub updated_at: DateTime<Local>,
    #[serde(skip)]
    pub report: AnalyticsReport,
}

impl AnalyticsBoard {
    pub fn new(report: AnalyticsReport) -> Self {
        Self {
            statistics: Statistics::from(&report.summary),
            charts: ChartSet::new(&report.charts),
            trips: TripTable::new(&report.trips),
            updated_at: Local::now(),
            report,
        }
    }

    /// Applies a newer report, reusing the existing chart configurations.
    pub fn refresh(&mut self, report: AnalyticsReport) {
        self.statistics = Statistics::from(&report.summary);
        self.charts.refresh(&report.charts);
        self.trips = TripTable::new(&report.trips);
        self.updated_at = Local::now();
        self.report = report;
    }
}

/// The last analytics board fetched from the ride server.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsStore {
    board: Arc<RwLock<Option<Arc<AnalyticsBoard>>>>,
}

impl AnalyticsStore {
    pub async fn current(&self) -> Option<Arc<AnalyticsBoard>> {
        self.board.read().await.clone()
    }

    pub async fn refresh(&self, server: &dyn RideServer) -> Result<Arc<AnalyticsBoard>, ApiError> {
        let report = server.analytics().await?;
        let mut board = self.board.write().await;
        let next = match board.as_deref() {
            Some(current) => {
                let mut next = current.clone();
                next.refresh(report);
                next
            }
            None => AnalyticsBoard::new(report),
        };
        let next = Arc::new(next);
        *board = Some(next.clone());
        Ok(next)
    }

    /// Cached board, fetching it first if there is none yet.
    pub async fn get_or_refresh(
        &self,
        server: &dyn RideServer,
    ) -> Result<Arc<AnalyticsBoard>, ApiError> {
        match self.current().await {
            Some(board) => Ok(board),
            None => self.refresh(server).await,
        }
    }
}

/// Refreshes the store every `period` until the runtime shuts down. Failed
/// refreshes keep the previous board.
pub fn spawn_refresh(store: AnalyticsStore, server: Arc<dyn RideServer>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        loop {
            interval.tick().await;
            match store.refresh(server.as_ref()).await {
                Ok(board) => log::debug!("analytics refreshed ({} trips)", board.trips.rows.len()),
                Err(why) => log::warn!("could not refresh analytics: {}", why),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use model::{
        trip_planning::{PredictionResponse, RouteRequest, SimulationRequest, SimulationResponse},
        ExampleData,
    };

    use super::*;

    #[derive(Default)]
    struct CountingServer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RideServer for CountingServer {
        async fn analytics(&self) -> Result<AnalyticsReport, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let mut report = AnalyticsReport::example_data();
            report.summary.total_trips = call as u64 + 1;
            Ok(report)
        }

        async fn predict(&self, _route: &RouteRequest) -> Result<PredictionResponse, ApiError> {
            Err(ApiError::Other("unused".to_owned()))
        }

        async fn start_simulation(
            &self,
            _request: &SimulationRequest,
        ) -> Result<SimulationResponse, ApiError> {
            Err(ApiError::Other("unused".to_owned()))
        }
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn statistics_are_rounded() {
        let stats = Statistics::from(&TripSummary {
            total_trips: 12,
            total_distance_km: 84.26,
            total_time_hours: 3.04,
            avg_speed_kmh: 27.75,
        });
        assert_eq!(stats.total_trips, "12");
        assert_eq!(stats.total_distance, "84.3 km");
        assert_eq!(stats.total_time, "3.0 hrs");
        assert_eq!(stats.avg_speed, "27.8 km/h");
    }

    #[tokio::test]
    async fn store_fetches_once_and_refreshes_in_place() {
        let server = CountingServer::default();
        let store = AnalyticsStore::default();
        assert!(store.current().await.is_none());

        let first = store.get_or_refresh(&server).await.unwrap();
        let cached = store.get_or_refresh(&server).await.unwrap();
        assert!(Arc::ptr_eq(&first, &cached));
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);

        let second = store.refresh(&server).await.unwrap();
        assert_eq!(second.statistics.total_trips, "2");
        assert_eq!(second.charts, first.charts);
        assert_eq!(first.statistics.total_trips, "1");
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_runs_on_every_tick() {
        let server = Arc::new(CountingServer::default());
        let store = AnalyticsStore::default();
        spawn_refresh(store.clone(), server.clone(), Duration::from_secs(30));

        // the first tick fires right away
        settle().await;
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(server.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            store.current().await.unwrap().statistics.total_trips,
            "2"
        );
    }
}
