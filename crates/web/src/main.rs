use std::{process, sync::Arc};

use ride_api::{PushChannel, RideApiClient, RideServer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracking::{runtime, Tracker};
use web::{
    analytics::{self, AnalyticsStore},
    config::DashboardConfig,
    feed, start_web_server, WebState,
};

#[tokio::main]
async fn main() {
    env_logger::init();

    // request tracing
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer());
    if let Err(why) = tracing::subscriber::set_global_default(subscriber) {
        log::warn!("request tracing disabled: {}", why);
    }

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(why) => {
            log::error!("invalid configuration: {}", why);
            process::exit(1);
        }
    };

    // tracker
    let tracker = runtime::spawn(Tracker::new());
    feed::spawn(PushChannel::new(config.events_url()), tracker.clone());

    // analytics
    let ride_server: Arc<dyn RideServer> =
        Arc::new(RideApiClient::new(config.ride_server_url.clone()));
    let analytics = AnalyticsStore::default();
    analytics::spawn_refresh(
        analytics.clone(),
        ride_server.clone(),
        config.analytics_refresh,
    );

    // web server
    let web_future = start_web_server(
        config.address,
        WebState {
            tracker,
            ride_server,
            analytics,
        },
    );

    if let Err(why) = web_future.await {
        log::error!("web server stopped: {}", why);
        process::exit(1);
    }
}
