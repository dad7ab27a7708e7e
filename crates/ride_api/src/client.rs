use async_trait::async_trait;
use model::{
    analytics::AnalyticsReport,
    trip_planning::{PredictionResponse, RouteRequest, SimulationRequest, SimulationResponse},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::ApiError;

pub const ANALYTICS_ENDPOINT: &str = "/api/analytics";
pub const PREDICT_ENDPOINT: &str = "/api/predict";
pub const START_SIMULATION_ENDPOINT: &str = "/api/start_simulation";

/// The ride server endpoints the dashboard talks to.
#[async_trait]
pub trait RideServer: Send + Sync {
    async fn analytics(&self) -> Result<AnalyticsReport, ApiError>;

    async fn predict(&self, route: &RouteRequest) -> Result<PredictionResponse, ApiError>;

    async fn start_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct RideApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl RideApiClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client<S: Into<String>>(base_url: S, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        log::debug!("Requesting Endpoint '{url}'.");
        let response = self.client.get(&url).send().await?;
        Self::parse(response, url).await
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        log::debug!("Posting to Endpoint '{url}'.");
        let response = self.client.post(&url).json(body).send().await?;
        Self::parse(response, url).await
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        url: String,
    ) -> Result<T, ApiError> {
        match response.status() {
            reqwest::StatusCode::OK => {
                let text = response.text().await?;
                Ok(serde_json::from_str(&text)?)
            }
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

#[async_trait]
impl RideServer for RideApiClient {
    async fn analytics(&self) -> Result<AnalyticsReport, ApiError> {
        self.get(ANALYTICS_ENDPOINT).await
    }

    async fn predict(&self, route: &RouteRequest) -> Result<PredictionResponse, ApiError> {
        self.post(PREDICT_ENDPOINT, route).await
    }

    async fn start_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, ApiError> {
        self.post(START_SIMULATION_ENDPOINT, request).await
    }
}
