use std::{env, error, fmt, net::SocketAddr, time::Duration};

const DEFAULT_RIDE_SERVER_URL: &str = "http://localhost:5000";
const DEFAULT_RIDE_EVENTS_PATH: &str = "/events";
const DEFAULT_DASHBOARD_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_ANALYTICS_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for {}", value, key)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub ride_server_url: String,
    pub ride_events_path: String,
    pub address: SocketAddr,
    pub analytics_refresh: Duration,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |key: &'static str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        let address = get("DASHBOARD_ADDRESS", DEFAULT_DASHBOARD_ADDRESS);
        let address = address
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "DASHBOARD_ADDRESS",
                value: address.clone(),
            })?;

        let refresh = get(
            "ANALYTICS_REFRESH_SECS",
            &DEFAULT_ANALYTICS_REFRESH_SECS.to_string(),
        );
        let analytics_refresh = match refresh.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "ANALYTICS_REFRESH_SECS",
                    value: refresh,
                })
            }
        };

        let mut ride_events_path = get("RIDE_EVENTS_PATH", DEFAULT_RIDE_EVENTS_PATH);
        if !ride_events_path.starts_with('/') {
            ride_events_path.insert(0, '/');
        }

        Ok(Self {
            ride_server_url: get("RIDE_SERVER_URL", DEFAULT_RIDE_SERVER_URL)
                .trim_end_matches('/')
                .to_owned(),
            ride_events_path,
            address,
            analytics_refresh,
        })
    }

    pub fn events_url(&self) -> String {
        format!("{}{}", self.ride_server_url, self.ride_events_path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&'static str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let vars: HashMap<_, _> = vars
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.ride_server_url, "http://localhost:5000");
        assert_eq!(config.events_url(), "http://localhost:5000/events");
        assert_eq!(config.address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.analytics_refresh, Duration::from_secs(30));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("RIDE_SERVER_URL", "http://rides:5000/"),
            ("RIDE_EVENTS_PATH", "stream"),
            ("DASHBOARD_ADDRESS", "127.0.0.1:9000"),
            ("ANALYTICS_REFRESH_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.events_url(), "http://rides:5000/stream");
        assert_eq!(config.address.port(), 9000);
        assert_eq!(config.analytics_refresh, Duration::from_secs(5));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            config(&[("ANALYTICS_REFRESH_SECS", "0")]),
            Err(ConfigError::InvalidValue {
                key: "ANALYTICS_REFRESH_SECS",
                value: "0".to_owned(),
            })
        );
        assert!(config(&[("DASHBOARD_ADDRESS", "localhost")]).is_err());
    }
}
