//! Weather report tool.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{error, info};

use super::{Tool, ToolContext, wrong_arguments};
use crate::domain::{ToolId, ToolInvocation};
use crate::http;

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentConditions {
    pub description: String,
    pub temp_c: String,
    pub feels_like_c: String,
    pub humidity: String,
    pub wind_kmph: String,
}

/// Seam to the weather endpoint
pub trait WeatherClient: Send + Sync {
    /// Fetch current conditions for `city`
    fn current(&self, city: &str) -> Result<CurrentConditions>;
}

/// Client for the wttr.in JSON view.
///
/// The city is interpolated as a path segment and the `j1` format gives a
/// JSON payload with the conditions nested under `current_condition`.
pub struct WttrClient {
    agent: ureq::Agent,
}

impl WttrClient {
    pub fn new() -> Self {
        Self {
            agent: http::agent(),
        }
    }
}

impl Default for WttrClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient for WttrClient {
    fn current(&self, city: &str) -> Result<CurrentConditions> {
        let url = format!("https://wttr.in/{city}?format=j1");
        let response = self
            .agent
            .get(&url)
            .call()
            .context("weather request failed")?;
        let json: serde_json::Value = response
            .into_json()
            .context("weather response was not JSON")?;

        let current = json
            .get("current_condition")
            .and_then(|value| value.as_array())
            .and_then(|conditions| conditions.first())
            .ok_or_else(|| anyhow!("missing current_condition"))?;

        let field = |name: &str| -> Result<String> {
            current
                .get(name)
                .and_then(|value| value.as_str())
                .map(String::from)
                .ok_or_else(|| anyhow!("missing field '{name}'"))
        };

        let description = current
            .get("weatherDesc")
            .and_then(|value| value.as_array())
            .and_then(|descriptions| descriptions.first())
            .and_then(|entry| entry.get("value"))
            .and_then(|value| value.as_str())
            .map(String::from)
            .ok_or_else(|| anyhow!("missing weather description"))?;

        Ok(CurrentConditions {
            description,
            temp_c: field("temp_C")?,
            feels_like_c: field("FeelsLikeC")?,
            humidity: field("humidity")?,
            wind_kmph: field("windspeedKmph")?,
        })
    }
}

/// Tool that reports current weather for a city
pub struct GetWeather {
    client: Arc<dyn WeatherClient>,
}

impl GetWeather {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    async fn report(&self, city: String) -> String {
        let client = self.client.clone();
        let lookup = {
            let city = city.clone();
            tokio::task::spawn_blocking(move || client.current(&city))
        };

        match lookup.await {
            Ok(Ok(conditions)) => {
                info!(city = %city, "weather retrieved");
                format!(
                    "{} in {city}: {}°C (feels like {}°C), humidity {}%, wind {} km/h.",
                    conditions.description,
                    conditions.temp_c,
                    conditions.feels_like_c,
                    conditions.humidity,
                    conditions.wind_kmph,
                )
            }
            Ok(Err(err)) => {
                error!(city = %city, error = %err, "failed to retrieve weather");
                format!("Could not retrieve weather for {city}.")
            }
            Err(err) => {
                error!(city = %city, error = %err, "weather lookup task failed");
                format!("An error occurred while retrieving weather for {city}.")
            }
        }
    }
}

#[async_trait]
impl Tool for GetWeather {
    fn id(&self) -> ToolId {
        ToolId::GetWeather
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        match invocation {
            ToolInvocation::GetWeather { city } => self.report(city).await,
            _ => wrong_arguments(self.id()),
        }
    }
}
