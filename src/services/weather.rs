//! Current conditions and multi-day forecast (weatherapi.com)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{base_url, fetch_json, require_key};
use crate::core::ServiceError;

const SERVICE: &str = "weather";

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub condition: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: String,
    pub condition: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub avg_temp_c: f64,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<CurrentWeather, ServiceError>;
    async fn forecast(&self, city: &str, days: u32) -> Result<Vec<ForecastDay>, ServiceError>;
}

impl CurrentWeather {
    pub fn describe(&self, city: &str) -> String {
        format!(
            "The current weather in {city} is {}. It is {}°C and feels like {}°C. Humidity is {}%.",
            self.condition, self.temp_c, self.feels_like_c, self.humidity
        )
    }
}

impl ForecastDay {
    pub fn describe(&self) -> String {
        format!(
            "On {}, expect {}. High: {}°C, Low: {}°C, Average: {}°C.",
            self.date, self.condition, self.max_temp_c, self.min_temp_c, self.avg_temp_c
        )
    }
}

/// One line per forecast day
pub fn describe_forecast(days: &[ForecastDay]) -> String {
    days.iter()
        .map(ForecastDay::describe)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Deserialize)]
struct Condition {
    text: String,
}

#[derive(Deserialize)]
struct CurrentResponse {
    current: CurrentBlock,
}

#[derive(Deserialize)]
struct CurrentBlock {
    condition: Condition,
    temp_c: f64,
    feelslike_c: f64,
    humidity: u32,
}

#[derive(Deserialize)]
struct ForecastResponse {
    forecast: ForecastBlock,
}

#[derive(Deserialize)]
struct ForecastBlock {
    forecastday: Vec<ForecastDayBlock>,
}

#[derive(Deserialize)]
struct ForecastDayBlock {
    date: String,
    day: DayBlock,
}

#[derive(Deserialize)]
struct DayBlock {
    condition: Condition,
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
}

/// weatherapi.com client
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    pub fn new(client: reqwest::Client, base: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url(base),
            api_key,
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn current(&self, city: &str) -> Result<CurrentWeather, ServiceError> {
        let key = require_key(SERVICE, &self.api_key)?;
        debug!("Fetching current weather for {city}");

        let request = self
            .client
            .get(format!("{}/v1/current.json", self.base_url))
            .query(&[("key", key), ("q", city)]);
        let body: CurrentResponse = fetch_json(SERVICE, request).await?;

        Ok(CurrentWeather {
            condition: body.current.condition.text,
            temp_c: body.current.temp_c,
            feels_like_c: body.current.feelslike_c,
            humidity: body.current.humidity,
        })
    }

    async fn forecast(&self, city: &str, days: u32) -> Result<Vec<ForecastDay>, ServiceError> {
        let key = require_key(SERVICE, &self.api_key)?;
        debug!("Fetching {days}-day forecast for {city}");

        let days_param = days.to_string();
        let request = self
            .client
            .get(format!("{}/v1/forecast.json", self.base_url))
            .query(&[("key", key), ("q", city), ("days", days_param.as_str())]);
        let body: ForecastResponse = fetch_json(SERVICE, request).await?;

        Ok(body
            .forecast
            .forecastday
            .into_iter()
            .map(|d| ForecastDay {
                date: d.date,
                condition: d.day.condition.text,
                max_temp_c: d.day.maxtemp_c,
                min_temp_c: d.day.mintemp_c,
                avg_temp_c: d.day.avgtemp_c,
            })
            .collect())
    }
}
