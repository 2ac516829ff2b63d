//! Weather intent handlers
//!
//! Handles: weather, weather_forecast
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use log::error;
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;
use crate::services::weather::describe_forecast;

const NO_CITY: &str = "I didn't catch the city name.";

/// Handler for weather intents: weather, weather_forecast
pub struct WeatherHandler;

#[async_trait]
impl IntentHandler for WeatherHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::Weather, Intent::WeatherForecast]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        _utterance: &str,
    ) -> Result<Flow> {
        match intent {
            Intent::Weather => self.handle_current(&ctx).await,
            Intent::WeatherForecast => self.handle_forecast(&ctx).await,
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

impl WeatherHandler {
    async fn handle_current(&self, ctx: &AssistantContext) {
        let city = ctx.ask("Which city do you want the weather for?").await;
        if city.is_empty() {
            ctx.say(NO_CITY).await;
            return;
        }

        let reply = match ctx.call("weather", ctx.services.weather.current(&city)).await {
            Ok(weather) => weather.describe(&city),
            Err(e) => {
                error!("Weather error for {city:?}: {e}");
                "Unable to fetch weather at the moment.".to_string()
            }
        };
        ctx.say(&reply).await;
    }

    async fn handle_forecast(&self, ctx: &AssistantContext) {
        let city = ctx.ask("Which city do you want the weather forecast for?").await;
        if city.is_empty() {
            ctx.say(NO_CITY).await;
            return;
        }

        let days = ctx.settings.services.forecast_days;
        let reply = match ctx
            .call("weather", ctx.services.weather.forecast(&city, days))
            .await
        {
            Ok(forecast) => describe_forecast(&forecast),
            Err(e) => {
                error!("Weather forecast error for {city:?}: {e}");
                "Unable to fetch weather forecast at the moment.".to_string()
            }
        };
        ctx.say(&reply).await;
    }
}
