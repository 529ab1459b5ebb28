//! Canned weather and city tools. No side effects.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool};

pub const FOGGY: &str = "It's 60 degrees and foggy.";
pub const RAINY: &str = "It's 50 degrees and rainy.";
pub const SUNNY: &str = "It's 90 degrees and sunny.";

/// Canned weather for a small set of cities.
pub struct GetWeather;

impl GetWeather {
    /// Look up the canned report. Matching ignores case and surrounding whitespace.
    pub fn report(location: &str) -> &'static str {
        match location.trim().to_lowercase().as_str() {
            "sf" | "san francisco" => FOGGY,
            "bal" | "baltimore" => RAINY,
            _ => SUNNY,
        }
    }
}

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a location."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City name or abbreviation, e.g. 'San Francisco' or 'sf'"
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let location = required_str(&args, "location")?;
        Ok(Self::report(location).to_string())
    }
}

/// Fixed list of the coolest cities.
pub struct GetCoolestCities;

#[async_trait]
impl Tool for GetCoolestCities {
    fn name(&self) -> &str {
        "get_coolest_cities"
    }

    fn description(&self) -> &str {
        "Get a list of coolest cities"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        Ok("nyc, sf".to_string())
    }
}
