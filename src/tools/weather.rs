//! Weather tools - canned weather data

use crate::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const FORECAST: [&str; 7] = [
    "Monday: Sunny, 75°F",
    "Tuesday: Partly Cloudy, 72°F",
    "Wednesday: Rain, 68°F",
    "Thursday: Cloudy, 70°F",
    "Friday: Sunny, 76°F",
    "Saturday: Clear, 74°F",
    "Sunday: Partly Cloudy, 73°F",
];

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
}

pub struct CurrentWeatherTool;

#[async_trait]
impl Tool for CurrentWeatherTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_weather".to_string(),
            description: "Get the current weather for a given city.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "Name of the city"
                    }
                },
                "required": ["city"]
            }),
        }
    }

    async fn execute(&self, args: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        let args: WeatherArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Invalid arguments: {}", e)),
        };
        ToolResult::success(format!("The weather in {} is sunny.", args.city))
    }
}

pub struct CurrentTemperatureTool;

#[async_trait]
impl Tool for CurrentTemperatureTool {
    fn name(&self) -> &str {
        "get_current_temperature"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_temperature".to_string(),
            description: "Get the current temperature.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    async fn execute(&self, _args: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        ToolResult::success("The current temperature is 72°F.")
    }
}

pub struct SevenDayForecastTool;

#[async_trait]
impl Tool for SevenDayForecastTool {
    fn name(&self) -> &str {
        "get_seven_day_forecast"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_seven_day_forecast".to_string(),
            description: "Get the weather forecast for the next 7 days.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    async fn execute(&self, _args: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        ToolResult::success(FORECAST.join("\n"))
    }
}
