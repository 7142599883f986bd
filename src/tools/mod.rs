//! Built-in tools referenced by name from agent configs

mod calculator;
mod clock;
mod weather;
mod web_search;

pub use calculator::CalculatorAgentTool;
pub use clock::{CurrentDateTool, CurrentTimeTool};
pub use weather::{CurrentTemperatureTool, CurrentWeatherTool, SevenDayForecastTool};
pub use web_search::WebSearchTool;

use crate::config::ToolSettings;
use crate::error::Result;
use crate::tool::ToolRegistry;

/// Create a registry with all built-in tools
pub fn create_registry(settings: &ToolSettings) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    registry.register(CurrentWeatherTool)?;
    registry.register(CurrentTimeTool)?;
    registry.register(CurrentTemperatureTool)?;
    registry.register(SevenDayForecastTool)?;
    registry.register(CurrentDateTool)?;
    registry.register(WebSearchTool::with_url(&settings.searxng_url))?;
    registry.register(CalculatorAgentTool::new(settings.calculator_url.clone()))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue() {
        let registry = create_registry(&ToolSettings::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "get_current_weather",
                "get_current_time",
                "get_current_temperature",
                "get_seven_day_forecast",
                "get_current_date",
                "web_search",
                "calculator_agent",
            ]
        );
    }

    #[test]
    fn test_definitions_match_names() {
        let registry = create_registry(&ToolSettings::default()).unwrap();
        for name in registry.names() {
            let def = registry.get(name).unwrap().definition();
            assert_eq!(def.name, name);
            assert!(!def.description.is_empty());
        }
    }
}
