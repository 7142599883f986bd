//! Run hooks - callbacks fired by the run engine
//!
//! Fired around every tool call (function tools and sub-agent tools alike)
//! and whenever control is handed off to another agent.

use parking_lot::Mutex;
use std::time::Instant;

pub trait RunHooks: Send + Sync {
    fn on_tool_start(&self, _agent: &str, _tool: &str) {}

    fn on_tool_end(&self, _agent: &str, _tool: &str, _output: &str) {}

    fn on_handoff(&self, _from: &str, _to: &str) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl RunHooks for NoopHooks {}

/// Prints each tool call to stdout in green and logs its duration
#[derive(Debug, Default)]
pub struct ConsoleHooks {
    /// Start times of the tool calls in flight; sub-agent tools nest
    tool_starts: Mutex<Vec<Instant>>,
}

impl ConsoleHooks {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Line printed when `agent` calls `tool`
pub fn tool_call_notice(agent: &str, tool: &str) -> String {
    format!("\x1b[92mTool {} called from {}\x1b[0m", tool, agent)
}

impl RunHooks for ConsoleHooks {
    fn on_tool_start(&self, agent: &str, tool: &str) {
        self.tool_starts.lock().push(Instant::now());
        println!("{}", tool_call_notice(agent, tool));
    }

    fn on_tool_end(&self, agent: &str, tool: &str, output: &str) {
        let duration_ms = self
            .tool_starts
            .lock()
            .pop()
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);
        tracing::debug!(
            agent = %agent,
            tool = %tool,
            duration_ms,
            output_len = output.len(),
            "Tool call finished"
        );
    }

    fn on_handoff(&self, from: &str, to: &str) {
        tracing::info!(from = %from, to = %to, "Handoff");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_notice() {
        assert_eq!(
            tool_call_notice("Weather Agent", "get_current_weather"),
            "\x1b[92mTool get_current_weather called from Weather Agent\x1b[0m"
        );
    }

    #[test]
    fn test_console_hooks_clear_timing() {
        let hooks = ConsoleHooks::new();
        hooks.on_tool_start("a", "t");
        assert_eq!(hooks.tool_starts.lock().len(), 1);
        hooks.on_tool_end("a", "t", "done");
        assert!(hooks.tool_starts.lock().is_empty());
    }

    #[test]
    fn test_nested_tool_calls_keep_outer_start() {
        let hooks = ConsoleHooks::new();
        hooks.on_tool_start("Conversation Agent", "weather");
        let outer = hooks.tool_starts.lock()[0];

        hooks.on_tool_start("Weather Agent", "get_current_weather");
        assert_eq!(hooks.tool_starts.lock().len(), 2);
        hooks.on_tool_end("Weather Agent", "get_current_weather", "sunny");

        assert_eq!(*hooks.tool_starts.lock(), vec![outer]);
        hooks.on_tool_end("Conversation Agent", "weather", "sunny");
        assert!(hooks.tool_starts.lock().is_empty());
    }
}
