//! LLM Provider layer
//!
//! OpenAI-compatible provider that handles chat completions.
//! Supports any API implementing the OpenAI chat completions spec.

mod client;
mod config;

pub use client::*;
pub use config::*;
