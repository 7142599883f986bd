//! Agent Factory - configuration-driven agent composition
//!
//! This crate provides:
//! - JSON agent configs loaded from a directory or a Redis config store,
//!   validated against a fixed schema
//! - An agent factory resolving tools, sub-agents and handoffs by name
//! - A run engine and conversation REPL over an OpenAI-compatible API
//! - An importer that uploads validated configs to the store
//! - The remote square-root calculator service

pub mod config;
pub mod error;
pub mod message;
pub mod telemetry;
pub mod templates;

// Agent system
pub mod agent;
pub mod conversation;
pub mod hooks;
pub mod provider;
pub mod runner;
pub mod tool;
pub mod tools;

// Config store and remote service
pub mod remote;
pub mod store;

pub use agent::{AgentConfig, AgentFactory, AgentTeam, ComposedAgent, TeamBuilder, ToolBinding};
pub use config::Config;
pub use error::{AgentError, Result};
pub use message::{Message, ToolCall};
pub use provider::{ProviderClient, ProviderConfig};
pub use runner::{ChatModel, RunResult, Runner};
