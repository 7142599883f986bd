//! Agent system
//!
//! - `AgentConfig`: one JSON document per agent
//! - `config_loader` / `schema`: fetch a document by id and validate it
//! - `AgentFactory`: resolve a config into a `ComposedAgent`
//! - `TeamBuilder`: compose a root agent and everything it references

mod config;
pub mod config_loader;
mod factory;
pub mod schema;
mod team;

pub use config::*;
pub use config_loader::{load_agent_config, ConfigSource, DirectorySource, StoreSource};
pub use factory::*;
pub use schema::{validate_agent_document, AgentSchema};
pub use team::{AgentTeam, TeamBuilder};
