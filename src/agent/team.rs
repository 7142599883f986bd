//! Team assembly - loads a root agent and everything it references
//!
//! Referenced agents are built bottom-up: a sub-agent named in `tools` (and
//! listed in the exposure table) or a handoff target named in `handoffs` is
//! composed before the agent that needs it. Each id is built once and shared.

use super::config_loader::{load_agent_config, ConfigSource};
use super::factory::{AgentFactory, ComposedAgent, ExposedAgent, ExposedAgents};
use crate::error::{AgentError, Result};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use std::sync::Arc;

/// The composed agents of one conversation
#[derive(Debug, Clone)]
pub struct AgentTeam {
    pub root: Arc<ComposedAgent>,
    /// Every built agent by id, dependencies before dependents
    pub agents: IndexMap<String, Arc<ComposedAgent>>,
}

impl AgentTeam {
    pub fn get(&self, id: &str) -> Option<&Arc<ComposedAgent>> {
        self.agents.get(id)
    }
}

/// Assembles an `AgentTeam` from a config source
pub struct TeamBuilder<'a> {
    source: &'a dyn ConfigSource,
    factory: &'a AgentFactory,
    /// Tool names that refer to sub-agents, with their tool descriptions
    exposures: IndexMap<String, String>,
}

#[derive(Default)]
struct Assembly {
    stack: Vec<String>,
    built: IndexMap<String, Arc<ComposedAgent>>,
}

impl<'a> TeamBuilder<'a> {
    pub fn new(source: &'a dyn ConfigSource, factory: &'a AgentFactory) -> Self {
        Self {
            source,
            factory,
            exposures: IndexMap::new(),
        }
    }

    /// Builder: expose agent `id` as a tool with the given description
    pub fn expose(mut self, id: impl Into<String>, description: impl Into<String>) -> Self {
        self.exposures.insert(id.into(), description.into());
        self
    }

    pub async fn assemble(&self, root_id: &str) -> Result<AgentTeam> {
        let mut assembly = Assembly::default();
        let root = self.build(root_id.to_string(), &mut assembly).await?;
        tracing::info!(
            root = %root.id,
            agents = ?assembly.built.keys().collect::<Vec<_>>(),
            "Assembled agent team"
        );
        Ok(AgentTeam {
            root,
            agents: assembly.built,
        })
    }

    fn build<'s>(
        &'s self,
        id: String,
        assembly: &'s mut Assembly,
    ) -> BoxFuture<'s, Result<Arc<ComposedAgent>>> {
        Box::pin(async move {
            if let Some(agent) = assembly.built.get(&id) {
                return Ok(agent.clone());
            }
            if let Some(pos) = assembly.stack.iter().position(|s| s == &id) {
                let mut path = assembly.stack[pos..].to_vec();
                path.push(id);
                return Err(AgentError::CompositionCycle { path });
            }

            let config = load_agent_config(self.source, &id).await?;
            assembly.stack.push(id.clone());

            let mut exposed = ExposedAgents::new();
            for name in &config.tools {
                if self.factory.registry().contains(name) {
                    continue;
                }
                // Anything else is left to the factory to reject
                if let Some(description) = self.exposures.get(name) {
                    let agent = self.build(name.clone(), assembly).await?;
                    exposed.insert(name.clone(), ExposedAgent::new(agent, description.clone()));
                }
            }

            let mut handoffs = Vec::with_capacity(config.handoffs.len());
            for target in &config.handoffs {
                handoffs.push(self.build(target.clone(), assembly).await?);
            }

            assembly.stack.pop();

            let agent = Arc::new(self.factory.build(&config, &exposed, &handoffs)?);
            assembly.built.insert(id, agent.clone());
            Ok(agent)
        })
    }
}
