//! Handlebars rendering for agent instructions
//!
//! Instructions are free text and may reference `{{agent_name}}`,
//! `{{agent_id}}` and `{{current_date}}`. Unknown placeholders render empty.

use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use std::sync::OnceLock;

fn handlebars() -> &'static Handlebars<'static> {
    static HANDLEBARS: OnceLock<Handlebars<'static>> = OnceLock::new();
    HANDLEBARS.get_or_init(|| {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(no_escape);
        handlebars
    })
}

/// Data available to instruction templates
#[derive(Serialize, Clone, Debug)]
pub struct InstructionContext<'a> {
    pub agent_name: &'a str,
    pub agent_id: &'a str,
    pub current_date: String,
}

impl<'a> InstructionContext<'a> {
    pub fn new(agent_id: &'a str, agent_name: &'a str) -> Self {
        Self {
            agent_name,
            agent_id,
            current_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Render instructions, falling back to the raw text if the template is broken
pub fn render_instructions(instructions: &str, context: &InstructionContext<'_>) -> String {
    match handlebars().render_template(instructions, context) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::warn!(agent = %context.agent_id, error = %e, "Failed to render instructions, using raw text");
            instructions.to_string()
        }
    }
}
