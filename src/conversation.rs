//! Conversation driver - the interactive loop around a root agent
//!
//! State is `Active(agent)` until the user types `exit` at the root agent.
//! `exit` anywhere else returns to the root; `reset` starts over.

use crate::agent::ComposedAgent;
use crate::error::Result;
use crate::message::Message;
use crate::runner::Runner;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use std::sync::Arc;

/// A line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Reset,
    Say(String),
}

impl Command {
    /// Only the exact words `exit` and `reset` are commands
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "exit" => Command::Exit,
            "reset" => Command::Reset,
            text => Command::Say(text.to_string()),
        }
    }
}

/// What handling a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The final output of the responding agent
    Reply(String),
    ReturnedToRoot,
    Reset,
    Terminated,
}

pub struct ConversationState {
    root: Arc<ComposedAgent>,
    active: Arc<ComposedAgent>,
    transcript: Vec<Message>,
    terminated: bool,
}

impl ConversationState {
    pub fn new(root: Arc<ComposedAgent>) -> Self {
        Self {
            active: root.clone(),
            root,
            transcript: Vec::new(),
            terminated: false,
        }
    }

    pub fn root(&self) -> &Arc<ComposedAgent> {
        &self.root
    }

    /// The agent the next input goes to
    pub fn active(&self) -> &Arc<ComposedAgent> {
        &self.active
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn at_root(&self) -> bool {
        Arc::ptr_eq(&self.active, &self.root)
    }

    /// Apply one command.
    ///
    /// A failed run leaves the state exactly as it was before the input.
    pub async fn handle(&mut self, runner: &Runner, command: Command) -> Result<Outcome> {
        if self.terminated {
            return Ok(Outcome::Terminated);
        }

        match command {
            Command::Exit if self.at_root() => {
                self.terminated = true;
                Ok(Outcome::Terminated)
            }
            Command::Exit => {
                tracing::info!(from = %self.active.id, to = %self.root.id, "Returning to root agent");
                self.active = self.root.clone();
                Ok(Outcome::ReturnedToRoot)
            }
            Command::Reset => {
                self.transcript.clear();
                self.active = self.root.clone();
                Ok(Outcome::Reset)
            }
            Command::Say(text) => {
                self.transcript.push(Message::user(text));
                match runner.run(self.active.clone(), self.transcript.clone()).await {
                    Ok(result) => {
                        self.transcript = result.transcript;
                        self.active = result.last_agent;
                        Ok(Outcome::Reply(result.final_output))
                    }
                    Err(e) => {
                        self.transcript.pop();
                        Err(e)
                    }
                }
            }
        }
    }
}

/// Interactive loop on stdin/stdout. Ctrl-C is ignored, Ctrl-D exits.
pub async fn run_repl(
    runner: &Runner,
    root: Arc<ComposedAgent>,
    history_path: Option<&Path>,
) -> anyhow::Result<()> {
    println!(
        "You are now chatting with the {} agent. Type 'exit' to end the conversation.",
        root.name
    );
    println!("Type 'reset' to start over.");
    println!();

    let mut rl = DefaultEditor::new()?;
    if let Some(path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut state = ConversationState::new(root);

    loop {
        let prompt = format!("You ({}): ", state.active().name);
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match state.handle(runner, Command::parse(line)).await {
                    Ok(Outcome::Reply(output)) => println!("Agent: {}\n", output),
                    Ok(Outcome::ReturnedToRoot) => {
                        println!("Back to the {} agent.\n", state.root().name)
                    }
                    Ok(Outcome::Reset) => println!("Conversation reset.\n"),
                    Ok(Outcome::Terminated) => {
                        println!("Goodbye!");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(agent = %state.active().id, error = %e, "Run failed");
                        eprintln!("Error: {}\n", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path {
        let _ = rl.save_history(path);
    }
    Ok(())
}
