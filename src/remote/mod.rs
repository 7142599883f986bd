//! Remote square-root calculator service
//!
//! The HTTP counterpart of the `calculator_agent` tool.

mod server;
mod sqrt;

pub use server::{router, AgentResponse, AppState, QueryRequest, ServiceError};
pub use sqrt::{square_root, square_root_agent, SquareRootTool, AGENT_NAME, TOOL_NAME};
