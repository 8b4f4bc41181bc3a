//! Conversation orchestration: state, graph, and the chat facade.

pub mod facade;
pub mod graph;
pub mod state;

pub use facade::{Agent, ChatResult};
pub use graph::{AgentGraph, GraphNode, GraphStep};
pub use state::{ConversationState, StateUpdate};
