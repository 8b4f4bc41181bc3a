//! graph-agent: a tool-using chat agent driven by a small state graph.
//!
//! A user message enters the graph at the agent node, which asks the
//! language model for a turn. Requested tools run in the tools node and
//! their results go back to the model until it answers without tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use graph_agent::prelude::*;
//!
//! # async fn example() -> graph_agent::error::Result<()> {
//! let config = AppConfig::load(LoadOptions::default())?;
//! let agent = Agent::from_config(&config)?;
//! let result = agent.chat("What is 15 * 23?", None).await?;
//! println!("{}", result.response);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod server;
pub mod tools;
pub mod types;
pub mod util;
