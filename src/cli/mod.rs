//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Sample questions run by `demo`, one fresh thread each.
pub const DEMO_QUESTIONS: [&str; 3] = [
    "Hello! What time is it now?",
    "Please calculate 2 + 2 * 3",
    "Please search for information about Python",
];

const EXIT_WORDS: [&str; 4] = ["exit", "quit", "bye", "終了"];

/// Graph agent service and CLI
#[derive(Parser, Debug)]
#[command(name = "graph-agent", version, about = "Tool-using chat agent over HTTP or the terminal")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "GRAPH_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Send one message to the agent
    Chat(ChatArgs),
    /// Chat in a prompt loop, keeping one thread id across turns
    Interactive,
    /// Run a few sample questions
    Demo,
    /// List the available tools
    Tools,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overriding configuration (e.g. 127.0.0.1:8000)
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send
    pub message: String,

    /// Continue under an existing thread id
    #[arg(long)]
    pub thread_id: Option<String>,

    /// Print each graph step as it happens
    #[arg(long)]
    pub stream: bool,
}

/// Whether an interactive-mode line ends the session.
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_WORDS.contains(&input.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_with_global_config() {
        let cli = Cli::parse_from([
            "graph-agent",
            "chat",
            "what is 2+3?",
            "--thread-id",
            "t-1",
            "--stream",
            "--config",
            "agent.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("agent.toml")));
        match cli.command {
            Commands::Chat(args) => {
                assert_eq!(args.message, "what is 2+3?");
                assert_eq!(args.thread_id.as_deref(), Some("t-1"));
                assert!(args.stream);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_bind_is_optional() {
        let cli = Cli::parse_from(["graph-agent", "serve"]);
        assert!(matches!(cli.command, Commands::Serve(ServeArgs { bind: None })));
    }

    #[test]
    fn parses_interactive_and_demo() {
        let cli = Cli::parse_from(["graph-agent", "interactive", "--config", "a.toml"]);
        assert!(matches!(cli.command, Commands::Interactive));
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));

        let cli = Cli::parse_from(["graph-agent", "demo"]);
        assert!(matches!(cli.command, Commands::Demo));
    }

    #[test]
    fn dotenv_loaded_before_parsing_supplies_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "GRAPH_AGENT_CONFIG=from-dotenv.toml\n").unwrap();
        dotenvy::from_path(&env_file).unwrap();

        let cli = Cli::parse_from(["graph-agent", "tools"]);
        assert_eq!(cli.config, Some(PathBuf::from("from-dotenv.toml")));
    }

    #[test]
    fn exit_words_end_the_session() {
        for word in ["exit", "QUIT", " bye ", "終了"] {
            assert!(is_exit_command(word), "{word}");
        }
        assert!(!is_exit_command("exit please"));
        assert!(!is_exit_command(""));
    }
}
