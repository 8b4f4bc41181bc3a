//! graph-agent binary entry point.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use graph_agent::agent::{Agent, ChatResult};
use graph_agent::cli::{is_exit_command, ChatArgs, Cli, Commands, DEMO_QUESTIONS};
use graph_agent::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use graph_agent::tools::ToolRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so `.env` can supply GRAPH_AGENT_CONFIG.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        ..Default::default()
    })
    .context("failed to load configuration")?;
    if let Commands::Serve(args) = &cli.command {
        if let Some(bind) = &args.bind {
            config.server.bind_address = bind.clone();
        }
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Serve(_) => {
            let agent = Agent::from_config(&config)?;
            graph_agent::server::serve(agent, &config.server.bind_address).await?;
        }
        Commands::Chat(args) => handle_chat(&config, args).await?,
        Commands::Interactive => run_interactive(&config).await?,
        Commands::Demo => run_demo(&config).await?,
        Commands::Tools => {
            let registry = ToolRegistry::builtin(config.agent.default_timezone.clone());
            println!("{}", serde_json::to_string_pretty(&registry.infos())?);
        }
    }
    Ok(())
}

async fn handle_chat(config: &AppConfig, args: ChatArgs) -> anyhow::Result<()> {
    let agent = Agent::from_config(config)?;

    if !args.stream {
        let result = agent.chat(&args.message, args.thread_id).await?;
        println!("{}", result.response);
        eprintln!(
            "[thread {} | steps {} | tools {:?}]",
            result.thread_id, result.step_count, result.tools_used
        );
        return Ok(());
    }

    let mut steps = agent.stream_chat(&args.message, args.thread_id)?;
    while let Some(step) = steps.next().await {
        let step = step?;
        for message in &step.messages {
            println!("[{} #{}] {}", step.node, step.step_count, message.text());
        }
    }
    Ok(())
}

async fn run_interactive(config: &AppConfig) -> anyhow::Result<()> {
    let agent = Agent::from_config(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut thread_id: Option<String> = None;

    println!("Interactive mode. Type 'exit', 'quit' or 'bye' to leave.");
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            println!("Goodbye.");
            break;
        }

        match agent.chat(input, thread_id.clone()).await {
            Ok(result) => {
                thread_id = Some(result.thread_id.clone());
                print_answer(&result);
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

async fn run_demo(config: &AppConfig) -> anyhow::Result<()> {
    let agent = Agent::from_config(config)?;
    for (idx, question) in DEMO_QUESTIONS.iter().enumerate() {
        println!("Sample {}: {question}", idx + 1);
        match agent.chat(question, None).await {
            Ok(result) => print_answer(&result),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

fn print_answer(result: &ChatResult) {
    if result.response.is_empty() {
        println!("agent> (no response)");
    } else {
        println!("agent> {}", result.response);
    }
    if !result.tools_used.is_empty() {
        println!("  tools: {}", result.tools_used.join(", "));
    }
    println!();
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
