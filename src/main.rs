//! tooloop CLI entry point

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tooloop")]
#[command(about = "Minimal local-model agent loop with validated tool calls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Chat with the agent
    Chat {
        /// Message to send to the agent (omit for interactive mode)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print the tool descriptors sent to the model
    Tools,

    /// Dispatch a single tool call locally
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Show configuration and registered tools
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Ctrl+C twice within 3 seconds exits
    let exit_flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let r = exit_flag.clone();

    ctrlc::set_handler(move || {
        if r.load(std::sync::atomic::Ordering::SeqCst) {
            println!("\n👋 Bye!");
            std::process::exit(0);
        } else {
            println!("\n⚠️  Press Ctrl+C again to exit");
            r.store(true, std::sync::atomic::Ordering::SeqCst);

            let r2 = r.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_secs(3));
                r2.store(false, std::sync::atomic::Ordering::SeqCst);
            });
        }
    })
    .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            let path = tooloop::config::config_path();
            tooloop::config::init(&path, force)?;
            tooloop::ui::print_success(&format!("Wrote default config to {:?}", path));
        }

        Commands::Chat { message } => {
            run_chat(message).await?;
        }

        Commands::Tools => {
            let registry = tooloop::tools::ToolRegistry::with_defaults();
            println!("{}", serde_json::to_string_pretty(registry.descriptors())?);
        }

        Commands::Call { name, args } => {
            let arguments: serde_json::Value =
                serde_json::from_str(&args).context("--args must be valid JSON")?;
            let registry = tooloop::tools::ToolRegistry::with_defaults();
            let call = tooloop::tools::ToolCallRequest::new("call_0", name, arguments);

            let outcome = registry.dispatch(&call);
            tooloop::ui::print_tool_result(&call.name, &outcome.to_content(), outcome.is_success());
        }

        Commands::Status => {
            let config = tooloop::config::load()?;
            let registry = tooloop::tools::ToolRegistry::with_defaults();
            println!("tooloop status\n");
            println!("Config: {:?}", tooloop::config::config_path());
            println!("Model: {}", config.model);
            println!("Ollama: {}", config.ollama_host);
            println!("Max iterations: {}", config.max_iterations);
            println!("Tools: {}", registry.tool_names().join(", "));
        }
    }

    Ok(())
}

async fn run_chat(message: Option<String>) -> Result<()> {
    use tooloop::adapters::CliChannel;
    use tooloop::agent::{AgentLoop, Conversation, LlmClient, OllamaClient};
    use tooloop::tools::ToolRegistry;

    let config = tooloop::config::load()?;
    let registry = ToolRegistry::with_defaults();
    let client = OllamaClient::from_config(&config);

    let agent = AgentLoop::new(client, registry, config.max_iterations);
    tooloop::ui::print_header(
        agent.client().default_model(),
        &config.ollama_host,
        agent.registry().len(),
    );

    let mut channel = CliChannel::new(agent, Conversation::new(config.system_prompt.clone()));

    if let Some(msg) = message {
        // Single message mode
        let response = channel.run_once(&msg).await?;
        tooloop::ui::print_assistant(&response.content);
    } else {
        tooloop::ui::print_step("Interactive mode (type 'exit' to quit)");
        channel.run_interactive().await?;
    }

    Ok(())
}
