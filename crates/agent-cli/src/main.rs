//! Market analysis agent, terminal front end
//!
//! Reads one line per turn from stdin and prints the agent's reply.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{LlmProvider, RetentionPolicy};
use agent_runtime::{OpenAiProvider, Settings};
use market_analyst::chat::DEFAULT_HISTORY_LIMIT;
use market_analyst::market_data::DEFAULT_LATENCY;
use market_analyst::{AnalystError, ChatSession, MarketAnalysisAgent, MockMarketData};

const EXIT_WORDS: [&str; 3] = ["quit", "exit", "bye"];

#[derive(Parser, Debug)]
#[command(name = "market-agent")]
#[command(about = "Chat with the market analysis agent", long_about = None)]
struct Args {
    /// Model name, overrides DEFAULT_MODEL
    #[arg(long)]
    model: Option<String>,

    /// OpenAI-compatible API base URL, overrides OPENAI_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Messages kept in history (0 keeps everything)
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Simulated market data latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Send a single message, print the reply and exit
    #[arg(short, long)]
    message: Option<String>,
}

/// What a line of input asks the REPL to do
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Reset,
    Skip,
    Chat(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let input = line.trim();
    if input.is_empty() {
        return Command::Skip;
    }
    let lowered = input.to_lowercase();
    if EXIT_WORDS.contains(&lowered.as_str()) {
        Command::Quit
    } else if lowered == "reset" {
        Command::Reset
    } else {
        Command::Chat(input)
    }
}

const fn retention(history_limit: usize) -> RetentionPolicy {
    if history_limit == 0 {
        RetentionPolicy::Unbounded
    } else {
        RetentionPolicy::SlidingWindow(history_limit)
    }
}

fn print_banner() {
    println!("Market Analysis Agent started! Type 'quit' to exit.");
    println!("Try asking: 'Calculate secret indicator for SOL' or 'Hello'");
    println!("Type 'reset' to start a new conversation.");
    println!("{}", "-".repeat(50));
}

fn prompt() -> std::io::Result<()> {
    print!("\nYou: ");
    std::io::stdout().flush()
}

fn describe(err: &AnalystError) -> String {
    match err {
        AnalystError::Provider(inner) => inner.user_message(),
        other => other.to_string(),
    }
}

/// Probe the language model once at startup; the agent still runs without it
async fn check_provider(provider: &dyn LlmProvider) -> bool {
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!(provider = provider.name(), "✓ Connected to language model");
            true
        }
        Ok(false) => {
            tracing::warn!(
                provider = provider.name(),
                "⚠ Language model not reachable; general questions will fail"
            );
            false
        }
        Err(e) => {
            tracing::warn!(
                provider = provider.name(),
                error = %e,
                "⚠ Language model unavailable; general questions will fail"
            );
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing; stderr keeps logs out of the conversation
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut settings = Settings::from_env();
    if let Some(model) = args.model {
        settings = settings.with_model(model);
    }
    if let Some(base_url) = args.base_url {
        settings = settings.with_base_url(base_url);
    }
    if !settings.has_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; general questions will fail");
    }

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(&settings)?);

    // Verify the language model connection
    check_provider(provider.as_ref()).await;

    // Synthetic market data
    let latency = args.latency_ms.map_or(DEFAULT_LATENCY, Duration::from_millis);
    let source = Arc::new(MockMarketData::new().with_latency(latency));

    let agent = Arc::new(MarketAnalysisAgent::new(
        source,
        provider,
        settings.generation_options(),
    ));
    let mut chat = ChatSession::with_retention(agent, retention(args.history_limit));

    tracing::info!(
        session = %chat.session().id,
        model = %settings.model,
        base_url = %settings.base_url,
        "Session started"
    );

    if let Some(message) = args.message {
        let reply = chat.chat(&message).await?;
        println!("{reply}");
        return Ok(());
    }

    print_banner();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_command(&line) {
            Command::Skip => {}
            Command::Quit => {
                println!("Goodbye!");
                break;
            }
            Command::Reset => {
                chat.reset();
                println!("\nAgent: Conversation cleared.");
            }
            Command::Chat(input) => match chat.chat(input).await {
                Ok(reply) => println!("\nAgent: {reply}"),
                Err(e) => {
                    tracing::error!(error = %e, "Turn failed");
                    println!("\nAgent: ❌ Error: {}", describe(&e));
                }
            },
        }
    }

    tracing::info!(
        session = %chat.session().id,
        turns = chat.history().len() / 2,
        "Session ended"
    );
    Ok(())
}
