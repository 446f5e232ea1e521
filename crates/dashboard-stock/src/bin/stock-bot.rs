//! Stock Chatbot CLI
//!
//! An interactive command-line chat over live market data.
//!
//! # Usage
//!
//! ```bash
//! # Optional: prefer Alpha Vantage over Yahoo Finance
//! export ALPHA_VANTAGE_API_KEY="your-key"
//! export DASHBOARD_PROVIDER="alphavantage"
//!
//! # Run the bot
//! cargo run --bin stock-bot -p dashboard-stock
//! ```

use dashboard_stock::bot::{ChatSession, Command, StockChatbot};
use dashboard_stock::{DashboardConfig, HybridSource};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "📈 > ";

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                       Stock Chatbot                          ║
║                                                              ║
║  Commands:                                                   ║
║    /clear   - Clear conversation history                     ║
║    /help    - Show help                                      ║
║    /exit    - Exit                                           ║
║                                                              ║
║  Or ask in natural language:                                 ║
║    "What's the price of AAPL?"                               ║
║    "Analyze RELIANCE.NS"                                     ║
║    "Compare TCS vs INFY"                                     ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashboard_utils::init_tracing("warn,dashboard_stock=info");

    print_banner();

    let config = DashboardConfig::from_env()?;
    let source = HybridSource::from_config(&config)?;

    println!("Configuration:");
    println!("  Provider: {:?}", config.provider);
    println!("  Sources: {}", source.source_names().join(" -> "));
    println!("  History range: {}", config.history_range);
    println!();

    let bot = StockChatbot::new(Arc::new(source));
    let mut session = ChatSession::new();
    println!("Ready!\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Ok(Command::Exit) => {
                println!("Goodbye!");
                break;
            }
            Ok(Command::Clear) => {
                session.clear();
                println!("Conversation history cleared.\n");
            }
            Ok(Command::Help) => println!("{}", Command::help_text()),
            Ok(Command::Query { text }) => {
                let reply = bot.converse(&mut session, &text).await;
                println!("{reply}\n");
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
