//! Financial analyst CLI
//!
//! Fetches price history and fundamentals for a ticker, computes technical
//! indicators, and asks an LLM for a Buy/Hold/Sell recommendation.
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="gsk-..."
//!
//! # One-shot
//! cargo run --bin analyst -p analyst-stock -- AAPL
//!
//! # Interactive
//! cargo run --bin analyst -p analyst-stock
//! ```

use analyst_llm::providers::{GroqConfig, GroqProvider};
use analyst_stock::{
    AnalysisPipeline, AnalystConfig, AnalystError, RecommendationAgent, YahooMarketData, render,
};
use clap::Parser;
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "analyst", about = "LLM-assisted stock analysis", version)]
struct Args {
    /// Ticker symbol to analyze; omit to start an interactive session
    symbol: Option<String>,

    /// Override the Groq model
    #[arg(long)]
    model: Option<String>,
}

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════╗
║              Financial Analyst                   ║
║                                                  ║
║  Enter a stock ticker (e.g. AAPL) to analyze.    ║
║  Type /exit to quit.                             ║
╚══════════════════════════════════════════════════╝
"#
    );
}

fn build_pipeline(config: AnalystConfig) -> anyhow::Result<AnalysisPipeline> {
    let market_data = Arc::new(YahooMarketData::new(&config)?);

    let agent = match config.groq_api_key.as_deref() {
        Some(key) => {
            let mut groq_config =
                GroqConfig::new(key).with_timeout(config.request_timeout.as_secs().max(30));
            if let Some(base) = &config.api_base {
                groq_config = groq_config.with_api_base(base);
            }
            let provider = Arc::new(GroqProvider::with_config(groq_config)?);
            Some(RecommendationAgent::new(provider, Arc::new(config)))
        }
        None => {
            eprintln!("Warning: GROQ_API_KEY not set; recommendations are disabled.");
            None
        }
    };

    Ok(AnalysisPipeline::new(market_data, agent))
}

async fn analyze(pipeline: &AnalysisPipeline, ticker: &str) {
    match pipeline.run(ticker).await {
        Ok(report) => println!("{}", render::render_report(&report)),
        Err(AnalystError::EmptyTicker) => {
            eprintln!("Please enter a stock ticker.");
        }
        Err(e) => eprintln!("Error: {e}\n"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,analyst_stock=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let mut builder = AnalystConfig::builder().with_env();
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let config = builder.build()?;

    let pipeline = build_pipeline(config)?;

    if let Some(symbol) = args.symbol {
        analyze(&pipeline, &symbol).await;
        return Ok(());
    }

    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("ticker> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("/exit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        analyze(&pipeline, input).await;
    }

    Ok(())
}
