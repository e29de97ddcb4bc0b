//! Farewatch CLI - chat with the flight price assistant from a terminal.

use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod render;
mod session;

use client::ChatClient;
use session::Session;

/// Farewatch CLI - flight price assistant
#[derive(Parser)]
#[command(name = "farewatch")]
#[command(about = "Chat with the Farewatch flight price assistant", long_about = None)]
struct Cli {
    /// Chat endpoint
    #[arg(short, long, default_value = "http://localhost:3000/api/chat")]
    url: String,

    /// Seconds to wait for the service before answering locally
    #[arg(short, long, default_value_t = 10)]
    timeout_secs: u64,

    /// Send one message and exit
    #[arg(short, long)]
    message: Option<String>,

    /// Never contact the service
    #[arg(long)]
    offline: bool,

    /// Seed for locally generated offers
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = if cli.offline {
        None
    } else {
        Some(ChatClient::new(&cli.url, Duration::from_secs(cli.timeout_secs))?)
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(client, rng);

    if let Some(message) = cli.message {
        for reply in session.ask(&message).await? {
            println!("{}\n", render::render(&reply));
        }
        return Ok(());
    }

    for message in session.conversation().messages() {
        println!("{}\n", render::render(message));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "exit" | "quit") {
            break;
        }

        for reply in session.ask(text).await? {
            println!("{}\n", render::render(&reply));
        }
    }

    Ok(())
}
