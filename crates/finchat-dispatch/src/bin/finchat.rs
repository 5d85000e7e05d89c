//! Interactive console front-end

use std::io::{BufRead, Write};

use finchat_dispatch::{render, Dispatcher, Reply};
use finchat_llm::{CompletionRequest, GroqProvider, LlmProvider};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const ANSWER_MODEL: &str = "llama-3.1-8b-instant";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Answer an educational question through the LLM when a credential is
/// configured; otherwise return a fixed polite message
async fn answer_educational(answerer: Option<&GroqProvider>, query: &str) -> String {
    let Some(provider) = answerer else {
        return "I can explain financial concepts when an LLM credential is configured. \
                Meanwhile, try asking for live prices, OHLC data or forex rates."
            .to_string();
    };
    let request = CompletionRequest::builder(ANSWER_MODEL)
        .system("You are a concise financial educator. Answer in a short paragraph.")
        .prompt(query)
        .max_tokens(400)
        .build();
    match provider.complete(request).await {
        Ok(response) => response.text,
        Err(err) => {
            warn!(error = %err, "educational answer failed");
            "Sorry, I couldn't answer that right now. Please try again later.".to_string()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let dispatcher = Dispatcher::from_env();
    let answerer = GroqProvider::from_env().ok();
    if answerer.is_none() {
        info!("GROQ_API_KEY not set; running with pattern classification only");
    }

    println!("finchat: ask about crypto, stocks or forex. Ctrl-D to exit.");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        let reply = dispatcher.handle(utterance).await;
        let text = match &reply {
            Reply::Educational { query } => answer_educational(answerer.as_ref(), query).await,
            other => render(other),
        };
        println!("{text}\n");
    }

    Ok(())
}
