//! llmwrap CLI - send prompts and attachments to an OpenAI-compatible model
//!
//! Usage:
//!     llmwrap [OPTIONS] [PROMPT]
//!
//! Environment Variables:
//!     LLMWRAP_API_KEY: API key (falls back to OPENROUTER_API_KEY, then OPENAI_API_KEY)
//!     LLMWRAP_MODEL: Model name (default: gpt-4o-mini)
//!     LLMWRAP_BASE_URL: API base URL (default: https://openrouter.ai/api/v1)
//!     LLMWRAP_TIMEOUT_SECS: Request timeout in seconds

use anyhow::{Context, Result};
use clap::Parser;
use llmwrap::{
    ClientOptions, CompletionOptions, ContentBlock, ImageDetail, Llm, LlmConfig, Message,
    DEFAULT_BASE_URL, DEFAULT_FILE_MIME, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// llmwrap - chat completions from the command line
#[derive(Parser, Debug)]
#[command(name = "llmwrap", version = llmwrap::VERSION)]
#[command(about = "Send a prompt, with optional images and files, to a chat model")]
#[command(after_help = r#"Examples:
    # Ask a question with the default model
    llmwrap "Summarize the Rust ownership model in one sentence"

    # Describe a local image
    llmwrap --image photo.png "What is in this picture?"

    # Ask about a PDF
    llmwrap --file paper.pdf "List the main contributions"

    # Use another model and endpoint
    llmwrap --model llama3 --base-url http://localhost:11434/v1 "Hello"

    # Interactive chat
    llmwrap
"#)]
struct Cli {
    /// API key (falls back to OPENROUTER_API_KEY, then OPENAI_API_KEY)
    #[arg(long, env = "LLMWRAP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long, env = "LLMWRAP_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API base URL
    #[arg(long, env = "LLMWRAP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "LLMWRAP_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Extra HTTP header, e.g. --header "X-Title=my-app"
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// System prompt
    #[arg(short, long)]
    system: Option<String>,

    /// Image to attach: a local path or an http(s) URL (repeatable)
    #[arg(long = "image", value_name = "PATH_OR_URL")]
    images: Vec<String>,

    /// File to attach (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// MIME type for attached files
    #[arg(long, default_value = DEFAULT_FILE_MIME)]
    file_mime: String,

    /// Maximum tokens to generate
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Prompt to send (interactive mode if not provided)
    prompt: Option<String>,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", raw))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("llmwrap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &Cli) -> Result<LlmConfig> {
    let config = match &args.api_key {
        Some(key) => LlmConfig::new(key),
        None => LlmConfig::from_env()
            .context("No API key given; pass --api-key or set LLMWRAP_API_KEY")?,
    };

    let mut options = ClientOptions::new();
    if let Some(secs) = args.timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }
    for (name, value) in &args.headers {
        options = options.with_header(name, value);
    }

    Ok(config
        .with_model(&args.model)
        .with_base_url(&args.base_url)
        .with_options(options))
}

/// Build the content blocks for the first user turn
fn build_attachments(args: &Cli) -> Result<Vec<ContentBlock>> {
    let mut blocks = Vec::new();

    for image in &args.images {
        let block = Llm::image_content(image.as_str(), ImageDetail::Auto)
            .with_context(|| format!("Failed to attach image {}", image))?;
        blocks.push(block);
    }

    for file in &args.files {
        let block = Llm::file_content(file.as_path(), Some(args.file_mime.as_str()), None)
            .with_context(|| format!("Failed to attach file {}", file.display()))?;
        blocks.push(block);
    }

    Ok(blocks)
}

fn user_message(prompt: &str, attachments: Vec<ContentBlock>) -> Message {
    if attachments.is_empty() {
        return Message::user(prompt);
    }

    let mut blocks = vec![Llm::text_content(prompt)];
    blocks.extend(attachments);
    Message::user_blocks(blocks)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    debug!("Using {:?}", config);
    let llm = Llm::with_config(config)?;

    let options = CompletionOptions::new()
        .with_max_tokens(args.max_tokens)
        .with_temperature(args.temperature);

    let mut history = Vec::new();
    if let Some(system) = &args.system {
        history.push(Message::system(system));
    }

    let mut attachments = build_attachments(&args)?;

    if let Some(prompt) = &args.prompt {
        history.push(user_message(prompt, attachments));
        let reply = llm.complete_with(history, options).await?;
        println!("{}", reply);
        return Ok(());
    }

    // Interactive mode: attachments go with the first turn only
    println!("Model: {} (empty line or 'quit' to exit)", llm.model());
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim();
        if prompt.is_empty() || prompt == "quit" || prompt == "exit" {
            break;
        }

        history.push(user_message(prompt, std::mem::take(&mut attachments)));
        match llm.complete_with(history.clone(), options.clone()).await {
            Ok(reply) => {
                println!("{}\n", reply);
                // Keep text only so images and files are not resent every turn
                let last = history.pop().map(Message::without_attachments);
                history.extend(last);
                history.push(Message::assistant(reply));
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                history.pop();
            }
        }
    }

    Ok(())
}
