//! `twentysix` command-line client.
//!
//! Signs, publishes and tracks messages using the account held in
//! `TWENTYSIX_PRIVATE_KEY` (or the variable named in the config) or a
//! mnemonic passed with `--mnemonic`. Results print as pretty JSON on stdout;
//! logs go to stderr.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use twentysix_client::config::load_or_default;
use twentysix_client::message::unix_time;
use twentysix_client::observability::logging::init_logging;
use twentysix_client::{Account, ClientConfig, Message, MessageClient, MessageType};

#[derive(Parser)]
#[command(name = "twentysix")]
#[command(about = "Sign, publish and track messages on the network", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Derive the account from this mnemonic instead of the private key variable
    #[arg(long, global = true)]
    mnemonic: Option<String>,

    /// Channel to publish to and search in, overriding the config
    #[arg(long, global = true)]
    channel: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the account address and public key
    Address,
    /// Build and sign a message without submitting it
    Sign {
        #[arg(short = 't', long = "type")]
        message_type: MessageType,
        /// JSON content; `address` and `time` are filled in when missing
        #[arg(long)]
        content: String,
    },
    /// Verify the signature and content hash of a message stored as JSON
    Verify { path: PathBuf },
    /// Sign and submit content
    Send {
        #[arg(short = 't', long = "type")]
        message_type: MessageType,
        /// JSON content; `address` and `time` are filled in when missing
        #[arg(long)]
        content: String,
        /// Wait for the message to be confirmed
        #[arg(long)]
        wait: bool,
    },
    /// Fetch a message by hash
    Get { hash: String },
    /// Wait for a message to be confirmed
    Wait {
        hash: String,
        /// Override the configured timeout, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Find this account's message whose content references a hash
    Find {
        #[arg(short = 't', long = "type")]
        message_type: MessageType,
        hash: String,
    },
    /// Forget a message
    Forget {
        hash: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Upload a file and print its STORE message
    Store { path: PathBuf },
    /// Show where an instance is scheduled
    Allocation { hash: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    if let Some(channel) = &cli.channel {
        config.account.channel = channel.clone();
    }
    if let Commands::Wait {
        timeout: Some(secs),
        ..
    } = &cli.command
    {
        config.confirmation.timeout_secs = *secs;
    }

    tracing::debug!(
        api_url = %config.api.api_url,
        channel = %config.account.channel,
        "Configuration loaded"
    );

    if let Commands::Verify { path } = &cli.command {
        return verify_file(path);
    }

    let account = load_account(cli.mnemonic.as_deref(), &config)?;

    match cli.command {
        Commands::Address => print_json(&json!({
            "address": account.address_string(),
            "public_key": alloy::primitives::hex::encode_prefixed(account.public_key()),
        })),
        Commands::Sign {
            message_type,
            content,
        } => {
            let now = unix_time();
            let content = stamp_content(&content, &account, now)?;
            let message =
                Message::build(&account, &config.account.channel, message_type, &content, now)?;
            print_json(&message)
        }
        Commands::Verify { .. } => Ok(()),
        Commands::Send {
            message_type,
            content,
            wait,
        } => {
            let client = MessageClient::new(account, &config)?;
            let now = unix_time();
            let content = stamp_content(&content, client.account(), now)?;
            let (message, response) = client.send(message_type, &content, now).await?;

            if wait {
                let confirmed = client.wait_for_confirmation(&message.item_hash).await?;
                print_json(&json!({ "message": confirmed, "response": response }))
            } else {
                print_json(&json!({ "message": message, "response": response }))
            }
        }
        Commands::Get { hash } => {
            let client = MessageClient::new(account, &config)?;
            print_json(&client.message_by_hash(&hash).await?)
        }
        Commands::Wait { hash, .. } => {
            let client = MessageClient::new(account, &config)?;
            print_json(&client.wait_for_confirmation(&hash).await?)
        }
        Commands::Find { message_type, hash } => {
            let client = MessageClient::new(account, &config)?;
            print_json(&client.find_by_item_hash(message_type, &hash).await?)
        }
        Commands::Forget { hash, reason } => {
            let client = MessageClient::new(account, &config)?;
            let (message, response) = client.forget(&hash, reason).await?;
            print_json(&json!({ "message": message, "response": response }))
        }
        Commands::Store { path } => {
            let client = MessageClient::new(account, &config)?;
            let stored = client.store_file(&path).await?;
            print_json(&json!({ "message": stored.message, "upload": stored.upload }))
        }
        Commands::Allocation { hash } => {
            let client = MessageClient::new(account, &config)?;
            print_json(&client.instance_allocation(&hash).await?)
        }
    }
}

fn load_account(
    mnemonic: Option<&str>,
    config: &ClientConfig,
) -> Result<Account, Box<dyn std::error::Error>> {
    let account = match mnemonic {
        Some(phrase) => Account::from_mnemonic(phrase, &config.account.derivation_path)?,
        None => Account::from_env_var(&config.account.private_key_env)?,
    };
    Ok(account)
}

fn verify_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let message: Message = serde_json::from_str(&raw)?;
    message.verify()?;

    print_json(&json!({
        "valid": true,
        "sender": message.sender,
        "item_hash": message.item_hash,
        "payload": message.verification_payload(),
    }))
}

/// Parse JSON content and fill in `address` and `time` on objects that lack them.
fn stamp_content(
    raw: &str,
    account: &Account,
    time: f64,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut content: Value = serde_json::from_str(raw)?;
    if let Value::Object(fields) = &mut content {
        fields
            .entry("address")
            .or_insert_with(|| Value::String(account.address_string()));
        fields.entry("time").or_insert_with(|| json!(time));
    }
    Ok(content)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
