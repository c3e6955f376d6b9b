use anyhow::{Context, Result};
use banana_messages::{Config, Placeholder};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Look up a localized message from a directory of message files.
///
/// Settings not given on the command line are read from
/// BANANA_MESSAGES_DIR, BANANA_MESSAGES_FORMAT and
/// BANANA_MESSAGES_DEFAULT_LANGUAGE.
#[derive(Debug, Parser)]
#[command(name = "banana-messages", version, about)]
struct Args {
    /// Message path, e.g. "menu.title"
    path: String,

    /// Language to resolve; the default language is used when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Directory holding the message files
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Filename template containing %lang%
    #[arg(short, long)]
    format: Option<String>,

    /// Language used when a message is missing
    #[arg(long)]
    default_language: Option<String>,

    /// Print the message as a list, one line per entry
    #[arg(long)]
    list: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(dir) = args.dir {
        config.messages_dir = dir;
    }
    if let Some(format) = args.format {
        config.file_format = format;
    }
    if let Some(language) = args.default_language {
        config.default_language = language;
    }

    let repository = config
        .builder()
        .strategy(Placeholder::brackets())
        .build()
        .context("Failed to configure message repository")?;
    let language = args.language.as_deref();

    if args.list {
        let lines = repository
            .get_messages(language, &args.path)
            .with_context(|| format!("Failed to resolve '{}'", args.path))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&lines)?);
        } else {
            for line in lines {
                println!("{}", line);
            }
        }
    } else {
        let message = repository
            .get_message(language, &args.path)
            .with_context(|| format!("Failed to resolve '{}'", args.path))?;
        if args.json {
            println!("{}", serde_json::to_string(&message)?);
        } else {
            println!("{}", message);
        }
    }

    Ok(())
}
