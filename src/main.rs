//! Quotecard - render quote card PNGs from the command line.
//!
//! # Usage
//!
//! ```bash
//! quotecard "Hello world" "Bob Smith"
//! quotecard "Hello world" "Bob Smith" --color red
//! quotecard "Hello world" "Bob Smith" --avatar-url https://example.com/p.jpg -o card.png
//! quotecard --list-colors
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use quotecard::color;
use quotecard::prelude::*;

/// A quote card image generator for chat bots
#[derive(Parser, Debug)]
#[command(name = "quotecard", version, about, long_about = None)]
struct Cli {
    /// Message text to quote
    #[arg(value_name = "TEXT", default_value = "")]
    text: String,

    /// Author display name
    #[arg(value_name = "AUTHOR", default_value = "Unknown User")]
    author: String,

    /// Avatar image URL (any fetch failure falls back to initials)
    #[arg(long, value_name = "URL")]
    avatar_url: Option<String>,

    /// Background color: palette name or #rrggbb; unrecognized tokens fall
    /// back to the default
    #[arg(short, long, default_value = color::DEFAULT_TOKEN)]
    color: String,

    /// Card width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Output file
    #[arg(short, long, default_value = "quote.png")]
    out: PathBuf,

    /// List palette color names and exit
    #[arg(long)]
    list_colors: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_colors {
        println!("{}", color::available_colors().join(", "));
        return Ok(());
    }

    let mut config = CardConfig::default();
    if let Some(width) = cli.width {
        config.width = width;
    }

    let renderer = QuoteCardRenderer::with_config(config).context("Font setup failed")?;
    let request = RenderRequest {
        message_text: cli.text,
        author_name: cli.author,
        avatar_url: cli.avatar_url,
        background_color: cli.color,
    };

    let bytes = renderer.generate(&request).context("Render failed")?;
    fs::write(&cli.out, &bytes)
        .with_context(|| format!("Failed to write {}", cli.out.display()))?;
    println!("Wrote {} ({} bytes)", cli.out.display(), bytes.len());
    Ok(())
}
