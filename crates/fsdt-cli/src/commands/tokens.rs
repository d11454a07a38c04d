//! Tokens command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::output;
use crate::store;

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Print encoded token values instead of redacting them
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Serialize)]
struct TokenLine<'a> {
    kind: &'a str,
    service: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    renewer: Option<&'a str>,
    token: &'a str,
    added_at: &'a str,
}

pub async fn run(args: TokensArgs, store: Option<PathBuf>) -> Result<()> {
    let provider = store::open_provider(store)?;
    let held = provider
        .store()
        .tokens()
        .context("Failed to read credential store")?;

    if held.is_empty() {
        eprintln!("{}", "No tokens held.".dimmed());
        return Ok(());
    }

    for entry in &held {
        output::json(&TokenLine {
            kind: entry.token.kind().as_str(),
            service: entry.token.service(),
            renewer: entry.token.renewer(),
            token: if args.show_secrets {
                entry.token.encoded()
            } else {
                "[REDACTED]"
            },
            added_at: &entry.added_at,
        })?;
    }

    Ok(())
}
