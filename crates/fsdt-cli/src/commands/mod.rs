//! Subcommand implementations.

mod acquire;
mod import;
mod init;
mod resolve;
mod tokens;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or update the credential store
    Init(init::InitArgs),

    /// Add a token the principal already holds
    Import(import::ImportArgs),

    /// List held tokens
    Tokens(tokens::TokensArgs),

    /// Show which token a filesystem needs
    Resolve(resolve::ResolveArgs),

    /// Acquire the token a filesystem needs
    Acquire(acquire::AcquireArgs),
}

pub async fn handle(command: Command, store: Option<PathBuf>) -> Result<()> {
    match command {
        Command::Init(args) => init::run(args, store).await,
        Command::Import(args) => import::run(args, store).await,
        Command::Tokens(args) => tokens::run(args, store).await,
        Command::Resolve(args) => resolve::run(args).await,
        Command::Acquire(args) => acquire::run(args, store).await,
    }
}
