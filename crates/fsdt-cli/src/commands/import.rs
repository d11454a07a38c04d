//! Import command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fsdt_core::{FsUri, Token, TokenKind};

use crate::output;
use crate::store;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Token kind (e.g. "HDFS_DELEGATION_TOKEN")
    #[arg(long)]
    pub kind: String,

    /// Canonical service name, or a filesystem URI to derive it from
    #[arg(long)]
    pub service: String,

    /// Encoded token
    #[arg(long)]
    pub token: String,

    /// Principal allowed to renew the token
    #[arg(long)]
    pub renewer: Option<String>,
}

pub async fn run(args: ImportArgs, store: Option<PathBuf>) -> Result<()> {
    let provider = store::open_provider(store)?;

    let kind = TokenKind::new(&args.kind).context("Invalid token kind")?;

    // Accept "webhdfs://nn/path" as well as the canonical "webhdfs://nn:9870"
    let service = match FsUri::new(&args.service) {
        Ok(uri) => uri.canonical_service_name(),
        Err(_) => args.service.clone(),
    };

    let mut token = Token::new(kind, service, args.token);
    if let Some(renewer) = args.renewer {
        token = token.with_renewer(renewer);
    }

    provider
        .store()
        .add_token(token.clone())
        .context("Failed to save token")?;

    output::success("Token imported");
    output::field("Kind", token.kind().as_str());
    output::field("Service", token.service());

    Ok(())
}
