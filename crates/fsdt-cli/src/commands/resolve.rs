//! Resolve command implementation.

use anyhow::Result;
use clap::Args;

use fsdt_core::TokenManager;

use crate::filesystem;
use crate::output;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Filesystem URI (e.g. "webhdfs://namenode:9870")
    pub uri: String,
}

pub async fn run(args: ResolveArgs) -> Result<()> {
    let service = filesystem::open(&args.uri, None)?;

    let kind = TokenManager::resolve_token_kind(service.as_ref());
    output::field("Kind", kind.as_str());
    output::field("Service", &service.canonical_service_name());

    Ok(())
}
