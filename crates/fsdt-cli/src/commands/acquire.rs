//! Acquire command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;

use fsdt_core::{CancelOutcome, IdentityProvider, Provenance, TokenManager};

use crate::filesystem;
use crate::output;
use crate::store;

#[derive(Args, Debug)]
pub struct AcquireArgs {
    /// Filesystem URI (e.g. "hdfs://namenode:8020")
    pub uri: String,

    /// Token kind to acquire instead of the one the filesystem declares
    #[arg(long)]
    pub kind: Option<String>,

    /// Principal allowed to renew issued tokens (defaults to the store principal)
    #[arg(long)]
    pub renewer: Option<String>,

    /// Send this user.name to REST filesystems
    #[arg(long)]
    pub user: Option<String>,

    /// Cancel the token straight after acquiring it
    #[arg(long)]
    pub release: bool,
}

pub async fn run(args: AcquireArgs, store: Option<PathBuf>) -> Result<()> {
    let provider = store::open_provider(store)?;

    let renewer = match args.renewer {
        Some(renewer) => renewer,
        None => {
            provider
                .store()
                .load()
                .context("Failed to read credential store")?
                .principal
        }
    };

    let service = filesystem::open(&args.uri, args.user.as_deref())?;

    let provider = Arc::new(provider);
    let mut manager = TokenManager::new(provider.clone(), renewer);

    let acquired = match &args.kind {
        Some(kind) => manager.acquire_with_kind(kind, service).await,
        None => manager.acquire(service).await,
    };
    acquired.with_context(|| format!("Failed to acquire token for {}", args.uri))?;

    if !provider.is_security_enabled() {
        output::warning("Security is disabled; no token is needed");
        return Ok(());
    }

    let token = manager.user_token()?.clone();
    let provenance = manager.provenance();

    output::field("Kind", token.kind().as_str());
    output::field("Service", token.service());
    output::field(
        "Provenance",
        match provenance {
            Some(Provenance::Forwarded) => "forwarded",
            Some(Provenance::Issued) => "issued",
            None => "none",
        },
    );
    output::field("Renewer", manager.renewer());

    if args.release {
        match manager.cancel().await {
            CancelOutcome::NothingHeld => output::warning("No token was held"),
            CancelOutcome::Released => output::success("Token released"),
            CancelOutcome::Revoked => output::success("Token cancelled"),
            CancelOutcome::RevokeFailed(e) => {
                bail!("Token released but could not be cancelled: {}", e)
            }
        }
        return Ok(());
    }

    if provenance == Some(Provenance::Issued) {
        provider
            .store()
            .add_token(token)
            .context("Failed to save issued token")?;
        output::success("Issued token saved");
    }

    Ok(())
}
