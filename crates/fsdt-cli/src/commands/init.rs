//! Init command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use fsdt_file::Authentication;

use crate::output;
use crate::store;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum AuthenticationArg {
    /// Security disabled; no delegation tokens
    Simple,
    /// Security enabled; delegation tokens required
    Kerberos,
}

impl From<AuthenticationArg> for Authentication {
    fn from(arg: AuthenticationArg) -> Self {
        match arg {
            AuthenticationArg::Simple => Authentication::Simple,
            AuthenticationArg::Kerberos => Authentication::Kerberos,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Principal tokens are acquired for
    #[arg(long)]
    pub principal: String,

    /// Authentication mode of the cluster
    #[arg(long, value_enum, default_value = "kerberos")]
    pub authentication: AuthenticationArg,
}

pub async fn run(args: InitArgs, store: Option<PathBuf>) -> Result<()> {
    let store = store::open_store(store)?;

    let contents = store
        .init(&args.principal, args.authentication.into())
        .context("Failed to initialise credential store")?;

    output::success("Credential store ready");
    output::field("Store", &store.path().display().to_string());
    output::field("Principal", &contents.principal);
    output::field(
        "Security",
        if contents.authentication.is_secure() {
            "enabled"
        } else {
            "disabled"
        },
    );

    Ok(())
}
