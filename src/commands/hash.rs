//! Hash command - ask the backend for the digest of a text.

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use super::{AppContext, CommandExecutor};

/// Print the hash the backend would anchor for a text.
#[derive(Args, Debug)]
pub struct HashCommand {
    /// Text to hash
    #[arg(short, long)]
    pub text: String,
}

#[async_trait]
impl CommandExecutor for HashCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        if self.text.is_empty() {
            bail!("Text is required");
        }
        match ctx.gateway.generate_hash(&self.text).await {
            Ok(hash) => {
                println!("{}", hash);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "hash request failed");
                bail!(err.user_message("Failed to generate hash"))
            }
        }
    }
}
