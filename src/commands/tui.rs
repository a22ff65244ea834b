//! TUI command - the interactive tabbed interface.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{AppContext, CommandExecutor};

/// Open the interactive terminal interface (default).
#[derive(Args, Debug, Default)]
pub struct TuiCommand {}

#[async_trait]
impl CommandExecutor for TuiCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        tracing::info!(api_url = %ctx.config.api_url, "starting TUI");
        stegchain::tui::run(Arc::clone(&ctx.gateway), ctx.config.api_url.clone()).await?;
        Ok(())
    }
}
