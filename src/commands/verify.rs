//! Verify command - check text against an anchored hash, no image needed.

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use stegchain::flow::{SubmitState, VerifyAction, VerifyFlow};

use super::{flow_failure, AppContext, CommandExecutor};

/// Verify that a text matches the hash anchored by a transaction.
#[derive(Args, Debug)]
pub struct VerifyCommand {
    /// Text to verify
    #[arg(short, long)]
    pub text: String,

    /// Transaction hash holding the anchored text hash
    #[arg(long = "tx", value_name = "TRANSACTION_HASH")]
    pub transaction_hash: String,
}

#[async_trait]
impl CommandExecutor for VerifyCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let (mut flow, effect) = VerifyFlow::new()
            .reduce(VerifyAction::SetText(self.text.clone()))
            .state
            .reduce(VerifyAction::SetTransactionHash(self.transaction_hash.clone()))
            .state
            .reduce(VerifyAction::Submit)
            .into_parts();

        if let Some(effect) = effect {
            let resolved = effect.perform(ctx.gateway.as_ref()).await;
            flow = flow.reduce(resolved).state;
        }

        match &flow.state {
            SubmitState::Succeeded(v) if v.verified => {
                println!("✓ Text integrity verified");
                Ok(())
            }
            SubmitState::Succeeded(v) => {
                println!("✗ Text integrity verification failed");
                bail!(v
                    .message
                    .clone()
                    .unwrap_or_else(|| "Text does not match the anchored hash".to_string()))
            }
            SubmitState::Failed(err) => Err(flow_failure(err)),
            SubmitState::Idle | SubmitState::Pending => Ok(()),
        }
    }
}
