//! Extract command - recover hidden text and check its integrity.

use std::path::PathBuf;

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use stegchain::flow::extract::TAMPER_WARNING;
use stegchain::flow::{ExtractAction, ExtractFlow, ExtractPanel};

use super::{flow_failure, read_image, AppContext, CommandExecutor};

/// Extract hidden text from a steganographic PNG.
///
/// The recovered text is hashed by the backend and compared against the
/// hash anchored by the given transaction. A mismatch is reported as a
/// failed verification and the command exits with an error.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Steganographic PNG image
    #[arg(short, long)]
    pub image: PathBuf,

    /// Transaction hash returned when the text was hidden
    #[arg(long = "tx", value_name = "TRANSACTION_HASH")]
    pub transaction_hash: String,
}

#[async_trait]
impl CommandExecutor for ExtractCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let select = match read_image(&self.image) {
            Ok(image) => ExtractAction::SelectFile(image),
            Err(reason) => ExtractAction::RejectFile(reason),
        };

        let (mut flow, effect) = ExtractFlow::new()
            .reduce(select)
            .state
            .reduce(ExtractAction::SetTransactionHash(self.transaction_hash.clone()))
            .state
            .reduce(ExtractAction::Submit)
            .into_parts();

        if let Some(effect) = effect {
            eprintln!("Extracting...");
            let resolved = effect.perform(ctx.gateway.as_ref()).await;
            flow = flow.reduce(resolved).state;
        }

        match flow.panel() {
            Some(ExtractPanel::Verified { text }) => {
                println!("✓ Text integrity verified");
                println!();
                println!("{}", text);
                Ok(())
            }
            Some(ExtractPanel::Tampered { text, detail }) => {
                println!("✗ Text integrity verification failed");
                println!("{}", TAMPER_WARNING);
                if let Some(text) = text {
                    println!();
                    println!("{}", text);
                }
                bail!(detail.unwrap_or("Text integrity verification failed").to_string())
            }
            Some(ExtractPanel::Error { .. }) => match flow.state.error() {
                Some(err) => Err(flow_failure(err)),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }
}
