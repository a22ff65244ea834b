//! Hide command - hide text in a PNG and anchor its hash.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use stegchain::flow::{HideAction, HideFlow, SubmitState};

use super::{flow_failure, print_record, read_image, AppContext, CommandExecutor};

/// Hide text inside a PNG image.
///
/// The backend writes the text into the image, stores the SHA-256 of the
/// text on the blockchain and returns the resulting record. Keep the
/// transaction hash: extraction needs it.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// PNG image to hide the text in
    #[arg(short, long)]
    pub image: PathBuf,

    /// Text to hide
    #[arg(short, long)]
    pub text: String,
}

#[async_trait]
impl CommandExecutor for HideCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let select = match read_image(&self.image) {
            Ok(image) => HideAction::SelectFile(image),
            Err(reason) => HideAction::RejectFile(reason),
        };

        let mut flow = HideFlow::new()
            .reduce(select)
            .state
            .reduce(HideAction::SetText(self.text.clone()))
            .state;

        let (state, effect) = flow.reduce(HideAction::Submit).into_parts();
        flow = state;
        if let Some(effect) = effect {
            eprintln!("Processing...");
            let resolved = effect.perform(ctx.gateway.as_ref()).await;
            flow = flow.reduce(resolved).state;
        }

        match &flow.state {
            SubmitState::Succeeded(record) => {
                println!("Text hidden successfully!");
                println!();
                print_record(record);
                println!();
                println!("The steganographic image is stored by the backend as {}.", record.file_name);
                println!("It is not downloaded; keep the transaction hash to extract the text later.");
                Ok(())
            }
            SubmitState::Failed(err) => Err(flow_failure(err)),
            SubmitState::Idle | SubmitState::Pending => Ok(()),
        }
    }
}
