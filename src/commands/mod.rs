//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Commands drive the same flows as the terminal UI, one submit per run.

mod extract;
mod hash;
mod health;
mod hide;
mod records;
mod tui;
mod verify;

pub use extract::ExtractCommand;
pub use hash::HashCommand;
pub use health::HealthCommand;
pub use hide::HideCommand;
pub use records::RecordsCommand;
pub use tui::TuiCommand;
pub use verify::VerifyCommand;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use stegchain::flow::FlowError;
use stegchain::upload::ImageFile;
use stegchain::{ClientConfig, StegoGateway, SteganographyRecord};

/// Shared state handed to every command.
pub struct AppContext {
    pub config: ClientConfig,
    pub gateway: Arc<dyn StegoGateway>,
}

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
#[async_trait]
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    async fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Reads an image for upload. A read failure becomes the message the flow
/// reports, so it surfaces like any other validation error.
pub(crate) fn read_image(path: &Path) -> Result<ImageFile, String> {
    ImageFile::from_path(path).map_err(|e| format!("Could not read {}: {}", path.display(), e))
}

/// Turns a failed flow into the process error.
pub(crate) fn flow_failure(err: &FlowError) -> anyhow::Error {
    anyhow::anyhow!("{}", err.message())
}

/// Prints every field of a record, hashes in full.
pub(crate) fn print_record(record: &SteganographyRecord) {
    println!("  ID:                 {}", record.id);
    println!("  File:               {}", record.file_name);
    println!("  Original file:      {}", record.original_file_name);
    println!("  Text hash:          {}", record.text_hash);
    println!("  Transaction hash:   {}", record.transaction_hash);
    println!("  Blockchain address: {}", record.blockchain_address);
    println!("  Status:             {}", record.status);
    println!("  Created:            {}", record.format_created_at());
}
