//! Records command - list operations or look one up.

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use stegchain::flow::records::EMPTY_RECORDS;
use stegchain::flow::{RecordsAction, RecordsBrowser};
use stegchain::record::DEFAULT_HASH_DISPLAY;
use stegchain::{shorten_hash, ApiError};

use super::{print_record, AppContext, CommandExecutor};

/// List steganography records, or show one by ID or transaction hash.
#[derive(Args, Debug)]
pub struct RecordsCommand {
    /// Show the record with this ID
    #[arg(long, conflicts_with = "transaction_hash")]
    pub id: Option<String>,

    /// Show the record anchored by this transaction hash
    #[arg(long = "tx", value_name = "TRANSACTION_HASH")]
    pub transaction_hash: Option<String>,
}

#[async_trait]
impl CommandExecutor for RecordsCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        if let Some(id) = &self.id {
            return self.show_by_id(ctx, id).await;
        }

        let action = match &self.transaction_hash {
            Some(hash) => {
                let browser = RecordsBrowser::new()
                    .reduce(RecordsAction::SetSearchInput(hash.clone()))
                    .state;
                return self.search(ctx, browser).await;
            }
            None => RecordsAction::Load,
        };

        let (mut browser, effect) = RecordsBrowser::new().reduce(action).into_parts();
        if let Some(effect) = effect {
            let resolved = effect.perform(ctx.gateway.as_ref()).await;
            browser = browser.reduce(resolved).state;
        }

        if let Some(error) = browser.error() {
            bail!(error.to_string());
        }
        if browser.is_empty() {
            println!("{}", EMPTY_RECORDS);
            return Ok(());
        }

        println!(
            "{:<24} {:<24} {:<25} {:<25} {:<10} {}",
            "FILE", "ORIGINAL", "TEXT HASH", "TRANSACTION", "STATUS", "CREATED"
        );
        for r in browser.records() {
            println!(
                "{:<24} {:<24} {:<25} {:<25} {:<10} {}",
                r.file_name,
                r.original_file_name,
                shorten_hash(&r.text_hash, DEFAULT_HASH_DISPLAY),
                shorten_hash(&r.transaction_hash, DEFAULT_HASH_DISPLAY),
                r.status,
                r.format_created_at()
            );
        }
        println!();
        println!("{} record(s)", browser.records().len());
        Ok(())
    }
}

impl RecordsCommand {
    async fn search(&self, ctx: &AppContext, browser: RecordsBrowser) -> Result<()> {
        let (mut browser, effect) = browser.reduce(RecordsAction::Search).into_parts();
        if let Some(effect) = effect {
            let resolved = effect.perform(ctx.gateway.as_ref()).await;
            browser = browser.reduce(resolved).state;
        }

        match browser.search_result() {
            Some(record) => {
                print_record(record);
                Ok(())
            }
            None => bail!(browser
                .error()
                .unwrap_or("No record found for this transaction hash")
                .to_string()),
        }
    }

    async fn show_by_id(&self, ctx: &AppContext, id: &str) -> Result<()> {
        match ctx.gateway.get_record_by_id(id).await {
            Ok(record) => {
                print_record(&record);
                Ok(())
            }
            Err(err @ ApiError::NotFound(_)) => bail!(err.user_message("Record not found")),
            Err(err) => {
                tracing::warn!(error = %err, "record lookup failed");
                bail!(err.user_message("Failed to fetch record"))
            }
        }
    }
}
