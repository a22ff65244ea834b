//! Health command - check that the backend is reachable.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use clap::Args;

use super::{AppContext, CommandExecutor};

/// Check the backend health endpoint.
#[derive(Args, Debug)]
pub struct HealthCommand {}

#[async_trait]
impl CommandExecutor for HealthCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        println!("Backend: {}", ctx.config.api_url);

        let status = match ctx.gateway.health_check().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(error = %err, "health check failed");
                bail!("Backend unreachable: {}", err);
            }
        };

        if let Some(message) = &status.message {
            println!("Message: {}", message);
        }
        if let Some(time) = status
            .timestamp
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        {
            println!("Server time: {}", time.format("%Y-%m-%d %H:%M:%S"));
        }

        if status.healthy {
            println!("Status: healthy");
            Ok(())
        } else {
            bail!("Backend reported unhealthy")
        }
    }
}
