// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! List command - read every stored shot back from the table

use super::Output;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::gateway::{PersistenceGateway, RestGateway};
use crate::types::ShotRecord;
use anyhow::{Context, Result};

/// Run the list command
pub async fn run(config: &Config, out: Output) -> Result<()> {
    let gateway = RestGateway::from_config(&config.gateway)?;
    let rows = gateway.list().await.context("Failed to fetch shots")?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let records: Vec<ShotRecord> = rows.into_iter().map(|row| row.record).collect();
    print!("{}", Dashboard::new(&records).render_text(out.color));
    Ok(())
}
