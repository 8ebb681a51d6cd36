// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! View command - the interactive dashboard and add form

use crate::config::Config;
use crate::gateway::{MemoryGateway, RestGateway};
use anyhow::Result;
use tracing::info;

/// Run the view command
pub async fn run(config: &Config, offline: bool) -> Result<()> {
    if offline {
        info!("Offline session: shots are kept in memory only");
        return crate::tui::run(&MemoryGateway::new()).await;
    }
    let gateway = RestGateway::from_config(&config.gateway)?;
    crate::tui::run(&gateway).await
}
