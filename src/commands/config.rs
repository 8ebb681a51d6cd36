// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use crate::config::Config;
use anyhow::{Context, Result};

/// Print the effective configuration, or one dotted key of it
pub fn run(config: &Config, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => {
            let value = config
                .get(key)
                .ok_or_else(|| anyhow::anyhow!("Unknown or unset config key: {}", key))?;
            println!("{value}");
        }
        None => {
            let text = toml::to_string_pretty(&config.redacted())
                .context("Failed to render configuration")?;
            print!("{text}");
        }
    }
    Ok(())
}
