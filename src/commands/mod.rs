// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod add;
pub mod completions;
pub mod config;
pub mod list;
pub mod taxonomy;
pub mod view;

/// Output switches shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Emit JSON instead of text
    pub json: bool,
    /// Colour text output
    pub color: bool,
}
