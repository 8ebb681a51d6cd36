// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dashboard - shot records rendered as cards

use crate::types::ShotRecord;
use owo_colors::OwoColorize;

/// Heading shown above the cards
pub const TITLE: &str = "Film Shots Dashboard";
/// Shown instead of cards when there are none
pub const EMPTY_MESSAGE: &str = "No film shots yet.";
/// Follow-up line under [`EMPTY_MESSAGE`]
pub const EMPTY_HINT: &str = "Press 'a' (or run 'shotlog add') to get started!";

/// What the dashboard can ask the app shell to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Open the add-shot form
    AddRequested,
}

/// Display data for one shot card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// "Scene 5"
    pub scene_label: String,
    /// "Shot 2.1"
    pub shot_label: String,
    /// Shot size value
    pub shot_size: &'static str,
    /// Angle type value
    pub angle_type: &'static str,
    /// Subject, possibly empty
    pub subject: String,
    /// Description
    pub description: String,
}

impl Card {
    /// Card for one record
    #[must_use]
    pub fn from_record(record: &ShotRecord) -> Self {
        Self {
            scene_label: format!("Scene {}", record.scene()),
            shot_label: format!("Shot {}", record.shot()),
            shot_size: record.shot_size().as_str(),
            angle_type: record.angle_type().as_str(),
            subject: record.subject().to_string(),
            description: record.description().to_string(),
        }
    }

    /// Tag line: shot size, angle, and subject when present
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags = vec![self.shot_size, self.angle_type];
        if !self.subject.is_empty() {
            tags.push(&self.subject);
        }
        tags
    }
}

/// Read-only view over the session's records, oldest first
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    records: &'a [ShotRecord],
}

impl<'a> Dashboard<'a> {
    /// View over `records` in insertion order
    #[must_use]
    pub fn new(records: &'a [ShotRecord]) -> Self {
        Self { records }
    }

    /// Whether the empty state is showing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of cards
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// One card per record, in the same order
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.records.iter().map(Card::from_record).collect()
    }

    /// The user asked to add a shot
    #[must_use]
    pub fn request_add(&self) -> DashboardEvent {
        DashboardEvent::AddRequested
    }

    /// Plain-text rendering for the command line
    #[must_use]
    pub fn render_text(&self, color: bool) -> String {
        if self.is_empty() {
            return format!("{EMPTY_MESSAGE}\n{EMPTY_HINT}\n");
        }

        let mut out = String::new();
        for card in self.cards() {
            let tags = card.tags().join(" | ");
            let heading = if color {
                format!(
                    "{}  {}\n  {}\n",
                    card.scene_label.bold().magenta(),
                    card.shot_label.bold(),
                    tags.cyan()
                )
            } else {
                format!("{}  {}\n  {tags}\n", card.scene_label, card.shot_label)
            };
            out.push_str(&heading);
            out.push_str(&format!("  {}\n\n", card.description));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormController;
    use crate::gateway::MemoryGateway;

    async fn record(scene: &str, shot: &str, subject: &str) -> ShotRecord {
        let mut form = FormController::new();
        form.set_field("scene", scene).unwrap();
        form.set_field("shot", shot).unwrap();
        form.set_field("description", "Test shot").unwrap();
        form.set_field("subject", subject).unwrap();
        form.set_field("angle_type", "low angle").unwrap();
        form.submit(&MemoryGateway::new()).await.unwrap()
    }

    #[test]
    fn test_empty_state() {
        let dashboard = Dashboard::new(&[]);
        assert!(dashboard.is_empty());
        let text = dashboard.render_text(false);
        assert!(text.contains(EMPTY_MESSAGE));
        assert!(text.contains(EMPTY_HINT));
    }

    #[tokio::test]
    async fn test_cards_keep_insertion_order() {
        let records = vec![record("3", "1", "").await, record("1", "4.2", "Anna").await];
        let dashboard = Dashboard::new(&records);
        let cards = dashboard.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].scene_label, "Scene 3");
        assert_eq!(cards[0].shot_label, "Shot 1.0");
        assert_eq!(cards[0].tags(), vec!["close up", "low angle"]);
        assert_eq!(cards[1].shot_label, "Shot 4.2");
        assert_eq!(cards[1].tags(), vec!["close up", "low angle", "Anna"]);

        let text = dashboard.render_text(false);
        assert!(text.find("Scene 3").unwrap() < text.find("Scene 1").unwrap());
        assert!(!text.contains(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_plain_card_layout() {
        let records = vec![record("2", "7", "Anna").await];
        assert_eq!(
            Dashboard::new(&records).render_text(false),
            "Scene 2  Shot 7.0\n  close up | low angle | Anna\n  Test shot\n\n"
        );
        assert_eq!(
            Dashboard::new(&[]).render_text(false),
            format!("{EMPTY_MESSAGE}\n{EMPTY_HINT}\n")
        );
    }

    #[test]
    fn test_request_add_event() {
        assert_eq!(Dashboard::new(&[]).request_add(), DashboardEvent::AddRequested);
    }
}
