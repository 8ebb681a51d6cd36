// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! App shell - which screen is showing, and the session's shot list
//!
//! Two screens: the dashboard (initial) and the add form. The shell is the
//! only writer of the record list, and only appends after a successful
//! submit.

use crate::dashboard::{Dashboard, DashboardEvent};
use crate::error::ShotError;
use crate::form::{FormController, PreparedShot};
use crate::gateway::PersistenceGateway;
use crate::types::ShotRecord;
use tracing::{debug, info};

/// The active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Card list
    Dashboard,
    /// Add-shot form
    AddForm,
}

/// Identifies the form session a submission started from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

/// Result of handing a finished submission back to the shell
#[derive(Debug)]
pub enum Completion {
    /// Record appended, dashboard showing
    Saved,
    /// Submission failed; still on the form with the draft intact
    Failed(ShotError),
    /// The form it came from is gone; nothing changed
    Discarded,
}

/// Navigation state plus the authoritative in-memory record list
#[derive(Debug)]
pub struct AppShell {
    screen: Screen,
    records: Vec<ShotRecord>,
    form: FormController,
    session: u64,
    last_error: Option<String>,
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AppShell {
    /// Start on the dashboard with no records
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start on the dashboard with records already in the session
    #[must_use]
    pub fn with_records(records: Vec<ShotRecord>) -> Self {
        Self {
            screen: Screen::Dashboard,
            records,
            form: FormController::new(),
            session: 0,
            last_error: None,
        }
    }

    /// Current screen
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session records, oldest first
    #[must_use]
    pub fn records(&self) -> &[ShotRecord] {
        &self.records
    }

    /// Dashboard over the session records
    #[must_use]
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(&self.records)
    }

    /// The form, when it is the active screen
    #[must_use]
    pub fn form(&self) -> Option<&FormController> {
        (self.screen == Screen::AddForm).then_some(&self.form)
    }

    /// Mutable form, when it is the active screen
    pub fn form_mut(&mut self) -> Option<&mut FormController> {
        (self.screen == Screen::AddForm).then_some(&mut self.form)
    }

    /// Message from the last failed submit, cleared on navigation
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Route a dashboard event. Ignored unless the dashboard is showing.
    pub fn handle(&mut self, event: DashboardEvent) {
        match (self.screen, event) {
            (Screen::Dashboard, DashboardEvent::AddRequested) => {
                self.session += 1;
                self.form = FormController::new();
                self.last_error = None;
                self.screen = Screen::AddForm;
                debug!(session = self.session, "Opened add form");
            }
            (Screen::AddForm, _) => {
                debug!(?event, "Ignoring dashboard event while the form is open");
            }
        }
    }

    /// Leave the form without saving
    pub fn cancel(&mut self) {
        if self.screen == Screen::AddForm {
            self.form.cancel();
            self.last_error = None;
            self.screen = Screen::Dashboard;
            debug!(session = self.session, "Add form cancelled");
        }
    }

    /// Validate the form and snapshot it for sending. The ticket ties the
    /// eventual result to this form session.
    pub fn begin_submit(&mut self) -> Option<Result<(SubmitTicket, PreparedShot), ShotError>> {
        let form = self.form_mut()?;
        Some(match form.prepare() {
            Ok(prepared) => Ok((SubmitTicket(self.session), prepared)),
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        })
    }

    /// Apply the outcome of a submission started with [`Self::begin_submit`].
    ///
    /// Results for a form session that has since been cancelled or replaced
    /// are dropped without touching any state.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<ShotRecord, ShotError>,
    ) -> Completion {
        if self.screen != Screen::AddForm || ticket.0 != self.session {
            debug!(?ticket, current = self.session, "Discarding late submit result");
            return Completion::Discarded;
        }

        match outcome {
            Ok(record) => {
                info!(scene = %record.scene(), shot = %record.shot(), total = self.records.len() + 1, "Shot added");
                self.records.push(record);
                self.form.cancel();
                self.last_error = None;
                self.screen = Screen::Dashboard;
                Completion::Saved
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Completion::Failed(e)
            }
        }
    }

    /// Submit the open form and wait for the gateway
    pub async fn submit<G>(&mut self, gateway: &G) -> Completion
    where
        G: PersistenceGateway + ?Sized,
    {
        let (ticket, prepared) = match self.begin_submit() {
            Some(Ok(started)) => started,
            Some(Err(e)) => return Completion::Failed(e),
            None => return Completion::Discarded,
        };
        let outcome = prepared.persist(gateway).await;
        self.complete_submit(ticket, outcome)
    }
}
