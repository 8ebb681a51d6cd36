// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Terminal user interface
//!
//! Dashboard keys: `a` add, `j`/`k` or arrows scroll, `q` quit.
//! Form keys: arrows/Tab move, Left/Right cycle a choice, typing edits a
//! text field, Enter saves, Esc cancels. Ctrl+C quits anywhere.

use crate::app::{AppShell, Completion, Screen};
use crate::dashboard::{EMPTY_HINT, EMPTY_MESSAGE, TITLE};
use crate::form::{DraftField, FieldUpdate};
use crate::gateway::PersistenceGateway;
use crate::types::StoryboardFile;
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use std::path::Path;
use tracing::info;

/// Colours used across every screen
struct Theme {
    accent: Color,
    muted: Color,
    error: Color,
    ok: Color,
}

const THEME: Theme = Theme {
    accent: Color::Rgb(139, 21, 56),
    muted: Color::Rgb(210, 180, 222),
    error: Color::LightRed,
    ok: Color::LightGreen,
};

/// One row of the form: a draft field or the storyboard path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Field(DraftField),
    Storyboard,
}

fn rows() -> Vec<Row> {
    let mut rows: Vec<Row> = DraftField::ALL.into_iter().map(Row::Field).collect();
    // Storyboard sits after the basic information, as on the paper form
    rows.insert(2, Row::Storyboard);
    rows
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Submit,
    Quit,
}

/// Status line contents
#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

struct TuiState {
    shell: AppShell,
    selected: usize,
    storyboard_path: String,
    scroll: u16,
    status: Option<Status>,
}

impl TuiState {
    fn new() -> Self {
        Self {
            shell: AppShell::new(),
            selected: 0,
            storyboard_path: String::new(),
            scroll: 0,
            status: None,
        }
    }

    fn selected_row(&self) -> Row {
        let rows = rows();
        rows[self.selected.min(rows.len() - 1)]
    }

    fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match self.shell.screen() {
            Screen::Dashboard => self.on_dashboard_key(key),
            Screen::AddForm => self.on_form_key(key),
        }
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('a') => {
                let event = self.shell.dashboard().request_add();
                self.shell.handle(event);
                self.selected = 0;
                self.storyboard_path.clear();
                self.status = None;
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        Action::None
    }

    fn on_form_key(&mut self, key: KeyEvent) -> Action {
        let row_count = rows().len();
        match key.code {
            KeyCode::Esc => {
                self.shell.cancel();
                self.storyboard_path.clear();
                self.status = None;
            }
            KeyCode::Enter => return Action::Submit,
            KeyCode::Down | KeyCode::Tab => self.selected = (self.selected + 1) % row_count,
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = (self.selected + row_count - 1) % row_count;
            }
            KeyCode::Left | KeyCode::Right => self.cycle(key.code == KeyCode::Right),
            KeyCode::Backspace => self.edit(|text| {
                text.pop();
            }),
            KeyCode::Char(c) => self.edit(|text| text.push(c)),
            _ => {}
        }
        Action::None
    }

    /// Step a categorical field through its vocabulary
    fn cycle(&mut self, forward: bool) {
        let Row::Field(field) = self.selected_row() else {
            return;
        };
        let Some(form) = self.shell.form_mut() else {
            return;
        };
        let draft = form.draft();
        macro_rules! turn {
            ($value:expr, $variant:ident) => {
                Some(FieldUpdate::$variant(if forward { $value.next() } else { $value.previous() }))
            };
        }
        let update = match field {
            DraftField::ShotSize => turn!(draft.shot_size, ShotSize),
            DraftField::AngleType => turn!(draft.angle_type, AngleType),
            DraftField::Framing => turn!(draft.framing, Framing),
            DraftField::Focus => turn!(draft.focus, Focus),
            DraftField::DutchAngle => turn!(draft.dutch_angle, DutchAngle),
            DraftField::Movement => turn!(draft.movement, Movement),
            DraftField::Equipment => turn!(draft.equipment, Equipment),
            _ => None,
        };
        if let Some(update) = update {
            form.update(update);
        }
    }

    /// Edit the text behind the selected row; categorical rows ignore typing
    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        let row = self.selected_row();
        if row == Row::Storyboard {
            change(&mut self.storyboard_path);
            return;
        }
        let Row::Field(field) = row else { return };
        if field.taxonomy().is_some() {
            return;
        }
        let Some(form) = self.shell.form_mut() else {
            return;
        };
        let mut text = form.draft().value(field).to_string();
        change(&mut text);
        if let Ok(update) = FieldUpdate::parse(field, &text) {
            form.update(update);
        }
    }

    /// Attach (or detach) the storyboard named in the path row
    fn stage_storyboard(&mut self) -> Result<(), String> {
        let path = self.storyboard_path.trim().to_string();
        let Some(form) = self.shell.form_mut() else {
            return Ok(());
        };
        if path.is_empty() {
            form.clear_storyboard_file();
            return Ok(());
        }
        let file = StoryboardFile::from_path(Path::new(&path))
            .map_err(|e| format!("Cannot read storyboard {path}: {e}"))?;
        form.set_storyboard_file(file);
        Ok(())
    }

    async fn submit<G>(&mut self, gateway: &G)
    where
        G: PersistenceGateway + ?Sized,
    {
        if let Err(message) = self.stage_storyboard() {
            self.status = Some(Status::Error(message));
            return;
        }
        match self.shell.submit(gateway).await {
            Completion::Saved => {
                self.storyboard_path.clear();
                self.status = Some(Status::Info("Shot saved".to_string()));
            }
            Completion::Failed(e) => self.status = Some(Status::Error(e.to_string())),
            Completion::Discarded => {}
        }
    }
}

/// Run the interactive dashboard until the user quits
pub async fn run<G>(gateway: &G) -> Result<()>
where
    G: PersistenceGateway + ?Sized,
{
    info!("Launching TUI");
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, gateway).await;
    ratatui::restore();
    result
}

async fn event_loop<G>(terminal: &mut DefaultTerminal, gateway: &G) -> Result<()>
where
    G: PersistenceGateway + ?Sized,
{
    let mut state = TuiState::new();
    loop {
        terminal.draw(|frame| draw(frame, &state))?;
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match state.on_key(key) {
            Action::Quit => break,
            Action::Submit => {
                state.status = Some(Status::Info("Saving...".to_string()));
                terminal.draw(|frame| draw(frame, &state))?;
                state.submit(gateway).await;
            }
            Action::None => {}
        }
    }
    info!(shots = state.shell.records().len(), "Leaving TUI");
    Ok(())
}

fn draw(frame: &mut Frame, state: &TuiState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = match state.shell.screen() {
        Screen::Dashboard => format!(" {TITLE} "),
        Screen::AddForm => " Add New Film Shot ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::new().fg(THEME.accent).add_modifier(Modifier::BOLD),
        )))
        .block(Block::bordered().border_style(Style::new().fg(THEME.muted))),
        header,
    );

    match state.shell.screen() {
        Screen::Dashboard => draw_dashboard(frame, body, state),
        Screen::AddForm => draw_form(frame, body, state),
    }

    let footer_line = match &state.status {
        Some(Status::Error(message)) => Line::styled(message.clone(), Style::new().fg(THEME.error)),
        Some(Status::Info(message)) => Line::styled(message.clone(), Style::new().fg(THEME.ok)),
        None => match state.shell.screen() {
            Screen::Dashboard => Line::styled("a add  j/k scroll  q quit", Style::new().fg(THEME.muted)),
            Screen::AddForm => Line::styled(
                "Tab/arrows move  Left/Right choose  Enter save  Esc cancel",
                Style::new().fg(THEME.muted),
            ),
        },
    };
    frame.render_widget(Paragraph::new(footer_line), footer);
}

fn draw_dashboard(frame: &mut Frame, area: Rect, state: &TuiState) {
    let dashboard = state.shell.dashboard();
    if dashboard.is_empty() {
        let lines = vec![
            Line::styled(EMPTY_MESSAGE, Style::new().fg(THEME.accent)),
            Line::styled(EMPTY_HINT, Style::new().fg(THEME.muted)),
        ];
        frame.render_widget(
            Paragraph::new(lines).centered().block(Block::bordered()),
            area,
        );
        return;
    }

    let mut lines = Vec::new();
    for card in dashboard.cards() {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", card.scene_label),
                Style::new().bg(THEME.accent).fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(card.shot_label.clone(), Style::new().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::styled(
            format!("  {}", card.tags().join(" | ")),
            Style::new().fg(THEME.muted),
        ));
        lines.push(Line::raw(format!("  {}", card.description)));
        lines.push(Line::raw(""));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.scroll, 0))
            .block(Block::bordered().title(format!(" {} shots ", dashboard.len()))),
        area,
    );
}

fn draw_form(frame: &mut Frame, area: Rect, state: &TuiState) {
    let Some(form) = state.shell.form() else {
        return;
    };
    let draft = form.draft();
    let selected = state.selected_row();

    let lines: Vec<Line> = rows()
        .into_iter()
        .map(|row| {
            let (label, value, choice) = match row {
                Row::Field(field) => (field.label(), draft.value(field).to_string(), field.taxonomy().is_some()),
                Row::Storyboard => ("Storyboard", state.storyboard_path.clone(), false),
            };
            let marker = if row == selected { "> " } else { "  " };
            let value = if choice { format!("< {value} >") } else { value };
            let style = if row == selected {
                Style::new().fg(THEME.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::new()
            };
            Line::from(vec![
                Span::styled(format!("{marker}{label:<14}"), style),
                Span::raw(value),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Shot ")),
        area,
    );
}
