//! UI rendering using ratatui
//!
//! One render function per screen:
//! - Welcome: battle name and room code form
//! - Lobby: see [`super::lobby`]
//! - Debate: players, phase clock, transcript and the draft box

use crate::app::{AppCoordinator, DebateRoom, Field, Screen, WelcomeForm, MAX_DRAFT_LEN};
use crate::game::{Outcome, Phase, Player, Turn, MAX_HEALTH};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};

use std::time::Duration;

use super::lobby::render_lobby;

/// Render the screen for the current session mode
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    let status = coordinator.status_message.as_deref();
    match coordinator.screen() {
        Screen::Welcome(form) => render_welcome(frame, form, status),
        Screen::Lobby(tracker) => render_lobby(
            frame,
            coordinator.session(),
            tracker,
            &coordinator.config().topic,
            status,
        ),
        Screen::Debate(room) => render_debate(frame, room, status),
    }
}

fn render_welcome(frame: &mut Frame, form: &WelcomeForm, status: Option<&str>) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(3), // Name
            Constraint::Length(3), // Room code
            Constraint::Length(2), // Action hint
            Constraint::Min(0),
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 ___      ___       _   _   _
|   \ ___| _ ) __ _| |_| |_| |___
| |) / -_) _ \/ _` |  _|  _| / -_)
|___/\___|___/\__,_|\__|\__|_\___|
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    frame.render_widget(
        input_field("Battle name", &form.name, form.focus == Field::Name),
        layout[1],
    );
    frame.render_widget(
        input_field(
            "Room code (empty to create)",
            &form.room_code,
            form.focus == Field::RoomCode,
        ),
        layout[2],
    );

    let (hint, hint_style) = if form.can_join() {
        ("Enter to join room", Style::default().fg(Color::Green).bold())
    } else if form.can_create() {
        ("Enter to create a room", Style::default().fg(Color::Green).bold())
    } else {
        ("Enter a battle name to begin", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(
        Paragraph::new(hint).style(hint_style).alignment(Alignment::Center),
        layout[3],
    );

    render_status(frame, layout[5], status);
    render_footer(frame, layout[6], "Tab Switch field  Enter Go  Esc Quit");
}

fn input_field<'a>(title: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let (text, border) = if focused {
        (format!("{value}_"), Style::default().fg(Color::Cyan))
    } else {
        (value.to_string(), Style::default().fg(Color::DarkGray))
    };
    Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    )
}

fn render_debate(frame: &mut Frame, room: &DebateRoom, status: Option<&str>) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header: topic, phase, timer
            Constraint::Length(3), // Health bars
            Constraint::Length(1), // Phase description
            Constraint::Min(4),    // Transcript
            Constraint::Length(3), // Draft
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_debate_header(frame, layout[0], room);
    render_players(frame, layout[1], room.players());

    let banner = match room.outcome() {
        Some(outcome) => outcome_banner(outcome, room.players()),
        None => room.phase().description().to_string(),
    };
    frame.render_widget(
        Paragraph::new(banner)
            .style(Style::default().fg(phase_color(room.phase())).bold())
            .alignment(Alignment::Center),
        layout[2],
    );

    render_transcript(frame, layout[3], room);
    render_draft(frame, layout[4], room);
    render_status(frame, layout[5], status);

    let mute = if room.is_muted() { "Unmute" } else { "Mute" };
    render_footer(
        frame,
        layout[6],
        &format!("Enter Send  Ctrl+T {mute}  Esc Leave"),
    );
}

fn render_debate_header(frame: &mut Frame, area: Rect, room: &DebateRoom) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Phase badge
            Constraint::Min(20),    // Topic
            Constraint::Length(8),  // Timer
        ])
        .split(inner);

    let phase = room.phase();
    frame.render_widget(
        Paragraph::new(phase.label())
            .style(Style::default().fg(phase_color(phase)).bold())
            .alignment(Alignment::Left),
        header_layout[0],
    );

    frame.render_widget(
        Paragraph::new(room.topic())
            .style(Style::default().fg(Color::White).bold())
            .alignment(Alignment::Center),
        header_layout[1],
    );

    let remaining = room.remaining();
    let timer_color = if phase.is_terminal() {
        Color::DarkGray
    } else if remaining <= 10 {
        Color::Red
    } else {
        Color::Green
    };
    frame.render_widget(
        Paragraph::new(format_timer(remaining))
            .style(Style::default().fg(timer_color).bold())
            .alignment(Alignment::Right),
        header_layout[2],
    );
}

fn render_players(frame: &mut Frame, area: Rect, players: &[Player; 2]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (player, column) in players.iter().zip(columns.iter()) {
        let color = match player.side {
            crate::game::Side::Pro => Color::Cyan,
            crate::game::Side::Con => Color::Magenta,
        };
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} ({})", player.name, player.side.label())),
            )
            .gauge_style(Style::default().fg(color))
            .ratio(f64::from(player.health) / f64::from(MAX_HEALTH))
            .label(format!("{} HP", player.health));
        frame.render_widget(gauge, *column);
    }
}

fn render_transcript(frame: &mut Frame, area: Rect, room: &DebateRoom) {
    let local = room.players()[0].name.as_str();
    let items: Vec<ListItem> = room
        .transcript()
        .messages()
        .iter()
        .map(|m| {
            let style = if m.author == local {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Magenta)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} [{}] ", format_stamp(m.created_at), m.phase.label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{}: ", m.author), style.bold()),
                Span::raw(m.content.as_str()),
            ]))
        })
        .collect();

    let title = format!("Arguments ({})", items.len());

    // Keep the newest messages in view
    let visible = usize::from(area.height.saturating_sub(2));
    let skip = items.len().saturating_sub(visible);
    let list = List::new(items.into_iter().skip(skip))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_draft(frame: &mut Frame, area: Rect, room: &DebateRoom) {
    let phase = room.phase();
    let (text, style, title) = if !phase.accepts_messages() {
        (
            "Arguments are closed".to_string(),
            Style::default().fg(Color::DarkGray),
            "Closed".to_string(),
        )
    } else if room.turn() == Turn::Theirs {
        (
            "Opponent is responding...".to_string(),
            Style::default().fg(Color::Yellow),
            "Their turn".to_string(),
        )
    } else {
        (
            format!("> {}_", room.draft()),
            Style::default().fg(Color::White),
            format!(
                "Your turn  {}/{}",
                room.draft().chars().count(),
                MAX_DRAFT_LEN
            ),
        )
    };

    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, status: Option<&str>) {
    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(status)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center),
            area,
        );
    }
}

pub(super) fn render_footer(frame: &mut Frame, area: Rect, keys: &str) {
    frame.render_widget(
        Paragraph::new(keys)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn outcome_banner(outcome: Outcome, players: &[Player; 2]) -> String {
    let name = outcome.winner_name(players).unwrap_or("Nobody");
    format!("Debate Complete! {name} wins")
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Opening | Phase::Final => Color::Green,
        Phase::Rebuttal => Color::Yellow,
        Phase::Crossfire => Color::Red,
        Phase::Judging => Color::Magenta,
        Phase::Complete => Color::Cyan,
    }
}

/// Format the timer display
pub(super) fn format_timer(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

/// Clock reading for a transcript line, as mm:ss
fn format_stamp(at: Duration) -> String {
    let total = at.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}
