//! Lobby UI rendering
//!
//! Layout:
//! ┌─────────────────────────────────────────────────┐
//! │  DeBattle                          ROOM ABC123  │
//! ├─────────────────────────────────────────────────┤
//! │  Should AI be heavily regulated by governments? │
//! │                                                 │
//! │  ╔═══════════════════════════════════════════╗  │
//! │  ║  PLAYERS                                  ║  │
//! │  ║  ✓ Ada (PRO)  "Logic will prevail!"       ║  │
//! │  ║  … waiting for opponent                   ║  │
//! │  ╚═══════════════════════════════════════════╝  │
//! │                                                 │
//! │                 Starting in 7                   │
//! │          Sharpen your arguments...              │
//! │  Tip: Strong opening statements set the tone    │
//! │                                                 │
//! │  [Space] Ready  [ESC] Leave                     │
//! └─────────────────────────────────────────────────┘

use crate::app::Session;
use crate::game::Side;
use crate::lobby::ReadinessTracker;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::ui::render_footer;

/// Render the lobby screen
pub fn render_lobby(
    frame: &mut Frame,
    session: &Session,
    tracker: &ReadinessTracker,
    topic: &str,
    status: Option<&str>,
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Topic
            Constraint::Length(4), // Players
            Constraint::Min(4),    // Countdown / captions
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_lobby_header(frame, layout[0], session.room_id());

    frame.render_widget(
        Paragraph::new(topic)
            .style(Style::default().fg(Color::White).bold())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        layout[1],
    );

    render_players(frame, layout[2], session.player_name(), tracker);
    render_waiting(frame, layout[3], tracker);

    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(status)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center),
            layout[4],
        );
    }

    let keys = if tracker.is_counting_down() {
        "[ESC] Leave"
    } else if tracker.is_local_ready() {
        "[Space] Not ready  [ESC] Leave"
    } else {
        "[Space] Ready  [ESC] Leave"
    };
    render_footer(frame, layout[5], keys);
}

fn render_lobby_header(frame: &mut Frame, area: Rect, room_id: &str) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(16)])
        .split(inner);

    frame.render_widget(
        Paragraph::new("DeBattle").style(Style::default().fg(Color::Yellow).bold()),
        header_layout[0],
    );
    frame.render_widget(
        Paragraph::new(format!("ROOM {room_id}"))
            .style(Style::default().fg(Color::Cyan).bold())
            .alignment(Alignment::Right),
        header_layout[1],
    );
}

fn render_players(frame: &mut Frame, area: Rect, local: &str, tracker: &ReadinessTracker) {
    let local_item = player_item(
        local,
        Side::Pro,
        tracker.local_taunt().unwrap_or("Preparing arguments..."),
        tracker.is_local_ready(),
    );
    let remote_item = match tracker.opponent_name() {
        Some(name) => player_item(
            name,
            Side::Con,
            tracker.remote_taunt().unwrap_or("Loading..."),
            tracker.is_remote_ready(),
        ),
        None => ListItem::new("  … waiting for opponent").style(Style::default().fg(Color::DarkGray)),
    };

    let list = List::new(vec![local_item, remote_item])
        .block(Block::default().borders(Borders::ALL).title("Players"));
    frame.render_widget(list, area);
}

fn player_item(name: &str, side: Side, bubble: &str, ready: bool) -> ListItem<'static> {
    let (mark, style) = if ready {
        ("✓", Style::default().fg(Color::Green))
    } else {
        (" ", Style::default().fg(Color::White))
    };
    ListItem::new(Line::from(vec![
        Span::styled(format!("  {mark} {name} ({})  ", side.label()), style),
        Span::styled(format!("\"{bubble}\""), Style::default().fg(Color::Yellow).italic()),
    ]))
}

fn render_waiting(frame: &mut Frame, area: Rect, tracker: &ReadinessTracker) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1), // Countdown
            Constraint::Length(1), // Caption
            Constraint::Length(1), // Tip
            Constraint::Min(0),
        ])
        .split(area);

    let (countdown, color) = match tracker.countdown_remaining() {
        Some(n) if n <= 3 => (format!("Starting in {n}"), Color::Red),
        Some(n) => (format!("Starting in {n}"), Color::Yellow),
        None if tracker.is_local_ready() => ("Waiting for opponent...".to_string(), Color::DarkGray),
        None => ("Press Space when ready".to_string(), Color::DarkGray),
    };
    frame.render_widget(
        Paragraph::new(countdown)
            .style(Style::default().fg(color).bold())
            .alignment(Alignment::Center),
        layout[1],
    );

    frame.render_widget(
        Paragraph::new(tracker.caption())
            .style(Style::default().fg(Color::Magenta))
            .alignment(Alignment::Center),
        layout[2],
    );
    frame.render_widget(
        Paragraph::new(tracker.tip())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        layout[3],
    );
}

#[cfg(test)]
mod tests {
    use crate::app::{AppCoordinator, KeyInput};
    use crate::config::Config;
    use crate::lobby::TAUNTS;
    use crate::network::Collaborators;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn draw(coordinator: &AppCoordinator) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| super::super::render(frame, coordinator))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn lobby() -> AppCoordinator {
        let config = Config::default();
        let collaborators = Collaborators::simulated(&config.timings);
        let mut app = AppCoordinator::new(config, collaborators);
        app.join_room("abc123", "Ada", Duration::ZERO).unwrap();
        app
    }

    #[test]
    fn test_lobby_shows_room_and_waiting() {
        let screen = draw(&lobby());
        assert!(screen.contains("ROOM ABC123"));
        assert!(screen.contains("waiting for opponent"));
        assert!(screen.contains("Sharpen your arguments..."));
        assert!(screen.contains("\"Preparing arguments...\""));
    }

    #[test]
    fn test_lobby_shows_taunts_when_ready() {
        let mut app = lobby();
        app.handle_key(KeyInput::Char(' '), Duration::ZERO);
        app.advance(Duration::from_secs(3));

        let screen = draw(&app);
        assert!(!screen.contains("Preparing arguments..."));
        assert!(!screen.contains("Loading..."));
        let shown = TAUNTS
            .iter()
            .filter(|t| screen.contains(&format!("\"{t}\"")))
            .count();
        // both players may draw the same line
        assert!((1..=2).contains(&shown));
    }

    #[test]
    fn test_lobby_shows_countdown() {
        let mut app = lobby();
        app.advance(Duration::from_secs(3));
        app.handle_key(KeyInput::Char(' '), Duration::from_secs(3));
        app.advance(Duration::from_secs(5));

        let screen = draw(&app);
        assert!(screen.contains("Opponent (CON)"));
        assert!(screen.contains("Starting in 8"));
    }
}
