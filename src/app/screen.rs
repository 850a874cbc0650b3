//! Session controller
//!
//! Routes between the three screens:
//! - Welcome form
//! - Lobby (readiness and countdown)
//! - Debate
//!
//! The coordinator owns the only [`Scheduler`] and the collaborators. Each
//! screen records the timers it scheduled and cancels them, together with its
//! collaborators, when the coordinator leaves it.

use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::Rejected;
use crate::game::DEFAULT_OPPONENT_NAME;
use crate::lobby::{ReadinessState, ReadinessTracker};
use crate::network::Collaborators;
use crate::timer::{Fired, Scheduler, TimerKind};

use super::input::KeyInput;
use super::session::{Mode, Session};
use super::state::DebateRoom;
use super::welcome::WelcomeForm;

/// The screen currently mounted; always matches the session mode
#[derive(Debug)]
pub enum Screen {
    Welcome(WelcomeForm),
    Lobby(ReadinessTracker),
    Debate(DebateRoom),
}

/// Serializable view of the whole session
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub session: &'a Session,
    pub readiness: Option<&'a ReadinessState>,
    pub debate: Option<&'a DebateRoom>,
}

/// Main application coordinator
#[derive(Debug)]
pub struct AppCoordinator {
    session: Session,
    screen: Screen,
    scheduler: Scheduler<TimerKind>,
    config: Config,
    collaborators: Collaborators,
    /// Reason the last action was refused, shown in the status line
    pub status_message: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppCoordinator {
    /// Start on the welcome screen
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        Self::with_form(config, collaborators, WelcomeForm::new())
    }

    /// Start on the welcome screen with a pre-filled form
    pub fn with_form(config: Config, collaborators: Collaborators, form: WelcomeForm) -> Self {
        Self {
            session: Session::new(),
            screen: Screen::Welcome(form),
            scheduler: Scheduler::new(),
            config,
            collaborators,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Timers currently scheduled by the active screen
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Leave the welcome screen for the lobby of `room_id`
    pub fn join_room(
        &mut self,
        room_id: &str,
        player_name: &str,
        now: Duration,
    ) -> Result<(), Rejected> {
        self.session.join_room(room_id, player_name)?;
        let tracker = ReadinessTracker::enter(
            self.session.room_id(),
            self.session.player_name(),
            now,
            &self.config.timings,
            &mut self.scheduler,
            &mut *self.collaborators.matchmaker,
        );
        self.screen = Screen::Lobby(tracker);
        self.status_message = None;
        Ok(())
    }

    /// Leave the lobby for the debate
    pub fn start_debate(&mut self, now: Duration) -> Result<(), Rejected> {
        self.session.start_debate()?;

        let opponent = match &mut self.screen {
            Screen::Lobby(tracker) => {
                let name = tracker
                    .opponent_name()
                    .unwrap_or(DEFAULT_OPPONENT_NAME)
                    .to_string();
                tracker.teardown(&mut self.scheduler, &mut *self.collaborators.matchmaker);
                name
            }
            Screen::Welcome(_) | Screen::Debate(_) => DEFAULT_OPPONENT_NAME.to_string(),
        };

        self.screen = Screen::Debate(DebateRoom::start(
            &self.config.topic,
            self.session.player_name(),
            &opponent,
            now,
            &self.config.timings,
            &mut self.scheduler,
        ));
        self.status_message = None;
        Ok(())
    }

    /// Tear down the current screen and return to an empty welcome form
    pub fn leave_to_welcome(&mut self) {
        match &mut self.screen {
            Screen::Welcome(_) => {}
            Screen::Lobby(tracker) => {
                tracker.teardown(&mut self.scheduler, &mut *self.collaborators.matchmaker);
            }
            Screen::Debate(room) => {
                room.teardown(
                    &mut self.scheduler,
                    &mut *self.collaborators.peer,
                    &mut *self.collaborators.judge,
                );
            }
        }
        debug_assert!(self.scheduler.is_empty(), "screen left timers behind");
        self.session.leave_to_welcome();
        self.screen = Screen::Welcome(WelcomeForm::new());
        self.status_message = None;
    }

    /// Flip local readiness in the lobby
    pub fn toggle_ready(&mut self, now: Duration) -> Result<(), Rejected> {
        match &mut self.screen {
            Screen::Lobby(tracker) => tracker.toggle_local_ready(now, &mut self.scheduler),
            Screen::Welcome(_) | Screen::Debate(_) => Err(self.wrong_mode("toggle ready")),
        }
    }

    /// Send an argument in the debate
    pub fn send_message(&mut self, content: &str, now: Duration) -> Result<(), Rejected> {
        match &mut self.screen {
            Screen::Debate(room) => room
                .send_message(content, now, &mut *self.collaborators.peer)
                .map(|_| ()),
            Screen::Welcome(_) | Screen::Lobby(_) => Err(self.wrong_mode("send a message")),
        }
    }

    /// Flip the mute flag in the debate
    pub fn toggle_mute(&mut self) -> Result<(), Rejected> {
        match &mut self.screen {
            Screen::Debate(room) => {
                room.toggle_mute();
                Ok(())
            }
            Screen::Welcome(_) | Screen::Lobby(_) => Err(self.wrong_mode("toggle mute")),
        }
    }

    /// Run every timer and collaborator event due by `now`, in time order
    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.scheduler.pop_due(now) {
            self.poll_collaborators(fired.at);
            self.dispatch(fired);
        }
        self.poll_collaborators(now);
    }

    /// Handle a key press at `now`
    pub fn handle_key(&mut self, key: KeyInput, now: Duration) {
        if key == KeyInput::Quit {
            self.quit();
            return;
        }

        let result = match &mut self.screen {
            Screen::Welcome(form) => match key {
                KeyInput::Char(c) => {
                    form.on_char(c);
                    Ok(())
                }
                KeyInput::Backspace => {
                    form.on_backspace();
                    Ok(())
                }
                KeyInput::Tab => {
                    form.toggle_focus();
                    Ok(())
                }
                KeyInput::Enter => {
                    let (room, name) = form.submission();
                    self.join_room(&room, &name, now)
                }
                KeyInput::Esc => {
                    self.quit();
                    Ok(())
                }
                _ => Ok(()),
            },
            Screen::Lobby(_) => match key {
                KeyInput::ToggleReady | KeyInput::Char(' ') | KeyInput::Char('r') => {
                    self.toggle_ready(now)
                }
                KeyInput::Esc => {
                    self.leave_to_welcome();
                    Ok(())
                }
                _ => Ok(()),
            },
            Screen::Debate(room) => match key {
                KeyInput::Char(c) => {
                    room.on_char(c);
                    Ok(())
                }
                KeyInput::Backspace => {
                    room.on_backspace();
                    Ok(())
                }
                KeyInput::Enter => room
                    .submit_draft(now, &mut *self.collaborators.peer)
                    .map(|_| ()),
                KeyInput::ToggleMute => self.toggle_mute(),
                KeyInput::Esc => {
                    self.leave_to_welcome();
                    Ok(())
                }
                _ => Ok(()),
            },
        };

        match result {
            Ok(()) => {
                if matches!(key, KeyInput::Char(_) | KeyInput::Backspace) {
                    self.status_message = None;
                }
            }
            Err(rejected) => {
                tracing::debug!(%rejected, mode = %self.mode(), "action rejected");
                self.status_message = Some(rejected.to_string());
            }
        }
    }

    /// Serializable view of the session
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            session: &self.session,
            readiness: match &self.screen {
                Screen::Lobby(tracker) => Some(tracker.state()),
                _ => None,
            },
            debate: match &self.screen {
                Screen::Debate(room) => Some(room),
                _ => None,
            },
        }
    }

    fn dispatch(&mut self, fired: Fired<TimerKind>) {
        let Fired { id, at, payload } = fired;
        let countdown_done = match &mut self.screen {
            Screen::Welcome(_) => {
                tracing::warn!(?id, ?payload, "timer fired on the welcome screen");
                false
            }
            Screen::Lobby(tracker) => tracker.on_timer(id, payload, &mut self.scheduler),
            Screen::Debate(room) => {
                room.on_timer(
                    id,
                    payload,
                    at,
                    &mut self.scheduler,
                    &mut *self.collaborators.judge,
                );
                false
            }
        };

        if countdown_done {
            if let Err(rejected) = self.start_debate(at) {
                tracing::warn!(%rejected, "countdown finished but the debate could not start");
            }
        }
    }

    fn poll_collaborators(&mut self, now: Duration) {
        match &mut self.screen {
            Screen::Welcome(_) => {}
            Screen::Lobby(tracker) => tracker.poll_matchmaker(
                now,
                &mut self.scheduler,
                &mut *self.collaborators.matchmaker,
            ),
            Screen::Debate(room) => room.poll_collaborators(
                now,
                &mut self.scheduler,
                &mut *self.collaborators.peer,
                &mut *self.collaborators.judge,
            ),
        }
    }

    fn wrong_mode(&self, action: &'static str) -> Rejected {
        Rejected::WrongMode {
            action,
            mode: self.mode(),
        }
    }
}
