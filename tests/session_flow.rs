//! End-to-end session flows driven by a virtual clock

use debattle::app::{AppCoordinator, KeyInput, Mode, Screen};
use debattle::config::Config;
use debattle::error::Rejected;
use debattle::game::{Message, Outcome, Phase, Turn};
use debattle::network::{
    Collaborators, PeerChannel, PeerEvent, SimulatedJudge, SimulatedMatchmaker,
};
use debattle::timer::{Clock, ManualClock, Scheduler};
use std::time::Duration;

struct Session {
    app: AppCoordinator,
    clock: ManualClock,
}

impl Session {
    fn with(collaborators: Collaborators) -> Self {
        Self {
            app: AppCoordinator::new(Config::default(), collaborators),
            clock: ManualClock::new(),
        }
    }

    fn new() -> Self {
        let config = Config::default();
        Self::with(Collaborators::simulated(&config.timings))
    }

    /// Step the clock one second at a time
    fn wait(&mut self, secs: u64) {
        for _ in 0..secs {
            self.clock.advance_secs(1);
            self.app.advance(self.clock.now());
        }
    }

    fn key(&mut self, key: KeyInput) {
        self.app.handle_key(key, self.clock.now());
    }

    fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.key(KeyInput::Char(c));
        }
    }

    /// Welcome form to a running debate
    fn into_debate(&mut self) {
        self.type_str("Ada");
        self.key(KeyInput::Tab);
        self.type_str("room42");
        self.key(KeyInput::Enter);
        assert_eq!(self.app.mode(), Mode::Lobby);

        self.key(KeyInput::Char(' '));
        self.wait(3);
        self.wait(10);
        assert_eq!(self.app.mode(), Mode::Debate);
    }

    fn debate(&self) -> &debattle::app::DebateRoom {
        match self.app.screen() {
            Screen::Debate(room) => room,
            other => panic!("expected debate screen, got {other:?}"),
        }
    }
}

#[test]
fn test_full_session_reaches_verdict() {
    let mut s = Session::new();
    s.into_debate();
    assert_eq!(s.app.session().room_id(), "ROOM42");
    assert_eq!(s.debate().phase(), Phase::Opening);

    s.type_str("Unchecked AI is a public risk");
    s.key(KeyInput::Enter);
    assert_eq!(s.debate().transcript().len(), 1);
    assert_eq!(s.debate().turn(), Turn::Theirs);

    s.wait(2);
    assert_eq!(s.debate().turn(), Turn::Mine);
    assert_eq!(s.debate().transcript().len(), 1);

    s.wait(178);
    assert_eq!(s.debate().phase(), Phase::Judging);
    s.wait(3);
    assert_eq!(s.debate().phase(), Phase::Complete);
    assert_eq!(s.debate().outcome(), Some(Outcome { winner: 0 }));
    assert_eq!(s.app.pending_timers(), 0);
}

#[test]
fn test_countdown_only_with_both_ready() {
    let mut s = Session::new();
    s.app
        .join_room("ABC123", "Ada", s.clock.now())
        .unwrap();
    s.wait(30);
    assert_eq!(s.app.mode(), Mode::Lobby);

    s.app.toggle_ready(s.clock.now()).unwrap();
    s.wait(9);
    assert_eq!(s.app.mode(), Mode::Lobby);
    s.wait(1);
    assert_eq!(s.app.mode(), Mode::Debate);
}

#[test]
fn test_ready_toggle_locked_during_countdown() {
    let mut s = Session::new();
    s.app.join_room("ABC123", "Ada", s.clock.now()).unwrap();
    s.app.toggle_ready(s.clock.now()).unwrap();
    s.wait(4);

    assert_eq!(
        s.app.toggle_ready(s.clock.now()),
        Err(Rejected::CountdownStarted)
    );
    s.key(KeyInput::Char(' '));
    assert_eq!(
        s.app.status_message.as_deref(),
        Some("countdown already started")
    );
}

#[test]
fn test_leaving_mid_reply_cancels_everything() {
    let mut s = Session::new();
    s.into_debate();
    s.app.send_message("closing thought", s.clock.now()).unwrap();
    s.wait(1);

    s.key(KeyInput::Esc);
    assert_eq!(s.app.mode(), Mode::Welcome);
    assert_eq!(s.app.session().room_id(), "");
    assert_eq!(s.app.session().player_name(), "");
    assert_eq!(s.app.pending_timers(), 0);

    // a stale reply must not resurrect anything
    s.wait(10);
    assert_eq!(s.app.mode(), Mode::Welcome);
    assert!(matches!(s.app.screen(), Screen::Welcome(form) if form.name.is_empty()));
}

#[test]
fn test_leaving_lobby_before_opponent_joins() {
    let mut s = Session::new();
    s.app.join_room("ABC123", "Ada", s.clock.now()).unwrap();
    s.wait(1);
    s.app.leave_to_welcome();
    assert_eq!(s.app.pending_timers(), 0);

    s.app.join_room("XYZ789", "Bo", s.clock.now()).unwrap();
    s.wait(2);
    assert!(matches!(s.app.screen(), Screen::Lobby(t) if !t.is_remote_ready()));
    s.wait(1);
    assert!(matches!(s.app.screen(), Screen::Lobby(t) if t.is_remote_ready()));
}

#[test]
fn test_actions_rejected_on_wrong_screen() {
    let mut s = Session::new();
    assert!(matches!(
        s.app.send_message("hi", s.clock.now()),
        Err(Rejected::WrongMode { mode: Mode::Welcome, .. })
    ));
    assert!(s.app.start_debate(s.clock.now()).is_err());
    assert_eq!(s.app.mode(), Mode::Welcome);
}

#[test]
fn test_snapshot_serializes_debate() {
    let mut s = Session::new();
    s.into_debate();
    s.app.send_message("first point", s.clock.now()).unwrap();

    let json = serde_json::to_value(s.app.snapshot()).unwrap();
    assert_eq!(json["session"]["mode"], "debate");
    assert_eq!(json["session"]["room_id"], "ROOM42");
    assert_eq!(json["debate"]["engine"]["phase"], "opening");
    assert_eq!(json["debate"]["turn"], "theirs");
    assert_eq!(
        json["debate"]["transcript"]["messages"][0]["content"],
        "first point"
    );
    assert!(json["readiness"].is_null());
}

#[test]
fn test_snapshot_serializes_lobby() {
    let mut s = Session::new();
    s.app.join_room("ABC123", "Ada", s.clock.now()).unwrap();
    s.app.toggle_ready(s.clock.now()).unwrap();

    let json = serde_json::to_value(s.app.snapshot()).unwrap();
    assert_eq!(json["session"]["mode"], "lobby");
    assert_eq!(json["readiness"]["local_ready"], true);
    assert_eq!(json["readiness"]["remote_ready"], false);
    assert_eq!(json["readiness"]["countdown"], "idle");
}

/// Peer that answers every message with a canned rebuttal
struct EchoPeer {
    delay: Duration,
    pending: Scheduler<String>,
}

impl PeerChannel for EchoPeer {
    fn deliver(&mut self, message: &Message, now: Duration) {
        self.pending
            .schedule_once(now, self.delay, format!("Not so: {}", message.content));
    }

    fn poll(&mut self, now: Duration) -> Option<PeerEvent> {
        self.pending.pop_due(now).map(|fired| PeerEvent::TurnReturned {
            reply: Some(fired.payload),
        })
    }

    fn cancel(&mut self) {
        self.pending.clear();
    }
}

#[test]
fn test_custom_peer_reply_is_logged() {
    let timings = Config::default().timings;
    let mut s = Session::with(Collaborators {
        matchmaker: Box::new(
            SimulatedMatchmaker::new(timings.opponent_join_delay()).with_opponent_name("Rival"),
        ),
        peer: Box::new(EchoPeer {
            delay: Duration::from_secs(1),
            pending: Scheduler::new(),
        }),
        judge: Box::new(SimulatedJudge::new(timings.judging_delay())),
    });
    s.into_debate();
    assert_eq!(s.debate().players()[1].name, "Rival");

    s.app.send_message("AI needs oversight", s.clock.now()).unwrap();
    s.wait(1);

    let messages = s.debate().transcript().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].author, "Rival");
    assert_eq!(messages[1].content, "Not so: AI needs oversight");
    assert_eq!(messages[1].phase, Phase::Opening);
    assert_eq!(s.debate().turn(), Turn::Mine);
}
