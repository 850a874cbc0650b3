//! Fixed-delay collaborators
//!
//! Each one keeps a private [`Scheduler`] for its pending answer, so the
//! delays run on the same injected time as the rest of the session and die
//! with `cancel()`.

use std::time::Duration;

use super::{JudgingService, MatchEvent, Matchmaker, PeerChannel, PeerEvent, Verdict};
use crate::game::{decide_by_health, Message, Player, DEFAULT_OPPONENT_NAME};
use crate::timer::Scheduler;

/// Reports an opponent as ready a fixed delay after the search starts
#[derive(Debug, Clone)]
pub struct SimulatedMatchmaker {
    delay: Duration,
    opponent_name: String,
    pending: Scheduler<()>,
}

impl SimulatedMatchmaker {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            opponent_name: DEFAULT_OPPONENT_NAME.to_string(),
            pending: Scheduler::new(),
        }
    }

    /// Name the simulated opponent
    pub fn with_opponent_name(mut self, name: impl Into<String>) -> Self {
        self.opponent_name = name.into();
        self
    }
}

impl Matchmaker for SimulatedMatchmaker {
    fn find_opponent(&mut self, room_id: &str, _player_name: &str, now: Duration) {
        tracing::debug!(room = room_id, delay_ms = self.delay.as_millis() as u64, "simulating opponent join");
        self.pending.clear();
        self.pending.schedule_once(now, self.delay, ());
    }

    fn poll(&mut self, now: Duration) -> Option<MatchEvent> {
        self.pending.pop_due(now).map(|_| MatchEvent::OpponentReady {
            name: self.opponent_name.clone(),
        })
    }

    fn cancel(&mut self) {
        self.pending.clear();
    }
}

/// Hands the turn back a fixed delay after each delivered message, without
/// saying anything
#[derive(Debug, Clone)]
pub struct SimulatedPeer {
    delay: Duration,
    pending: Scheduler<()>,
}

impl SimulatedPeer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Scheduler::new(),
        }
    }

    /// Replies still in flight
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}

impl PeerChannel for SimulatedPeer {
    fn deliver(&mut self, message: &Message, now: Duration) {
        tracing::debug!(id = %message.id, "simulating opponent reply");
        self.pending.schedule_once(now, self.delay, ());
    }

    fn poll(&mut self, now: Duration) -> Option<PeerEvent> {
        self.pending
            .pop_due(now)
            .map(|_| PeerEvent::TurnReturned { reply: None })
    }

    fn cancel(&mut self) {
        self.pending.clear();
    }
}

/// Declares the healthier player the winner after a fixed pause
#[derive(Debug, Clone)]
pub struct SimulatedJudge {
    delay: Duration,
    pending: Scheduler<Verdict>,
}

impl SimulatedJudge {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Scheduler::new(),
        }
    }
}

impl JudgingService for SimulatedJudge {
    fn request_verdict(&mut self, players: &[Player; 2], transcript: &[Message], now: Duration) {
        tracing::debug!(messages = transcript.len(), "simulating judging pause");
        let verdict = Verdict {
            outcome: decide_by_health(players),
        };
        self.pending.clear();
        self.pending.schedule_once(now, self.delay, verdict);
    }

    fn poll(&mut self, now: Duration) -> Option<Verdict> {
        self.pending.pop_due(now).map(|fired| fired.payload)
    }

    fn cancel(&mut self) {
        self.pending.clear();
    }
}
