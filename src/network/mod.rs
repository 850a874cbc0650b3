//! Collaborators outside the client
//!
//! The session never talks to the outside world directly. Matchmaking, the
//! message exchange with the other debater and the verdict each sit behind a
//! trait, polled with the current time like the rest of the state machine:
//!
//! - [`Matchmaker`]: room presence, tells us when the opponent is ready
//! - [`PeerChannel`]: carries our arguments over and hands the turn back
//! - [`JudgingService`]: evaluates the transcript once arguments close
//!
//! The [`simulated`] implementations answer after fixed delays and are what
//! the binary ships with.

pub mod simulated;

pub use simulated::{SimulatedJudge, SimulatedMatchmaker, SimulatedPeer};

use std::time::Duration;

use crate::config::Timings;
use crate::game::{Message, Outcome, Player};

/// Events from the matchmaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// An opponent joined the room and is ready
    OpponentReady { name: String },
}

/// Events from the other debater
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// The opponent finished their turn, optionally with an argument
    TurnReturned { reply: Option<String> },
}

/// A finished evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
}

/// Room presence.
pub trait Matchmaker {
    /// Start looking for an opponent in `room_id`
    fn find_opponent(&mut self, room_id: &str, player_name: &str, now: Duration);

    /// Next event at or before `now`, if any
    fn poll(&mut self, now: Duration) -> Option<MatchEvent>;

    /// Stop looking. Nothing is reported after this.
    fn cancel(&mut self);
}

/// Message transport to the other debater.
pub trait PeerChannel {
    /// Hand our argument to the opponent
    fn deliver(&mut self, message: &Message, now: Duration);

    /// Next event at or before `now`, if any
    fn poll(&mut self, now: Duration) -> Option<PeerEvent>;

    /// Drop everything in flight. Nothing is reported after this.
    fn cancel(&mut self);
}

/// Debate evaluation.
pub trait JudgingService {
    /// Begin evaluating the debate
    fn request_verdict(&mut self, players: &[Player; 2], transcript: &[Message], now: Duration);

    /// The verdict, once it is ready
    fn poll(&mut self, now: Duration) -> Option<Verdict>;

    /// Abandon the evaluation. Nothing is reported after this.
    fn cancel(&mut self);
}

/// The three collaborators a session talks to
pub struct Collaborators {
    pub matchmaker: Box<dyn Matchmaker>,
    pub peer: Box<dyn PeerChannel>,
    pub judge: Box<dyn JudgingService>,
}

impl Collaborators {
    /// Fixed-delay stand-ins driven by `timings`
    pub fn simulated(timings: &Timings) -> Self {
        Self {
            matchmaker: Box::new(SimulatedMatchmaker::new(timings.opponent_join_delay())),
            peer: Box::new(SimulatedPeer::new(timings.opponent_reply_delay())),
            judge: Box::new(SimulatedJudge::new(timings.judging_delay())),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
