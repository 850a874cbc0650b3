//! Debate rules: phases, players, outcome

pub mod engine;
pub mod transcript;

pub use engine::PhaseEngine;
pub use transcript::{Message, MessageId, Transcript, Turn};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Starting health of the local player
pub const LOCAL_HEALTH: u8 = 100;

/// Starting health of the opponent
pub const OPPONENT_HEALTH: u8 = 85;

/// Maximum health a player can show
pub const MAX_HEALTH: u8 = 100;

/// Display name used until the matchmaker names the opponent
pub const DEFAULT_OPPONENT_NAME: &str = "Opponent";

/// One stage of the debate timeline.
///
/// Declaration order is the play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Opening,
    Rebuttal,
    Crossfire,
    Final,
    Judging,
    Complete,
}

impl Phase {
    /// Every phase in play order
    pub const ALL: [Phase; 6] = [
        Phase::Opening,
        Phase::Rebuttal,
        Phase::Crossfire,
        Phase::Final,
        Phase::Judging,
        Phase::Complete,
    ];

    /// The phase that follows this one. `None` for `Complete`.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Opening => Some(Phase::Rebuttal),
            Phase::Rebuttal => Some(Phase::Crossfire),
            Phase::Crossfire => Some(Phase::Final),
            Phase::Final => Some(Phase::Judging),
            Phase::Judging => Some(Phase::Complete),
            Phase::Complete => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Complete
    }

    /// Whether players may still submit arguments
    pub fn accepts_messages(self) -> bool {
        !matches!(self, Phase::Judging | Phase::Complete)
    }

    /// Upper-case label shown on badges and message tags
    pub fn label(self) -> &'static str {
        match self {
            Phase::Opening => "OPENING",
            Phase::Rebuttal => "REBUTTAL",
            Phase::Crossfire => "CROSSFIRE",
            Phase::Final => "FINAL",
            Phase::Judging => "JUDGING",
            Phase::Complete => "COMPLETE",
        }
    }

    /// One-line instruction for the phase banner
    pub fn description(self) -> &'static str {
        match self {
            Phase::Opening => "Opening Statements - Present your initial argument",
            Phase::Rebuttal => "Rebuttals - Address your opponent's points",
            Phase::Crossfire => "Crossfire - Rapid back-and-forth Q&A",
            Phase::Final => "Final Arguments - Make your closing case",
            Phase::Judging => "Judging - The arguments are being evaluated...",
            Phase::Complete => "Debate Complete!",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Opening => "opening",
            Phase::Rebuttal => "rebuttal",
            Phase::Crossfire => "crossfire",
            Phase::Final => "final",
            Phase::Judging => "judging",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Which side of the motion a player argues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Pro,
    Con,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Pro => "PRO",
            Side::Con => "CON",
        }
    }
}

/// A debater
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Display only; no rule changes it
    pub health: u8,
    pub side: Side,
}

impl Player {
    pub fn new(name: impl Into<String>, health: u8, side: Side) -> Self {
        Self {
            name: name.into(),
            health: health.min(MAX_HEALTH),
            side,
        }
    }
}

/// The two debaters: local player first (pro), opponent second (con)
pub fn pair(local: &str, opponent: &str) -> [Player; 2] {
    [
        Player::new(local, LOCAL_HEALTH, Side::Pro),
        Player::new(opponent, OPPONENT_HEALTH, Side::Con),
    ]
}

/// Result of a finished debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Index into the player pair
    pub winner: usize,
}

impl Outcome {
    pub fn winner_name<'a>(&self, players: &'a [Player; 2]) -> Option<&'a str> {
        players.get(self.winner).map(|p| p.name.as_str())
    }
}

/// The first player wins only with strictly more health.
///
/// Equal health therefore goes to the second player. Health never changes
/// during a debate, so with the default pair this never comes up.
pub fn decide_by_health(players: &[Player; 2]) -> Outcome {
    let [a, b] = players;
    let winner = if a.health > b.health { 0 } else { 1 };
    Outcome { winner }
}
