//! Top-level session: which screen is live, for which room and player

use rand::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::error::Rejected;

/// Length of a generated room code
pub const ROOM_CODE_LEN: usize = 6;

const ROOM_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Welcome,
    Lobby,
    Debate,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Welcome => "welcome",
            Mode::Lobby => "lobby",
            Mode::Debate => "debate",
        })
    }
}

/// Mode plus the room and name it was entered with.
///
/// Room and name are empty exactly when the mode is `Welcome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    mode: Mode,
    room_id: String,
    player_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::Welcome,
            room_id: String::new(),
            player_name: String::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Enter the lobby of `room_id`.
    ///
    /// The name is trimmed and the room code trimmed and upper-cased.
    pub fn join_room(&mut self, room_id: &str, player_name: &str) -> Result<(), Rejected> {
        if self.mode != Mode::Welcome {
            return Err(Rejected::WrongMode {
                action: "join a room",
                mode: self.mode,
            });
        }
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(Rejected::EmptyPlayerName);
        }
        let room_id = room_id.trim();
        if room_id.is_empty() {
            return Err(Rejected::EmptyRoomCode);
        }

        self.room_id = room_id.to_uppercase();
        self.player_name = player_name.to_string();
        self.mode = Mode::Lobby;
        tracing::info!(room = %self.room_id, player = %self.player_name, "joined room");
        Ok(())
    }

    /// Move from the lobby into the debate
    pub fn start_debate(&mut self) -> Result<(), Rejected> {
        if self.mode != Mode::Lobby {
            return Err(Rejected::WrongMode {
                action: "start the debate",
                mode: self.mode,
            });
        }
        self.mode = Mode::Debate;
        tracing::info!(room = %self.room_id, "debate started");
        Ok(())
    }

    /// Back to the welcome screen from anywhere, forgetting room and name
    pub fn leave_to_welcome(&mut self) {
        if self.mode != Mode::Welcome {
            tracing::info!(from = %self.mode, room = %self.room_id, "left to welcome");
        }
        *self = Self::new();
    }
}

/// Random six-character room code from `[0-9A-Z]`
pub fn generate_room_code() -> String {
    generate_room_code_with_rng(&mut rand::rng())
}

/// Generate a room code with a specific RNG (for testing/seeding)
pub fn generate_room_code_with_rng<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| char::from(ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())]))
        .collect()
}
