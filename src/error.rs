//! Error types

use std::path::PathBuf;

use thiserror::Error;

use crate::app::Mode;
use crate::game::Phase;

/// A user action whose precondition is not met.
///
/// This is a validation result, not a failure: the state is left exactly as
/// it was and the front end greys out or explains the control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    /// Player name is blank
    #[error("enter a battle name first")]
    EmptyPlayerName,

    /// Room code is blank
    #[error("enter a room code first")]
    EmptyRoomCode,

    /// Action is not available on the current screen
    #[error("cannot {action} from the {mode} screen")]
    WrongMode { action: &'static str, mode: Mode },

    /// Readiness is locked once the countdown runs
    #[error("countdown already started")]
    CountdownStarted,

    /// The opponent holds the turn
    #[error("wait for your turn")]
    NotMyTurn,

    /// Draft is blank after trimming
    #[error("message is empty")]
    EmptyMessage,

    /// Messages are closed in this phase
    #[error("messages are closed during {0}")]
    PhaseClosed(Phase),
}

/// Errors loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("failed to parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
