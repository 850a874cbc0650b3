//! DeBattle - two-player timed debates in the terminal
//!
//! Join a room, ready up, argue through opening, rebuttal, crossfire and
//! final rounds, then wait for the verdict.

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod lobby;
pub mod network;
pub mod timer;
pub mod tui;
