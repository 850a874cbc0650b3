//! Waiting room: readiness and the pre-debate countdown
//!
//! Handles:
//! - Local ready toggle
//! - Opponent readiness reported by the matchmaker
//! - Countdown once both sides are ready (locked in once it starts)
//! - Rotating captions and a tip while waiting
//! - A taunt for each player once they are ready

use rand::prelude::*;
use serde::Serialize;
use std::time::Duration;

use crate::config::Timings;
use crate::error::Rejected;
use crate::network::{MatchEvent, Matchmaker};
use crate::timer::{Scheduler, TimerId, TimerKind};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Captions cycled while waiting
pub const CAPTIONS: &[&str] = &[
    "Sharpen your arguments...",
    "Opponent is warming up...",
    "Prepare for intellectual combat!",
    "Ready to debate?",
];

/// One of these is picked on entry
pub const TIPS: &[&str] = &[
    "Tip: Use concrete examples to support your points",
    "Tip: Listen carefully to counter your opponent's arguments",
    "Tip: Stay calm and focused during heated exchanges",
    "Tip: Strong opening statements set the tone",
];

/// Shown next to a player once they are ready
pub const TAUNTS: &[&str] = &[
    "You're going down!",
    "I've got facts on my side!",
    "Prepare to be schooled!",
    "Bring your A-game!",
    "Logic will prevail!",
];

/// State of the pre-debate countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Countdown {
    /// Waiting for both players
    Idle,
    /// Seconds remaining until the debate starts
    Running(u32),
    /// Reached zero; the debate has been signalled
    Finished,
}

/// Readiness of both players
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessState {
    pub local_ready: bool,
    pub remote_ready: bool,
    pub countdown: Countdown,
}

/// The waiting room for one session
#[derive(Debug, Clone)]
pub struct ReadinessTracker {
    state: ReadinessState,
    countdown_secs: u32,
    opponent_name: Option<String>,
    caption_index: usize,
    tip: &'static str,
    /// Local player first, opponent second
    taunts: [&'static str; 2],
    countdown_timer: Option<TimerId>,
    caption_timer: Option<TimerId>,
}

impl ReadinessTracker {
    /// Enter the waiting room: start the opponent search and the captions
    pub fn enter(
        room_id: &str,
        player_name: &str,
        now: Duration,
        timings: &Timings,
        sched: &mut Scheduler<TimerKind>,
        matchmaker: &mut dyn Matchmaker,
    ) -> Self {
        Self::enter_with_rng(room_id, player_name, now, timings, sched, matchmaker, &mut rand::rng())
    }

    /// Enter with a specific RNG (for testing/seeding)
    pub fn enter_with_rng<R: Rng + ?Sized>(
        room_id: &str,
        player_name: &str,
        now: Duration,
        timings: &Timings,
        sched: &mut Scheduler<TimerKind>,
        matchmaker: &mut dyn Matchmaker,
        rng: &mut R,
    ) -> Self {
        matchmaker.find_opponent(room_id, player_name, now);
        let caption_timer =
            sched.schedule_every(now, timings.caption_rotate(), TimerKind::CaptionRotate);

        Self {
            state: ReadinessState {
                local_ready: false,
                remote_ready: false,
                countdown: Countdown::Idle,
            },
            countdown_secs: timings.ready_countdown_secs,
            opponent_name: None,
            caption_index: 0,
            tip: TIPS[rng.random_range(0..TIPS.len())],
            taunts: [pick_taunt(rng), pick_taunt(rng)],
            countdown_timer: None,
            caption_timer: Some(caption_timer),
        }
    }

    pub fn state(&self) -> &ReadinessState {
        &self.state
    }

    pub fn is_local_ready(&self) -> bool {
        self.state.local_ready
    }

    pub fn is_remote_ready(&self) -> bool {
        self.state.remote_ready
    }

    /// Whether the countdown has started (readiness is locked)
    pub fn is_counting_down(&self) -> bool {
        self.state.countdown != Countdown::Idle
    }

    /// Seconds left on the countdown, if it is running
    pub fn countdown_remaining(&self) -> Option<u32> {
        match self.state.countdown {
            Countdown::Running(n) => Some(n),
            Countdown::Idle | Countdown::Finished => None,
        }
    }

    /// Opponent's name once the matchmaker found one
    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent_name.as_deref()
    }

    pub fn caption(&self) -> &'static str {
        CAPTIONS[self.caption_index % CAPTIONS.len()]
    }

    pub fn tip(&self) -> &'static str {
        self.tip
    }

    /// Local player's taunt, once they are ready
    pub fn local_taunt(&self) -> Option<&'static str> {
        self.state.local_ready.then_some(self.taunts[0])
    }

    /// Opponent's taunt, once they are ready
    pub fn remote_taunt(&self) -> Option<&'static str> {
        self.state.remote_ready.then_some(self.taunts[1])
    }

    /// Flip local readiness. Rejected once the countdown has started.
    pub fn toggle_local_ready(
        &mut self,
        now: Duration,
        sched: &mut Scheduler<TimerKind>,
    ) -> Result<(), Rejected> {
        if self.is_counting_down() {
            return Err(Rejected::CountdownStarted);
        }
        self.state.local_ready = !self.state.local_ready;
        tracing::debug!(ready = self.state.local_ready, "local readiness toggled");
        self.maybe_start_countdown(now, sched);
        Ok(())
    }

    /// Drain matchmaker events due by `now`
    pub fn poll_matchmaker(
        &mut self,
        now: Duration,
        sched: &mut Scheduler<TimerKind>,
        matchmaker: &mut dyn Matchmaker,
    ) {
        while let Some(event) = matchmaker.poll(now) {
            match event {
                MatchEvent::OpponentReady { name } => {
                    tracing::info!(opponent = %name, "opponent ready");
                    self.opponent_name = Some(name);
                    self.state.remote_ready = true;
                    self.maybe_start_countdown(now, sched);
                }
            }
        }
    }

    /// Handle a fired timer.
    ///
    /// Returns true exactly once: on the tick that takes the countdown to
    /// zero. Timers this tracker does not own are ignored.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        kind: TimerKind,
        sched: &mut Scheduler<TimerKind>,
    ) -> bool {
        match kind {
            TimerKind::CaptionRotate if self.caption_timer == Some(id) => {
                self.caption_index = (self.caption_index + 1) % CAPTIONS.len();
                false
            }
            TimerKind::CountdownTick if self.countdown_timer == Some(id) => {
                self.countdown_tick(sched)
            }
            _ => {
                tracing::warn!(?id, ?kind, "ignoring timer not owned by the lobby");
                false
            }
        }
    }

    /// Cancel everything this tracker scheduled
    pub fn teardown(&mut self, sched: &mut Scheduler<TimerKind>, matchmaker: &mut dyn Matchmaker) {
        for id in [self.countdown_timer.take(), self.caption_timer.take()]
            .into_iter()
            .flatten()
        {
            sched.cancel(id);
        }
        matchmaker.cancel();
    }

    fn maybe_start_countdown(&mut self, now: Duration, sched: &mut Scheduler<TimerKind>) {
        if !(self.state.local_ready && self.state.remote_ready) {
            return;
        }
        if self.state.countdown != Countdown::Idle {
            return;
        }
        tracing::info!(secs = self.countdown_secs, "both players ready, countdown started");
        self.state.countdown = Countdown::Running(self.countdown_secs);
        self.countdown_timer =
            Some(sched.schedule_every(now, COUNTDOWN_STEP, TimerKind::CountdownTick));
    }

    fn countdown_tick(&mut self, sched: &mut Scheduler<TimerKind>) -> bool {
        let Countdown::Running(remaining) = self.state.countdown else {
            return false;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.state.countdown = Countdown::Running(remaining);
            return false;
        }

        if let Some(id) = self.countdown_timer.take() {
            sched.cancel(id);
        }
        self.state.countdown = Countdown::Finished;
        true
    }
}

fn pick_taunt<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TAUNTS[rng.random_range(0..TAUNTS.len())]
}
