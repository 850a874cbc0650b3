//! Debate room state
//!
//! Owns everything on the debate screen: the two players, the phase engine,
//! the transcript and whose turn it is. Time only enters through the `now`
//! and fired-timer arguments; the collaborators are passed in per call.

use serde::Serialize;
use std::time::Duration;

use crate::config::Timings;
use crate::error::Rejected;
use crate::game::{
    decide_by_health, pair, Message, Outcome, Phase, PhaseEngine, Player, Transcript, Turn,
};
use crate::network::{JudgingService, PeerChannel, PeerEvent, Verdict};
use crate::timer::{Scheduler, TimerId, TimerKind};

/// Longest draft the input box accepts
pub const MAX_DRAFT_LEN: usize = 280;

/// State of one debate
#[derive(Debug, Clone, Serialize)]
pub struct DebateRoom {
    topic: String,
    players: [Player; 2],
    engine: PhaseEngine,
    transcript: Transcript,
    turn: Turn,
    draft: String,
    muted: bool,
    outcome: Option<Outcome>,
}

impl DebateRoom {
    /// Open the debate in `Opening` with the local player to speak
    pub fn start(
        topic: &str,
        local_name: &str,
        opponent_name: &str,
        now: Duration,
        timings: &Timings,
        sched: &mut Scheduler<TimerKind>,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            players: pair(local_name, opponent_name),
            engine: PhaseEngine::start(now, timings, sched),
            transcript: Transcript::new(),
            turn: Turn::Mine,
            draft: String::new(),
            muted: false,
            outcome: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Local player first, opponent second
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Seconds left in the current phase
    pub fn remaining(&self) -> u32 {
        self.engine.remaining()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn is_my_turn(&self) -> bool {
        self.turn == Turn::Mine
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Set once the debate is complete
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether the send control is enabled
    pub fn can_send(&self) -> bool {
        self.check_can_send(&self.draft).is_ok()
    }

    /// Type into the draft (only on our turn while arguments are open)
    pub fn on_char(&mut self, c: char) {
        if !self.is_my_turn() || !self.phase().accepts_messages() || c.is_control() {
            return;
        }
        if self.draft.chars().count() < MAX_DRAFT_LEN {
            self.draft.push(c);
        }
    }

    pub fn on_backspace(&mut self) {
        if !self.is_my_turn() {
            return;
        }
        self.draft.pop();
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        tracing::debug!(muted = self.muted, "mute toggled");
    }

    /// Send an argument.
    ///
    /// Needs the turn, an open phase and non-blank content. On success the
    /// trimmed message is logged under the current phase, the draft is
    /// cleared and the turn passes to the opponent.
    pub fn send_message(
        &mut self,
        content: &str,
        now: Duration,
        peer: &mut dyn PeerChannel,
    ) -> Result<&Message, Rejected> {
        self.check_can_send(content)?;

        let phase = self.phase();
        self.draft.clear();
        self.turn = Turn::Theirs;
        let message = self
            .transcript
            .append(&self.players[0].name, content.trim().to_string(), now, phase);
        tracing::debug!(id = %message.id, %phase, "message sent");
        peer.deliver(message, now);
        Ok(message)
    }

    /// Send whatever is in the draft
    pub fn submit_draft(
        &mut self,
        now: Duration,
        peer: &mut dyn PeerChannel,
    ) -> Result<&Message, Rejected> {
        let content = self.draft.clone();
        self.send_message(&content, now, peer)
    }

    /// The opponent finished their turn
    pub fn on_peer_event(&mut self, event: PeerEvent, now: Duration) {
        match event {
            PeerEvent::TurnReturned { reply } => {
                if let Some(reply) = reply.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
                    let phase = self.phase();
                    self.transcript
                        .append(&self.players[1].name, reply.to_string(), now, phase);
                }
                self.turn = Turn::Mine;
                tracing::debug!("turn returned");
            }
        }
    }

    /// A verdict arrived; only counts while judging
    pub fn on_verdict(&mut self, verdict: Verdict, at: Duration, sched: &mut Scheduler<TimerKind>) {
        if !self.engine.finish_judging(at, sched) {
            tracing::warn!(phase = %self.phase(), "ignoring verdict outside judging");
            return;
        }
        self.complete(verdict.outcome);
    }

    /// Handle a fired timer; returns the new phase on a phase change
    pub fn on_timer(
        &mut self,
        id: TimerId,
        kind: TimerKind,
        at: Duration,
        sched: &mut Scheduler<TimerKind>,
        judge: &mut dyn JudgingService,
    ) -> Option<Phase> {
        if kind != TimerKind::PhaseTick {
            tracing::warn!(?id, ?kind, "ignoring timer not owned by the debate");
            return None;
        }
        let phase = self.engine.on_tick(id, at, sched)?;
        match phase {
            Phase::Judging => {
                judge.request_verdict(&self.players, self.transcript.messages(), at);
            }
            Phase::Complete => {
                // judging ran out before a verdict
                judge.cancel();
                self.complete(decide_by_health(&self.players));
            }
            _ => {}
        }
        Some(phase)
    }

    /// Drain peer and judge events due by `now`
    pub fn poll_collaborators(
        &mut self,
        now: Duration,
        sched: &mut Scheduler<TimerKind>,
        peer: &mut dyn PeerChannel,
        judge: &mut dyn JudgingService,
    ) {
        while let Some(event) = peer.poll(now) {
            self.on_peer_event(event, now);
        }
        while let Some(verdict) = judge.poll(now) {
            self.on_verdict(verdict, now, sched);
        }
    }

    /// Stop the clock and drop anything in flight
    pub fn teardown(
        &mut self,
        sched: &mut Scheduler<TimerKind>,
        peer: &mut dyn PeerChannel,
        judge: &mut dyn JudgingService,
    ) {
        self.engine.stop(sched);
        peer.cancel();
        judge.cancel();
    }

    fn check_can_send(&self, content: &str) -> Result<(), Rejected> {
        let phase = self.phase();
        if !phase.accepts_messages() {
            return Err(Rejected::PhaseClosed(phase));
        }
        if self.turn != Turn::Mine {
            return Err(Rejected::NotMyTurn);
        }
        if content.trim().is_empty() {
            return Err(Rejected::EmptyMessage);
        }
        Ok(())
    }

    fn complete(&mut self, outcome: Outcome) {
        let winner = outcome.winner_name(&self.players).unwrap_or_default();
        tracing::info!(winner, "debate complete");
        self.outcome = Some(outcome);
    }
}
