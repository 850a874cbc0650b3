//! Debate phase engine
//!
//! Walks the fixed phase order on a one-second tick. The engine owns at most
//! one tick timer at a time: it is re-armed whenever the phase changes and
//! cancelled at `Complete` or on [`PhaseEngine::stop`].

use serde::Serialize;
use std::time::Duration;

use super::Phase;
use crate::config::Timings;
use crate::timer::{Scheduler, TimerId, TimerKind};

const TICK: Duration = Duration::from_secs(1);

/// Phase timeline state
#[derive(Debug, Clone, Serialize)]
pub struct PhaseEngine {
    phase: Phase,
    /// Seconds left in the current phase
    remaining: u32,
    #[serde(skip)]
    budgets: Timings,
    #[serde(skip)]
    tick: Option<TimerId>,
}

impl PhaseEngine {
    /// Start at `Opening` and arm the tick
    pub fn start(now: Duration, budgets: &Timings, sched: &mut Scheduler<TimerKind>) -> Self {
        let mut engine = Self {
            phase: Phase::Opening,
            remaining: budgets.phase_budget(Phase::Opening),
            budgets: budgets.clone(),
            tick: None,
        };
        engine.arm(now, sched);
        engine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether `id` is this engine's live tick timer
    pub fn owns(&self, id: TimerId) -> bool {
        self.tick == Some(id)
    }

    /// Handle one elapsed second.
    ///
    /// Returns the new phase when the tick crossed a phase boundary. Timers
    /// this engine does not own are ignored.
    pub fn on_tick(
        &mut self,
        id: TimerId,
        at: Duration,
        sched: &mut Scheduler<TimerKind>,
    ) -> Option<Phase> {
        if !self.owns(id) {
            tracing::warn!(?id, "ignoring stale phase tick");
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }

        let next = self.phase.next()?;
        self.enter(next, at, sched);
        Some(next)
    }

    /// Jump from `Judging` straight to `Complete` (verdict delivered).
    ///
    /// Returns false and changes nothing from any other phase.
    pub fn finish_judging(&mut self, at: Duration, sched: &mut Scheduler<TimerKind>) -> bool {
        if self.phase != Phase::Judging {
            return false;
        }
        self.enter(Phase::Complete, at, sched);
        true
    }

    /// Cancel the tick. The phase stays where it is.
    pub fn stop(&mut self, sched: &mut Scheduler<TimerKind>) {
        if let Some(id) = self.tick.take() {
            sched.cancel(id);
        }
    }

    fn enter(&mut self, phase: Phase, at: Duration, sched: &mut Scheduler<TimerKind>) {
        debug_assert!(phase > self.phase, "phases only move forward");
        tracing::info!(from = %self.phase, to = %phase, "phase change");
        self.stop(sched);
        self.phase = phase;
        self.remaining = self.budgets.phase_budget(phase);
        self.arm(at, sched);
    }

    fn arm(&mut self, now: Duration, sched: &mut Scheduler<TimerKind>) {
        if self.phase.is_terminal() {
            return;
        }
        self.tick = Some(sched.schedule_every(now, TICK, TimerKind::PhaseTick));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Run the scheduler up to `until`, feeding every tick to the engine
    fn run(
        engine: &mut PhaseEngine,
        sched: &mut Scheduler<TimerKind>,
        until: Duration,
    ) -> Vec<Phase> {
        let mut transitions = Vec::new();
        while let Some(fired) = sched.pop_due(until) {
            if let Some(phase) = engine.on_tick(fired.id, fired.at, sched) {
                transitions.push(phase);
            }
        }
        transitions
    }

    #[test]
    fn test_starts_in_opening_with_full_budget() {
        let mut sched = Scheduler::new();
        let engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);
        assert_eq!(engine.phase(), Phase::Opening);
        assert_eq!(engine.remaining(), 30);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_thirty_ticks_move_opening_to_rebuttal() {
        let mut sched = Scheduler::new();
        let mut engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);

        run(&mut engine, &mut sched, Duration::from_secs(29));
        assert_eq!(engine.phase(), Phase::Opening);
        assert_eq!(engine.remaining(), 1);

        let transitions = run(&mut engine, &mut sched, Duration::from_secs(30));
        assert_eq!(transitions, vec![Phase::Rebuttal]);
        assert_eq!(engine.remaining(), 30);
    }

    #[test]
    fn test_full_timeline_without_verdict() {
        let mut sched = Scheduler::new();
        let mut engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);

        // 30 + 30 + 90 + 30 + 30
        let transitions = run(&mut engine, &mut sched, Duration::from_secs(210));
        assert_eq!(transitions, Phase::ALL[1..].to_vec());
        assert_eq!(engine.phase(), Phase::Complete);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_complete_ignores_further_time() {
        let mut sched = Scheduler::new();
        let mut engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);
        run(&mut engine, &mut sched, Duration::from_secs(210));

        let transitions = run(&mut engine, &mut sched, Duration::from_secs(1_000));
        assert!(transitions.is_empty());
        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(engine.remaining(), 0);
    }

    #[test]
    fn test_finish_judging_only_from_judging() {
        let mut sched = Scheduler::new();
        let mut engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);
        assert!(!engine.finish_judging(Duration::ZERO, &mut sched));
        assert_eq!(engine.phase(), Phase::Opening);

        run(&mut engine, &mut sched, Duration::from_secs(180));
        assert_eq!(engine.phase(), Phase::Judging);
        assert!(engine.finish_judging(Duration::from_secs(183), &mut sched));
        assert_eq!(engine.phase(), Phase::Complete);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_stop_cancels_tick() {
        let mut sched = Scheduler::new();
        let mut engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);
        engine.stop(&mut sched);
        assert!(sched.is_empty());
        assert!(run(&mut engine, &mut sched, Duration::from_secs(100)).is_empty());
        assert_eq!(engine.phase(), Phase::Opening);
    }

    #[test]
    fn test_foreign_timer_is_ignored() {
        let mut sched = Scheduler::new();
        let mut engine = PhaseEngine::start(Duration::ZERO, &Timings::default(), &mut sched);
        let foreign = sched.schedule_once(Duration::ZERO, TICK, TimerKind::CountdownTick);
        assert_eq!(engine.on_tick(foreign, TICK, &mut sched), None);
        assert_eq!(engine.remaining(), 30);
    }

    fn budgets_strategy() -> impl Strategy<Value = Timings> {
        (1u32..6, 1u32..6, 1u32..6, 1u32..6, 1u32..6).prop_map(|(o, r, c, f, j)| Timings {
            opening_secs: o,
            rebuttal_secs: r,
            crossfire_secs: c,
            final_secs: f,
            judging_secs: j,
            ..Timings::default()
        })
    }

    proptest! {
        #[test]
        fn prop_phases_never_skip_or_repeat(budgets in budgets_strategy(), step in 1u64..4) {
            let mut sched = Scheduler::new();
            let mut engine = PhaseEngine::start(Duration::ZERO, &budgets, &mut sched);
            let mut seen = vec![Phase::Opening];
            let mut now = Duration::ZERO;

            while !engine.phase().is_terminal() {
                now += Duration::from_secs(step);
                seen.extend(run(&mut engine, &mut sched, now));
            }

            prop_assert_eq!(seen, Phase::ALL.to_vec());
        }

        #[test]
        fn prop_each_phase_lasts_its_budget(budgets in budgets_strategy()) {
            let mut sched = Scheduler::new();
            let mut engine = PhaseEngine::start(Duration::ZERO, &budgets, &mut sched);
            let mut elapsed = 0u64;

            for phase in Phase::ALL.into_iter().filter(|p| !p.is_terminal()) {
                let budget = u64::from(budgets.phase_budget(phase));
                let before = Duration::from_secs(elapsed + budget - 1);
                prop_assert!(run(&mut engine, &mut sched, before).is_empty());
                prop_assert_eq!(engine.phase(), phase);

                elapsed += budget;
                let transitions = run(&mut engine, &mut sched, Duration::from_secs(elapsed));
                prop_assert_eq!(transitions, vec![phase.next().unwrap()]);
            }
        }
    }
}
