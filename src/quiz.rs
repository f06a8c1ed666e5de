//! Session state machine.
//!
//! `Idle -> Active -> (Correct | Wrong | TimedOut) -> Active -> ... -> Ended`
//!
//! The engine is driven from outside: input events through
//! [`QuizEngine::handle_input`] and clock ticks through [`QuizEngine::on_tick`].
//! The round deadline and the review window after a round share one
//! [`Scheduler`] slot, so moving on always replaces or clears whatever was
//! pending and a stale timeout can never fire into a later round.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::clock::Clock;
use crate::error::QuizError;
use crate::fretboard::{PitchClass, Position, Tuning};
use crate::random::RandomSource;
use crate::round::{QuizMode, RoundState, RoundStatus};
use crate::schedule::{CancelHandle, Scheduler};
use crate::scoring::SessionResult;
use crate::session::{QuizConfig, SessionState};

/// Engine-level status as seen by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum QuizStatus {
    Idle,
    Active,
    Correct,
    Wrong,
    #[strum(to_string = "Timed out")]
    TimedOut,
    Ended,
}

impl QuizStatus {
    /// A round has resolved and the review window is open.
    pub fn is_reviewing(self) -> bool {
        matches!(
            self,
            QuizStatus::Correct | QuizStatus::Wrong | QuizStatus::TimedOut
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    Toggle(Position),
    SubmitPitch(PitchClass),
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheduled {
    RoundTimeout,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Ended,
}

/// How a renderer should paint one cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    Empty,
    /// The prompted coordinate.
    Target,
    /// Selected and sounding the target pitch class.
    Correct,
    /// Selected but sounding another pitch class.
    Wrong,
    /// Required but not selected when the round resolved.
    Missed,
    /// Shares the target pitch class, shown as feedback.
    Revealed,
}

/// Read-only projection of the engine for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub status: QuizStatus,
    pub mode: QuizMode,
    pub target_position: Option<Position>,
    /// Only present once the round has resolved.
    pub target_pitch: Option<PitchClass>,
    /// Empty while the round is active; every required position afterwards.
    pub required_positions: Vec<Position>,
    pub selected_positions: Vec<Position>,
    pub wrong_selections: Vec<Position>,
    pub guess: Option<PitchClass>,
    /// Current question number, 1-based.
    pub round_index: usize,
    pub total_questions: usize,
    pub score: usize,
    /// Time left on the round deadline (find-all while active).
    pub remaining_ms: Option<u64>,
    /// Elapsed time of the round, frozen once it resolves.
    pub elapsed_ms: Option<u64>,
    pub max_fret: u8,
}

impl QuizSnapshot {
    pub fn is_revealed(&self) -> bool {
        self.status.is_reviewing() || self.status == QuizStatus::Ended
    }

    pub fn mark_at(&self, position: Position) -> CellMark {
        if self.target_position == Some(position) {
            return CellMark::Target;
        }
        let selected = self.selected_positions.contains(&position);
        let wrong = self.wrong_selections.contains(&position);
        let required = self.required_positions.contains(&position);
        match (selected, wrong) {
            (true, true) => CellMark::Wrong,
            (true, false) => CellMark::Correct,
            (false, _) if required => match self.mode {
                QuizMode::FindAll => CellMark::Missed,
                QuizMode::Guess => CellMark::Revealed,
            },
            _ => CellMark::Empty,
        }
    }
}

pub struct QuizEngine<C: Clock, R: RandomSource> {
    tuning: Tuning,
    clock: C,
    rng: R,
    config: QuizConfig,
    phase: Phase,
    round: Option<RoundState>,
    session: SessionState,
    scheduler: Scheduler<Scheduled>,
    /// Handle of whatever is waiting in `scheduler`.
    timer: Option<CancelHandle>,
    last_tick: Option<Instant>,
    result: Option<SessionResult>,
}

impl<C: Clock, R: RandomSource> QuizEngine<C, R> {
    pub fn new(tuning: Tuning, clock: C, rng: R) -> Self {
        Self {
            tuning,
            clock,
            rng,
            config: QuizConfig::default(),
            phase: Phase::Idle,
            round: None,
            session: SessionState::default(),
            scheduler: Scheduler::new(),
            timer: None,
            last_tick: None,
            result: None,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn status(&self) -> QuizStatus {
        match self.phase {
            Phase::Idle => QuizStatus::Idle,
            Phase::Ended => QuizStatus::Ended,
            Phase::Running => match self.round.as_ref().map(RoundState::status) {
                Some(RoundStatus::Correct) => QuizStatus::Correct,
                Some(RoundStatus::Wrong) => QuizStatus::Wrong,
                Some(RoundStatus::TimedOut) => QuizStatus::TimedOut,
                _ => QuizStatus::Active,
            },
        }
    }

    /// Begin a new session. On error nothing changes.
    pub fn start(&mut self, config: QuizConfig) -> Result<(), QuizError> {
        config.validate()?;

        self.cancel_timer();
        self.config = config;
        self.session = SessionState::default();
        self.result = None;
        self.round = None;
        self.phase = Phase::Running;
        info!(
            "starting {} session: {} questions, max fret {}",
            self.config.mode, self.config.total_questions, self.config.max_fret
        );
        self.next_round();
        Ok(())
    }

    /// Abandon the session and return to idle. Safe to call at any time.
    pub fn stop(&mut self) {
        self.cancel_timer();
        if self.phase == Phase::Running {
            info!("session stopped at question {}", self.session.round_index);
        }
        self.round = None;
        self.result = None;
        self.last_tick = None;
        self.phase = Phase::Idle;
    }

    /// Apply a user event to the active round. Returns whether it had an effect.
    ///
    /// A deadline that passed without a tick is applied first, so late input
    /// finds the round already timed out.
    pub fn handle_input(&mut self, input: QuizInput) -> bool {
        if self.status() != QuizStatus::Active {
            return false;
        }
        let now = self.clock.now();
        if self.fire_due(now) {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };

        let changed = match input {
            QuizInput::Toggle(position) => round.toggle(position, now),
            QuizInput::Submit => round.submit(now).is_some(),
            QuizInput::SubmitPitch(pitch) => round.submit_pitch(pitch, now).is_some(),
        };

        if changed && round.status().is_resolved() {
            self.finish_round(now);
        }
        changed
    }

    /// Fire whatever is due at `now`: the round deadline or the end of the
    /// review window.
    pub fn on_tick(&mut self, now: Instant) {
        if self.phase != Phase::Running {
            return;
        }
        self.last_tick = Some(now);
        self.fire_due(now);
    }

    /// Move past a resolved round: either the next question or the end of
    /// the session. Ignored while a round is still being answered.
    pub fn advance(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let resolved = self
            .round
            .as_ref()
            .is_some_and(|round| round.status().is_resolved());
        if !resolved {
            return;
        }

        self.cancel_timer();
        if self.session.round_index >= self.config.total_questions {
            self.finish_session();
        } else {
            self.next_round();
        }
    }

    pub fn session_result(&self) -> Option<&SessionResult> {
        match self.phase {
            Phase::Ended => self.result.as_ref(),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        let status = self.status();
        let round = self.round.as_ref();
        let revealed = round.is_some_and(|r| r.status().is_resolved());
        let now = self.last_tick.unwrap_or_else(|| self.clock.now());

        let remaining_ms = match (status, self.config.mode) {
            (QuizStatus::Active, QuizMode::FindAll) => self
                .scheduler
                .remaining(now)
                .map(|d| d.as_millis() as u64),
            _ => None,
        };

        QuizSnapshot {
            status,
            mode: self.config.mode,
            target_position: round.map(RoundState::target),
            target_pitch: round.filter(|_| revealed).map(RoundState::target_pitch),
            required_positions: round
                .filter(|_| revealed)
                .map(|r| r.required().to_vec())
                .unwrap_or_default(),
            selected_positions: round.map(|r| r.selected().to_vec()).unwrap_or_default(),
            wrong_selections: round
                .map(|r| r.wrong_selections().copied().collect())
                .unwrap_or_default(),
            guess: round.and_then(RoundState::guess),
            round_index: self.session.round_index,
            total_questions: self.config.total_questions,
            score: self.session.score,
            remaining_ms,
            elapsed_ms: round.map(|r| r.elapsed(now).as_millis() as u64),
            max_fret: self.config.max_fret,
        }
    }

    fn next_round(&mut self) {
        let now = self.clock.now();
        let mut round =
            RoundState::generate(self.config.mode, &self.tuning, self.config.max_fret, &mut self.rng);
        round.activate(now);
        self.session.round_index += 1;
        debug!(
            "round {}/{}: target {} ({}), {} other positions",
            self.session.round_index,
            self.config.total_questions,
            round.target(),
            round.target_pitch(),
            round.required().len()
        );

        if let Some(limit) = self.config.time_limit() {
            self.schedule(now, limit, Scheduled::RoundTimeout);
        }
        self.last_tick = Some(now);
        self.round = Some(round);
    }

    fn finish_round(&mut self, now: Instant) {
        self.cancel_timer();
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let status = round.status();
        let record = self.session.record(round, round.elapsed(now));
        info!(
            "round {} {}: {} at {} in {} ms",
            record.round, record.outcome, record.target_pitch, record.target, record.elapsed_ms
        );

        let delay = self.config.settle.after(status);
        if delay.is_zero() {
            self.advance();
        } else {
            self.schedule(now, delay, Scheduled::Advance);
        }
    }

    /// Run the scheduled action if it is due. Returns whether one fired.
    fn fire_due(&mut self, now: Instant) -> bool {
        let Some(action) = self.scheduler.poll(now) else {
            return false;
        };
        self.timer = None;
        match action {
            Scheduled::RoundTimeout => {
                let timed_out = self
                    .round
                    .as_mut()
                    .is_some_and(|round| round.time_out(now));
                if timed_out {
                    self.finish_round(now);
                }
            }
            Scheduled::Advance => self.advance(),
        }
        true
    }

    fn schedule(&mut self, now: Instant, delay: Duration, action: Scheduled) {
        self.cancel_timer();
        self.timer = Some(self.scheduler.after(now, delay, action));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn finish_session(&mut self) {
        let result = SessionResult::from_session(&self.session, self.config.total_questions);
        info!(
            "session ended: {}/{} grade {} avg {} ms",
            result.score, result.total_questions, result.grade, result.average_time_ms
        );
        self.result = Some(result);
        self.phase = Phase::Ended;
    }
}
