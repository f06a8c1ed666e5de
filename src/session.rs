use std::time::Duration;

use crate::error::QuizError;
use crate::fretboard::{PitchClass, Position, FRET_LIMIT};
use crate::round::{QuizMode, RoundState, RoundStatus};

pub const DEFAULT_WAIT_TIME_SECS: u64 = 10;
pub const DEFAULT_MAX_FRET: u8 = 11;
pub const DEFAULT_TOTAL_QUESTIONS: usize = 10;

/// Review window after a round resolves, per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    pub correct: Duration,
    pub wrong: Duration,
    pub timed_out: Duration,
}

impl SettleDelays {
    pub fn for_mode(mode: QuizMode) -> Self {
        match mode {
            QuizMode::FindAll => Self {
                correct: Duration::from_secs(1),
                wrong: Duration::from_secs(2),
                timed_out: Duration::from_secs(2),
            },
            QuizMode::Guess => Self {
                correct: Duration::from_secs(5),
                wrong: Duration::from_secs(5),
                timed_out: Duration::from_secs(5),
            },
        }
    }

    /// No review window: rounds advance as soon as they resolve.
    pub fn none() -> Self {
        Self {
            correct: Duration::ZERO,
            wrong: Duration::ZERO,
            timed_out: Duration::ZERO,
        }
    }

    pub fn after(&self, status: RoundStatus) -> Duration {
        match status {
            RoundStatus::Correct => self.correct,
            RoundStatus::Wrong => self.wrong,
            RoundStatus::TimedOut => self.timed_out,
            RoundStatus::Pending | RoundStatus::Active => Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub mode: QuizMode,
    pub total_questions: usize,
    /// Per-round limit in find-all mode; `None` means the default.
    pub wait_time_secs: Option<u64>,
    pub max_fret: u8,
    pub settle: SettleDelays,
}

impl QuizConfig {
    pub fn new(mode: QuizMode, total_questions: usize, max_fret: u8) -> Self {
        Self {
            mode,
            total_questions,
            wait_time_secs: None,
            max_fret,
            settle: SettleDelays::for_mode(mode),
        }
    }

    pub fn with_wait_time(mut self, secs: u64) -> Self {
        self.wait_time_secs = Some(secs);
        self
    }

    pub fn with_settle(mut self, settle: SettleDelays) -> Self {
        self.settle = settle;
        self
    }

    /// Round deadline, only enforced in find-all mode.
    pub fn time_limit(&self) -> Option<Duration> {
        match self.mode {
            QuizMode::FindAll => Some(Duration::from_secs(
                self.wait_time_secs.unwrap_or(DEFAULT_WAIT_TIME_SECS),
            )),
            QuizMode::Guess => None,
        }
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.total_questions < 1 {
            return Err(QuizError::invalid("total_questions", "must be at least 1"));
        }
        if self.max_fret > FRET_LIMIT {
            return Err(QuizError::invalid(
                "max_fret",
                format!("must be at most {FRET_LIMIT}, got {}", self.max_fret),
            ));
        }
        if self.mode == QuizMode::FindAll && self.wait_time_secs == Some(0) {
            return Err(QuizError::invalid("wait_time_secs", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::new(QuizMode::FindAll, DEFAULT_TOTAL_QUESTIONS, DEFAULT_MAX_FRET)
    }
}

/// Outcome of one finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    /// 1-based question number.
    pub round: usize,
    pub target: Position,
    pub target_pitch: PitchClass,
    pub outcome: RoundStatus,
    pub elapsed_ms: u64,
    pub guess: Option<PitchClass>,
}

impl RoundRecord {
    pub fn is_correct(&self) -> bool {
        self.outcome == RoundStatus::Correct
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Number of rounds generated so far; the current question number.
    pub round_index: usize,
    pub score: usize,
    pub accumulated_correct_ms: u64,
    pub results: Vec<RoundRecord>,
}

impl SessionState {
    /// Fold a resolved round into the totals. Only correct rounds score or
    /// add time.
    pub fn record(&mut self, round: &RoundState, elapsed: Duration) -> &RoundRecord {
        let outcome = round.status();
        let elapsed_ms = elapsed.as_millis() as u64;
        if outcome == RoundStatus::Correct {
            self.score += 1;
            self.accumulated_correct_ms += elapsed_ms;
        }
        self.results.push(RoundRecord {
            round: self.round_index,
            target: round.target(),
            target_pitch: round.target_pitch(),
            outcome,
            elapsed_ms,
            guess: round.guess(),
        });
        &self.results[self.results.len() - 1]
    }
}
