use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::fretboard::{
    pitch_at, positions_for_pitch, PitchClass, Position, PositionSet, Tuning,
};
use crate::random::RandomSource;

/// Rule variant of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum QuizMode {
    /// Select every other position sounding the highlighted pitch class.
    #[default]
    #[strum(to_string = "Same Note Finder")]
    FindAll,
    /// Name the pitch class at the highlighted position.
    #[strum(to_string = "Guess The Note")]
    Guess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RoundStatus {
    Pending,
    Active,
    Correct,
    Wrong,
    #[strum(to_string = "Timed out")]
    TimedOut,
}

impl RoundStatus {
    pub fn is_resolved(self) -> bool {
        matches!(
            self,
            RoundStatus::Correct | RoundStatus::Wrong | RoundStatus::TimedOut
        )
    }
}

/// One question: a target coordinate plus the player's response so far.
#[derive(Debug, Clone)]
pub struct RoundState {
    mode: QuizMode,
    tuning: Tuning,
    max_fret: u8,
    target: Position,
    target_pitch: PitchClass,
    /// Positions sharing `target_pitch`, never including `target`.
    required: PositionSet,
    selected: PositionSet,
    guess: Option<PitchClass>,
    started_at: Option<Instant>,
    resolved_at: Option<Instant>,
    status: RoundStatus,
}

impl RoundState {
    /// Build a pending round around `target`, or `None` if it is off the board.
    pub fn new(mode: QuizMode, tuning: &Tuning, max_fret: u8, target: Position) -> Option<Self> {
        if !tuning.contains(target, max_fret) {
            return None;
        }
        let open = tuning.open_pitch(target.string)?;
        Some(Self::build(mode, tuning, max_fret, target, open))
    }

    /// Draw a uniformly random target on frets `0..=max_fret`.
    pub fn generate<R: RandomSource + ?Sized>(
        mode: QuizMode,
        tuning: &Tuning,
        max_fret: u8,
        rng: &mut R,
    ) -> Self {
        let strings = tuning.strings();
        let spec = strings[rng.random_index(strings.len())];
        let fret = rng.random_index(max_fret as usize + 1) as u8;
        Self::build(mode, tuning, max_fret, Position::new(spec.id, fret), spec.open)
    }

    fn build(
        mode: QuizMode,
        tuning: &Tuning,
        max_fret: u8,
        target: Position,
        open: PitchClass,
    ) -> Self {
        let target_pitch = pitch_at(open, target.fret);
        let mut required = positions_for_pitch(target_pitch, tuning.strings(), max_fret);
        required.remove(&target);

        Self {
            mode,
            tuning: tuning.clone(),
            max_fret,
            target,
            target_pitch,
            required,
            selected: PositionSet::new(),
            guess: None,
            started_at: None,
            resolved_at: None,
            status: RoundStatus::Pending,
        }
    }

    pub fn activate(&mut self, now: Instant) {
        if self.status == RoundStatus::Pending {
            self.started_at = Some(now);
            self.status = RoundStatus::Active;
        }
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn target_pitch(&self) -> PitchClass {
        self.target_pitch
    }

    pub fn required(&self) -> &PositionSet {
        &self.required
    }

    pub fn selected(&self) -> &PositionSet {
        &self.selected
    }

    pub fn guess(&self) -> Option<PitchClass> {
        self.guess
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    /// Whether `position` sounds the target pitch class (the target included).
    pub fn matches(&self, position: &Position) -> bool {
        *position == self.target || self.required.contains(position)
    }

    /// Selected positions that do not sound the target pitch class.
    pub fn wrong_selections(&self) -> impl Iterator<Item = &Position> {
        self.selected.iter().filter(|p| !self.required.contains(p))
    }

    /// Time from activation to resolution, or to `now` while unresolved.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => self.resolved_at.unwrap_or(now).saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }

    /// Toggle `position` in the selection (find-all only).
    ///
    /// Ignored unless the round is active, the position is on the board and
    /// is not the target. Resolves the round as correct when the selection
    /// becomes exactly the required set. Returns whether anything changed.
    pub fn toggle(&mut self, position: Position, now: Instant) -> bool {
        if self.mode != QuizMode::FindAll || !self.is_active() || position == self.target {
            return false;
        }
        if !self.tuning.contains(position, self.max_fret) {
            return false;
        }

        self.selected.toggle(position);
        if self.is_selection_complete() {
            self.resolve(RoundStatus::Correct, now);
        }
        true
    }

    /// Auto-submit rule: non-empty, no wrong selections, same size as required.
    pub fn is_selection_complete(&self) -> bool {
        !self.selected.is_empty()
            && self.selected.is_subset(&self.required)
            && self.selected.len() == self.required.len()
    }

    /// Evaluate the current selection immediately (find-all only).
    pub fn submit(&mut self, now: Instant) -> Option<RoundStatus> {
        if self.mode != QuizMode::FindAll || !self.is_active() {
            return None;
        }
        let all_found = self.required.is_subset(&self.selected);
        let none_wrong = self.selected.is_subset(&self.required);
        let status = if all_found && none_wrong {
            RoundStatus::Correct
        } else {
            RoundStatus::Wrong
        };
        self.resolve(status, now);
        Some(status)
    }

    /// Answer with a pitch class (guess only).
    pub fn submit_pitch(&mut self, pitch: PitchClass, now: Instant) -> Option<RoundStatus> {
        if self.mode != QuizMode::Guess || !self.is_active() {
            return None;
        }
        self.guess = Some(pitch);
        let status = if pitch == self.target_pitch {
            RoundStatus::Correct
        } else {
            RoundStatus::Wrong
        };
        self.resolve(status, now);
        Some(status)
    }

    pub fn time_out(&mut self, now: Instant) -> bool {
        if !self.is_active() {
            return false;
        }
        self.resolve(RoundStatus::TimedOut, now);
        true
    }

    fn resolve(&mut self, status: RoundStatus, now: Instant) {
        self.status = status;
        self.resolved_at = Some(now);
    }
}
