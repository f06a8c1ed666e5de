//! Pitch model for a six-string fretboard.
//!
//! Everything here is pure: a [`Tuning`] is built once and shared by value,
//! and the free functions map (open string, fret) pairs to pitch classes and
//! back to the set of positions sounding the same pitch class.

use std::collections::{btree_set, BTreeSet};
use std::fmt;

/// Hard upper bound for `max_fret`; boards larger than this are not supported.
pub const FRET_LIMIT: u8 = 24;

pub const STRING_COUNT: usize = 6;

/// One of the twelve octave-independent note names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display)]
pub enum PitchClass {
    C,
    #[strum(to_string = "C#")]
    CSharp,
    D,
    #[strum(to_string = "D#")]
    DSharp,
    E,
    F,
    #[strum(to_string = "F#")]
    FSharp,
    G,
    #[strum(to_string = "G#")]
    GSharp,
    A,
    #[strum(to_string = "A#")]
    ASharp,
    B,
}

impl PitchClass {
    /// Circular order starting at C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Move up by `semitones`, wrapping around the octave.
    pub fn transpose(self, semitones: usize) -> Self {
        Self::from_index(self.index() + semitones % 12)
    }

    /// Natural note for a letter key (`'a'..='g'`, either case).
    pub fn natural(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(PitchClass::C),
            'D' => Some(PitchClass::D),
            'E' => Some(PitchClass::E),
            'F' => Some(PitchClass::F),
            'G' => Some(PitchClass::G),
            'A' => Some(PitchClass::A),
            'B' => Some(PitchClass::B),
            _ => None,
        }
    }
}

/// A (string, fret) coordinate. String 1 is the highest-pitched string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub string: u8,
    pub fret: u8,
}

impl Position {
    pub const fn new(string: u8, fret: u8) -> Self {
        Self { string, fret }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.string, self.fret)
    }
}

/// Set of positions with structural membership.
///
/// Iteration order is string ascending, then fret ascending, which matches
/// the declared order of [`Tuning::standard`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSet {
    positions: BTreeSet<Position>,
}

impl PositionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.positions.contains(position)
    }

    pub fn insert(&mut self, position: Position) -> bool {
        self.positions.insert(position)
    }

    pub fn remove(&mut self, position: &Position) -> bool {
        self.positions.remove(position)
    }

    /// Removes `position` if present, inserts it otherwise.
    /// Returns true when the position is selected afterwards.
    pub fn toggle(&mut self, position: Position) -> bool {
        if self.positions.remove(&position) {
            false
        } else {
            self.positions.insert(position);
            true
        }
    }

    pub fn is_subset(&self, other: &PositionSet) -> bool {
        self.positions.is_subset(&other.positions)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Position> {
        self.positions.iter()
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.positions.iter().copied().collect()
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PositionSet {
    type Item = &'a Position;
    type IntoIter = btree_set::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSpec {
    pub id: u8,
    pub open: PitchClass,
}

/// Open pitch classes of the six strings, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    strings: [StringSpec; STRING_COUNT],
}

impl Tuning {
    /// E B G D A E, string 1 (high E) to string 6 (low E).
    pub fn standard() -> Self {
        Self {
            strings: [
                StringSpec { id: 1, open: PitchClass::E },
                StringSpec { id: 2, open: PitchClass::B },
                StringSpec { id: 3, open: PitchClass::G },
                StringSpec { id: 4, open: PitchClass::D },
                StringSpec { id: 5, open: PitchClass::A },
                StringSpec { id: 6, open: PitchClass::E },
            ],
        }
    }

    pub fn strings(&self) -> &[StringSpec] {
        &self.strings
    }

    pub fn open_pitch(&self, string: u8) -> Option<PitchClass> {
        self.strings
            .iter()
            .find(|s| s.id == string)
            .map(|s| s.open)
    }

    /// Pitch class sounding at `position`, or `None` for an unknown string.
    pub fn pitch_at_position(&self, position: Position) -> Option<PitchClass> {
        self.open_pitch(position.string)
            .map(|open| pitch_at(open, position.fret))
    }

    /// Whether `position` lies on a board with frets `0..=max_fret`.
    pub fn contains(&self, position: Position, max_fret: u8) -> bool {
        position.fret <= max_fret && self.open_pitch(position.string).is_some()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn pitch_at(open: PitchClass, fret: u8) -> PitchClass {
    open.transpose(fret as usize)
}

/// Every position on frets `0..=max_fret` whose pitch class is `pitch`.
pub fn positions_for_pitch(pitch: PitchClass, strings: &[StringSpec], max_fret: u8) -> PositionSet {
    strings
        .iter()
        .flat_map(|s| (0..=max_fret).map(move |fret| (s, fret)))
        .filter(|(s, fret)| pitch_at(s.open, *fret) == pitch)
        .map(|(s, fret)| Position::new(s.id, fret))
        .collect()
}
