use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::Clock;
use crate::error::QuizError;
use crate::fretboard::{PitchClass, Position, STRING_COUNT};
use crate::quiz::{QuizEngine, QuizInput, QuizStatus};
use crate::random::RandomSource;
use crate::round::QuizMode;
use crate::session::QuizConfig;
use crate::util::wrap_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Quiz,
    Results,
}

/// What the terminal loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Keyboard-driven front end state around a [`QuizEngine`].
pub struct App<C: Clock, R: RandomSource> {
    pub engine: QuizEngine<C, R>,
    pub quiz_config: QuizConfig,
    pub state: AppState,
    /// Board cursor in find-all mode.
    pub cursor: Position,
    /// Highlighted answer in guess mode.
    pub note_cursor: PitchClass,
}

impl<C: Clock, R: RandomSource> App<C, R> {
    pub fn new(mut engine: QuizEngine<C, R>, quiz_config: QuizConfig) -> Result<Self, QuizError> {
        engine.start(quiz_config.clone())?;
        Ok(Self {
            engine,
            quiz_config,
            state: AppState::Quiz,
            cursor: Position::new(1, 0),
            note_cursor: PitchClass::C,
        })
    }

    pub fn mode(&self) -> QuizMode {
        self.quiz_config.mode
    }

    pub fn restart(&mut self) -> Result<(), QuizError> {
        self.engine.start(self.quiz_config.clone())?;
        self.state = AppState::Quiz;
        self.cursor = Position::new(1, 0);
        self.note_cursor = PitchClass::C;
        Ok(())
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.engine.on_tick(now);
        self.sync_state();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return AppAction::Quit;
        }

        match self.state {
            AppState::Quiz => {
                match self.mode() {
                    QuizMode::FindAll => self.on_find_all_key(key.code),
                    QuizMode::Guess => self.on_guess_key(key.code),
                }
                if key.code == KeyCode::Char('n') && self.engine.status().is_reviewing() {
                    self.engine.advance();
                }
                self.sync_state();
            }
            AppState::Results => {
                if key.code == KeyCode::Char('r') {
                    if let Err(e) = self.restart() {
                        log::error!("restart failed: {}", e);
                    }
                }
            }
        }
        AppAction::Continue
    }

    fn on_find_all_key(&mut self, code: KeyCode) {
        let max_fret = self.quiz_config.max_fret as usize;
        match code {
            KeyCode::Up => self.move_string(-1),
            KeyCode::Down => self.move_string(1),
            KeyCode::Left => {
                self.cursor.fret = wrap_step(self.cursor.fret as usize, -1, max_fret) as u8
            }
            KeyCode::Right => {
                self.cursor.fret = wrap_step(self.cursor.fret as usize, 1, max_fret) as u8
            }
            KeyCode::Char(' ') => {
                self.engine.handle_input(QuizInput::Toggle(self.cursor));
            }
            KeyCode::Enter => {
                self.engine.handle_input(QuizInput::Submit);
            }
            _ => {}
        }
    }

    fn on_guess_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.note_cursor = self.note_cursor.transpose(11),
            KeyCode::Right | KeyCode::Char('#') => self.note_cursor = self.note_cursor.transpose(1),
            KeyCode::Char(c) => {
                if let Some(pitch) = PitchClass::natural(c) {
                    self.note_cursor = pitch;
                }
            }
            KeyCode::Enter => {
                self.engine
                    .handle_input(QuizInput::SubmitPitch(self.note_cursor));
            }
            _ => {}
        }
    }

    fn move_string(&mut self, delta: isize) {
        let index = wrap_step(self.cursor.string as usize - 1, delta, STRING_COUNT - 1);
        self.cursor.string = index as u8 + 1;
    }

    fn sync_state(&mut self) {
        if self.engine.status() == QuizStatus::Ended {
            self.state = AppState::Results;
        }
    }
}
