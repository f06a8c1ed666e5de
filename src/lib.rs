// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod fretboard;
pub mod logging;
pub mod quiz;
pub mod random;
pub mod round;
pub mod runtime;
pub mod schedule;
pub mod scoring;
pub mod session;
pub mod ui;
pub mod util;

pub use error::QuizError;
pub use fretboard::{PitchClass, Position, Tuning};
pub use quiz::{QuizEngine, QuizInput, QuizSnapshot, QuizStatus};
pub use round::QuizMode;
pub use session::QuizConfig;
