use ratatui::Frame;

use crate::app::{App, AppState};
use crate::clock::Clock;
use crate::random::RandomSource;
use crate::ui::{render_quiz, render_results};

/// A UI Screen boundary: responsible for rendering one application state
pub trait Screen<C: Clock, R: RandomSource> {
    fn render(&self, app: &App<C, R>, f: &mut Frame);
}

/// Board, prompt and timer while a session is running
pub struct QuizScreen;

impl<C: Clock, R: RandomSource> Screen<C, R> for QuizScreen {
    fn render(&self, app: &App<C, R>, f: &mut Frame) {
        render_quiz(app, f.area(), f.buffer_mut());
    }
}

/// Grade, averages and the answer-time chart
pub struct ResultsScreen;

impl<C: Clock, R: RandomSource> Screen<C, R> for ResultsScreen {
    fn render(&self, app: &App<C, R>, f: &mut Frame) {
        render_results(app, f.area(), f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<C: Clock, R: RandomSource>(state: &AppState) -> Box<dyn Screen<C, R>> {
    match state {
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
