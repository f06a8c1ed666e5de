use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use fretquiz::app::{App, AppAction, AppState};
use fretquiz::clock::{Clock, ManualClock};
use fretquiz::fretboard::{PitchClass, Position, Tuning};
use fretquiz::quiz::{QuizEngine, QuizStatus};
use fretquiz::random::ScriptedSource;
use fretquiz::round::QuizMode;
use fretquiz::runtime::{FixedTicker, QuizEvent, Runner, TestEventSource};
use fretquiz::session::QuizConfig;

fn key(code: KeyCode) -> QuizEvent {
    QuizEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Every draw targets string 6, fret 0 (low E).
fn low_e_app(config: QuizConfig) -> (App<ManualClock, ScriptedSource>, ManualClock) {
    let clock = ManualClock::new();
    let engine = QuizEngine::new(
        Tuning::standard(),
        clock.clone(),
        ScriptedSource::new(vec![5, 0]),
    );
    (App::new(engine, config).unwrap(), clock)
}

/// Feed events through the runner the way the terminal loop does, moving the
/// manual clock forward by `tick` on every Tick.
fn drive(
    app: &mut App<ManualClock, ScriptedSource>,
    clock: &ManualClock,
    runner: &Runner<TestEventSource, FixedTicker>,
    tick: Duration,
    max_steps: u32,
) -> bool {
    for _ in 0..max_steps {
        match runner.step() {
            QuizEvent::Tick => {
                clock.advance(tick);
                app.on_tick(clock.now());
            }
            QuizEvent::Resize => {}
            QuizEvent::Key(k) => {
                if app.on_key(k) == AppAction::Quit {
                    return true;
                }
            }
        }
    }
    false
}

#[test]
fn headless_find_all_flow_reaches_results() {
    let (mut app, clock) = low_e_app(QuizConfig::new(QuizMode::FindAll, 1, 11));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    // walk the cursor to every E on the board and select it
    let targets = [(1, 0), (2, 5), (3, 9), (4, 2), (5, 7)];
    let mut cursor = Position::new(1, 0);
    for (string, fret) in targets {
        while cursor.string < string {
            tx.send(key(KeyCode::Down)).unwrap();
            cursor.string += 1;
        }
        while cursor.fret < fret {
            tx.send(key(KeyCode::Right)).unwrap();
            cursor.fret += 1;
        }
        while cursor.fret > fret {
            tx.send(key(KeyCode::Left)).unwrap();
            cursor.fret -= 1;
        }
        tx.send(key(KeyCode::Char(' '))).unwrap();
    }

    // keys, then enough ticks to cover the one second review window
    drive(&mut app, &clock, &runner, Duration::from_millis(100), 60);

    assert_eq!(app.state, AppState::Results);
    let result = app.engine.session_result().unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.grade.to_string(), "S");
}

#[test]
fn headless_round_times_out_on_ticks() {
    let config = QuizConfig::new(QuizMode::FindAll, 2, 11).with_wait_time(1);
    let (mut app, clock) = low_e_app(config);
    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    drive(&mut app, &clock, &runner, Duration::from_millis(250), 4);
    assert_eq!(app.engine.status(), QuizStatus::TimedOut);
    assert_eq!(app.engine.snapshot().required_positions.len(), 5);

    // two second review window, then question 2 begins
    drive(&mut app, &clock, &runner, Duration::from_millis(250), 8);
    assert_eq!(app.engine.status(), QuizStatus::Active);
    assert_eq!(app.engine.snapshot().round_index, 2);
    assert_eq!(app.engine.snapshot().score, 0);
}

#[test]
fn headless_guess_flow_and_quit() {
    let (mut app, clock) = low_e_app(QuizConfig::new(QuizMode::Guess, 1, 11));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(key(KeyCode::Char('e'))).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Char('n'))).unwrap();
    tx.send(key(KeyCode::Esc)).unwrap();

    let quit = drive(&mut app, &clock, &runner, Duration::from_millis(10), 20);
    assert!(quit, "esc should quit");
    assert_eq!(app.note_cursor, PitchClass::E);
    assert_eq!(app.state, AppState::Results);
    assert_eq!(app.engine.session_result().unwrap().score, 1);
}
