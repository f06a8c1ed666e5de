use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use fretquiz::{
    app::{App, AppAction},
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    fretboard::Tuning,
    logging::init_logging,
    quiz::QuizEngine,
    random::RngSource,
    round::QuizMode,
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    ui::screen::current_screen,
};
use rand::rngs::StdRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 50;

type FretApp = App<SystemClock, RngSource<StdRng>>;

/// fretboard note trainer: find every matching position or name the note
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal fretboard trainer. In find-all mode, mark every other position of the highlighted note before the timer runs out; in guess mode, name the highlighted note."
)]
pub struct Cli {
    /// quiz variant to play
    #[clap(short = 'm', long, value_enum)]
    mode: Option<CliMode>,

    /// number of questions per session
    #[clap(short = 'q', long)]
    questions: Option<usize>,

    /// seconds allowed per question in find-all mode
    #[clap(short = 't', long)]
    wait_time: Option<u64>,

    /// highest fret on the board (0-24)
    #[clap(short = 'f', long)]
    max_fret: Option<u8>,

    /// seed the question generator for a repeatable session
    #[clap(long)]
    seed: Option<u64>,

    /// remember the given options as the new defaults
    #[clap(long)]
    save_config: bool,

    /// write debug logs to the state directory
    #[clap(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum CliMode {
    FindAll,
    Guess,
}

impl CliMode {
    fn as_mode(&self) -> QuizMode {
        match self {
            CliMode::FindAll => QuizMode::FindAll,
            CliMode::Guess => QuizMode::Guess,
        }
    }
}

impl Cli {
    /// Stored preferences with any flags given on the command line applied on top
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(mode) = self.mode {
            cfg.mode = mode.as_mode();
        }
        if let Some(questions) = self.questions {
            cfg.number_of_questions = questions;
        }
        if let Some(wait_time) = self.wait_time {
            cfg.wait_time_secs = wait_time;
        }
        if let Some(max_fret) = self.max_fret {
            cfg.max_fret = max_fret;
        }
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = FileConfigStore::new();
    let cfg = cli.apply_to(store.load());
    let quiz_config = cfg.to_quiz_config();
    if let Err(e) = quiz_config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, e).exit();
    }
    if cli.save_config {
        store.save(&cfg)?;
        log::info!("saved preferences to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let rng = match cli.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let engine = QuizEngine::new(Tuning::standard(), SystemClock, rng);
    let mut app: FretApp = App::new(engine, quiz_config)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        log::error!("terminal loop failed: {}", e);
    }
    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut FretApp,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| {
            current_screen::<SystemClock, RngSource<StdRng>>(&app.state).render(&*app, f)
        })?;

        match runner.step() {
            QuizEvent::Tick => app.on_tick(Instant::now()),
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => {
                if app.on_key(key) == AppAction::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
