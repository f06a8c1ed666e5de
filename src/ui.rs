pub mod charting;
pub mod fretboard;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};

use crate::app::{App, AppState};
use crate::clock::Clock;
use crate::fretboard::PitchClass;
use crate::quiz::{QuizSnapshot, QuizStatus};
use crate::random::RandomSource;
use crate::round::QuizMode;
use crate::scoring::Grade;
use crate::ui::fretboard::FretboardView;
use crate::util::format_time;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl<C: Clock, R: RandomSource> Widget for &App<C, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Quiz => render_quiz(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

pub fn render_quiz<C: Clock, R: RandomSource>(app: &App<C, R>, area: Rect, buf: &mut Buffer) {
    let snap = app.engine.snapshot();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let picker_lines = if snap.mode == QuizMode::Guess { 2 } else { 0 };
    let board_height = 7;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // status line
            Constraint::Length(2), // prompt
            Constraint::Length(board_height),
            Constraint::Length(picker_lines),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let timer = match (snap.remaining_ms, snap.elapsed_ms) {
        (Some(remaining), _) => format!("Time: {}", format_time(remaining)),
        (None, Some(elapsed)) if snap.mode == QuizMode::Guess => {
            format!("Time: {}", format_time(elapsed))
        }
        _ => String::new(),
    };
    let status_line = Paragraph::new(Span::styled(
        format!(
            "{}   Q{}/{}   Score: {}   {}",
            snap.mode, snap.round_index, snap.total_questions, snap.score, timer
        ),
        dim_bold_style,
    ))
    .alignment(Alignment::Center);
    status_line.render(chunks[0], buf);

    Paragraph::new(prompt_line(&snap))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    let board_width = FretboardView::width(snap.max_fret).min(chunks[2].width);
    let board_area = Rect {
        x: chunks[2].x + (chunks[2].width - board_width) / 2,
        width: board_width,
        ..chunks[2]
    };
    FretboardView {
        snapshot: &snap,
        tuning: app.engine.tuning(),
        cursor: (snap.mode == QuizMode::FindAll).then_some(app.cursor),
    }
    .render(board_area, buf);

    if snap.mode == QuizMode::Guess {
        Paragraph::new(note_picker(&snap, app.note_cursor))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    let legend = match snap.mode {
        QuizMode::FindAll => "(arrows) move / (space) select / (enter) submit / (n)ext / (esc)ape",
        QuizMode::Guess => "(←→ a-g #) choose / (enter) answer / (n)ext / (esc)ape",
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[5], buf);
}

fn prompt_line(snap: &QuizSnapshot) -> Line<'static> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    match snap.status {
        QuizStatus::Correct => Line::from(Span::styled(
            format!(
                "✓ Correct! ({}s)",
                format_time(snap.elapsed_ms.unwrap_or_default())
            ),
            bold_style.fg(Color::Green),
        )),
        QuizStatus::Wrong => {
            let answer = snap
                .target_pitch
                .map(|p| format!(" It was {p}."))
                .unwrap_or_default();
            Line::from(Span::styled(
                format!("✗ Wrong!{answer}"),
                bold_style.fg(Color::Red),
            ))
        }
        QuizStatus::TimedOut => Line::from(Span::styled(
            "⏱ Time's up!".to_string(),
            bold_style.fg(Color::Yellow),
        )),
        _ => Line::from(Span::styled(
            match snap.mode {
                QuizMode::FindAll => "Find every other position of the highlighted note",
                QuizMode::Guess => "Name the highlighted note",
            },
            bold_style,
        )),
    }
}

fn note_picker(snap: &QuizSnapshot, cursor: PitchClass) -> Line<'static> {
    let spans = PitchClass::ALL
        .iter()
        .map(|&pitch| {
            let mut style = Style::default();
            if pitch == cursor && snap.status == QuizStatus::Active {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            if snap.guess == Some(pitch) {
                style = style.fg(if snap.target_pitch == Some(pitch) {
                    Color::Green
                } else {
                    Color::Red
                });
            } else if snap.is_revealed() && snap.target_pitch == Some(pitch) {
                style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
            }
            Span::styled(format!(" {pitch:<2} "), style)
        })
        .collect_vec();
    Line::from(spans)
}

pub fn render_results<C: Clock, R: RandomSource>(app: &App<C, R>, area: Rect, buf: &mut Buffer) {
    let Some(result) = app.engine.session_result() else {
        return;
    };
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // grade
            Constraint::Length(1), // stats
            Constraint::Length(1), // misses
            Constraint::Length(1), // padding
            Constraint::Min(1),    // chart
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let grade_color = match result.grade {
        Grade::S => Color::Magenta,
        Grade::A => Color::Green,
        Grade::B => Color::Yellow,
        Grade::C => Color::Red,
    };
    Paragraph::new(Span::styled(
        format!("Grade {}", result.grade),
        bold_style.fg(grade_color),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} / {}   {}% correct   avg {}s",
            result.score,
            result.total_questions,
            result.percent(),
            format_time(result.average_time_ms)
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let missed = result
        .rounds
        .iter()
        .filter(|r| !r.is_correct())
        .map(|r| format!("Q{} {}", r.round, r.target_pitch))
        .join(", ");
    if !missed.is_empty() {
        Paragraph::new(Span::styled(format!("missed: {missed}"), italic_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    let points = charting::answer_time_points(&result.rounds);
    let (last_question, slowest) =
        charting::compute_chart_params(&points, result.total_questions);
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Scatter)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("question")
                .bounds([1.0, last_question])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(last_question), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, slowest])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(slowest), bold_style),
                ]),
        )
        .render(chunks[4], buf);

    Paragraph::new(Span::styled("(r)etry / (esc)ape", italic_style)).render(chunks[6], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::fretboard::Tuning;
    use crate::quiz::{QuizEngine, QuizInput};
    use crate::random::ScriptedSource;
    use crate::session::QuizConfig;

    fn create_test_app(mode: QuizMode) -> App<ManualClock, ScriptedSource> {
        let engine = QuizEngine::new(
            Tuning::standard(),
            ManualClock::new(),
            ScriptedSource::new(vec![5, 0]),
        );
        App::new(engine, QuizConfig::new(mode, 1, 11)).unwrap()
    }

    fn render(app: &App<ManualClock, ScriptedSource>) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_ui_find_all_in_progress() {
        let app = create_test_app(QuizMode::FindAll);
        let rendered = render(&app);
        assert!(rendered.contains("Same Note Finder"));
        assert!(rendered.contains("Q1/1"));
        assert!(rendered.contains("Time: 10.00"));
        assert!(rendered.contains("Find every other position"));
    }

    #[test]
    fn test_ui_guess_shows_picker() {
        let app = create_test_app(QuizMode::Guess);
        let rendered = render(&app);
        assert!(rendered.contains("Name the highlighted note"));
        assert!(rendered.contains(" A# "));
    }

    #[test]
    fn test_ui_wrong_feedback() {
        let mut app = create_test_app(QuizMode::Guess);
        app.engine.handle_input(QuizInput::SubmitPitch(PitchClass::G));
        let rendered = render(&app);
        assert!(rendered.contains("Wrong! It was E."));
    }

    #[test]
    fn test_ui_results() {
        let mut app = create_test_app(QuizMode::FindAll);
        app.engine.handle_input(QuizInput::Submit);
        app.engine.advance();
        app.state = AppState::Results;

        let rendered = render(&app);
        assert!(rendered.contains("Grade C"));
        assert!(rendered.contains("0 / 1"));
        assert!(rendered.contains("missed: Q1 E"));
        assert!(rendered.contains("(r)etry"));
    }
}
