use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::fretboard::{Position, Tuning};
use crate::quiz::{CellMark, QuizSnapshot};

pub const CELL_WIDTH: usize = 4;
const LABEL_WIDTH: usize = 3;

/// Board grid: a fret-number header, then string 1 (top) to string 6.
pub struct FretboardView<'a> {
    pub snapshot: &'a QuizSnapshot,
    pub tuning: &'a Tuning,
    pub cursor: Option<Position>,
}

impl FretboardView<'_> {
    pub fn width(max_fret: u8) -> u16 {
        (LABEL_WIDTH + CELL_WIDTH * (max_fret as usize + 1)) as u16
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let max_fret = self.snapshot.max_fret;

        let mut header = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
        header.extend((0..=max_fret).map(|fret| Span::styled(center(&fret.to_string()), dim)));

        let mut lines = vec![Line::from(header)];
        for string in self.tuning.strings() {
            let mut spans = vec![Span::styled(
                format!("{:<width$}", string.open.to_string(), width = LABEL_WIDTH),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            for fret in 0..=max_fret {
                spans.push(self.cell(Position::new(string.id, fret)));
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn cell(&self, position: Position) -> Span<'static> {
        let snap = self.snapshot;
        let revealed = snap.is_revealed();
        let pitch_label = || {
            self.tuning
                .pitch_at_position(position)
                .map(|p| p.to_string())
                .unwrap_or_default()
        };

        let (text, style) = match snap.mark_at(position) {
            CellMark::Empty => ("──".to_string(), Style::default().add_modifier(Modifier::DIM)),
            CellMark::Target => (
                snap.target_pitch
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            CellMark::Correct => (
                if revealed { pitch_label() } else { "●".to_string() },
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            CellMark::Wrong => (
                if revealed { pitch_label() } else { "✗".to_string() },
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            CellMark::Missed => (pitch_label(), Style::default().fg(Color::Yellow)),
            CellMark::Revealed => (pitch_label(), Style::default().fg(Color::Cyan)),
        };

        let style = if self.cursor == Some(position) {
            style.add_modifier(Modifier::UNDERLINED).bg(Color::DarkGray)
        } else {
            style
        };
        Span::styled(center(&text), style)
    }
}

impl Widget for FretboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines()).render(area, buf);
    }
}

/// Pad `text` to exactly one cell, centred.
fn center(text: &str) -> String {
    let width = text.width().min(CELL_WIDTH);
    let left = (CELL_WIDTH - width) / 2;
    let right = CELL_WIDTH - width - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuizStatus;
    use crate::round::QuizMode;

    fn snapshot() -> QuizSnapshot {
        QuizSnapshot {
            status: QuizStatus::Active,
            mode: QuizMode::FindAll,
            target_position: Some(Position::new(6, 0)),
            target_pitch: None,
            required_positions: vec![],
            selected_positions: vec![Position::new(1, 0), Position::new(1, 1)],
            wrong_selections: vec![Position::new(1, 1)],
            guess: None,
            round_index: 1,
            total_questions: 5,
            score: 0,
            remaining_ms: Some(8000),
            elapsed_ms: Some(2000),
            max_fret: 11,
        }
    }

    fn render_to_string(view: FretboardView) -> String {
        let area = Rect::new(0, 0, FretboardView::width(11), 7);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_center_pads_to_cell_width() {
        assert_eq!(center("E"), " E  ");
        assert_eq!(center("C#"), " C# ");
        assert_eq!(center("11"), " 11 ");
    }

    #[test]
    fn test_active_board_hides_target_pitch() {
        let snap = snapshot();
        let tuning = Tuning::standard();
        let rendered = render_to_string(FretboardView {
            snapshot: &snap,
            tuning: &tuning,
            cursor: None,
        });
        assert!(rendered.contains('?'));
        assert!(rendered.contains('●'));
        assert!(rendered.contains('✗'));
    }

    #[test]
    fn test_resolved_board_labels_marked_cells() {
        let mut snap = snapshot();
        snap.status = QuizStatus::TimedOut;
        snap.target_pitch = Some(crate::fretboard::PitchClass::E);
        snap.required_positions = vec![Position::new(1, 0), Position::new(2, 5)];
        let tuning = Tuning::standard();
        let rendered = render_to_string(FretboardView {
            snapshot: &snap,
            tuning: &tuning,
            cursor: None,
        });
        assert!(!rendered.contains('?'));
        // the wrong tap at 1-1 is labelled with its own pitch
        assert!(rendered.contains(" F "));
    }
}
