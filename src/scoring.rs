use crate::session::{RoundRecord, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum_macros::Display)]
pub enum Grade {
    S,
    A,
    B,
    C,
}

/// Letter grade for `score` correct answers out of `total_questions`.
///
/// 100% is S, at least 80% is A, at least 60% is B, anything else C.
/// Compared in integers so 3/5 lands exactly on B.
pub fn grade(score: usize, total_questions: usize) -> Grade {
    if total_questions == 0 {
        return Grade::C;
    }
    if score >= total_questions {
        Grade::S
    } else if score * 10 >= total_questions * 8 {
        Grade::A
    } else if score * 10 >= total_questions * 6 {
        Grade::B
    } else {
        Grade::C
    }
}

/// Mean time over correct rounds only; zero when nothing was correct.
pub fn average_time_ms(accumulated_correct_ms: u64, score: usize) -> u64 {
    if score == 0 {
        0
    } else {
        accumulated_correct_ms / score as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub score: usize,
    pub total_questions: usize,
    pub average_time_ms: u64,
    pub grade: Grade,
    pub rounds: Vec<RoundRecord>,
}

impl SessionResult {
    pub fn from_session(session: &SessionState, total_questions: usize) -> Self {
        Self {
            score: session.score,
            total_questions,
            average_time_ms: average_time_ms(session.accumulated_correct_ms, session.score),
            grade: grade(session.score, total_questions),
            rounds: session.results.clone(),
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        (self.score as f64 / self.total_questions as f64 * 100.0).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade(1, 1), Grade::S);
        assert_eq!(grade(10, 10), Grade::S);
        assert_eq!(grade(9, 10), Grade::A);
        assert_eq!(grade(4, 5), Grade::A);
        assert_eq!(grade(3, 5), Grade::B);
        assert_eq!(grade(7, 10), Grade::B);
        assert_eq!(grade(2, 5), Grade::C);
        assert_eq!(grade(0, 5), Grade::C);
    }

    #[test]
    fn test_grade_boundaries_on_awkward_totals() {
        // 0.8 and 0.6 are not exact in binary; integer comparison keeps them inclusive
        assert_eq!(grade(12, 15), Grade::A);
        assert_eq!(grade(9, 15), Grade::B);
        assert_eq!(grade(8, 15), Grade::C);
    }

    #[test]
    fn test_average_over_correct_rounds_only() {
        assert_eq!(average_time_ms(0, 0), 0);
        assert_eq!(average_time_ms(4500, 3), 1500);
        assert_eq!(average_time_ms(1001, 2), 500);
    }

    #[test]
    fn test_result_from_session() {
        let session = SessionState {
            round_index: 5,
            score: 3,
            accumulated_correct_ms: 6000,
            results: vec![],
        };
        let result = SessionResult::from_session(&session, 5);
        assert_eq!(result.grade, Grade::B);
        assert_eq!(result.average_time_ms, 2000);
        assert_eq!(result.percent(), 60.0);
        assert_eq!(result.grade.to_string(), "B");
    }
}
