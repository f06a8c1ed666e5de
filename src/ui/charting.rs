use crate::session::RoundRecord;

/// (question number, seconds) for every correctly answered round
pub fn answer_time_points(rounds: &[RoundRecord]) -> Vec<(f64, f64)> {
    rounds
        .iter()
        .filter(|r| r.is_correct())
        .map(|r| (r.round as f64, r.elapsed_ms as f64 / 1000.0))
        .collect()
}

/// Compute X (question) and Y (seconds) bounds for the results chart
pub fn compute_chart_params(points: &[(f64, f64)], total_questions: usize) -> (f64, f64) {
    let slowest = points.iter().map(|&(_, secs)| secs).fold(0.0, f64::max);
    let last_question = (total_questions as f64).max(1.0);

    (last_question, slowest.ceil().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
