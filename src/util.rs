/// Format milliseconds as `seconds.hundredths`, e.g. `1234` -> `1.23`.
pub fn format_time(ms: u64) -> String {
    let seconds = ms / 1000;
    let hundredths = (ms % 1000) / 10;
    format!("{seconds}.{hundredths:02}")
}

/// Step `current` by `delta` within `0..=max`, wrapping at both ends.
pub fn wrap_step(current: usize, delta: isize, max: usize) -> usize {
    let span = max as isize + 1;
    (current as isize + delta).rem_euclid(span) as usize
}
