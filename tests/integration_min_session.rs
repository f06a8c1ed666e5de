// Drives the compiled binary through a PTY so the real event loop and
// crossterm input handling are exercised end to end.
//
// Unix-only and ignored by default since it needs a pseudo terminal.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("fretquiz");
    let cmd = format!("{} --mode guess -q 1 --seed 7", bin.display());

    let mut p = spawn(cmd)?;

    // Give the app a moment to enter the alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Answer whatever is highlighted, then skip the review window
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("n")?;
    std::thread::sleep(Duration::from_millis(200));

    // ESC quits from the results screen
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn rejects_out_of_range_fret() {
    assert_cmd::Command::cargo_bin("fretquiz")
        .unwrap()
        .args(["--max-fret", "30"])
        .assert()
        .failure();
}
