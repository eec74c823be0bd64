//! Integration tests for the hegemon bot binary.
//!
//! Tests full protocol sessions by spawning the bot process, sending server
//! lines via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Output, Stdio};

/// Sends a sequence of lines to the bot and collects stdout lines.
fn run_bot(lines: &[&str]) -> Vec<String> {
    let output = spawn_bot(lines, &[]);
    assert!(output.status.success());
    output
        .stdout
        .lines()
        .map(|l| l.unwrap())
        .collect()
}

fn spawn_bot(lines: &[&str], args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_hegemon");
    let mut child = Command::new(exe)
        .args(args)
        .env_remove("HEGEMON_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start hegemon");

    let mut stdin = child.stdin.take().unwrap();
    for line in lines {
        writeln!(stdin, "{}", line).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    child.wait_with_output().expect("failed to wait on child")
}

/// Super-region 1 (reward 5) = {1, 2}, 2 (reward 2) = {3, 4},
/// 3 (reward 0) = {5}; a path 1 - 2 - 3 - 4 - 5 with 5 a wasteland.
const SETUP: &[&str] = &[
    "settings timebank 10000",
    "settings time_per_move 500",
    "settings max_rounds 45",
    "settings your_bot player1",
    "settings opponent_bot player2",
    "setup_map super_regions 1 5 2 2 3 0",
    "setup_map regions 1 1 2 1 3 2 4 2 5 3",
    "setup_map neighbors 1 2 2 3 3 4 4 5",
    "setup_map wastelands 5",
    "settings starting_regions 1 3 5",
    "settings starting_pick_amount 2",
];

fn session(rest: &[&str]) -> Vec<String> {
    let mut lines: Vec<&str> = SETUP.to_vec();
    lines.extend_from_slice(rest);
    run_bot(&lines)
}

#[test]
fn pick_prefers_richest_cheap_super_region() {
    let lines = session(&["pick_starting_region 10000 1 3 5"]);
    assert_eq!(lines, vec!["1"]);
}

#[test]
fn full_round_session() {
    let lines = session(&[
        "pick_starting_region 10000 1 3 5",
        "settings starting_armies 5",
        "update_map 1 player1 2 2 neutral 2 3 player2 4",
        "opponent_moves",
        "go place_armies 2000",
        "go attack/transfer 2000",
    ]);
    assert_eq!(
        lines,
        vec![
            "1",
            "player1 place_armies 1 2,player1 place_armies 1 3",
            "player1 attack/transfer 1 2 3",
        ]
    );
}

#[test]
fn requests_before_map_update_answer_no_moves() {
    let lines = session(&["go place_armies 500", "go attack/transfer 500"]);
    assert_eq!(lines, vec!["No moves", "No moves"]);
}

#[test]
fn malformed_lines_are_ignored() {
    let lines = session(&[
        "",
        "this is not a command",
        "setup_map neighbors 1 x,y",
        "update_map 1 player1",
        "pick_starting_region 10000 1",
    ]);
    assert_eq!(lines, vec!["1"]);
}

#[test]
fn every_request_gets_exactly_one_line() {
    let lines = session(&[
        "settings starting_armies 5",
        "update_map 1 player1 2 2 neutral 2",
        "go place_armies 500",
        "go attack/transfer 500",
        "settings starting_armies 5",
        "update_map 1 player1 1 2 player1 3 3 player2 6",
        "opponent_moves player2 place_armies 3 2 player2 attack/transfer 3 2 1",
        "go place_armies 500",
        "go attack/transfer 500",
    ]);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("player1 place_armies"));
    assert!(lines[2].starts_with("player1 place_armies"));
}

#[test]
fn missing_config_file_fails_startup() {
    let output = spawn_bot(&[], &["--config", "/nonexistent/hegemon.json"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_argument_fails_startup() {
    let output = spawn_bot(&[], &["--bogus"]);
    assert!(!output.status.success());
}
