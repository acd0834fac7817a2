//! Scripted whole-session flows through the command grammar.

use std::fs;
use std::path::PathBuf;

use othello::command::Command;
use othello::error::GameError;
use othello::game::{Game, Outcome};
use othello::types::Disc;

fn temp_save_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("othello-test-{}-{tag}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// Drives one input line against the session the way the binary's command
/// loop does.
fn run(game: &mut Game, line: &str) -> Result<bool, GameError> {
    match Command::parse(line)?.expect("test lines are never blank") {
        Command::New => {
            game.reset();
            Ok(true)
        }
        Command::Place(pos) => game.make_move(pos).map(|_| true),
        Command::Save(name) => game.save_game(&name).map(|_| false),
        Command::Load(name) => game.load_game(&name).map(|_| true),
        Command::Undo => Ok(game.undo_last_move()),
        Command::Redo => Ok(game.redo_last_move()),
        Command::Exit => unreachable!("exit is not exercised here"),
    }
}

#[test]
fn opening_exchange_alternates_turns() {
    let mut game = Game::new(temp_save_dir("opening"));

    run(&mut game, "place d3").unwrap();
    assert_eq!(game.scores(), (4, 1));
    assert_eq!(game.current(), Disc::White);

    run(&mut game, "place e3").unwrap();
    assert_eq!(game.scores(), (3, 3));
    assert_eq!(game.current(), Disc::Black);
    assert!(!game.is_finished());
}

#[test]
fn save_load_round_trip_restores_grid_and_mover() {
    let dir = temp_save_dir("roundtrip");
    let mut game = Game::new(&dir);

    run(&mut game, "place d3").unwrap();
    run(&mut game, "save game.oth").unwrap();
    assert!(dir.join("game.oth").is_file());

    run(&mut game, "new").unwrap();
    assert_eq!(game.scores(), (2, 2));

    run(&mut game, "load game.oth").unwrap();
    assert_eq!(game.scores(), (4, 1));
    assert_eq!(game.current(), Disc::White);
    assert!(!game.is_finished());

    // A loaded session starts a fresh history.
    assert!(!run(&mut game, "undo").unwrap());
    assert_eq!(game.scores(), (4, 1));
}

#[test]
fn undo_redo_follow_the_session_and_diverging_moves_drop_redo() {
    let mut game = Game::new(temp_save_dir("undo-redo"));

    run(&mut game, "place d3").unwrap();
    assert!(run(&mut game, "undo").unwrap());
    assert_eq!(game.scores(), (2, 2));
    assert_eq!(game.current(), Disc::Black);

    assert!(run(&mut game, "redo").unwrap());
    assert_eq!(game.scores(), (4, 1));
    assert_eq!(game.current(), Disc::White);

    // Diverge: rewind again, then play a different opening.
    assert!(run(&mut game, "undo").unwrap());
    run(&mut game, "place c4").unwrap();
    assert_eq!(game.scores(), (4, 1));

    assert!(!run(&mut game, "redo").unwrap());
    assert_eq!(game.scores(), (4, 1));
    assert_eq!(game.current(), Disc::White);
}

#[test]
fn loading_a_dead_position_finishes_immediately() {
    let dir = temp_save_dir("dead");
    fs::create_dir_all(&dir).unwrap();
    let all_black = format!("{}W\n", "B B B B B B B B\n".repeat(8));
    fs::write(dir.join("done.oth"), all_black).unwrap();

    let mut game = Game::new(&dir);
    run(&mut game, "load done.oth").unwrap();

    assert!(game.is_finished());
    assert_eq!(game.scores(), (64, 0));
    assert_eq!(game.outcome(), Some(Outcome::Winner(Disc::Black)));
}

#[test]
fn equal_counts_on_a_dead_position_are_a_draw() {
    let dir = temp_save_dir("draw");
    fs::create_dir_all(&dir).unwrap();
    let split = format!(
        "{}{}B\n",
        "B B B B B B B B\n".repeat(4),
        "W W W W W W W W\n".repeat(4)
    );
    fs::write(dir.join("split.oth"), split).unwrap();

    let mut game = Game::new(&dir);
    run(&mut game, "load split.oth").unwrap();

    assert!(game.is_finished());
    assert_eq!(game.scores(), (32, 32));
    assert_eq!(game.outcome(), Some(Outcome::Draw));
}

#[test]
fn corrupt_saves_are_rejected_and_leave_the_session_alone() {
    let dir = temp_save_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("short.oth"), "B W .\n").unwrap();
    fs::write(
        dir.join("marker.oth"),
        format!("{}X\n", ". . . . . . . .\n".repeat(8)),
    )
    .unwrap();
    fs::write(
        dir.join("nomarker.oth"),
        ". . . . . . . .\n".repeat(8),
    )
    .unwrap();

    let mut game = Game::new(&dir);
    run(&mut game, "place d3").unwrap();

    for line in ["load short.oth", "load marker.oth", "load nomarker.oth"] {
        let err = run(&mut game, line).unwrap_err();
        assert!(matches!(err, GameError::CorruptData(_)), "{line}: {err}");
        assert_eq!(game.scores(), (4, 1));
        assert_eq!(game.current(), Disc::White);
    }

    let err = run(&mut game, "load missing.oth").unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
    assert_eq!(game.scores(), (4, 1));
}

#[test]
fn rejected_commands_leave_the_session_unchanged() {
    let mut game = Game::new(temp_save_dir("rejected"));

    for line in [
        "place a1",    // no bracket anywhere
        "place d4",    // occupied
        "place k9",    // off the board
        "place d33",   // malformed square
        "save game",   // missing extension
        "flip d3",     // unknown command
        "new game",    // trailing argument
    ] {
        let err = run(&mut game, line).unwrap_err();
        assert!(
            matches!(
                err,
                GameError::IllegalMove
                    | GameError::CellOccupied
                    | GameError::OutOfRange
                    | GameError::InvalidCommand(_)
            ),
            "{line}: {err}"
        );
        assert_eq!(game.scores(), (2, 2));
        assert_eq!(game.current(), Disc::Black);
        assert!(!game.is_finished());
    }
}
