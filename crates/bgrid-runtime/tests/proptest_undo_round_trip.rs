#![forbid(unsafe_code)]

//! Property tests for session undo and redo.
//!
//! Validates:
//! - Undoing every recorded command walks the surface and the game records
//!   back through each earlier state, in reverse.
//! - Redoing them walks forward through the same states.
//! - Failed commands leave the surface and the history untouched.

use bgrid_core::{GameId, Region};
use bgrid_harness::{MemorySourceTable, MemorySurface, Workbench, single_elimination};
use bgrid_layout::GridPattern;
use bgrid_render::GameRecord;
use bgrid_runtime::{BracketConfig, BracketSession};
use proptest::prelude::*;

type MemorySession = BracketSession<MemorySurface, MemorySourceTable>;

const GAMES: u32 = 7;

// ============================================================================
// Strategy helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Command {
    Add { game: u32, day: u32, row: u32 },
    Move { game: u32, day: u32, row: u32 },
    Remove { game: u32 },
    Schedule { game: u32, field: Option<&'static str> },
}

fn command_strategy() -> impl Strategy<Value = Command> {
    let game = 1u32..=GAMES;
    prop_oneof![
        3 => (game.clone(), 0u32..5, 0u32..60)
            .prop_map(|(game, day, row)| Command::Add { game, day, row }),
        1 => (game.clone(), 0u32..5, 0u32..60)
            .prop_map(|(game, day, row)| Command::Move { game, day, row }),
        1 => game.clone().prop_map(|game| Command::Remove { game }),
        1 => (game, prop::option::of(prop::sample::select(vec!["Ballfield", "Field #1"])))
            .prop_map(|(game, field)| Command::Schedule { game, field }),
    ]
}

fn open() -> MemorySession {
    let bench = Workbench::new(single_elimination(8).unwrap());
    BracketSession::new(
        bench.surface,
        bench.source,
        bench.bracket,
        BracketConfig::default(),
    )
    .unwrap()
}

fn run(session: &mut MemorySession, command: &Command) -> bool {
    let selection = |day: u32, row: u32| {
        let column = GridPattern::default().team_column_for_day(day);
        Region::new(row, 11, column, GridPattern::DAY_WIDTH)
    };
    let result = match command {
        Command::Add { game, day, row } => {
            session.add_game(GameId::new(*game), selection(*day, *row))
        }
        Command::Move { game, day, row } => {
            session.move_game(GameId::new(*game), selection(*day, *row))
        }
        Command::Remove { game } => session.remove_game(GameId::new(*game)),
        Command::Schedule { game, field } => {
            let start_time = session.source().game(GameId::new(*game)).start_time;
            session.set_game_schedule(
                GameId::new(*game),
                field.map(str::to_string),
                start_time,
            )
        }
    };
    result.is_ok()
}

/// Everything undo is expected to restore.
fn state(session: &MemorySession) -> (String, Vec<GameRecord>) {
    let records = (1..=GAMES)
        .map(|game| session.source().game(GameId::new(game)))
        .collect();
    (session.surface().checksum(), records)
}

/// States before each recorded command, then the final state.
fn record(session: &mut MemorySession, commands: &[Command]) -> Vec<(String, Vec<GameRecord>)> {
    let mut states = vec![state(session)];
    for command in commands {
        let depth = session.undo_manager().undo_depth();
        let before = state(session);
        let ok = run(session, command);
        if session.undo_manager().undo_depth() > depth {
            states.push(state(session));
        } else {
            // Rejected or unchanged: nothing moved.
            assert_eq!(state(session), before, "{command:?} ok={ok}");
        }
    }
    states
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Invariant 1: undo retraces every recorded state
    // ========================================================================

    #[test]
    fn undo_retraces_recorded_states(commands in prop::collection::vec(command_strategy(), 1..12)) {
        let mut session = open();
        let states = record(&mut session, &commands);
        for expected in states.iter().rev().skip(1) {
            prop_assert!(session.undo().unwrap());
            prop_assert_eq!(&state(&session), expected);
        }
        prop_assert!(!session.undo().unwrap());
    }

    // ========================================================================
    // Invariant 2: redo retraces them forward
    // ========================================================================

    #[test]
    fn redo_retraces_recorded_states(commands in prop::collection::vec(command_strategy(), 1..12)) {
        let mut session = open();
        let states = record(&mut session, &commands);
        while session.undo().unwrap() {}
        for expected in states.iter().skip(1) {
            prop_assert!(session.redo().unwrap());
            prop_assert_eq!(&state(&session), expected);
        }
        prop_assert!(!session.redo().unwrap());
        prop_assert_eq!(session.undo_manager().undo_depth(), states.len() - 1);
    }
}
