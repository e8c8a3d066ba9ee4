#![forbid(unsafe_code)]

use std::io::Write;

use bgrid_core::{Bracket, BracketError, GameId, SlotSource};

#[test]
fn loads_definition_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let bracket = Bracket::double_elimination_4("DE4").unwrap();
    file.write_all(bracket.to_json().unwrap().as_bytes()).unwrap();

    let loaded = Bracket::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, bracket);
    assert_eq!(
        loaded.game(GameId::new(5)).unwrap().top,
        SlotSource::LoserOf(GameId::new(3))
    );
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    match Bracket::from_json_file(&path) {
        Err(BracketError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn generated_brackets_round_trip_through_json() {
    for teams in [2, 4, 8, 16, 32] {
        let bracket = Bracket::single_elimination(format!("{teams} Team"), teams).unwrap();
        assert_eq!(bracket.games().len() as u32, teams - 1);
        let again = Bracket::from_json_str(&bracket.to_json().unwrap()).unwrap();
        assert_eq!(again, bracket);
    }
}
