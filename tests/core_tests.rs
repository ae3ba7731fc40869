//! Integration tests for XFChess notation settings
//!
//! Verifies that persisted settings drive the PGN writer the way the
//! `xfpgn normalize` command uses them.

use xfchess_pgn::core::{load_settings, save_settings, NotationSettings};
use xfchess_pgn::game::rules::StandardRules;
use xfchess_pgn::notation::{import_game, GameOutcome, PgnWriter};

const GAME: &str = "[Event \"Club\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6";

#[test]
fn test_saved_settings_drive_writer() {
    //! Settings written to disk come back unchanged and shape the output
    //!
    //! A narrow line width and no tag block should give bare, wrapped
    //! movetext with the configured default result.

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xfchess").join("settings.json");
    let settings = NotationSettings {
        line_width: 20,
        include_tags: false,
        default_result: GameOutcome::Draw,
    };
    save_settings(&settings, Some(&path)).unwrap();

    let loaded = load_settings(Some(&path));
    assert_eq!(loaded, settings);

    let game = import_game(GAME, &StandardRules::new()).unwrap();
    assert_eq!(game.result, None);
    let result = game.result.unwrap_or(loaded.default_result);
    let pgn = PgnWriter::from_settings(&loaded).write(&game.tags, &game.tree, result);

    assert!(!pgn.contains("[Event"));
    assert!(pgn.lines().all(|line| line.len() <= 20));
    assert!(pgn.trim_end().ends_with("1/2-1/2"));
}

#[test]
fn test_default_settings_keep_tags() {
    let game = import_game(GAME, &StandardRules::new()).unwrap();
    let pgn = PgnWriter::from_settings(&NotationSettings::default()).write(
        &game.tags,
        &game.tree,
        GameOutcome::Unknown,
    );
    assert_eq!(
        pgn,
        "[Event \"Club\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 *\n"
    );
}

#[test]
fn test_corrupt_settings_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"line_width": "wide"}"#).unwrap();
    assert_eq!(load_settings(Some(&path)), NotationSettings::default());
}
