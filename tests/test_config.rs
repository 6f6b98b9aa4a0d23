use std::io::Write;
use std::time::Duration;

use invaders::geometry::Hitbox;
use invaders::{GameConfig, GameError};

use tempfile::NamedTempFile;

fn write_json(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_match_built_in_game() {
    let c = GameConfig::default();
    assert_eq!((c.canvas_width, c.canvas_height), (800.0, 600.0));
    assert_eq!((c.player_spawn_x, c.player_spawn_y), (375.0, 550.0));
    assert_eq!((c.enemy_rows, c.enemy_cols), (5, 10));
    assert_eq!(c.max_player_bullets, 5);
    assert_eq!(c.score_per_kill, 10);
    assert_eq!(c.starting_lives, 3);
    assert_eq!(c.enemy_descent, 10.0);
    assert_eq!(c.enemy_fire_interval(), Duration::from_millis(1000));
    assert_eq!(c.player_hitbox, Hitbox::new(5.0, 5.0, 40.0, 20.0));
    assert!(c.validate().is_ok());
}

#[test]
fn json_overrides_only_given_fields() {
    let file = write_json(r#"{ "enemy_rows": 3, "enemy_fire_interval_ms": 500 }"#);
    let c = GameConfig::from_json_file(file.path()).unwrap();
    assert_eq!(c.enemy_rows, 3);
    assert_eq!(c.enemy_fire_interval_ms, 500);
    assert_eq!(c.enemy_cols, 10); // untouched
    assert_eq!(c.player_speed, 5.0);
}

#[test]
fn json_hitbox_override() {
    let file = write_json(
        r#"{ "enemy_hitbox": { "offset_x": 0, "offset_y": 0, "width": 40, "height": 30 } }"#,
    );
    let c = GameConfig::from_json_file(file.path()).unwrap();
    assert_eq!(c.enemy_hitbox, Hitbox::full(40.0, 30.0));
}

#[test]
fn malformed_json_is_rejected() {
    let file = write_json("{ enemy_rows: ");
    let err = GameConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, GameError::Json(_)));
}

#[test]
fn missing_file_is_io_error() {
    let err = GameConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
}

#[test]
fn validate_rejects_degenerate_values() {
    let bad = [
        GameConfig { enemy_rows: 0, ..GameConfig::default() },
        GameConfig { enemy_cols: 0, ..GameConfig::default() },
        GameConfig { max_player_bullets: 0, ..GameConfig::default() },
        GameConfig { enemy_fire_interval_ms: 0, ..GameConfig::default() },
        GameConfig { starting_lives: 0, ..GameConfig::default() },
        GameConfig { canvas_width: 0.0, ..GameConfig::default() },
    ];
    for config in bad {
        assert!(matches!(config.validate(), Err(GameError::Config(_))), "{:?}", config);
    }
}

#[test]
fn oversized_hitbox_is_allowed() {
    // Logged as a warning, not an error
    let c = GameConfig {
        player_hitbox: Hitbox::new(20.0, 5.0, 40.0, 20.0),
        ..GameConfig::default()
    };
    assert!(c.validate().is_ok());
}
