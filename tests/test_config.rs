use std::io::Write;

use quiz_platformer::config::GameConfig;
use quiz_platformer::error::ConfigError;

use tempfile::NamedTempFile;

#[test]
fn defaults_are_valid() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.validate().ok(), Some(()));
    assert_eq!(cfg.physics.gravity, 0.8);
    assert_eq!(cfg.avatar.big_height, 48.0);
    assert_eq!(cfg.combat.stomp_tolerance, 15.0);
    assert_eq!(cfg.session.lives, 3);
    assert!(cfg.session.freeze_during_quiz);
}

#[test]
fn empty_file_gives_defaults() {
    let cfg = GameConfig::from_toml_str("").expect("empty config is fine");
    assert_eq!(cfg, GameConfig::default());
}

#[test]
fn partial_sections_override_only_named_values() {
    let text = r#"
        [physics]
        gravity = 0.5

        [session]
        lives = 5
        freeze_during_quiz = false
    "#;
    let cfg = GameConfig::from_toml_str(text).expect("valid config");
    assert_eq!(cfg.physics.gravity, 0.5);
    assert_eq!(cfg.physics.max_fall_speed, 15.0);
    assert_eq!(cfg.session.lives, 5);
    assert!(!cfg.session.freeze_during_quiz);
    assert_eq!(cfg.avatar, GameConfig::default().avatar);
}

#[test]
fn nonsensical_values_are_rejected() {
    let cases = [
        ("[physics]\ngravity = 0.0", "physics.gravity"),
        ("[avatar]\nbig_height = 10.0", "avatar.big_height"),
        ("[avatar]\nstar_duration = 0", "avatar.star_duration"),
        ("[combat]\nstomp_rebound = 3.0", "combat.stomp_rebound"),
        ("[session]\nlives = 0", "session.lives"),
    ];
    for (text, expected) in cases {
        match GameConfig::from_toml_str(text) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("{text}: expected Invalid, got {other:?}"),
        }
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = GameConfig::from_toml_str("[physics\ngravity = ");
    assert!(matches!(err, Err(ConfigError::Parse(_))));
}

#[test]
fn loads_from_a_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "[avatar]\nrun_speed = 9.5").expect("write config");
    let cfg = GameConfig::load(file.path()).expect("load config");
    assert_eq!(cfg.avatar.run_speed, 9.5);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");
    match GameConfig::load(&path) {
        Err(ConfigError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Read, got {other:?}"),
    }
}
