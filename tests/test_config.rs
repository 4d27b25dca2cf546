use std::path::PathBuf;
use std::time::Duration;

use arcade_shooter::config::Args;
use arcade_shooter::entities::SessionConfig;
use arcade_shooter::error::GameError;
use clap::Parser;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("arcade_shooter").chain(args.iter().copied())).unwrap()
}

#[test]
fn defaults_build_the_classic_session() {
    let args = parse(&[]);
    assert_eq!(args.session_config().unwrap(), SessionConfig::default());
    assert!(!args.verbose);
    assert!(args.victory_art.is_none());
    assert!(args.log_file.is_none());
}

#[test]
fn default_cadence_is_sixty_hertz() {
    let frame = parse(&[]).frame_duration().unwrap();
    assert_eq!(frame, Duration::from_secs(1) / 60);
}

#[test]
fn flags_override_defaults() {
    let args = parse(&[
        "--width",
        "1024",
        "--height",
        "768",
        "--rows",
        "3",
        "--cols",
        "10",
        "--fps",
        "30",
        "--seed",
        "99",
        "--victory-art",
        "art.txt",
        "--log-file",
        "game.log",
        "-v",
    ]);
    let config = args.session_config().unwrap();
    assert_eq!((config.screen_width, config.screen_height), (1024.0, 768.0));
    assert_eq!((config.enemy_rows, config.enemy_cols), (3, 10));
    assert_eq!(config.seed, Some(99));
    assert_eq!(args.frame_duration().unwrap(), Duration::from_secs(1) / 30);
    assert_eq!(args.victory_art, Some(PathBuf::from("art.txt")));
    assert_eq!(args.log_file, Some(PathBuf::from("game.log")));
    assert!(args.verbose);
}

#[test]
fn zero_fps_is_rejected() {
    let err = parse(&["--fps", "0"]).frame_duration().unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn oversized_grid_is_rejected() {
    assert!(parse(&["--cols", "20"]).session_config().is_err());
}

#[test]
fn huge_row_count_is_rejected() {
    let args = parse(&["--width", "100000000", "--rows", "4000000000", "--cols", "8"]);
    assert!(matches!(
        args.session_config(),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn malformed_numbers_fail_to_parse() {
    assert!(Args::try_parse_from(["arcade_shooter", "--rows", "many"]).is_err());
}
