use arcade_shooter::entities::*;
use arcade_shooter::error::GameError;

#[test]
fn projectile_factory_is_inactive_at_origin() {
    let p = Projectile::new();
    assert!(!p.active);
    assert_eq!((p.x, p.y), (0.0, 0.0));
    assert_eq!((p.width, p.height), (PROJECTILE_WIDTH, PROJECTILE_HEIGHT));
    assert_eq!(p.speed, PROJECTILE_SPEED);
    assert_eq!(Projectile::default(), p);
}

#[test]
fn bounds_mirror_entity_geometry() {
    let e = Enemy {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 4.0,
        alive: true,
    };
    assert_eq!(
        e.bounds(),
        BoundingBox {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0
        }
    );
}

#[test]
fn only_playing_is_not_terminal() {
    assert!(!RoundState::Playing.is_terminal());
    assert!(RoundState::Won.is_terminal());
    assert!(RoundState::Lost.is_terminal());
}

#[test]
fn input_state_defaults_to_idle() {
    let input = InputState::default();
    assert!(!input.move_left && !input.move_right);
    assert_eq!(input.fire_requests, 0);
}

#[test]
fn default_config_matches_classic_layout() {
    let c = SessionConfig::default();
    assert_eq!((c.screen_width, c.screen_height), (800.0, 600.0));
    assert_eq!((c.enemy_rows, c.enemy_cols), (5, 8));
    assert_eq!(c.seed, None);
    assert_eq!(SessionConfig::new(800.0, 600.0, 5, 8, None).unwrap(), c);
}

#[test]
fn config_rejects_empty_screen() {
    for (w, h) in [(0.0, 600.0), (800.0, -1.0), (f32::NAN, 600.0), (f32::INFINITY, 600.0)] {
        assert!(matches!(
            SessionConfig::new(w, h, 5, 8, None),
            Err(GameError::InvalidConfig(_))
        ));
    }
}

#[test]
fn config_rejects_empty_grid() {
    assert!(SessionConfig::new(800.0, 600.0, 0, 8, None).is_err());
    assert!(SessionConfig::new(800.0, 600.0, 5, 0, None).is_err());
}

#[test]
fn config_rejects_grid_wider_than_screen() {
    // 14 columns need 14 * 60 - 10 = 830 units
    let err = SessionConfig::new(800.0, 600.0, 5, 14, None).unwrap_err();
    assert!(err.to_string().contains("14 enemy columns"));
    // 13 columns fit exactly into 770
    assert!(SessionConfig::new(770.0, 600.0, 5, 13, None).is_ok());
}

#[test]
fn config_rejects_oversized_grid() {
    // Wide enough for the columns, but far too many enemies
    let err = SessionConfig::new(1.0e9, 600.0, 100, 100, None).unwrap_err();
    assert!(err.to_string().contains("exceeds"));
    // rows * cols would overflow u32
    assert!(SessionConfig::new(1.0e9, 600.0, u32::MAX, 2, None).is_err());
    // The cap itself is allowed
    assert!(SessionConfig::new(1.0e9, 600.0, MAX_ENEMIES / 64, 64, None).is_ok());
}

#[test]
fn config_rejects_screen_too_short_for_player() {
    assert!(SessionConfig::new(800.0, 100.0, 5, 8, None).is_err());
}

#[test]
fn living_enemies_counts_only_alive() {
    let enemy = |alive| Enemy {
        x: 0.0,
        y: 0.0,
        width: ENEMY_WIDTH,
        height: ENEMY_HEIGHT,
        alive,
    };
    let state = SessionState {
        player: Player {
            x: 0.0,
            y: 450.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            move_left: false,
            move_right: false,
        },
        projectiles: Vec::new(),
        enemies: vec![enemy(true), enemy(false), enemy(true)],
        round: RoundState::Playing,
        frame: 0,
        screen_width: 800.0,
        screen_height: 600.0,
    };
    assert_eq!(state.living_enemies(), 2);

    let mut cloned = state.clone();
    cloned.enemies[0].alive = false;
    assert_eq!(state.living_enemies(), 2);
    assert_eq!(cloned.living_enemies(), 1);
}
