/// Pure game-logic functions.
///
/// Every public function takes an immutable view of the current state (and,
/// where needed, an RNG handle) and returns a brand-new value.  Side effects
/// are limited to the injected RNG and log output.

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::entities::{
    BoundingBox, Enemy, InputState, Player, Projectile, RoundState, SessionConfig, SessionState,
    ENEMY_CREEP, ENEMY_HEIGHT, ENEMY_SPACING, ENEMY_WIDTH, PLAYER_BOTTOM_OFFSET, PLAYER_HEIGHT,
    PLAYER_SPEED, PLAYER_START_OFFSET, PLAYER_WIDTH,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Lay out a `rows` x `cols` enemy grid above the player.
///
/// The grid's top edge sits one third of the screen height plus the grid's
/// own height above `player_y`.  Each enemy gets its own uniform horizontal
/// jitter within the slack the screen leaves beside the packed grid, so
/// column `c` never starts left of `c * (enemy_width + 10)`.
///
/// Enemies are returned column by column.
#[allow(clippy::too_many_arguments)]
pub fn spawn_enemy_grid(
    rows: u32,
    cols: u32,
    enemy_width: f32,
    enemy_height: f32,
    screen_width: f32,
    screen_height: f32,
    player_y: f32,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let row_pitch = enemy_height + ENEMY_SPACING;
    let col_pitch = enemy_width + ENEMY_SPACING;
    let initial_y = player_y - screen_height / 3.0 - rows as f32 * row_pitch;
    let slack = (screen_width - cols as f32 * col_pitch).max(0.0);

    let mut enemies = Vec::with_capacity(rows as usize * cols as usize);
    for col in 0..cols {
        for row in 0..rows {
            let jitter: f32 = rng.gen();
            enemies.push(Enemy {
                x: col as f32 * col_pitch + jitter * slack,
                y: initial_y + row as f32 * row_pitch,
                width: enemy_width,
                height: enemy_height,
                alive: true,
            });
        }
    }
    enemies
}

/// Build the initial session state.  All randomness comes through `rng`.
pub fn init_state(config: &SessionConfig, rng: &mut impl Rng) -> SessionState {
    let max_x = (config.screen_width - PLAYER_WIDTH).max(0.0);
    let player = Player {
        x: (config.screen_width / 2.0 - PLAYER_START_OFFSET).clamp(0.0, max_x),
        y: config.screen_height - PLAYER_BOTTOM_OFFSET,
        width: PLAYER_WIDTH,
        height: PLAYER_HEIGHT,
        speed: PLAYER_SPEED,
        move_left: false,
        move_right: false,
    };

    let enemies = spawn_enemy_grid(
        config.enemy_rows,
        config.enemy_cols,
        ENEMY_WIDTH,
        ENEMY_HEIGHT,
        config.screen_width,
        config.screen_height,
        player.y,
        rng,
    );

    SessionState {
        player,
        projectiles: Vec::new(),
        enemies,
        round: RoundState::Playing,
        frame: 0,
        screen_width: config.screen_width,
        screen_height: config.screen_height,
    }
}

/// Start a fresh session, seeding the layout RNG from `config.seed` when set.
pub fn new_session(config: &SessionConfig) -> SessionState {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let state = init_state(config, &mut rng);
    info!(
        "new session: {}x{} screen, {} enemies",
        state.screen_width,
        state.screen_height,
        state.enemies.len()
    );
    state
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Spawn an active projectile centred on the player, at the player's top edge.
/// Ignored once the round is over.
pub fn fire_projectile(state: &SessionState) -> SessionState {
    if state.round.is_terminal() {
        return state.clone();
    }
    let mut projectile = Projectile::new();
    projectile.x = state.player.x + state.player.width / 2.0 - projectile.width / 2.0;
    projectile.y = state.player.y;
    projectile.active = true;
    debug!(
        "frame {}: fired at ({}, {})",
        state.frame, projectile.x, projectile.y
    );

    let mut projectiles = state.projectiles.clone();
    projectiles.push(projectile);
    SessionState {
        projectiles,
        ..state.clone()
    }
}

/// Copy the movement intent onto the player and perform every queued fire
/// action.
pub fn apply_input(state: &SessionState, input: &InputState) -> SessionState {
    let mut next = SessionState {
        player: Player {
            move_left: input.move_left,
            move_right: input.move_right,
            ..state.player.clone()
        },
        ..state.clone()
    };
    for _ in 0..input.fire_requests {
        next = fire_projectile(&next);
    }
    next
}

// ── Motion update ────────────────────────────────────────────────────────────

/// Advance the player one step along its intent.
///
/// Right is checked first, so holding both directions moves right unless the
/// player is already at the right edge.  The result is always clamped to
/// `[0, screen_width - width]`.
pub fn move_player(player: &Player, screen_width: f32) -> Player {
    let mut x = player.x;
    if player.move_right && x + player.width < screen_width {
        x += player.speed;
    } else if player.move_left && x > 0.0 {
        x -= player.speed;
    }
    let max_x = (screen_width - player.width).max(0.0);
    Player {
        x: x.clamp(0.0, max_x),
        ..player.clone()
    }
}

/// Move every active projectile up by its speed, deactivating the ones that
/// leave the top of the screen.  Inactive projectiles are left untouched.
pub fn move_projectiles(projectiles: &[Projectile]) -> Vec<Projectile> {
    projectiles
        .iter()
        .map(|p| {
            if !p.active {
                return p.clone();
            }
            let y = p.y - p.speed;
            Projectile {
                y,
                active: y >= 0.0,
                ..p.clone()
            }
        })
        .collect()
}

/// Living enemies creep downward; dead ones stay where they fell.
pub fn move_enemies(enemies: &[Enemy]) -> Vec<Enemy> {
    enemies
        .iter()
        .map(|e| {
            if e.alive {
                Enemy {
                    y: e.y + ENEMY_CREEP,
                    ..e.clone()
                }
            } else {
                e.clone()
            }
        })
        .collect()
}

// ── Collision engine ─────────────────────────────────────────────────────────

/// Strict axis-aligned overlap: boxes that only share an edge do not collide.
pub fn overlaps(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// True if any living enemy overlaps the player.
pub fn player_touched(player: &Player, enemies: &[Enemy]) -> bool {
    let player_box = player.bounds();
    enemies
        .iter()
        .any(|e| e.alive && overlaps(&player_box, &e.bounds()))
}

/// Credit projectile hits.
///
/// Projectiles are processed in storage order and each one kills at most the
/// first living enemy (in storage order) it overlaps.  Returns the updated
/// collections and the number of enemies destroyed.
pub fn resolve_projectile_hits(
    projectiles: &[Projectile],
    enemies: &[Enemy],
) -> (Vec<Projectile>, Vec<Enemy>, usize) {
    let mut projectiles = projectiles.to_vec();
    let mut enemies = enemies.to_vec();
    let mut destroyed = 0;

    for projectile in projectiles.iter_mut().filter(|p| p.active) {
        let shot = projectile.bounds();
        if let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.alive && overlaps(&shot, &e.bounds()))
        {
            enemy.alive = false;
            projectile.active = false;
            destroyed += 1;
        }
    }

    (projectiles, enemies, destroyed)
}

// ── Round evaluation ─────────────────────────────────────────────────────────

/// Decide the round state after a tick's collision pass.  Terminal states are
/// sticky; a touched player beats a cleared grid.
pub fn evaluate_round(current: RoundState, player_touched: bool, enemies: &[Enemy]) -> RoundState {
    if current.is_terminal() {
        return current;
    }
    if player_touched {
        RoundState::Lost
    } else if enemies.iter().all(|e| !e.alive) {
        RoundState::Won
    } else {
        RoundState::Playing
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame: motion, collisions, projectile
/// cleanup, then round evaluation.
///
/// Once the round is `Won` or `Lost` the state is returned unchanged.  The
/// player-contact check runs before any projectile is credited, so an enemy
/// touching the player loses the round even if a projectile would have
/// destroyed it this frame.
pub fn tick(state: &SessionState) -> SessionState {
    if state.round.is_terminal() {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Motion ────────────────────────────────────────────────────────────
    let player = move_player(&state.player, state.screen_width);
    let projectiles = move_projectiles(&state.projectiles);
    let enemies = move_enemies(&state.enemies);

    // ── 2. Collisions (player contact takes precedence) ──────────────────────
    let touched = player_touched(&player, &enemies);
    let (projectiles, enemies) = if touched {
        (projectiles, enemies)
    } else {
        let (projectiles, enemies, destroyed) = resolve_projectile_hits(&projectiles, &enemies);
        if destroyed > 0 {
            debug!("frame {frame}: {destroyed} enemies destroyed");
        }
        (projectiles, enemies)
    };

    // ── 3. Drop spent projectiles ────────────────────────────────────────────
    let projectiles: Vec<Projectile> = projectiles.into_iter().filter(|p| p.active).collect();

    // ── 4. Round state ───────────────────────────────────────────────────────
    let round = evaluate_round(state.round, touched, &enemies);
    match round {
        RoundState::Won => info!("frame {frame}: all enemies destroyed, round won"),
        RoundState::Lost => info!("frame {frame}: player touched, round lost"),
        RoundState::Playing => {}
    }

    SessionState {
        player,
        projectiles,
        enemies,
        round,
        frame,
        ..state.clone()
    }
}
