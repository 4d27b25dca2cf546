/// All game entity types — pure data, no game logic.

use crate::error::GameError;

// ── Geometry constants ────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 80.0;
pub const PLAYER_SPEED: f32 = 5.0;
/// Distance from the bottom of the screen to the player's top edge.
pub const PLAYER_BOTTOM_OFFSET: f32 = 150.0;
/// Distance left of the screen centre where the player starts.
pub const PLAYER_START_OFFSET: f32 = 100.0;

pub const PROJECTILE_WIDTH: f32 = 5.0;
pub const PROJECTILE_HEIGHT: f32 = 30.0;
pub const PROJECTILE_SPEED: f32 = 5.0;

pub const ENEMY_WIDTH: f32 = 50.0;
pub const ENEMY_HEIGHT: f32 = 60.0;
pub const ENEMY_ROWS: u32 = 5;
pub const ENEMY_COLS: u32 = 8;
/// Gap between neighbouring enemies, horizontally and vertically.
pub const ENEMY_SPACING: f32 = 10.0;
/// Downward drift applied to every living enemy each tick.
pub const ENEMY_CREEP: f32 = 0.1;
/// Upper bound on `rows * cols` for a session's enemy grid.
pub const MAX_ENEMIES: u32 = 4096;

pub const DEFAULT_SCREEN_WIDTH: f32 = 800.0;
pub const DEFAULT_SCREEN_HEIGHT: f32 = 600.0;

// ── Round state ───────────────────────────────────────────────────────────────

/// `Won` and `Lost` are terminal: nothing in a session leads out of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Playing,
    Won,
    Lost,
}

impl RoundState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RoundState::Playing)
    }
}

// ── Bounding boxes ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub move_left: bool,
    pub move_right: bool,
}

impl Player {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub active: bool,
}

impl Projectile {
    /// An inactive projectile at the origin, waiting to be positioned by a
    /// fire action.
    pub fn new() -> Self {
        Projectile {
            x: 0.0,
            y: 0.0,
            width: PROJECTILE_WIDTH,
            height: PROJECTILE_HEIGHT,
            speed: PROJECTILE_SPEED,
            active: false,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for Projectile {
    fn default() -> Self {
        Self::new()
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Snapshot of the player's intent, filled by the input collaborator and
/// consumed once per tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire-key presses received since the last tick.
    pub fire_requests: u32,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Parameters fixed for the lifetime of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub enemy_rows: u32,
    pub enemy_cols: u32,
    /// Seed for the enemy layout jitter; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Validate a session configuration.
    ///
    /// Rejects empty or non-finite screens, empty or oversized grids, grids
    /// wider than the screen and screens too short to hold the player.
    pub fn new(
        screen_width: f32,
        screen_height: f32,
        enemy_rows: u32,
        enemy_cols: u32,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        if !(screen_width.is_finite() && screen_width > 0.0)
            || !(screen_height.is_finite() && screen_height > 0.0)
        {
            return Err(GameError::InvalidConfig(format!(
                "screen must be positive, got {screen_width}x{screen_height}"
            )));
        }
        if enemy_rows == 0 || enemy_cols == 0 {
            return Err(GameError::InvalidConfig(format!(
                "enemy grid must be non-empty, got {enemy_rows}x{enemy_cols}"
            )));
        }
        match enemy_rows.checked_mul(enemy_cols) {
            Some(count) if count <= MAX_ENEMIES => {}
            _ => {
                return Err(GameError::InvalidConfig(format!(
                    "enemy grid {enemy_rows}x{enemy_cols} exceeds {MAX_ENEMIES} enemies"
                )))
            }
        }
        if screen_width < PLAYER_WIDTH || screen_height < PLAYER_BOTTOM_OFFSET {
            return Err(GameError::InvalidConfig(format!(
                "screen {screen_width}x{screen_height} is too small for the player"
            )));
        }
        let grid_width = enemy_cols as f32 * (ENEMY_WIDTH + ENEMY_SPACING) - ENEMY_SPACING;
        if grid_width > screen_width {
            return Err(GameError::InvalidConfig(format!(
                "{enemy_cols} enemy columns need {grid_width} units but the screen is {screen_width} wide"
            )));
        }
        Ok(SessionConfig {
            screen_width,
            screen_height,
            enemy_rows,
            enemy_cols,
            seed,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            enemy_rows: ENEMY_ROWS,
            enemy_cols: ENEMY_COLS,
            seed: None,
        }
    }
}

/// The entire state of one session.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub player: Player,
    /// Only active projectiles survive past the end of a tick.
    pub projectiles: Vec<Projectile>,
    /// Stored column by column; collision crediting follows this order.
    pub enemies: Vec<Enemy>,
    pub round: RoundState,
    pub frame: u64,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl SessionState {
    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }
}
