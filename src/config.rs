use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::entities::{
    SessionConfig, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, ENEMY_COLS, ENEMY_ROWS,
};
use crate::error::GameError;

/// Defend the bottom of the screen against a slowly descending enemy grid
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// World width in game units
    #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
    pub width: f32,

    /// World height in game units
    #[arg(long, default_value_t = DEFAULT_SCREEN_HEIGHT)]
    pub height: f32,

    /// Enemy grid rows
    #[arg(long, default_value_t = ENEMY_ROWS)]
    pub rows: u32,

    /// Enemy grid columns
    #[arg(long, default_value_t = ENEMY_COLS)]
    pub cols: u32,

    /// Target ticks per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Seed for the enemy layout (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Text file drawn below the victory message
    #[arg(long)]
    pub victory_art: Option<PathBuf>,

    /// Write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn session_config(&self) -> Result<SessionConfig, GameError> {
        SessionConfig::new(self.width, self.height, self.rows, self.cols, self.seed)
    }

    pub fn frame_duration(&self) -> Result<Duration, GameError> {
        if self.fps == 0 {
            return Err(GameError::InvalidConfig(
                "fps must be at least 1".to_string(),
            ));
        }
        Ok(Duration::from_secs(1) / self.fps)
    }
}
