//! Game tuning values.
//!
//! Every number the simulation uses lives here. `GameConfig::default()` is
//! the built-in game; a JSON file can override any subset of fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::geometry::Hitbox;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Player ===
    pub player_spawn_x: f32,
    pub player_spawn_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_hitbox: Hitbox,
    pub starting_lives: i32,

    // === Formation ===
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_padding: f32,
    pub enemy_offset_top: f32,
    pub enemy_offset_left: f32,
    pub enemy_speed: f32,
    /// +1.0 starts the grid moving right, -1.0 left
    pub enemy_direction: f32,
    pub enemy_hitbox: Hitbox,
    /// Distance the grid drops on every wall bounce
    pub enemy_descent: f32,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_hitbox: Hitbox,
    /// Upward speed of player bullets, per frame
    pub player_bullet_speed: f32,
    /// Downward speed of enemy bullets, per frame
    pub enemy_bullet_speed: f32,
    pub max_player_bullets: usize,

    // === Scoring and timing ===
    pub score_per_kill: u32,
    pub enemy_fire_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,

            player_spawn_x: 375.0,
            player_spawn_y: 550.0,
            player_width: 50.0,
            player_height: 30.0,
            player_speed: 5.0,
            player_hitbox: Hitbox::new(5.0, 5.0, 40.0, 20.0),
            starting_lives: 3,

            enemy_rows: 5,
            enemy_cols: 10,
            enemy_width: 40.0,
            enemy_height: 30.0,
            enemy_padding: 10.0,
            enemy_offset_top: 50.0,
            enemy_offset_left: 30.0,
            enemy_speed: 1.0,
            enemy_direction: 1.0,
            enemy_hitbox: Hitbox::new(5.0, 5.0, 30.0, 20.0),
            enemy_descent: 10.0,

            bullet_width: 5.0,
            bullet_height: 10.0,
            bullet_hitbox: Hitbox::full(5.0, 10.0),
            player_bullet_speed: 7.0,
            enemy_bullet_speed: 5.0,
            max_player_bullets: 5,

            score_per_kill: 10,
            enemy_fire_interval_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Load overrides from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn enemy_fire_interval(&self) -> Duration {
        Duration::from_millis(self.enemy_fire_interval_ms)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// Hitboxes that poke out of their sprite are allowed but logged.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(GameError::Config(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            return Err(GameError::Config("enemy grid needs at least one row and column".into()));
        }
        if self.max_player_bullets == 0 {
            return Err(GameError::Config("max_player_bullets must be at least 1".into()));
        }
        if self.enemy_fire_interval_ms == 0 {
            return Err(GameError::Config("enemy_fire_interval_ms must be non-zero".into()));
        }
        if self.starting_lives <= 0 {
            return Err(GameError::Config(format!(
                "starting_lives must be positive, got {}",
                self.starting_lives
            )));
        }

        let sprites = [
            ("player", &self.player_hitbox, self.player_width, self.player_height),
            ("enemy", &self.enemy_hitbox, self.enemy_width, self.enemy_height),
            ("bullet", &self.bullet_hitbox, self.bullet_width, self.bullet_height),
        ];
        for (name, hitbox, w, h) in sprites {
            if !hitbox.fits_within(w, h) {
                log::warn!("{} hitbox {:?} extends outside its {}x{} sprite", name, hitbox, w, h);
            }
        }
        Ok(())
    }
}
