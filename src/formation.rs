//! Enemy grid setup and lockstep movement.

use crate::config::GameConfig;
use crate::entities::{Body, Enemy, Player, Pool};

/// What happened to the formation during one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationStep {
    /// Moved sideways only
    Advanced,
    /// Hit a wall, flipped direction and dropped one step
    Descended,
    /// Dropped far enough to reach the player's row
    ReachedPlayer,
}

/// Build the full grid, row by row, left to right.
pub fn create_enemies(config: &GameConfig) -> Pool<Enemy> {
    let dx = config.enemy_speed * config.enemy_direction;
    (0..config.enemy_rows)
        .flat_map(|row| (0..config.enemy_cols).map(move |col| (row, col)))
        .map(|(row, col)| Enemy {
            body: Body {
                x: config.enemy_offset_left
                    + col as f32 * (config.enemy_width + config.enemy_padding),
                y: config.enemy_offset_top
                    + row as f32 * (config.enemy_height + config.enemy_padding),
                width: config.enemy_width,
                height: config.enemy_height,
                hitbox: config.enemy_hitbox,
            },
            dx,
        })
        .collect()
}

/// Advance every enemy by its dx. If any of them crossed a canvas edge the
/// whole grid reverses and drops by `enemy_descent`; after a drop, an enemy
/// whose bottom reaches the player's y means the player has lost.
pub fn move_enemies(enemies: &mut Pool<Enemy>, player: &Player, config: &GameConfig) -> FormationStep {
    let mut hit_wall = false;
    for enemy in enemies.iter_mut() {
        enemy.body.x += enemy.dx;
        if enemy.body.x < 0.0 || enemy.body.x + enemy.body.width > config.canvas_width {
            hit_wall = true;
        }
    }

    if !hit_wall {
        return FormationStep::Advanced;
    }

    for enemy in enemies.iter_mut() {
        enemy.dx = -enemy.dx;
        enemy.body.y += config.enemy_descent;
    }
    log::debug!("Formation bounced, {} enemies left", enemies.len());

    if enemies.iter().any(|e| e.body.bottom() >= player.body.y) {
        FormationStep::ReachedPlayer
    } else {
        FormationStep::Descended
    }
}
