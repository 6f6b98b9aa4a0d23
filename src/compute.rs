//! Pure game-logic functions.
//!
//! `tick` takes an immutable reference to the current `GameSession` and
//! returns a brand-new one. Deltas are applied once per call, not scaled by
//! elapsed time, so game speed follows the host's frame rate.

use crate::combat::{move_enemy_bullets, move_player_bullets, resolve_player_hits};
use crate::config::GameConfig;
use crate::entities::{Body, GameSession, GameStatus, Player, Pool};
use crate::formation::{create_enemies, move_enemies, FormationStep};

// ── Constructors ─────────────────────────────────────────────────────────────

/// The player at its spawn point, standing still.
pub fn spawn_player(config: &GameConfig) -> Player {
    Player {
        body: Body {
            x: config.player_spawn_x,
            y: config.player_spawn_y,
            width: config.player_width,
            height: config.player_height,
            hitbox: config.player_hitbox,
        },
        speed: config.player_speed,
        dx: 0.0,
    }
}

/// Build the state a fresh game starts from.
pub fn init_state(config: &GameConfig) -> GameSession {
    GameSession {
        player: spawn_player(config),
        player_bullets: Pool::new(),
        enemies: create_enemies(config),
        enemy_bullets: Pool::new(),
        score: 0,
        lives: config.starting_lives,
        status: GameStatus::Playing,
        frame: 0,
    }
}

// ── Player movement ──────────────────────────────────────────────────────────

/// Apply the current velocity intent, keeping the ship on the canvas.
pub fn move_player(player: &mut Player, config: &GameConfig) {
    let max_x = (config.canvas_width - player.body.width).max(0.0);
    player.body.x = (player.body.x + player.dx).clamp(0.0, max_x);
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Advance the simulation by one frame, in this order: player hits on the
/// formation, player movement, player bullets, formation, enemy bullets,
/// then the win check. A session that is already over is returned as is.
pub fn tick(state: &GameSession, config: &GameConfig) -> GameSession {
    if state.status.is_over() {
        return state.clone();
    }
    let mut next = state.clone();
    next.frame += 1;

    // ── 1. Player bullets ↔ enemies ──────────────────────────────────────────
    let kills = resolve_player_hits(&mut next.player_bullets, &mut next.enemies);
    next.score += kills as u32 * config.score_per_kill;

    // ── 2. Player and player bullets ─────────────────────────────────────────
    move_player(&mut next.player, config);
    move_player_bullets(&mut next.player_bullets);

    // ── 3. Formation ─────────────────────────────────────────────────────────
    let mut lost = false;
    if move_enemies(&mut next.enemies, &next.player, config) == FormationStep::ReachedPlayer {
        log::debug!("Formation reached the player on frame {}", next.frame);
        lost = true;
    }

    // ── 4. Enemy bullets ↔ player ────────────────────────────────────────────
    let hits = move_enemy_bullets(&mut next.enemy_bullets, &next.player, config);
    if hits > 0 {
        next.lives -= hits as i32;
        log::debug!("Player hit, {} lives left", next.lives);
        if next.lives <= 0 {
            lost = true;
        }
    }

    // ── 5. Terminal states ───────────────────────────────────────────────────
    next.status = if lost {
        GameStatus::Lost
    } else if next.enemies.is_empty() {
        GameStatus::Won
    } else {
        GameStatus::Playing
    };
    next
}
