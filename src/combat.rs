//! Firing, bullet movement and hit resolution.
//!
//! Nothing here removes an entity while walking its pool. Every removal is
//! decided in a full pass first and applied afterwards.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Body, Bullet, BulletOwner, Enemy, Player, Pool};
use crate::geometry::is_colliding;

fn bullet_at(x: f32, y: f32, dy: f32, owner: BulletOwner, config: &GameConfig) -> Bullet {
    Bullet {
        body: Body {
            x,
            y,
            width: config.bullet_width,
            height: config.bullet_height,
            hitbox: config.bullet_hitbox,
        },
        dy,
        owner,
    }
}

/// Fire from the centre of the player's top edge, unless the on-screen cap
/// is already reached. Returns whether a bullet was spawned.
pub fn player_shoot(player: &Player, bullets: &mut Pool<Bullet>, config: &GameConfig) -> bool {
    if bullets.len() >= config.max_player_bullets {
        return false;
    }
    let x = player.body.center_x() - config.bullet_width / 2.0;
    bullets.spawn(bullet_at(
        x,
        player.body.y,
        -config.player_bullet_speed,
        BulletOwner::Player,
        config,
    ));
    true
}

/// Pick one live enemy uniformly at random and fire from its bottom centre.
/// Returns the index of the shooter, or `None` when the formation is empty.
pub fn enemy_shoot(
    enemies: &Pool<Enemy>,
    bullets: &mut Pool<Bullet>,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Option<usize> {
    if enemies.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..enemies.len());
    let shooter = enemies.get(index)?;
    let x = shooter.body.center_x() - config.bullet_width / 2.0;
    bullets.spawn(bullet_at(
        x,
        shooter.body.bottom(),
        config.enemy_bullet_speed,
        BulletOwner::Enemy,
        config,
    ));
    log::trace!("Enemy {} fired from ({}, {})", index, x, shooter.body.bottom());
    Some(index)
}

/// Move player bullets up and drop those that went above the top edge.
pub fn move_player_bullets(bullets: &mut Pool<Bullet>) {
    for bullet in bullets.iter_mut() {
        bullet.body.y += bullet.dy;
    }
    bullets.retain(|b| b.body.y >= 0.0);
}

/// Move enemy bullets down, drop those below the canvas, and consume the
/// ones that hit the player. Returns the number of hits taken.
pub fn move_enemy_bullets(bullets: &mut Pool<Bullet>, player: &Player, config: &GameConfig) -> u32 {
    for bullet in bullets.iter_mut() {
        bullet.body.y += bullet.dy;
    }

    let mut hits = 0;
    bullets.retain(|b| {
        if is_colliding(b, player) {
            hits += 1;
            return false;
        }
        b.body.y <= config.canvas_height
    });
    hits
}

/// Resolve player bullets against the formation.
///
/// Every (bullet, enemy) pair is tested against the state at the start of
/// the pass. An enemy dies at most once, so a second bullet overlapping an
/// already-dead enemy is not spent on it; a bullet overlapping two live
/// enemies kills both. Returns the number of enemies destroyed.
pub fn resolve_player_hits(bullets: &mut Pool<Bullet>, enemies: &mut Pool<Enemy>) -> usize {
    let mut spent = vec![false; bullets.len()];
    let mut killed = vec![false; enemies.len()];

    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter().enumerate() {
            if !killed[ei] && is_colliding(bullet, enemy) {
                killed[ei] = true;
                spent[bi] = true;
            }
        }
    }

    let kills = killed.iter().filter(|&&k| k).count();
    if kills == 0 {
        return 0;
    }

    *bullets = std::mem::take(bullets)
        .into_iter()
        .zip(spent)
        .filter_map(|(b, gone)| (!gone).then_some(b))
        .collect();
    *enemies = std::mem::take(enemies)
        .into_iter()
        .zip(killed)
        .filter_map(|(e, gone)| (!gone).then_some(e))
        .collect();
    kills
}
