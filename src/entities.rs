//! All game entity types and the collections that hold them.

use crate::geometry::{Collidable, Hitbox, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Formation cleared
    Won,
    /// Out of lives, or the formation reached the player's row
    Lost,
}

impl GameStatus {
    /// Both `Won` and `Lost` are terminal until a restart.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

// ── Shared body ───────────────────────────────────────────────────────────────

/// Position, drawn size and hitbox common to every entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub hitbox: Hitbox,
}

impl Body {
    /// The rectangle the sprite is drawn into.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

impl Collidable for Body {
    fn hitbox_rect(&self) -> Rect {
        Rect::new(
            self.x + self.hitbox.offset_x,
            self.y + self.hitbox.offset_y,
            self.hitbox.width,
            self.hitbox.height,
        )
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    /// Horizontal intent: -speed, 0 or +speed
    pub dx: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    /// Same value for every enemy in the formation
    pub dx: f32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
    /// Negative moves up, positive moves down
    pub dy: f32,
    pub owner: BulletOwner,
}

impl Collidable for Player {
    fn hitbox_rect(&self) -> Rect {
        self.body.hitbox_rect()
    }
}

impl Collidable for Enemy {
    fn hitbox_rect(&self) -> Rect {
        self.body.hitbox_rect()
    }
}

impl Collidable for Bullet {
    fn hitbox_rect(&self) -> Rect {
        self.body.hitbox_rect()
    }
}

// ── Pools ─────────────────────────────────────────────────────────────────────

/// An ordered collection of live entities of one kind.
///
/// Removal never happens mid-iteration: `retain` runs a full predicate pass
/// and keeps survivors in their original order.
#[derive(Clone, Debug, PartialEq)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool { items: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove every entity for which `keep` returns false.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Remove the entity at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Pool { items: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for Pool<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

/// Everything that belongs to one game, from start to restart.
/// Cloneable so pure update functions can return a new copy.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    pub player: Player,
    pub player_bullets: Pool<Bullet>,
    pub enemies: Pool<Enemy>,
    pub enemy_bullets: Pool<Bullet>,
    pub score: u32,
    pub lives: i32,
    pub status: GameStatus,
    /// Frames simulated since the session started
    pub frame: u64,
}
