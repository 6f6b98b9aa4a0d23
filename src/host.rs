//! What the game needs from its host.
//!
//! The host owns the real drawing surface, keyboard and clocks. The game
//! only sees these traits, so the same loop runs in a terminal or under a
//! test double.

use std::time::Duration;

use crate::geometry::Rect;

/// One of the four pre-loaded images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

/// A 2D surface in canvas coordinates.
pub trait Surface {
    /// Width and height in canvas units.
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn draw_image(&mut self, sprite: Sprite, rect: Rect);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Frame and timer scheduling.
///
/// Callbacks are delivered by the host calling back into `Game` on the same
/// thread, so a frame and a timer tick never run at the same time.
pub trait Scheduler {
    /// Ask for one call to `Game::on_frame` at the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Start calling `Game::on_autofire` every `period` until cancelled.
    fn start_timer(&mut self, period: Duration) -> TimerHandle;
    fn cancel_timer(&mut self, handle: TimerHandle);
}

/// Decoded input intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
}
