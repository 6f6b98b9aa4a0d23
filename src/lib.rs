//! Invaders - a fixed-grid arcade shooter.
//!
//! The library holds the whole simulation; the binary is only a terminal
//! host that provides a drawing surface, input and scheduling.
//!
//! - `geometry`: hitbox rectangles and the overlap test
//! - `entities`: entity data, pools and the per-game session
//! - `formation`: enemy grid setup and lockstep movement
//! - `combat`: firing, bullet movement and hit resolution
//! - `compute`: the pure per-frame update
//! - `game`: the state machine driving frames and the autofire timer
//! - `host`: the traits a host implements

pub mod combat;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod formation;
pub mod game;
pub mod geometry;
pub mod host;

pub use config::GameConfig;
pub use error::GameError;
pub use game::Game;
