//! The game state machine.
//!
//! `Game` owns the session plus the two scheduling sources that drive it:
//! the per-frame callback and the enemy autofire timer. States are
//! uninitialized, running, and over (won or lost); only `restart_game`
//! leaves the over state.

use rand::Rng;

use crate::combat::{enemy_shoot, player_shoot};
use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{GameSession, GameStatus};
use crate::error::{GameError, Result};
use crate::host::{FrameHandle, Key, Scheduler, Sprite, Surface, TimerHandle};

pub struct Game<S: Scheduler, R: Rng> {
    config: GameConfig,
    scheduler: S,
    rng: R,
    session: Option<GameSession>,
    pending_frame: Option<FrameHandle>,
    autofire: Option<TimerHandle>,
}

impl<S: Scheduler, R: Rng> Game<S, R> {
    pub fn new(config: GameConfig, scheduler: S, rng: R) -> Self {
        Game {
            config,
            scheduler,
            rng,
            session: None,
            pending_frame: None,
            autofire: None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Start the game once the host's drawing surface exists.
    ///
    /// Without a surface nothing is created or scheduled and the error is
    /// returned for the host to report. Calling this again on an already
    /// started game does nothing.
    pub fn initialize(&mut self, surface: Option<&mut dyn Surface>) -> Result<()> {
        if self.session.is_some() {
            log::debug!("initialize called on a started game, ignoring");
            return Ok(());
        }
        let Some(surface) = surface else {
            log::error!("Drawing surface unavailable, game not started");
            return Err(GameError::SurfaceUnavailable);
        };

        let (width, height) = surface.size();
        if width != self.config.canvas_width || height != self.config.canvas_height {
            log::warn!(
                "Surface is {}x{} but the game is laid out for {}x{}",
                width,
                height,
                self.config.canvas_width,
                self.config.canvas_height
            );
        }

        self.start_session(surface);
        log::info!("Game started with {} enemies", self.enemy_count());
        Ok(())
    }

    /// Reset everything and resume play. Allowed at any time.
    pub fn restart_game(&mut self, surface: &mut dyn Surface) {
        self.cancel_schedules();
        self.start_session(surface);
        log::info!("Game restarted");
    }

    /// Cancel all pending callbacks, e.g. when the host unmounts the game.
    pub fn teardown(&mut self) {
        self.cancel_schedules();
        log::info!("Game torn down at score {}", self.score());
    }

    fn start_session(&mut self, surface: &mut dyn Surface) {
        self.session = Some(init_state(&self.config));
        self.run_frame(surface);
        if !self.game_over() {
            self.autofire = Some(self.scheduler.start_timer(self.config.enemy_fire_interval()));
        }
    }

    fn end_game(&mut self) {
        self.cancel_schedules();
        match self.status() {
            Some(GameStatus::Won) => log::info!("Formation cleared, final score {}", self.score()),
            Some(GameStatus::Lost) => log::info!("Game lost, final score {}", self.score()),
            _ => {}
        }
    }

    fn cancel_schedules(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = self.autofire.take() {
            self.scheduler.cancel_timer(handle);
        }
    }

    // ── Callbacks ────────────────────────────────────────────────────────────

    /// Frame callback. Calls for a frame that is no longer pending are
    /// ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, surface: &mut dyn Surface) {
        if self.pending_frame != Some(handle) {
            log::trace!("Ignoring stale frame {:?}", handle);
            return;
        }
        self.pending_frame = None;
        self.run_frame(surface);
    }

    /// Autofire timer callback. Ticks from a cancelled timer are ignored.
    pub fn on_autofire(&mut self, handle: TimerHandle) {
        if self.autofire != Some(handle) {
            log::trace!("Ignoring stale autofire tick {:?}", handle);
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.status.is_over() {
            return;
        }
        enemy_shoot(&session.enemies, &mut session.enemy_bullets, &self.config, &mut self.rng);
    }

    /// Draw the current state, advance it one step, then either schedule the
    /// next frame or shut the schedules down.
    fn run_frame(&mut self, surface: &mut dyn Surface) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.status.is_over() {
            return;
        }
        draw(surface, session);
        let next = tick(session, &self.config);
        let over = next.status.is_over();
        self.session = Some(next);

        if over {
            self.end_game();
        } else {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn key_down(&mut self, key: Key) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.status.is_over() {
            return;
        }
        let player = &mut session.player;
        match key {
            Key::Left => player.dx = -player.speed,
            Key::Right => player.dx = player.speed,
            Key::Fire => {
                player_shoot(player, &mut session.player_bullets, &self.config);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if matches!(key, Key::Left | Key::Right) {
            session.player.dx = 0.0;
        }
    }

    // ── Observable state ─────────────────────────────────────────────────────

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score)
    }

    pub fn lives(&self) -> i32 {
        self.session
            .as_ref()
            .map_or(self.config.starting_lives, |s| s.lives)
    }

    pub fn game_over(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.status.is_over())
    }

    /// `None` until the game has been initialized.
    pub fn status(&self) -> Option<GameStatus> {
        self.session.as_ref().map(|s| s.status)
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    pub fn enemy_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.enemies.len())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn autofire_timer(&self) -> Option<TimerHandle> {
        self.autofire
    }
}

/// Clear the surface and draw every entity at its current position.
pub fn draw(surface: &mut dyn Surface, session: &GameSession) {
    surface.clear();
    surface.draw_image(Sprite::Player, session.player.body.rect());
    for bullet in &session.player_bullets {
        surface.draw_image(Sprite::PlayerBullet, bullet.body.rect());
    }
    for enemy in &session.enemies {
        surface.draw_image(Sprite::Enemy, enemy.body.rect());
    }
    for bullet in &session.enemy_bullets {
        surface.draw_image(Sprite::EnemyBullet, bullet.body.rect());
    }
}
