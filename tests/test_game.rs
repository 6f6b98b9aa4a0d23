use std::time::Duration;

use invaders::entities::*;
use invaders::geometry::Rect;
use invaders::host::*;
use invaders::{Game, GameConfig, GameError};

use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Test doubles ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingScheduler {
    next_id: u64,
    requested: Vec<FrameHandle>,
    cancelled_frames: Vec<FrameHandle>,
    started: Vec<(TimerHandle, Duration)>,
    cancelled_timers: Vec<TimerHandle>,
}

impl Scheduler for RecordingScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled_frames.push(handle);
    }

    fn start_timer(&mut self, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.started.push((handle, period));
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.cancelled_timers.push(handle);
    }
}

#[derive(Default)]
struct RecordingSurface {
    clears: usize,
    drawn: Vec<(Sprite, Rect)>,
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (800.0, 600.0)
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.drawn.clear();
    }

    fn draw_image(&mut self, sprite: Sprite, rect: Rect) {
        self.drawn.push((sprite, rect));
    }
}

type TestGame = Game<RecordingScheduler, StdRng>;

fn new_game() -> TestGame {
    Game::new(
        GameConfig::default(),
        RecordingScheduler::default(),
        StdRng::seed_from_u64(7),
    )
}

fn started() -> (TestGame, RecordingSurface) {
    let mut game = new_game();
    let mut surface = RecordingSurface::default();
    game.initialize(Some(&mut surface)).unwrap();
    (game, surface)
}

/// Run the frame the game is currently waiting for.
fn step(game: &mut TestGame, surface: &mut RecordingSurface) {
    let handle = game.pending_frame().expect("no frame pending");
    game.on_frame(handle, surface);
}

fn enemy_bullet_on_player() -> Bullet {
    let c = GameConfig::default();
    Bullet {
        body: Body {
            x: 397.5,
            y: 550.0,
            width: c.bullet_width,
            height: c.bullet_height,
            hitbox: c.bullet_hitbox,
        },
        dy: c.enemy_bullet_speed,
        owner: BulletOwner::Enemy,
    }
}

// ── initialize ────────────────────────────────────────────────────────────────

#[test]
fn initialize_without_surface_creates_nothing() {
    let mut game = new_game();
    let err = game.initialize(None).unwrap_err();
    assert!(matches!(err, GameError::SurfaceUnavailable));
    assert!(game.session().is_none());
    assert!(game.status().is_none());
    assert!(!game.game_over());
    assert!(game.scheduler().requested.is_empty());
    assert!(game.scheduler().started.is_empty());
}

#[test]
fn initialize_draws_and_schedules() {
    let (game, surface) = started();
    assert_eq!(game.status(), Some(GameStatus::Playing));
    assert_eq!(game.score(), 0);
    assert_eq!(game.lives(), 3);
    assert_eq!(game.enemy_count(), 50);

    assert_eq!(surface.clears, 1);
    assert_eq!(surface.drawn.len(), 51); // player + 50 enemies
    assert_eq!(surface.drawn[0], (Sprite::Player, Rect::new(375.0, 550.0, 50.0, 30.0)));

    assert_eq!(game.scheduler().requested.len(), 1);
    assert_eq!(game.scheduler().started, vec![(TimerHandle(2), Duration::from_millis(1000))]);
    assert_eq!(game.autofire_timer(), Some(TimerHandle(2)));
}

#[test]
fn initialize_twice_is_ignored() {
    let (mut game, mut surface) = started();
    game.initialize(Some(&mut surface)).unwrap();
    assert_eq!(game.scheduler().started.len(), 1);
    assert_eq!(game.scheduler().requested.len(), 1);
}

#[test]
fn initialize_without_surface_on_started_game_is_ignored() {
    let (mut game, _) = started();
    assert!(game.initialize(None).is_ok());
    assert_eq!(game.status(), Some(GameStatus::Playing));
    assert!(game.pending_frame().is_some());
    assert_eq!(game.scheduler().started.len(), 1);
}

// ── frames ────────────────────────────────────────────────────────────────────

#[test]
fn each_frame_schedules_the_next() {
    let (mut game, mut surface) = started();
    for _ in 0..10 {
        step(&mut game, &mut surface);
    }
    assert_eq!(game.scheduler().requested.len(), 11);
    assert_eq!(game.session().unwrap().frame, 11);
}

#[test]
fn stale_frame_is_ignored() {
    let (mut game, mut surface) = started();
    let old = game.pending_frame().unwrap();
    step(&mut game, &mut surface);
    game.on_frame(old, &mut surface);
    assert_eq!(game.session().unwrap().frame, 2);
    assert_eq!(game.scheduler().requested.len(), 2);
}

#[test]
fn draw_order_is_player_bullets_enemies_enemy_bullets() {
    let (mut game, mut surface) = started();
    game.key_down(Key::Fire);
    let timer = game.autofire_timer().unwrap();
    game.on_autofire(timer);
    step(&mut game, &mut surface);

    let sprites: Vec<Sprite> = surface.drawn.iter().map(|(s, _)| *s).collect();
    assert_eq!(sprites[0], Sprite::Player);
    assert_eq!(sprites[1], Sprite::PlayerBullet);
    assert!(sprites[2..52].iter().all(|s| *s == Sprite::Enemy));
    assert_eq!(sprites[52], Sprite::EnemyBullet);
}

// ── input ─────────────────────────────────────────────────────────────────────

#[test]
fn arrow_keys_set_and_clear_intent() {
    let (mut game, _) = started();
    game.key_down(Key::Left);
    assert_eq!(game.session().unwrap().player.dx, -5.0);
    game.key_down(Key::Right);
    assert_eq!(game.session().unwrap().player.dx, 5.0);
    game.key_up(Key::Left);
    assert_eq!(game.session().unwrap().player.dx, 0.0);
}

#[test]
fn fire_key_respects_cap() {
    let (mut game, _) = started();
    for _ in 0..7 {
        game.key_down(Key::Fire);
    }
    assert_eq!(game.session().unwrap().player_bullets.len(), 5);
}

#[test]
fn fire_key_before_initialize_is_ignored() {
    let mut game = new_game();
    game.key_down(Key::Fire);
    game.key_up(Key::Left);
    assert!(game.session().is_none());
}

// ── autofire ──────────────────────────────────────────────────────────────────

#[test]
fn autofire_spawns_one_enemy_bullet() {
    let (mut game, _) = started();
    let timer = game.autofire_timer().unwrap();
    game.on_autofire(timer);
    game.on_autofire(timer);
    assert_eq!(game.session().unwrap().enemy_bullets.len(), 2);
}

#[test]
fn stale_autofire_tick_is_ignored() {
    let (mut game, _) = started();
    game.on_autofire(TimerHandle(999));
    assert!(game.session().unwrap().enemy_bullets.is_empty());
}

// ── terminal states ───────────────────────────────────────────────────────────

#[test]
fn losing_last_life_halts_scheduling() {
    let (mut game, mut surface) = started();
    let timer = game.autofire_timer().unwrap();
    {
        let s = game.session_mut().unwrap();
        s.lives = 1;
        s.enemy_bullets.spawn(enemy_bullet_on_player());
    }
    step(&mut game, &mut surface);

    assert!(game.game_over());
    assert_eq!(game.status(), Some(GameStatus::Lost));
    assert_eq!(game.lives(), 0);
    assert_eq!(game.pending_frame(), None);
    assert_eq!(game.autofire_timer(), None);
    assert_eq!(game.scheduler().cancelled_timers, vec![timer]);
    assert_eq!(game.scheduler().requested.len(), 1); // nothing after the fatal frame

    // A tick already in flight from the cancelled timer spawns nothing
    let bullets_before = game.session().unwrap().enemy_bullets.len();
    game.on_autofire(timer);
    assert_eq!(game.session().unwrap().enemy_bullets.len(), bullets_before);

    // Input does nothing once the game is over
    game.key_down(Key::Fire);
    assert!(game.session().unwrap().player_bullets.is_empty());
}

#[test]
fn clearing_formation_wins_and_halts_scheduling() {
    let (mut game, mut surface) = started();
    {
        let s = game.session_mut().unwrap();
        let first = s.enemies.get(0).unwrap().clone();
        let (x, y) = (first.body.x, first.body.y);
        s.enemies.clear();
        s.enemies.spawn(first);
        let mut shot = enemy_bullet_on_player();
        shot.body.x = x + 17.5;
        shot.body.y = y + 10.0;
        shot.dy = -7.0;
        shot.owner = BulletOwner::Player;
        s.player_bullets.spawn(shot);
    }
    step(&mut game, &mut surface);

    assert_eq!(game.status(), Some(GameStatus::Won));
    assert_eq!(game.score(), 10);
    assert_eq!(game.pending_frame(), None);
    assert_eq!(game.autofire_timer(), None);
    assert_eq!(game.scheduler().cancelled_timers.len(), 1);
}

// ── restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_after_loss_resets_everything() {
    let (mut game, mut surface) = started();
    {
        let s = game.session_mut().unwrap();
        s.lives = 1;
        s.score = 120;
        s.player.body.x = 10.0;
        s.enemies.remove(0);
        let mut shot = enemy_bullet_on_player();
        shot.body.x = 27.5; // over the moved player
        s.enemy_bullets.spawn(shot);
    }
    game.key_down(Key::Fire);
    step(&mut game, &mut surface);
    assert!(game.game_over());

    game.restart_game(&mut surface);

    let s = game.session().unwrap();
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 3);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(!game.game_over());
    assert!(s.player_bullets.is_empty());
    assert!(s.enemy_bullets.is_empty());
    assert_eq!(s.enemies.len(), 50);
    assert_eq!((s.player.body.x, s.player.body.y), (375.0, 550.0));

    // Both schedules are running again
    assert!(game.pending_frame().is_some());
    assert!(game.autofire_timer().is_some());
    assert_eq!(game.scheduler().started.len(), 2);
}

#[test]
fn restart_while_running_cancels_old_schedules() {
    let (mut game, mut surface) = started();
    let old_frame = game.pending_frame().unwrap();
    let old_timer = game.autofire_timer().unwrap();

    game.restart_game(&mut surface);

    assert_eq!(game.scheduler().cancelled_frames, vec![old_frame]);
    assert_eq!(game.scheduler().cancelled_timers, vec![old_timer]);
    assert_ne!(game.autofire_timer(), Some(old_timer));

    // Old timer ticks no longer fire
    game.on_autofire(old_timer);
    assert!(game.session().unwrap().enemy_bullets.is_empty());
}

#[test]
fn teardown_cancels_both_schedules() {
    let (mut game, _) = started();
    let frame = game.pending_frame().unwrap();
    let timer = game.autofire_timer().unwrap();
    game.teardown();
    assert_eq!(game.scheduler().cancelled_frames, vec![frame]);
    assert_eq!(game.scheduler().cancelled_timers, vec![timer]);
    assert_eq!(game.pending_frame(), None);
    assert_eq!(game.autofire_timer(), None);
}
