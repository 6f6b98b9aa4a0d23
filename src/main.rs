mod display;
mod input;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders::entities::GameStatus;
use invaders::host::{FrameHandle, Scheduler, Surface, TimerHandle};
use invaders::{Game, GameConfig};

use display::{Hud, TerminalSurface};
use input::{decode, Command, HeldKeys};

/// Display refresh the frame callbacks are aligned to (≈60 Hz).
const REFRESH: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "invaders")]
#[command(about = "Shoot down the descending formation before it reaches you")]
struct Args {
    /// JSON file overriding the built-in game constants
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where log output goes (the terminal itself is taken by the game)
    #[arg(long, default_value = "invaders.log")]
    log_file: PathBuf,

    /// Seed for the enemy fire RNG
    #[arg(long)]
    seed: Option<u64>,
}

// ── Host scheduling ───────────────────────────────────────────────────────────

enum HostEvent {
    Input(Event),
    Autofire(TimerHandle),
}

/// Frame requests wait for the next refresh of the main loop. Each timer is
/// a thread posting ticks into the same channel as input, so every callback
/// runs on the main thread.
struct TerminalScheduler {
    tx: mpsc::Sender<HostEvent>,
    next_id: u64,
    pending_frame: Option<FrameHandle>,
    timers: HashMap<TimerHandle, Arc<AtomicBool>>,
}

impl TerminalScheduler {
    fn new(tx: mpsc::Sender<HostEvent>) -> Self {
        TerminalScheduler {
            tx,
            next_id: 0,
            pending_frame: None,
            timers: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn take_due_frame(&mut self) -> Option<FrameHandle> {
        self.pending_frame.take()
    }
}

impl Scheduler for TerminalScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending_frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
    }

    fn start_timer(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.insert(handle, Arc::clone(&cancelled));

        let tx = self.tx.clone();
        thread::spawn(move || loop {
            thread::sleep(period);
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            if tx.send(HostEvent::Autofire(handle)).is_err() {
                break; // receiver dropped → program exiting
            }
        });
        log::debug!("Started timer {:?} every {:?}", handle, period);
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        if let Some(cancelled) = self.timers.remove(&handle) {
            cancelled.store(true, Ordering::Relaxed);
            log::debug!("Cancelled timer {:?}", handle);
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: terminals with keyboard enhancement report releases and we
/// forward them as `key_up`. Classic terminals only repeat presses, so
/// `HeldKeys` synthesizes the release once a direction's repeats stop.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game<TerminalScheduler, StdRng>,
    surface: &mut TerminalSurface,
    rx: &mpsc::Receiver<HostEvent>,
    keyboard_enhanced: bool,
) -> std::io::Result<()> {
    let mut held = HeldKeys::default();
    let mut refresh: u64 = 0;
    let mut next_refresh = Instant::now() + REFRESH;

    loop {
        // ── Display refresh: run the pending frame and redraw ─────────────────
        let now = Instant::now();
        if now >= next_refresh {
            refresh += 1;
            next_refresh += REFRESH;
            if next_refresh < now {
                next_refresh = now + REFRESH;
            }

            if !keyboard_enhanced {
                for key in held.expire(refresh) {
                    game.key_up(key);
                }
            }

            if let Some(handle) = game.scheduler_mut().take_due_frame() {
                game.on_frame(handle, surface);
            }

            let hud = Hud {
                score: game.score(),
                lives: game.lives(),
                status: game.status().unwrap_or(GameStatus::Playing),
            };
            display::render(out, surface, &hud)?;
            continue;
        }

        // ── Input and timer callbacks until the next refresh ──────────────────
        match rx.recv_timeout(next_refresh - now) {
            Ok(HostEvent::Input(Event::Key(ev))) => match decode(ev) {
                Command::Quit => return Ok(()),
                Command::Restart => {
                    held.clear();
                    game.restart_game(surface);
                }
                Command::Press(key) => {
                    held.press(key, refresh);
                    game.key_down(key);
                }
                Command::Release(key) => {
                    if held.release(key) {
                        game.key_up(key);
                    }
                }
                Command::Nothing => {}
            },
            Ok(HostEvent::Input(Event::Resize(cols, rows))) => surface.resize(cols, rows),
            Ok(HostEvent::Input(_)) => {}
            Ok(HostEvent::Autofire(handle)) => game.on_autofire(handle),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without support fall back to
    // the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<HostEvent>();
    let input_tx = tx.clone();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if input_tx.send(HostEvent::Input(ev)).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let mut game = Game::new(config, TerminalScheduler::new(tx), rng);
    let result = run(&mut out, &mut game, &rx, keyboard_enhanced);
    game.teardown();

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    game: &mut Game<TerminalScheduler, StdRng>,
    rx: &mpsc::Receiver<HostEvent>,
    keyboard_enhanced: bool,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    let (width, height) = (game.config().canvas_width, game.config().canvas_height);
    let mut surface = TerminalSurface::open(width, height, cols, rows);

    game.initialize(surface.as_mut().map(|s| s as &mut dyn Surface))
        .with_context(|| {
            format!(
                "terminal is {}x{}, need at least {}x{}",
                cols,
                rows,
                display::MIN_COLS,
                display::MIN_ROWS
            )
        })?;

    if let Some(surface) = surface.as_mut() {
        game_loop(out, game, surface, rx, keyboard_enhanced)?;
    }
    Ok(())
}
