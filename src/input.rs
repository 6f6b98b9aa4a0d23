//! Keyboard decoding and held-direction bookkeeping for the terminal host.
//!
//! Terminals with keyboard enhancement report releases. Classic terminals
//! only send a press, then auto-repeats after the OS repeat delay, and
//! nothing at all on release. `HeldKeys` turns that stream back into a
//! release: a direction is let go once its repeats stop.

use std::collections::{HashMap, HashSet};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use invaders::host::Key;

/// Refreshes a freshly pressed direction is held before its first repeat
/// must arrive (≈750 ms, longer than common OS repeat delays).
pub const INITIAL_HOLD: u64 = 45;

/// Refreshes a repeating direction survives without a further repeat
/// (≈133 ms, several repeat periods).
pub const REPEAT_HOLD: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Press(Key),
    Release(Key),
    Restart,
    Quit,
    Nothing,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        _ => None,
    }
}

pub fn decode(ev: KeyEvent) -> Command {
    let KeyEvent { code, kind, modifiers, .. } = ev;
    match kind {
        KeyEventKind::Press | KeyEventKind::Repeat => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') if kind == KeyEventKind::Press => {
                Command::Restart
            }
            _ => map_key(code).map_or(Command::Nothing, Command::Press),
        },
        KeyEventKind::Release => map_key(code).map_or(Command::Nothing, Command::Release),
    }
}

fn opposite(key: Key) -> Option<Key> {
    match key {
        Key::Left => Some(Key::Right),
        Key::Right => Some(Key::Left),
        Key::Fire => None,
    }
}

/// The direction keys currently considered held, with the refresh each was
/// last seen on. Only one direction is tracked at a time: pressing the other
/// one hands control over without a release of the first.
#[derive(Debug, Default)]
pub struct HeldKeys {
    last_seen: HashMap<Key, u64>,
    repeating: HashSet<Key>,
}

impl HeldKeys {
    /// Record a press or auto-repeat of `key` seen on `refresh`.
    pub fn press(&mut self, key: Key, refresh: u64) {
        let Some(other) = opposite(key) else {
            return;
        };
        self.forget(other);
        if self.last_seen.insert(key, refresh).is_some() {
            self.repeating.insert(key);
        }
    }

    /// Record an explicit release. Returns whether `key` was the held
    /// direction, i.e. whether the game should see a key-up.
    pub fn release(&mut self, key: Key) -> bool {
        self.forget(key)
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
        self.repeating.clear();
    }

    /// Drop and return the directions whose repeats have stopped as of
    /// `refresh`.
    pub fn expire(&mut self, refresh: u64) -> Vec<Key> {
        let expired: Vec<Key> = self
            .last_seen
            .iter()
            .filter(|&(key, &last)| {
                let window = if self.repeating.contains(key) {
                    REPEAT_HOLD
                } else {
                    INITIAL_HOLD
                };
                refresh.saturating_sub(last) > window
            })
            .map(|(&key, _)| key)
            .collect();
        for key in &expired {
            self.forget(*key);
        }
        expired
    }

    fn forget(&mut self, key: Key) -> bool {
        self.repeating.remove(&key);
        self.last_seen.remove(&key).is_some()
    }
}
