//! Hidden key combination that starts or ends a session from the device.

mod keymap;

pub use keymap::{Direction, KeyBinding, KeyMap};

use anyhow::{Result, ensure};
use crossterm::event::{KeyEvent, KeyEventKind};

/// Combination used when none is configured.
pub const DEFAULT_SEQUENCE: [Direction; 4] = [
    Direction::Up,
    Direction::Up,
    Direction::Down,
    Direction::Down,
];

/// Session controller the detector drives when the combination fires.
pub trait SessionToggle {
    fn start_session(&self);
    fn end_session(&self);

    /// Real session state, if the controller can report it.
    ///
    /// When `None` the detector falls back to its own record of what it last
    /// did, which goes stale if the session ends for another reason.
    fn is_session_active(&self) -> Option<bool> {
        None
    }
}

/// Watches released keys for an ordered target sequence.
pub struct KeyCombinationDetector<T> {
    target: Vec<Direction>,
    progress: Vec<Direction>,
    keymap: KeyMap,
    toggle: T,
    is_connected: bool,
}

impl<T: SessionToggle> KeyCombinationDetector<T> {
    pub fn new(target: Vec<Direction>, toggle: T) -> Result<Self> {
        Self::with_keymap(target, KeyMap::default_keymap(), toggle)
    }

    pub fn with_keymap(target: Vec<Direction>, keymap: KeyMap, toggle: T) -> Result<Self> {
        ensure!(!target.is_empty(), "key combination must not be empty");
        Ok(Self {
            progress: Vec::with_capacity(target.len()),
            target,
            keymap,
            toggle,
            is_connected: false,
        })
    }

    /// Feed one terminal key event. Only releases count; presses and repeats
    /// are ignored. Returns `true` if the combination fired.
    pub fn on_key_event(&mut self, event: &KeyEvent) -> bool {
        if event.kind != KeyEventKind::Release {
            return false;
        }
        match self.keymap.lookup(event.code, event.modifiers) {
            Some(direction) => self.on_symbol(direction),
            None => {
                self.reset();
                false
            }
        }
    }

    /// Feed an already-mapped symbol.
    pub fn on_symbol(&mut self, direction: Direction) -> bool {
        if self.progress.len() >= self.target.len() || !self.target.starts_with(&self.progress) {
            self.progress.clear();
        }
        self.progress.push(direction);

        if self.progress != self.target {
            return false;
        }
        self.progress.clear();
        self.fire();
        true
    }

    /// Drop any partial match.
    pub fn reset(&mut self) {
        self.progress.clear();
    }

    pub fn progress(&self) -> &[Direction] {
        &self.progress
    }

    pub fn target(&self) -> &[Direction] {
        &self.target
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn toggle(&self) -> &T {
        &self.toggle
    }

    fn fire(&mut self) {
        let connected = self
            .toggle
            .is_session_active()
            .unwrap_or(self.is_connected);
        if connected {
            tracing::info!("key combination detected, ending session");
            self.toggle.end_session();
        } else {
            tracing::info!("key combination detected, starting session");
            self.toggle.start_session();
        }
        self.is_connected = !connected;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
        active: Cell<Option<bool>>,
    }

    impl SessionToggle for Recorder {
        fn start_session(&self) {
            self.calls.borrow_mut().push("start");
        }

        fn end_session(&self) {
            self.calls.borrow_mut().push("end");
        }

        fn is_session_active(&self) -> Option<bool> {
            self.active.get()
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            kind: KeyEventKind::Press,
            ..release(code)
        }
    }

    fn detector() -> KeyCombinationDetector<Recorder> {
        KeyCombinationDetector::new(DEFAULT_SEQUENCE.to_vec(), Recorder::default()).unwrap()
    }

    fn feed(d: &mut KeyCombinationDetector<Recorder>, keys: &[KeyCode]) -> usize {
        keys.iter()
            .filter(|&&code| d.on_key_event(&release(code)))
            .count()
    }

    #[test]
    fn exact_sequence_fires_once() {
        let mut d = detector();
        let fired = feed(
            &mut d,
            &[KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down],
        );
        assert_eq!(fired, 1);
        assert_eq!(*d.toggle().calls.borrow(), ["start"]);
        assert!(d.progress().is_empty());
    }

    #[test]
    fn stray_leading_keys_are_discarded() {
        let mut d = detector();
        let fired = feed(
            &mut d,
            &[
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::Up,
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::Down,
            ],
        );
        assert_eq!(fired, 1);
    }

    #[test]
    fn unknown_key_aborts_progress() {
        let mut d = detector();
        feed(&mut d, &[KeyCode::Up, KeyCode::Up, KeyCode::Down]);
        assert_eq!(d.progress().len(), 3);
        d.on_key_event(&release(KeyCode::Char('x')));
        assert!(d.progress().is_empty());
        assert_eq!(feed(&mut d, &[KeyCode::Down]), 0);
    }

    #[test]
    fn presses_are_ignored() {
        let mut d = detector();
        for code in [KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down] {
            assert!(!d.on_key_event(&press(code)));
        }
        assert!(d.progress().is_empty());
        assert!(d.toggle().calls.borrow().is_empty());
    }

    #[test]
    fn presses_do_not_break_a_match() {
        let mut d = detector();
        d.on_key_event(&release(KeyCode::Up));
        d.on_key_event(&press(KeyCode::Char('x')));
        let fired = feed(&mut d, &[KeyCode::Up, KeyCode::Down, KeyCode::Down]);
        assert_eq!(fired, 1);
    }

    #[test]
    fn alternates_start_and_end() {
        let mut d = detector();
        let combo = [KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down];
        feed(&mut d, &combo);
        assert!(d.is_connected());
        feed(&mut d, &combo);
        assert!(!d.is_connected());
        assert_eq!(*d.toggle().calls.borrow(), ["start", "end"]);
    }

    #[test]
    fn shadow_flag_drifts_without_real_state() {
        let mut d = detector();
        let combo = [KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down];
        feed(&mut d, &combo);
        // Session ended elsewhere; the detector still believes it is connected.
        feed(&mut d, &combo);
        assert_eq!(*d.toggle().calls.borrow(), ["start", "end"]);
    }

    #[test]
    fn real_state_wins_when_reported() {
        let mut d = detector();
        let combo = [KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down];
        feed(&mut d, &combo);
        d.toggle().active.set(Some(false));
        feed(&mut d, &combo);
        assert_eq!(*d.toggle().calls.borrow(), ["start", "start"]);
        assert!(d.is_connected());
    }

    #[test]
    fn fires_on_back_to_back_matches() {
        let mut d = KeyCombinationDetector::new(
            vec![Direction::Left, Direction::Right],
            Recorder::default(),
        )
        .unwrap();
        assert!(!d.on_symbol(Direction::Left));
        assert!(d.on_symbol(Direction::Right));
        assert!(!d.on_symbol(Direction::Left));
        assert!(d.on_symbol(Direction::Right));
    }

    #[test]
    fn empty_target_rejected() {
        assert!(KeyCombinationDetector::new(vec![], Recorder::default()).is_err());
    }
}
