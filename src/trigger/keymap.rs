use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

// ── Symbols ──────────────────────────────────────────────────────────

/// Abstract key symbol the combination detector matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Binding ──────────────────────────────────────────────────────────

/// A physical key → direction mapping.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub direction: Direction,
}

// ── KeyMap ───────────────────────────────────────────────────────────

/// Table of keys the detector understands. Anything not in here is an
/// unknown key and resets progress.
pub struct KeyMap {
    pub bindings: Vec<KeyBinding>,
}

impl KeyMap {
    /// Arrow keys plus the vi-style `hjkl` equivalents.
    pub fn default_keymap() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }

    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Direction> {
        self.bindings
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.direction)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::default_keymap()
    }
}

fn default_bindings() -> Vec<KeyBinding> {
    let bind = |code, direction| KeyBinding {
        code,
        modifiers: KeyModifiers::NONE,
        direction,
    };

    vec![
        bind(KeyCode::Up, Direction::Up),
        bind(KeyCode::Down, Direction::Down),
        bind(KeyCode::Left, Direction::Left),
        bind(KeyCode::Right, Direction::Right),
        bind(KeyCode::Char('k'), Direction::Up),
        bind(KeyCode::Char('j'), Direction::Down),
        bind(KeyCode::Char('h'), Direction::Left),
        bind(KeyCode::Char('l'), Direction::Right),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_map_to_directions() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(KeyCode::Up, KeyModifiers::NONE),
            Some(Direction::Up)
        );
        assert_eq!(
            km.lookup(KeyCode::Right, KeyModifiers::NONE),
            Some(Direction::Right)
        );
    }

    #[test]
    fn vi_keys_map_to_directions() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(KeyCode::Char('j'), KeyModifiers::NONE),
            Some(Direction::Down)
        );
    }

    #[test]
    fn modifiers_must_match() {
        let km = KeyMap::default_keymap();
        assert_eq!(km.lookup(KeyCode::Up, KeyModifiers::SHIFT), None);
        assert_eq!(km.lookup(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn direction_parse() {
        assert_eq!("UP".parse(), Ok(Direction::Up));
        assert_eq!(" left".parse(), Ok(Direction::Left));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
