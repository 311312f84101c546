use crate::domain::model::Coord;
use crate::utils::error::SitterError;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The six independent care switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareToggles {
    pub petting: bool,
    pub grow_up: bool,
    pub max_fullness: bool,
    pub max_happiness: bool,
    pub max_friendship: bool,
    pub harvest: bool,
}

impl CareToggles {
    pub fn all() -> Self {
        Self {
            petting: true,
            grow_up: true,
            max_fullness: true,
            max_happiness: true,
            max_friendship: true,
            harvest: true,
        }
    }

    pub fn none() -> Self {
        Self {
            petting: false,
            grow_up: false,
            max_fullness: false,
            max_happiness: false,
            max_friendship: false,
            harvest: false,
        }
    }
}

/// Who takes the credit in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reporter {
    /// A nameless hired hand.
    Caretaker,
    Spouse,
    Pet,
    Character(String),
}

impl Reporter {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "spouse" => Reporter::Spouse,
            "pet" => Reporter::Pet,
            "" | "sitter" | "the animal sitter" => Reporter::Caretaker,
            _ => Reporter::Character(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBinding {
    Letter(char),
    Digit(u8),
    Function(u8),
    Space,
    Tab,
    Enter,
    Escape,
}

impl Default for KeyBinding {
    fn default() -> Self {
        KeyBinding::Letter('O')
    }
}

impl FromStr for KeyBinding {
    type Err = SitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_uppercase();
        let invalid = || SitterError::InvalidConfigValueError {
            field: "key_bind".to_string(),
            value: s.to_string(),
            reason: "expected a letter, a digit, F1-F12, Space, Tab, Enter or Escape".to_string(),
        };

        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => return Ok(KeyBinding::Letter(c)),
            (Some(c), None) if c.is_ascii_digit() => {
                return c
                    .to_digit(10)
                    .and_then(|d| u8::try_from(d).ok())
                    .map(KeyBinding::Digit)
                    .ok_or_else(invalid)
            }
            _ => {}
        }

        match value.as_str() {
            "SPACE" => Ok(KeyBinding::Space),
            "TAB" => Ok(KeyBinding::Tab),
            "ENTER" => Ok(KeyBinding::Enter),
            "ESCAPE" | "ESC" => Ok(KeyBinding::Escape),
            other => {
                if let Some(digit) = other.strip_prefix('D') {
                    if let Ok(d @ 0..=9) = digit.parse::<u8>() {
                        return Ok(KeyBinding::Digit(d));
                    }
                }
                if let Some(number) = other.strip_prefix('F') {
                    if let Ok(n @ 1..=12) = number.parse::<u8>() {
                        return Ok(KeyBinding::Function(n));
                    }
                }
                Err(invalid())
            }
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyBinding::Letter(c) => write!(f, "{}", c),
            KeyBinding::Digit(d) => write!(f, "D{}", d),
            KeyBinding::Function(n) => write!(f, "F{}", n),
            KeyBinding::Space => write!(f, "Space"),
            KeyBinding::Tab => write!(f, "Tab"),
            KeyBinding::Enter => write!(f, "Enter"),
            KeyBinding::Escape => write!(f, "Escape"),
        }
    }
}

/// Validated settings for one run. Never changes while a run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfiguration {
    pub toggles: CareToggles,
    pub take_truffles_from_pigs: bool,
    pub messages_enabled: bool,
    pub cost_per_action: u32,
    pub reporter: Reporter,
    pub bypass_inventory: bool,
    pub default_chest: Coord,
    /// item id -> chest that should receive it
    pub chests: HashMap<u32, Coord>,
    pub key_binding: KeyBinding,
    pub dialogue_path: Option<PathBuf>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            toggles: CareToggles::all(),
            take_truffles_from_pigs: true,
            messages_enabled: true,
            cost_per_action: 0,
            reporter: Reporter::Spouse,
            bypass_inventory: false,
            default_chest: Coord::new(73, 14),
            chests: HashMap::new(),
            key_binding: KeyBinding::default(),
            dialogue_path: None,
        }
    }
}

/// Parses `itemId,x,y|itemId,x,y`. Broken entries are skipped with a warning.
pub fn parse_chest_defs(defs: &str) -> HashMap<u32, Coord> {
    let mut chests = HashMap::new();

    for entry in defs.split('|').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split(',').map(str::trim).collect();
        let parsed = match parts.as_slice() {
            [id, x, y] => id
                .parse::<u32>()
                .ok()
                .zip(x.parse::<i32>().ok())
                .zip(y.parse::<i32>().ok())
                .map(|((id, x), y)| (id, Coord::new(x, y))),
            _ => None,
        };

        match parsed {
            Some((id, coord)) => {
                tracing::trace!("Chest for item {} at {}", id, coord);
                chests.insert(id, coord);
            }
            None => tracing::warn!("Ignoring malformed chest definition '{}'", entry),
        }
    }

    chests
}
