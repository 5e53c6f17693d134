//! Keyboard input types for driving the game page.
//!
//! Keys are named by their DOM `KeyboardEvent.code` (`"KeyW"`, `"Space"`,
//! `"ArrowUp"`), the same names the game's input handler listens for.

use serde::{Deserialize, Serialize};

/// A keyboard action sent to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyInput {
    /// Key held down
    Down {
        /// DOM key code
        code: String,
    },
    /// Key released
    Up {
        /// DOM key code
        code: String,
    },
    /// Down immediately followed by up
    Press {
        /// DOM key code
        code: String,
    },
}

impl KeyInput {
    /// Create a key-down event
    #[must_use]
    pub fn down(code: impl Into<String>) -> Self {
        Self::Down { code: code.into() }
    }

    /// Create a key-up event
    #[must_use]
    pub fn up(code: impl Into<String>) -> Self {
        Self::Up { code: code.into() }
    }

    /// Create a key press event
    #[must_use]
    pub fn press(code: impl Into<String>) -> Self {
        Self::Press { code: code.into() }
    }

    /// The DOM code this event refers to
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Down { code } | Self::Up { code } | Self::Press { code } => code,
        }
    }
}

/// Everything CDP needs to synthesize a key event for a DOM code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    /// DOM `code`
    pub code: String,
    /// DOM `key`
    pub key: String,
    /// Windows virtual key code (`keyCode`)
    pub key_code: i64,
    /// Text produced on key down, if printable
    pub text: Option<String>,
}

impl KeyDefinition {
    /// Look up a key by DOM code
    ///
    /// Covers the letters, digits, arrows and the handful of control keys
    /// the driving controls use.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        if let Some(letter) = code.strip_prefix("Key") {
            let mut chars = letter.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if c.is_ascii_uppercase() {
                    let key = c.to_ascii_lowercase().to_string();
                    return Some(Self::printable(code, &key, c as i64));
                }
            }
            return None;
        }

        if let Some(digit) = code.strip_prefix("Digit") {
            let mut chars = digit.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if c.is_ascii_digit() {
                    return Some(Self::printable(code, &c.to_string(), c as i64));
                }
            }
            return None;
        }

        let (key, key_code, text) = match code {
            "Space" => (" ", 32, Some(" ")),
            "Enter" => ("Enter", 13, Some("\r")),
            "Escape" => ("Escape", 27, None),
            "Tab" => ("Tab", 9, None),
            "Backspace" => ("Backspace", 8, None),
            "ShiftLeft" | "ShiftRight" => ("Shift", 16, None),
            "ControlLeft" | "ControlRight" => ("Control", 17, None),
            "ArrowLeft" => ("ArrowLeft", 37, None),
            "ArrowUp" => ("ArrowUp", 38, None),
            "ArrowRight" => ("ArrowRight", 39, None),
            "ArrowDown" => ("ArrowDown", 40, None),
            _ => return None,
        };

        Some(Self {
            code: code.to_string(),
            key: key.to_string(),
            key_code,
            text: text.map(str::to_string),
        })
    }

    fn printable(code: &str, key: &str, key_code: i64) -> Self {
        Self {
            code: code.to_string(),
            key: key.to_string(),
            key_code,
            text: Some(key.to_string()),
        }
    }
}
