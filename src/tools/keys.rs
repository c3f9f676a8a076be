//! Key chord parsing
//!
//! The model names keys the Playwright way: `Control+A`, `Enter`,
//! `Shift+Tab`. A chord is any number of modifiers followed by one key.

use std::fmt;
use std::str::FromStr;

use crate::core::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Alt,
    Control,
    Meta,
    Shift,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "alt" | "option" => Some(Self::Alt),
            "control" | "ctrl" => Some(Self::Control),
            "meta" | "cmd" | "command" | "super" | "win" => Some(Self::Meta),
            "shift" => Some(Self::Shift),
            _ => None,
        }
    }
}

/// A parsed key chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl KeyChord {
    /// Chord that selects everything in the focused field
    pub fn select_all() -> Self {
        let modifier = if cfg!(target_os = "macos") {
            Modifier::Meta
        } else {
            Modifier::Control
        };
        Self {
            modifiers: vec![modifier],
            key: "a".to_string(),
        }
    }

    pub fn single(key: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            key: key.into(),
        }
    }
}

/// Canonical DOM key names for the spellings models tend to use
fn canonical_key(key: &str) -> String {
    let canonical = match key.to_ascii_lowercase().as_str() {
        "enter" | "return" => "Enter",
        "tab" => "Tab",
        "esc" | "escape" => "Escape",
        "backspace" => "Backspace",
        "delete" | "del" => "Delete",
        "space" => " ",
        "pagedown" => "PageDown",
        "pageup" => "PageUp",
        "home" => "Home",
        "end" => "End",
        "up" | "arrowup" => "ArrowUp",
        "down" | "arrowdown" => "ArrowDown",
        "left" | "arrowleft" => "ArrowLeft",
        "right" | "arrowright" => "ArrowRight",
        _ => return key.to_string(),
    };
    canonical.to_string()
}

impl FromStr for KeyChord {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifier_tokens) = match tokens.split_last() {
            Some((key, rest)) if !key.is_empty() => (key, rest),
            // "Control++" style chords end in the plus key itself
            _ if s.trim().ends_with('+') && s.trim().len() > 1 => {
                let head = s.trim().trim_end_matches('+');
                let rest: Vec<&str> = head.split('+').map(str::trim).collect();
                let mut chord = Self::from_modifiers(&rest, s)?;
                chord.key = "+".to_string();
                return Ok(chord);
            }
            _ => return Err(ActionError::invalid("key_combination", format!("empty key in '{}'", s))),
        };

        let mut chord = Self::from_modifiers(modifier_tokens, s)?;
        chord.key = canonical_key(key);
        Ok(chord)
    }
}

impl KeyChord {
    fn from_modifiers(tokens: &[&str], original: &str) -> Result<Self, ActionError> {
        let modifiers = tokens
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| {
                Modifier::parse(t).ok_or_else(|| {
                    ActionError::invalid(
                        "key_combination",
                        format!("unknown modifier '{}' in '{}'", t, original),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            modifiers,
            key: String::new(),
        })
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            let name = match m {
                Modifier::Alt => "Alt",
                Modifier::Control => "Control",
                Modifier::Meta => "Meta",
                Modifier::Shift => "Shift",
            };
            write!(f, "{}+", name)?;
        }
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chord() {
        let chord: KeyChord = "Control+Shift+T".parse().unwrap();
        assert_eq!(chord.modifiers, vec![Modifier::Control, Modifier::Shift]);
        assert_eq!(chord.key, "T");
        assert_eq!(chord.to_string(), "Control+Shift+T");
    }

    #[test]
    fn test_single_key_is_canonicalized() {
        let chord: KeyChord = "enter".parse().unwrap();
        assert!(chord.modifiers.is_empty());
        assert_eq!(chord.key, "Enter");
    }

    #[test]
    fn test_plus_key() {
        let chord: KeyChord = "Control++".parse().unwrap();
        assert_eq!(chord.modifiers, vec![Modifier::Control]);
        assert_eq!(chord.key, "+");
    }

    #[test]
    fn test_unknown_modifier_rejected() {
        let err = "Hyper+A".parse::<KeyChord>().unwrap_err();
        assert!(err.to_string().contains("Hyper"));
    }

    #[test]
    fn test_empty_chord_rejected() {
        assert!("".parse::<KeyChord>().is_err());
    }
}
