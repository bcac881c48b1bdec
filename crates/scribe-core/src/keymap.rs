//! Keyboard mapping: key presses to commands.
//!
//! Defaults cover every menu operation; users override or extend them in
//! the `[keyboard.bindings]` section of the config file with entries like
//! `"ctrl+shift+d" = "duplicate_line"`.

use crate::command::Command;
use crate::config::Config;
use std::collections::HashMap;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl modifier.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Alt modifier.
    pub const ALT: Modifiers = Modifiers {
        ctrl: false,
        alt: true,
        shift: false,
        meta: false,
    };

    /// Shift modifier.
    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Ctrl+Shift.
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Ctrl+Alt.
    pub const CTRL_ALT: Modifiers = Modifiers {
        ctrl: true,
        alt: true,
        shift: false,
        meta: false,
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Parses modifiers from a string like "ctrl+shift".
    pub fn parse(s: &str) -> Self {
        let mut mods = Modifiers::NONE;
        let lower = s.to_lowercase();
        if lower.contains("ctrl") || lower.contains("control") {
            mods.ctrl = true;
        }
        if lower.contains("alt") || lower.contains("option") {
            mods.alt = true;
        }
        if lower.contains("shift") {
            mods.shift = true;
        }
        if lower.contains("meta") || lower.contains("cmd") || lower.contains("win") {
            mods.meta = true;
        }
        mods
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Space,
}

impl Key {
    /// Parses a key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" | "bs" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "pageup" | "pgup" => Some(Key::PageUp),
            "pagedown" | "pgdn" => Some(Key::PageDown),
            "space" => Some(Key::Space),
            // "f3".."f12", but never a bare "f" (that is Char('f'))
            _ if lower.len() >= 2
                && lower.len() <= 3
                && lower.starts_with('f')
                && lower[1..].chars().all(|c| c.is_ascii_digit()) =>
            {
                lower[1..].parse().ok().map(Key::F)
            }
            _ if s.chars().count() == 1 => s.chars().next().map(Key::Char),
            _ => None,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
            Key::F(n) => write!(f, "F{}", n),
            Key::Space => write!(f, "Space"),
        }
    }
}

/// A key press event: one key plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parses a key binding string like "ctrl+s" or "alt+up".
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').collect();
        let key_str = parts.last()?;
        let key = Key::parse(key_str)?;
        let modifiers = Modifiers::parse(&parts[..parts.len() - 1].join("+"));
        Some(Self { key, modifiers })
    }
}

impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// Maps key presses to commands.
pub struct Keymap {
    bindings: HashMap<KeyPress, Command>,
}

impl Keymap {
    /// Creates a keymap with the default bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap
    }

    /// Creates a keymap from configuration: defaults plus user overrides.
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        for (key_str, cmd_str) in &config.keyboard.bindings {
            if let (Some(key), Some(cmd)) = (KeyPress::parse(key_str), Command::parse(cmd_str)) {
                keymap.bindings.insert(key, cmd);
            }
        }

        keymap
    }

    fn add_default_bindings(&mut self) {
        use Command::*;

        let defaults: &[(&str, Command)] = &[
            // File
            ("ctrl+n", NewFile),
            ("ctrl+o", OpenFile),
            ("ctrl+shift+o", OpenFolder),
            ("ctrl+s", Save),
            ("ctrl+shift+s", SaveAs),
            ("ctrl+w", CloseTab),
            ("ctrl+q", Quit),
            // Edit
            ("ctrl+z", Undo),
            ("ctrl+y", Redo),
            ("ctrl+shift+z", Redo),
            ("ctrl+x", Cut),
            ("ctrl+c", Copy),
            ("ctrl+v", Paste),
            // Selection
            ("ctrl+a", SelectAll),
            ("ctrl+d", SelectWord),
            ("ctrl+l", SelectLine),
            // Line operations
            ("ctrl+shift+d", DuplicateLine),
            ("ctrl+shift+k", DeleteLine),
            ("alt+up", MoveLineUp),
            ("alt+down", MoveLineDown),
            // Splits
            ("ctrl+\\", SplitRight),
            ("ctrl+shift+\\", SplitDown),
            ("ctrl+shift+x", CloseSplit),
            ("ctrl+alt+right", FocusNextSplit),
            ("ctrl+alt+left", FocusPreviousSplit),
            // Search
            ("ctrl+f", Find),
            ("ctrl+h", Find),
            ("f3", FindNext),
            ("shift+f3", FindPrevious),
            ("ctrl+g", GotoLine),
            // Tabs
            ("ctrl+tab", NextTab),
            ("ctrl+shift+tab", PreviousTab),
            // View
            ("ctrl+b", ToggleSidebar),
        ];

        for (key_str, cmd) in defaults {
            if let Some(key) = KeyPress::parse(key_str) {
                self.bindings.insert(key, *cmd);
            }
        }
    }

    /// Looks up the command for a key press.
    pub fn lookup(&self, press: &KeyPress) -> Option<Command> {
        self.bindings.get(press).copied()
    }

    /// The display string of the binding for a command, for menu hints.
    pub fn shortcut_for(&self, command: Command) -> Option<String> {
        self.bindings
            .iter()
            .filter(|&(_, &c)| c == command)
            .map(|(k, _)| k.to_string())
            .min_by_key(|s| s.len())
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypress_parse() {
        let press = KeyPress::parse("ctrl+s").unwrap();
        assert_eq!(press.key, Key::Char('s'));
        assert!(press.modifiers.ctrl);
        assert!(!press.modifiers.shift);

        let press = KeyPress::parse("ctrl+shift+\\").unwrap();
        assert_eq!(press.key, Key::Char('\\'));
        assert!(press.modifiers.ctrl && press.modifiers.shift);

        let press = KeyPress::parse("alt+up").unwrap();
        assert_eq!(press.key, Key::Up);
        assert!(press.modifiers.alt);

        let press = KeyPress::parse("shift+f3").unwrap();
        assert_eq!(press.key, Key::F(3));
    }

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::new();
        assert_eq!(
            keymap.lookup(&KeyPress::parse("ctrl+s").unwrap()),
            Some(Command::Save)
        );
        assert_eq!(
            keymap.lookup(&KeyPress::parse("alt+down").unwrap()),
            Some(Command::MoveLineDown)
        );
        assert_eq!(
            keymap.lookup(&KeyPress::parse("ctrl+\\").unwrap()),
            Some(Command::SplitRight)
        );
        assert_eq!(keymap.lookup(&KeyPress::parse("ctrl+e").unwrap()), None);
        // A bare "f" parses as a character, not a truncated F-key
        assert_eq!(
            keymap.lookup(&KeyPress::parse("ctrl+f").unwrap()),
            Some(Command::Find)
        );
    }

    #[test]
    fn test_config_overrides_default() {
        let mut config = Config::default();
        config
            .keyboard
            .bindings
            .insert("ctrl+d".to_string(), "delete_line".to_string());

        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.lookup(&KeyPress::parse("ctrl+d").unwrap()),
            Some(Command::DeleteLine)
        );
        // Untouched defaults survive
        assert_eq!(
            keymap.lookup(&KeyPress::parse("ctrl+s").unwrap()),
            Some(Command::Save)
        );
    }

    #[test]
    fn test_shortcut_for() {
        let keymap = Keymap::new();
        assert_eq!(keymap.shortcut_for(Command::Save).as_deref(), Some("Ctrl+S"));
    }

    #[test]
    fn test_keypress_display() {
        let press = KeyPress::parse("ctrl+shift+k").unwrap();
        assert_eq!(press.to_string(), "Ctrl+Shift+K");
    }
}
