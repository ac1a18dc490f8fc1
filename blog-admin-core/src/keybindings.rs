//! Context-aware keybindings
//!
//! Commands are named strings (`"entry.new"`, `"quit"`) bound to one or more
//! key strings (`"n"`, `"ctrl+s"`). Bindings live either in the global table
//! or in a per-context table; context bindings win. The whole thing
//! (de)serializes as a JSON object keyed by `"global"` and context names, so
//! users can override defaults from their config file.

use std::collections::HashMap;
use std::hash::Hash;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A keybinding context, usually one per screen.
pub trait BindingContext: Clone + Copy + Eq + Hash {
    /// Name used as the key in config files
    fn name(&self) -> &'static str;

    /// Parse a context from its config name
    fn from_name(name: &str) -> Option<Self>;

    /// All contexts
    fn all() -> &'static [Self];
}

type BindingTable = HashMap<String, Vec<String>>;

/// Keybindings configuration with context support
#[derive(Debug, Clone)]
pub struct Keybindings<C: BindingContext> {
    global: BindingTable,
    contexts: HashMap<C, BindingTable>,
}

impl<C: BindingContext> Default for Keybindings<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BindingContext> Serialize for Keybindings<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(1 + self.contexts.len()))?;
        map.serialize_entry("global", &self.global)?;
        for (context, table) in &self.contexts {
            map.serialize_entry(context.name(), table)?;
        }
        map.end()
    }
}

impl<'de, C: BindingContext> Deserialize<'de> for Keybindings<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, BindingTable> = HashMap::deserialize(deserializer)?;
        let mut bindings = Keybindings::new();
        for (name, table) in raw {
            if name == "global" {
                bindings.global = table;
            } else if let Some(context) = C::from_name(&name) {
                bindings.contexts.insert(context, table);
            } else {
                tracing::warn!(context = %name, "ignoring bindings for unknown context");
            }
        }
        Ok(bindings)
    }
}

impl<C: BindingContext> Keybindings<C> {
    pub fn new() -> Self {
        Self {
            global: HashMap::new(),
            contexts: HashMap::new(),
        }
    }

    /// Bind a command in every context
    pub fn add_global(&mut self, command: impl Into<String>, keys: &[&str]) {
        self.global.insert(command.into(), to_owned(keys));
    }

    /// Bind a command in one context
    pub fn add(&mut self, context: C, command: impl Into<String>, keys: &[&str]) {
        self.contexts
            .entry(context)
            .or_default()
            .insert(command.into(), to_owned(keys));
    }

    /// Command bound to `key` in `context`, falling back to global bindings.
    pub fn get_command(&self, key: &KeyEvent, context: C) -> Option<&str> {
        self.contexts
            .get(&context)
            .and_then(|table| find_command(table, key))
            .or_else(|| find_command(&self.global, key))
    }

    /// First key string bound to `command`, for help text.
    pub fn first_key(&self, command: &str, context: C) -> Option<&str> {
        self.contexts
            .get(&context)
            .and_then(|table| table.get(command))
            .or_else(|| self.global.get(command))
            .and_then(|keys| keys.first())
            .map(String::as_str)
    }

    /// Overlay `user` on top of `defaults`, command by command.
    pub fn merge(mut defaults: Self, user: Self) -> Self {
        defaults.global.extend(user.global);
        for (context, table) in user.contexts {
            defaults.contexts.entry(context).or_default().extend(table);
        }
        defaults
    }
}

fn to_owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}

fn find_command<'a>(table: &'a BindingTable, key: &KeyEvent) -> Option<&'a str> {
    table.iter().find_map(|(command, keys)| {
        keys.iter()
            .filter_map(|k| parse_key_string(k))
            .any(|bound| keys_match(&bound, key))
            .then_some(command.as_str())
    })
}

/// Compare code and modifiers, ignoring kind and state. Letters compare
/// case-insensitively so `"G"` and `"g"` behave the same in config files.
fn keys_match(bound: &KeyEvent, pressed: &KeyEvent) -> bool {
    let codes_match = match (bound.code, pressed.code) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    };
    let mods = |m: KeyModifiers| m.difference(KeyModifiers::SHIFT);
    codes_match && mods(bound.modifiers) == mods(pressed.modifiers)
}

/// Parse a key string like `"q"`, `"esc"`, `"ctrl+s"`, `"shift+tab"`.
pub fn parse_key_string(key_str: &str) -> Option<KeyEvent> {
    let key_str = key_str.trim().to_lowercase();
    if key_str.is_empty() {
        return None;
    }

    // "+" on its own is a key, not a separator
    let (mod_part, key_part) = match key_str.rsplit_once('+') {
        Some((mods, "")) => (mods.trim_end_matches('+'), "+"),
        Some((mods, key)) => (mods, key),
        None => ("", key_str.as_str()),
    };

    let mut modifiers = KeyModifiers::empty();
    for part in mod_part.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match key_part.trim() {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        "tab" => KeyCode::Tab,
        "backtab" => {
            modifiers |= KeyModifiers::SHIFT;
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') => KeyCode::F(f[1..].parse().ok()?),
        c => {
            let mut chars = c.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

/// Format a key string for display: `"ctrl+s"` → `"^S"`, `"esc"` → `"Esc"`.
pub fn format_key_for_display(key_str: &str) -> String {
    let Some(key) = parse_key_string(key_str) else {
        return key_str.to_string();
    };

    let mut out = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        out.push('^');
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) && key.code != KeyCode::BackTab {
        out.push_str("Shift+");
    }

    let name = match key.code {
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            c.to_ascii_uppercase().to_string()
        }
        KeyCode::Char(c) => c.to_string(),
        other => format!("{:?}", other),
    };
    out.push_str(&name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Screen {
        List,
        Form,
    }

    impl BindingContext for Screen {
        fn name(&self) -> &'static str {
            match self {
                Screen::List => "list",
                Screen::Form => "form",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "list" => Some(Screen::List),
                "form" => Some(Screen::Form),
                _ => None,
            }
        }

        fn all() -> &'static [Self] {
            &[Screen::List, Screen::Form]
        }
    }

    fn key(s: &str) -> KeyEvent {
        parse_key_string(s).unwrap()
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(key("q").code, KeyCode::Char('q'));
        assert_eq!(key("esc").code, KeyCode::Esc);
        assert_eq!(key("f5").code, KeyCode::F(5));
        assert_eq!(key("space").code, KeyCode::Char(' '));

        let save = key("ctrl+s");
        assert_eq!(save.code, KeyCode::Char('s'));
        assert!(save.modifiers.contains(KeyModifiers::CONTROL));

        let back = key("shift+tab");
        assert_eq!(back.code, KeyCode::BackTab);
        assert_eq!(key("backtab").code, KeyCode::BackTab);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_key_string("").is_none());
        assert!(parse_key_string("hyper+x").is_none());
        assert!(parse_key_string("xyz").is_none());
    }

    #[test]
    fn test_context_overrides_global() {
        let mut bindings: Keybindings<Screen> = Keybindings::new();
        bindings.add_global("quit", &["q"]);
        bindings.add(Screen::Form, "form.cancel", &["esc"]);
        bindings.add(Screen::Form, "form.type", &["q"]);

        assert_eq!(bindings.get_command(&key("q"), Screen::List), Some("quit"));
        assert_eq!(bindings.get_command(&key("q"), Screen::Form), Some("form.type"));
        assert_eq!(
            bindings.get_command(&key("esc"), Screen::Form),
            Some("form.cancel")
        );
        assert_eq!(bindings.get_command(&key("esc"), Screen::List), None);
    }

    #[test]
    fn test_letters_match_case_insensitively() {
        let mut bindings: Keybindings<Screen> = Keybindings::new();
        bindings.add(Screen::List, "list.bottom", &["g"]);

        let mut upper = key("G");
        upper.modifiers = KeyModifiers::SHIFT;
        assert_eq!(
            bindings.get_command(&upper, Screen::List),
            Some("list.bottom")
        );
    }

    #[test]
    fn test_merge_and_deserialize() {
        let mut defaults: Keybindings<Screen> = Keybindings::new();
        defaults.add_global("quit", &["q"]);
        defaults.add(Screen::List, "entry.new", &["n"]);

        let user: Keybindings<Screen> = serde_json::from_str(
            r#"{ "global": { "quit": ["ctrl+q"] }, "list": { "entry.delete": ["x"] }, "nope": {} }"#,
        )
        .unwrap();

        let merged = Keybindings::merge(defaults, user);
        assert_eq!(merged.first_key("quit", Screen::List), Some("ctrl+q"));
        assert_eq!(merged.first_key("entry.new", Screen::List), Some("n"));
        assert_eq!(merged.first_key("entry.delete", Screen::List), Some("x"));
        assert_eq!(merged.first_key("entry.delete", Screen::Form), None);
    }

    #[test]
    fn test_format_key_for_display() {
        assert_eq!(format_key_for_display("n"), "n");
        assert_eq!(format_key_for_display("ctrl+s"), "^S");
        assert_eq!(format_key_for_display("esc"), "Esc");
        assert_eq!(format_key_for_display("shift+tab"), "Shift+Tab");
        assert_eq!(format_key_for_display("enter"), "Enter");
    }
}
