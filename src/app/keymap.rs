//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the dashboard's normal mode goes through the keymap. Text entry
//! (search prompt) and modal dialogs use fixed keys.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const KEYBINDS_FILE: &str = "keybinds.conf";

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the help dialog.
    OpenHelp,
    /// Show or hide the keybindings panel on the right.
    ToggleKeybindsPane,
    /// Focus the search prompt.
    StartSearch,
    /// Open the details dialog for the selected user.
    EnterAction,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Open the sort column menu.
    OpenSortMenu,
    /// Flip ascending/descending.
    ToggleSortOrder,
    /// Switch between table and cards.
    SwitchView,
    SimulateLoading,
    SimulateError,
    SimulateEmpty,
    /// Clear the simulator override.
    SimulateReset,
    /// Clear the override and refetch the list.
    Retry,
    Logout,
    /// Swallow the key.
    Ignore,
}

/// Config-file names of every action.
const ACTION_NAMES: [(KeyAction, &str); 19] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::ToggleKeybindsPane, "ToggleKeybindsPane"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::EnterAction, "EnterAction"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::OpenSortMenu, "OpenSortMenu"),
    (KeyAction::ToggleSortOrder, "ToggleSortOrder"),
    (KeyAction::SwitchView, "SwitchView"),
    (KeyAction::SimulateLoading, "SimulateLoading"),
    (KeyAction::SimulateError, "SimulateError"),
    (KeyAction::SimulateEmpty, "SimulateEmpty"),
    (KeyAction::SimulateReset, "SimulateReset"),
    (KeyAction::Retry, "Retry"),
    (KeyAction::Logout, "Logout"),
    (KeyAction::Ignore, "Ignore"),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style j/k, single letters for everything else.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Left), KeyAction::PageUp);
        bindings.insert((M::NONE, Right), KeyAction::PageDown);

        bindings.insert((M::NONE, Char('s')), KeyAction::OpenSortMenu);
        bindings.insert((M::NONE, Char('o')), KeyAction::ToggleSortOrder);
        bindings.insert((M::NONE, Char('v')), KeyAction::SwitchView);

        bindings.insert((M::NONE, Char('1')), KeyAction::SimulateLoading);
        bindings.insert((M::NONE, Char('2')), KeyAction::SimulateError);
        bindings.insert((M::NONE, Char('3')), KeyAction::SimulateEmpty);
        bindings.insert((M::NONE, Char('0')), KeyAction::SimulateReset);
        bindings.insert((M::NONE, Char('r')), KeyAction::Retry);
        bindings.insert((M::NONE, Char('x')), KeyAction::Logout);
        Self { bindings }
    }

    /// Load `path`; when missing, write the defaults there for the user to edit.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "cannot write default keybinds");
        }
        km
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|s| Self::parse(&s))
    }

    /// Start from defaults and apply `<Action> = <KeySpec>` lines on top.
    /// `<KeySpec> = <Action>` is accepted too.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn to_conf(&self) -> String {
        let mut buf = String::new();
        buf.push_str("# userdeck keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Up, Down, Left, Right, PageUp, PageDown, /, ?\n");
        let names: Vec<&str> = ACTION_NAMES.iter().map(|(_, n)| *n).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut rows: Vec<(String, KeyAction)> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| (Self::format_key(*mods, *code), *action))
            .collect();
        rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in rows {
            let _ = writeln!(&mut buf, "{} = {}", format_action(action), key);
        }
        buf
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_conf())
    }

    /// Resolve a key press. Shifted characters also match their unshifted binding
    /// entry, since terminals disagree on whether `?` or `K` carry SHIFT.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        if let Some(action) = self.bindings.get(&(key.modifiers, key.code)) {
            return Some(*action);
        }
        if let KeyCode::Char(_) = key.code
            && key.modifiers.contains(KeyModifiers::SHIFT)
        {
            let mods = key.modifiers.difference(KeyModifiers::SHIFT);
            return self.bindings.get(&(mods, key.code)).copied();
        }
        None
    }

    /// Snapshot of all bindings.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// First key (in display order) bound to `action`.
    pub fn key_for(&self, action: KeyAction) -> Option<String> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .min()
    }

    /// Human-readable spec like "Ctrl+c" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES
        .iter()
        .find(|(_, name)| *name == s)
        .map(|(action, _)| *action)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(mods: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_cover_simulator_keys() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyModifiers::NONE, KeyCode::Char('2'))), Some(KeyAction::SimulateError));
        assert_eq!(km.resolve(&press(KeyModifiers::NONE, KeyCode::Char('0'))), Some(KeyAction::SimulateReset));
    }

    #[test]
    fn shifted_chars_fall_back_to_plain_binding() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyModifiers::SHIFT, KeyCode::Char('?'))), Some(KeyAction::OpenHelp));
        assert_eq!(km.resolve(&press(KeyModifiers::SHIFT, KeyCode::Char('K'))), Some(KeyAction::ToggleKeybindsPane));
        assert_eq!(km.resolve(&press(KeyModifiers::NONE, KeyCode::F(5))), None);
    }

    #[test]
    fn file_overrides_apply_in_both_orders() {
        let km = Keymap::parse("SwitchView = t\nCtrl+l = Logout\nnonsense = here\n");
        assert_eq!(km.resolve(&press(KeyModifiers::NONE, KeyCode::Char('t'))), Some(KeyAction::SwitchView));
        assert_eq!(km.resolve(&press(KeyModifiers::CONTROL, KeyCode::Char('l'))), Some(KeyAction::Logout));
        // Defaults survive
        assert_eq!(km.resolve(&press(KeyModifiers::NONE, KeyCode::Char('v'))), Some(KeyAction::SwitchView));
    }

    #[test]
    fn conf_round_trips() {
        let km = Keymap::default();
        let back = Keymap::parse(&km.to_conf());
        let mut a = km.all_bindings();
        let mut b = back.all_bindings();
        a.sort_by_key(|(k, _)| format!("{k:?}"));
        b.sort_by_key(|(k, _)| format!("{k:?}"));
        assert_eq!(a, b);
    }

    #[test]
    fn action_names_round_trip() {
        for (action, name) in ACTION_NAMES {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
    }
}
