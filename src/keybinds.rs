use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::sections::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NextIssue,
    PrevIssue,
    FirstIssue,
    LastIssue,
    ScrollDown,
    ScrollUp,
    ToggleSection(SectionId),
    ExpandAll,
    CollapseAll,
    FocusChat,
    Help,
}

pub struct BindingSpec {
    pub action: Action,
    pub name: &'static str,
    pub defaults: &'static [&'static str],
    pub description: &'static str,
}

pub const BINDING_SPECS: &[BindingSpec] = &[
    BindingSpec { action: Action::Quit, name: "quit", defaults: &["q", "ctrl+c"], description: "Quit" },
    BindingSpec {
        action: Action::NextIssue,
        name: "next_issue",
        defaults: &["l", "right"],
        description: "Next issue",
    },
    BindingSpec {
        action: Action::PrevIssue,
        name: "prev_issue",
        defaults: &["h", "left"],
        description: "Previous issue",
    },
    BindingSpec {
        action: Action::FirstIssue,
        name: "first_issue",
        defaults: &["g", "home"],
        description: "First issue",
    },
    BindingSpec {
        action: Action::LastIssue,
        name: "last_issue",
        defaults: &["shift+g", "end"],
        description: "Last issue",
    },
    BindingSpec {
        action: Action::ScrollDown,
        name: "scroll_down",
        defaults: &["j", "down"],
        description: "Scroll card down",
    },
    BindingSpec {
        action: Action::ScrollUp,
        name: "scroll_up",
        defaults: &["k", "up"],
        description: "Scroll card up",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::KeyInformation),
        name: "toggle_key_information",
        defaults: &["1"],
        description: "Toggle Key Information",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::Location),
        name: "toggle_location",
        defaults: &["2"],
        description: "Toggle Location",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::Message),
        name: "toggle_message",
        defaults: &["3"],
        description: "Toggle Message",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::Flows),
        name: "toggle_flows",
        defaults: &["4"],
        description: "Toggle Flows",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::CleanCode),
        name: "toggle_clean_code",
        defaults: &["5"],
        description: "Toggle Clean Code",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::TechnicalDetails),
        name: "toggle_technical_details",
        defaults: &["6"],
        description: "Toggle Technical Details",
    },
    BindingSpec {
        action: Action::ToggleSection(SectionId::Tags),
        name: "toggle_tags",
        defaults: &["7"],
        description: "Toggle Tags",
    },
    BindingSpec {
        action: Action::ExpandAll,
        name: "expand_all",
        defaults: &["e"],
        description: "Expand all sections",
    },
    BindingSpec {
        action: Action::CollapseAll,
        name: "collapse_all",
        defaults: &["c"],
        description: "Collapse all sections",
    },
    BindingSpec {
        action: Action::FocusChat,
        name: "focus_chat",
        defaults: &["i", "tab"],
        description: "Focus chat input",
    },
    BindingSpec { action: Action::Help, name: "help", defaults: &["?"], description: "Toggle help" },
];

/// Resolved key -> action table. A `[keys]` override replaces every default
/// key of that action.
#[derive(Debug, Clone)]
pub struct Keybinds {
    bindings: HashMap<String, Action>,
    labels: HashMap<Action, String>,
}

impl Default for Keybinds {
    fn default() -> Self {
        Self::from_overrides(&HashMap::new())
    }
}

impl Keybinds {
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut bindings = HashMap::new();
        let mut labels = HashMap::new();

        for name in overrides.keys() {
            if !BINDING_SPECS.iter().any(|spec| spec.name == name.as_str()) {
                warn!(action = %name, "ignoring key override for unknown action");
            }
        }

        for spec in BINDING_SPECS {
            let keys = match overrides.get(spec.name) {
                Some(binding) if normalize_binding(binding).is_some() => vec![binding.as_str()],
                Some(binding) => {
                    warn!(action = spec.name, binding = %binding, "invalid key override");
                    spec.defaults.to_vec()
                }
                None => spec.defaults.to_vec(),
            };

            for key in &keys {
                if let Some(normalized) = normalize_binding(key) {
                    bindings.insert(normalized, spec.action);
                }
            }
            labels.insert(spec.action, keys.join("/"));
        }

        Self { bindings, labels }
    }

    pub fn action_for(&self, key: KeyEvent) -> Option<Action> {
        self.bindings.get(normalize_event(key).as_str()).copied()
    }

    /// Keys bound to an action, formatted for the help overlay.
    pub fn label(&self, action: Action) -> &str {
        self.labels.get(&action).map(String::as_str).unwrap_or("")
    }
}

pub fn parse_binding(binding: &str) -> Option<KeyEvent> {
    let tokens = binding
        .split('+')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<&str>>();
    let (key_token, modifier_tokens) = tokens.split_last()?;

    let mut modifiers = KeyModifiers::empty();
    for token in modifier_tokens {
        modifiers |= match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    let code = match key_token.to_ascii_lowercase().as_str() {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = key_token.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if ch.is_ascii_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
            KeyCode::Char(ch)
        }
    };

    Some(KeyEvent::new(code, modifiers))
}

pub fn normalize_binding(binding: &str) -> Option<String> {
    parse_binding(binding).map(normalize_event).filter(|key| !key.is_empty())
}

/// Canonical `ctrl+alt+shift+key` form. Uppercase letters imply shift and
/// shift is dropped for symbols, since terminals disagree on reporting it.
pub fn normalize_event(event: KeyEvent) -> String {
    let mut shift = event.modifiers.contains(KeyModifiers::SHIFT);
    let key = match event.code {
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => {
            shift = true;
            "tab".to_string()
        }
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(ch) if ch.is_alphabetic() => {
            shift |= ch.is_uppercase();
            ch.to_lowercase().to_string()
        }
        KeyCode::Char(ch) => {
            shift = false;
            ch.to_string()
        }
        _ => return String::new(),
    };

    let mut tokens = Vec::new();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        tokens.push("ctrl".to_string());
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        tokens.push("alt".to_string());
    }
    if shift {
        tokens.push("shift".to_string());
    }
    tokens.push(key);
    tokens.join("+")
}

#[cfg(test)]
mod tests {
    use super::{Action, Keybinds, normalize_binding, parse_binding};
    use crate::sections::SectionId;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::HashMap;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parse_binding_supports_named_keys_and_modifiers() {
        let key = parse_binding("ctrl+shift+left").expect("parse binding");
        assert_eq!(key.code, KeyCode::Left);
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));
        assert!(key.modifiers.contains(KeyModifiers::SHIFT));
        assert!(parse_binding("hyper+x").is_none());
        assert!(parse_binding("nope").is_none());
    }

    #[test]
    fn normalize_binding_converts_aliases() {
        assert_eq!(normalize_binding("Control+Return").as_deref(), Some("ctrl+enter"));
        assert_eq!(normalize_binding("G").as_deref(), Some("shift+g"));
        assert_eq!(normalize_binding("shift+g").as_deref(), Some("shift+g"));
    }

    #[test]
    fn default_bindings_resolve_actions() {
        let keybinds = Keybinds::default();
        assert_eq!(
            keybinds.action_for(key(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(Action::NextIssue)
        );
        assert_eq!(
            keybinds.action_for(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Action::LastIssue)
        );
        assert_eq!(
            keybinds.action_for(key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(Action::Help)
        );
        assert_eq!(
            keybinds.action_for(key(KeyCode::Char('4'), KeyModifiers::NONE)),
            Some(Action::ToggleSection(SectionId::Flows))
        );
        assert_eq!(keybinds.action_for(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn override_replaces_default_keys() {
        let mut overrides = HashMap::new();
        overrides.insert("next_issue".to_string(), "n".to_string());
        let keybinds = Keybinds::from_overrides(&overrides);

        assert_eq!(
            keybinds.action_for(key(KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(Action::NextIssue)
        );
        assert_eq!(keybinds.action_for(key(KeyCode::Char('l'), KeyModifiers::NONE)), None);
        assert_eq!(keybinds.label(Action::NextIssue), "n");
        assert_eq!(keybinds.label(Action::PrevIssue), "h/left");
    }

    #[test]
    fn invalid_override_keeps_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "hyper+q".to_string());
        let keybinds = Keybinds::from_overrides(&overrides);
        assert_eq!(
            keybinds.action_for(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
    }
}
