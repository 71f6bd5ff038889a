//! User configuration — library root, keybindings and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/model-catalog/config.toml`
//! (default `~/.config/model-catalog/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    SwitchPane,
    Activate,
    Preview,
    OpenFolder,
    CopyName,
    CopyFolderLink,
    CopyModelLink,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help dialog).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::PageUp,
        Action::PageDown,
        Action::SwitchPane,
        Action::Activate,
        Action::Preview,
        Action::OpenFolder,
        Action::CopyName,
        Action::CopyFolderLink,
        Action::CopyModelLink,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::MoveLeft => "Left / Collapse",
            Action::MoveRight => "Right / Expand",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::SwitchPane => "Switch Pane",
            Action::Activate => "Load Category / Open Model",
            Action::Preview => "Preview",
            Action::OpenFolder => "Open Folder",
            Action::CopyName => "Copy Name",
            Action::CopyFolderLink => "Copy Folder Link",
            Action::CopyModelLink => "Copy Model Link",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::SwitchPane => "switch_pane",
            Action::Activate => "activate",
            Action::Preview => "preview",
            Action::OpenFolder => "open_folder",
            Action::CopyName => "copy_name",
            Action::CopyFolderLink => "copy_folder_link",
            Action::CopyModelLink => "copy_model_link",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Named keys as `(config name, compact label, code)`.
const NAMED_KEYS: &[(&str, &str, KeyCode)] = &[
    ("Up", "↑", KeyCode::Up),
    ("Down", "↓", KeyCode::Down),
    ("Left", "←", KeyCode::Left),
    ("Right", "→", KeyCode::Right),
    ("Enter", "Enter", KeyCode::Enter),
    ("Esc", "Esc", KeyCode::Esc),
    ("Tab", "Tab", KeyCode::Tab),
    ("Backspace", "Bksp", KeyCode::Backspace),
    ("Delete", "Del", KeyCode::Delete),
    ("Home", "Home", KeyCode::Home),
    ("End", "End", KeyCode::End),
    ("PageUp", "PgUp", KeyCode::PageUp),
    ("PageDown", "PgDn", KeyCode::PageDown),
    ("Space", "Space", KeyCode::Char(' ')),
];

/// Extra spellings accepted in the config file (lowercase).
const KEY_ALIASES: &[(&str, KeyCode)] = &[
    ("return", KeyCode::Enter),
    ("escape", KeyCode::Esc),
    ("bksp", KeyCode::Backspace),
    ("del", KeyCode::Delete),
    ("pgup", KeyCode::PageUp),
    ("pgdn", KeyCode::PageDown),
];

/// Modifier prefixes in the order they are written.
const MODIFIER_NAMES: &[(&str, KeyModifiers)] = &[
    ("Ctrl", KeyModifiers::CONTROL),
    ("Alt", KeyModifiers::ALT),
    ("Shift", KeyModifiers::SHIFT),
];

/// A single key binding: key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.  SHIFT is ignored for character
    /// keys, since terminals already report the shifted character.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if !matches!(self.code, KeyCode::Char(_)) {
            mask |= KeyModifiers::SHIFT;
        }
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Compact label for the help dialog and status bar (`"↑"`, `"Ctrl+c"`).
    pub fn display(&self) -> String {
        let key = match named_key(self.code) {
            Some((_, label, _)) => label.to_string(),
            None => key_name(self.code),
        };
        format!("{}{key}", modifier_prefix(self.modifiers))
    }

    fn to_config_string(&self) -> String {
        format!("{}{}", modifier_prefix(self.modifiers), key_name(self.code))
    }

    /// Parse `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"F5"`.  A lone `"+"` is the
    /// plus key.
    fn parse(s: &str) -> Option<Self> {
        let (prefix, key) = match s.rsplit_once('+') {
            Some((prefix, key)) if !key.is_empty() => (prefix, key),
            _ => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            let (_, m) = MODIFIER_NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))?;
            modifiers |= *m;
        }

        let lower = key.to_ascii_lowercase();
        let function_key = lower
            .strip_prefix('f')
            .filter(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse::<u8>().ok());

        let code = if let Some((_, _, code)) = NAMED_KEYS
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(key))
        {
            *code
        } else if let Some((_, code)) = KEY_ALIASES.iter().find(|(alias, _)| *alias == lower) {
            *code
        } else if let Some(n) = function_key {
            KeyCode::F(n)
        } else {
            // Keep the original case so `C` and `c` stay distinct.
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c)
        };

        Some(KeyBind { code, modifiers })
    }
}

fn named_key(code: KeyCode) -> Option<&'static (&'static str, &'static str, KeyCode)> {
    NAMED_KEYS.iter().find(|(_, _, c)| *c == code)
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    MODIFIER_NAMES
        .iter()
        .filter(|(_, m)| modifiers.contains(*m))
        .map(|(name, _)| format!("{name}+"))
        .collect()
}

fn key_name(code: KeyCode) -> String {
    if let Some((name, _, _)) = named_key(code) {
        return name.to_string();
    }
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Library root used when neither the config file nor `--root` names one.
#[cfg(windows)]
pub fn default_root() -> PathBuf {
    PathBuf::from(r"\\File-share\DATA\PROPS\C4D\MODELS")
}

/// Library root used when neither the config file nor `--root` names one.
#[cfg(not(windows))]
pub fn default_root() -> PathBuf {
    PathBuf::from(".")
}

const DEFAULT_MODEL_EXTENSION: &str = "c4d";
const DEFAULT_DOUBLE_CLICK_MS: u64 = 250;

/// Application configuration — library location and keybindings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Root directory of the model library.
    pub root: PathBuf,
    /// Extension of the model file that sits next to each thumbnail.
    pub model_extension: String,
    /// Double-click detection window for mouse preview.
    pub double_click_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            root: default_root(),
            model_extension: DEFAULT_MODEL_EXTENSION.to_string(),
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
        }
    }
}

impl AppConfig {
    /// Built-in bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(MoveLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(MoveRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n)]);
        m.insert(SwitchPane, vec![KeyBind::new(Tab, n)]);
        m.insert(Activate, vec![KeyBind::new(Enter, n)]);
        m.insert(Preview, vec![KeyBind::new(Char(' '), n), KeyBind::new(Char('p'), n)]);
        m.insert(OpenFolder, vec![KeyBind::new(Char('o'), n)]);
        m.insert(CopyName, vec![KeyBind::new(Char('c'), n)]);
        m.insert(CopyFolderLink, vec![KeyBind::new(Char('f'), n)]);
        m.insert(CopyModelLink, vec![KeyBind::new(Char('m'), n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n), KeyBind::new(F(1), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins; ties go to the action
    /// listed first in [`Action::ALL`].
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for &action in Action::ALL {
            let Some(binds) = self.bindings.get(&action) else {
                continue;
            };
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: load/open | {}: preview | {}: switch pane | {}: help | {}: quit",
            self.short_binding(Action::Activate),
            self.short_binding(Action::Preview),
            self.short_binding(Action::SwitchPane),
            self.short_binding(Action::Help),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.  A missing file is
    /// created from the defaults so users have a template to edit.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => return Self::parse(&contents),
                Err(e) => tracing::warn!("config: cannot read {}: {e}", path.display()),
            }
            return Self::default();
        }

        let config = Self::default();
        if let Err(e) = config.save() {
            tracing::debug!("config: not written: {e:#}");
        }
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "root" => {
                    if !value.is_empty() {
                        config.root = PathBuf::from(value);
                    }
                    continue;
                }
                "model_extension" => {
                    let ext = value.trim_start_matches('.');
                    if !ext.is_empty() {
                        config.model_extension = ext.to_string();
                    }
                    continue;
                }
                "double_click_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.double_click_ms = v.clamp(100, 2000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# model-catalog configuration".to_string(),
            String::new(),
            "# Library".to_string(),
            format!("root = {}", self.root.display()),
            format!("model_extension = {}", self.model_extension),
            format!("double_click_ms = {}", self.double_click_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/model-catalog/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_map_common_keys() {
        let config = AppConfig::default();
        assert_eq!(config.match_key(key(KeyCode::Enter)), Some(Action::Activate));
        assert_eq!(config.match_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(config.match_key(key(KeyCode::Char(' '))), Some(Action::Preview));
        assert_eq!(config.match_key(key(KeyCode::F(1))), Some(Action::Help));
        assert_eq!(config.match_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn shifted_characters_match_plain_bindings() {
        let config = AppConfig::default();
        let ev = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(config.match_key(ev), Some(Action::Help));
    }

    #[test]
    fn parse_reads_library_settings() {
        let config = AppConfig::parse(
            "# comment\nroot = /srv/models\nmodel_extension = .fbx\ndouble_click_ms = 5\n",
        );
        assert_eq!(config.root, PathBuf::from("/srv/models"));
        assert_eq!(config.model_extension, "fbx");
        assert_eq!(config.double_click_ms, 100);
    }

    #[test]
    fn parse_overrides_bindings_and_ignores_junk() {
        let config = AppConfig::parse(
            "quit = Ctrl+x, Q\nunknown_action = z\npreview = Nonsense+k\nnot a pair\n",
        );
        assert_eq!(
            config.bindings[&Action::Quit],
            vec![
                KeyBind::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::Char('Q'), KeyModifiers::NONE),
            ]
        );
        // Invalid binding list keeps the defaults.
        assert_eq!(
            config.bindings[&Action::Preview],
            AppConfig::default_bindings()[&Action::Preview]
        );
    }

    #[test]
    fn serialise_then_parse_preserves_config() {
        let mut config = AppConfig::default();
        config.root = PathBuf::from("/mnt/share/MODELS");
        config.model_extension = "blend".into();
        config
            .bindings
            .insert(Action::OpenFolder, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::ALT)]);

        let back = AppConfig::parse(&config.serialise());
        assert_eq!(back.root, config.root);
        assert_eq!(back.model_extension, "blend");
        assert_eq!(back.bindings, config.bindings);
    }

    #[test]
    fn parse_accepts_aliases_and_function_keys() {
        assert_eq!(
            KeyBind::parse("pgdn"),
            Some(KeyBind::new(KeyCode::PageDown, KeyModifiers::NONE))
        );
        assert_eq!(
            KeyBind::parse("ctrl+alt+F12"),
            Some(KeyBind::new(
                KeyCode::F(12),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            ))
        );
        assert_eq!(
            KeyBind::parse("+"),
            Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::NONE))
        );
        assert_eq!(
            KeyBind::parse("f"),
            Some(KeyBind::new(KeyCode::Char('f'), KeyModifiers::NONE))
        );
        assert_eq!(KeyBind::parse("fx"), None);
        assert_eq!(KeyBind::parse("Hyper+k"), None);
    }

    #[test]
    fn conflicting_bindings_resolve_in_action_order() {
        // Both bound to `x`; Copy Name precedes Quit in Action::ALL.
        let config = AppConfig::parse("quit = x\ncopy_name = x\n");
        for _ in 0..32 {
            assert_eq!(
                config.match_key(key(KeyCode::Char('x'))),
                Some(Action::CopyName)
            );
        }

        // More modifiers still beat action order.
        let config = AppConfig::parse("move_up = x\nquit = Ctrl+x, x\n");
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(config.match_key(ctrl_x), Some(Action::Quit));
        assert_eq!(config.match_key(key(KeyCode::Char('x'))), Some(Action::MoveUp));
    }

    #[test]
    fn display_bindings_joins_keys() {
        let config = AppConfig::default();
        assert_eq!(config.display_bindings(Action::MoveUp), "↑/k");
        assert_eq!(config.display_bindings(Action::Preview), "Space/p");
    }
}
