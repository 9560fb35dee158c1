//! Keybinding registry: maps keys to actions with config overrides.
//!
//! Defaults live in a single table; `[keybindings]` in config.toml can rebind
//! any action by name (e.g. `refresh = "F5"`).
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Actions and Contexts
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NextPage,
    PrevPage,
    Refresh,
    EnterSearch,
    ClearSearch,
    ExitSearch,
    CommitSearch,
    CycleFilter,
    ResetFilter,
    OpenArticle,
    ToggleTheme,
    ContactForm,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next article on page",
            Self::NavUp => "Previous article on page",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::Refresh => "Reload the feed (retry after an error)",
            Self::EnterSearch => "Search articles",
            Self::ClearSearch => "Clear search",
            Self::ExitSearch => "Cancel search input",
            Self::CommitSearch => "Apply search now",
            Self::CycleFilter => "Next category filter",
            Self::ResetFilter => "Show all categories",
            Self::OpenArticle => "Open article in browser",
            Self::ToggleTheme => "Toggle dark/light theme",
            Self::ContactForm => "Open contact form",
            Self::ShowHelp => "Show help",
        }
    }

    /// Parse an action name from config (`snake_case`, a few aliases).
    fn from_name(name: &str) -> Option<Self> {
        let action = match name.trim().to_lowercase().as_str() {
            "quit" => Self::Quit,
            "nav_down" | "down" => Self::NavDown,
            "nav_up" | "up" => Self::NavUp,
            "next_page" => Self::NextPage,
            "prev_page" | "previous_page" => Self::PrevPage,
            "refresh" | "retry" => Self::Refresh,
            "search" | "enter_search" => Self::EnterSearch,
            "clear_search" => Self::ClearSearch,
            "exit_search" => Self::ExitSearch,
            "commit_search" => Self::CommitSearch,
            "filter" | "cycle_filter" => Self::CycleFilter,
            "reset_filter" | "all" => Self::ResetFilter,
            "open" | "open_article" => Self::OpenArticle,
            "theme" | "toggle_theme" => Self::ToggleTheme,
            "contact" | "contact_form" => Self::ContactForm,
            "help" | "show_help" => Self::ShowHelp,
            _ => return None,
        };
        Some(action)
    }
}

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Browse,
    Search,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// Parse a key string from config.
    ///
    /// Accepts single characters (`"q"`, `"/"`), named keys (`"Enter"`, `"Esc"`,
    /// `"Tab"`, arrows, `"PageUp"`, `"Space"`), `"Ctrl+<char>"` and `"F1"`-`"F12"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(rest) = s.strip_prefix("Ctrl+").or_else(|| s.strip_prefix("ctrl+")) {
            let mut chars = rest.trim().chars();
            let c = chars.next()?;
            return chars.next().is_none().then(|| Self::ctrl(c));
        }

        let named = match s.to_lowercase().as_str() {
            "enter" | "return" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            "tab" => Some(KeyCode::Tab),
            "up" => Some(KeyCode::Up),
            "down" => Some(KeyCode::Down),
            "left" => Some(KeyCode::Left),
            "right" => Some(KeyCode::Right),
            "pageup" => Some(KeyCode::PageUp),
            "pagedown" => Some(KeyCode::PageDown),
            "backspace" => Some(KeyCode::Backspace),
            "space" => Some(KeyCode::Char(' ')),
            _ => None,
        };
        if let Some(code) = named {
            return Some(Self::plain(code));
        }

        if let Some(n) = s
            .strip_prefix(['F', 'f'])
            .and_then(|n| n.parse::<u8>().ok())
        {
            return (1..=12).contains(&n).then(|| Self::plain(KeyCode::F(n)));
        }

        let mut chars = s.chars();
        let c = chars.next()?;
        chars.next().is_none().then(|| Self::ch(c))
    }

    /// Human-readable form for the help screen.
    pub fn display(&self) -> String {
        let prefix = if self.modifiers.contains(KeyModifiers::CONTROL) {
            "Ctrl+"
        } else {
            ""
        };
        let name = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => "?".to_string(),
        };
        format!("{}{}", prefix, name)
    }
}

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::Browse, KeySpec::ch('q'), Action::Quit),
    (Context::Browse, KeySpec::ctrl('c'), Action::Quit),
    (Context::Browse, KeySpec::ch('j'), Action::NavDown),
    (Context::Browse, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Browse, KeySpec::ch('k'), Action::NavUp),
    (Context::Browse, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Browse, KeySpec::ch('n'), Action::NextPage),
    (Context::Browse, KeySpec::plain(KeyCode::Right), Action::NextPage),
    (Context::Browse, KeySpec::plain(KeyCode::PageDown), Action::NextPage),
    (Context::Browse, KeySpec::ch('p'), Action::PrevPage),
    (Context::Browse, KeySpec::plain(KeyCode::Left), Action::PrevPage),
    (Context::Browse, KeySpec::plain(KeyCode::PageUp), Action::PrevPage),
    (Context::Browse, KeySpec::ch('r'), Action::Refresh),
    (Context::Browse, KeySpec::ch('/'), Action::EnterSearch),
    (Context::Browse, KeySpec::ctrl('f'), Action::EnterSearch),
    (Context::Browse, KeySpec::plain(KeyCode::Esc), Action::ClearSearch),
    (Context::Browse, KeySpec::plain(KeyCode::Tab), Action::CycleFilter),
    (Context::Browse, KeySpec::ch('f'), Action::CycleFilter),
    (Context::Browse, KeySpec::ch('a'), Action::ResetFilter),
    (Context::Browse, KeySpec::plain(KeyCode::Enter), Action::OpenArticle),
    (Context::Browse, KeySpec::ch('o'), Action::OpenArticle),
    (Context::Browse, KeySpec::ch('t'), Action::ToggleTheme),
    (Context::Browse, KeySpec::ch('c'), Action::ContactForm),
    (Context::Browse, KeySpec::ch('?'), Action::ShowHelp),
    (Context::Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch),
    (Context::Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch),
];

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings: defaults plus config overrides.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        for &(ctx, key, action) in DEFAULT_BINDINGS {
            registry.bind(ctx, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// An override replaces every default key of that action, in each context
    /// the action was bound in. Returns warnings for unknown actions or
    /// unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = Action::from_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = KeySpec::parse(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers)))
            .copied()
    }

    /// First key bound to `action` in `context`, for inline hints.
    pub fn key_for(&self, action: Action, context: Context) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *c == context && *a == action)
            .map(|(_, key, _)| key.display())
    }

    /// `(context, key, description)` for every binding, in registration order.
    pub fn all_bindings(&self) -> Vec<(Context, String, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, key.display(), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
