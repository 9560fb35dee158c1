//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other variant: Dark ↔ Light.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Cards --
    pub card_title: Style,
    pub card_selected: Style,
    pub card_description: Style,
    pub card_meta: Style,
    pub card_category: Style,

    // -- Header / filter bar --
    pub header: Style,
    pub filter_active: Style,
    pub filter_inactive: Style,

    // -- Messages --
    pub message_error: Style,
    pub message_empty: Style,
    pub message_loading: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,

    // -- Dialogs --
    pub dialog_field: Style,
    pub dialog_field_active: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::Gray),
            card_meta: Style::default().fg(Color::DarkGray),
            card_category: Style::default().fg(Color::Cyan),

            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            filter_active: Style::default().fg(Color::Black).bg(Color::Cyan),
            filter_inactive: Style::default().fg(Color::Gray),

            message_error: Style::default().fg(Color::Red),
            message_empty: Style::default().fg(Color::Yellow),
            message_loading: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),

            dialog_field: Style::default().fg(Color::Gray),
            dialog_field_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    fn light() -> Self {
        Self {
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::Black),
            card_meta: Style::default().fg(Color::DarkGray),
            card_category: Style::default().fg(Color::Blue),

            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            filter_active: Style::default().fg(Color::White).bg(Color::Blue),
            filter_inactive: Style::default().fg(Color::DarkGray),

            message_error: Style::default().fg(Color::Red),
            message_empty: Style::default().fg(Color::Magenta),
            message_loading: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),

            dialog_field: Style::default().fg(Color::DarkGray),
            dialog_field_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 16] = [
    "card_title",
    "card_selected",
    "card_description",
    "card_meta",
    "card_category",
    "header",
    "filter_active",
    "filter_inactive",
    "message_error",
    "message_empty",
    "message_loading",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "dialog_field",
    "dialog_field_active",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 16] = [
            p.card_title,
            p.card_selected,
            p.card_description,
            p.card_meta,
            p.card_category,
            p.header,
            p.filter_active,
            p.filter_inactive,
            p.message_error,
            p.message_empty,
            p.message_loading,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.dialog_field,
            p.dialog_field_active,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name(" DARK "), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn toggled_round_trips() {
        assert_eq!(ThemeVariant::Dark.toggled(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Dark.toggled().toggled(), ThemeVariant::Dark);
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.card_selected, light.card_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("card_selected"), palette.card_selected);
        assert_eq!(sm.resolve("message_error"), palette.message_error);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing", name);
        }
    }
}
