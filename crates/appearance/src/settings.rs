//! Appearance settings page state
//!
//! The page has a mode dropdown with two values: `system` (follow the OS) and
//! `light`, which stands for "pick a single theme". Each mode has its own
//! panel; only one is visible at a time. The single-theme panel holds one
//! radio per theme. Independently of the preference, two cards and badges
//! show which theme the OS scheme currently resolves to.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::preference::{PreferenceStore, ThemePreference, PREFERENCE_KEY};

/// Value of the mode dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    System,
    SingleTheme,
}

impl ThemeMode {
    pub fn for_preference(preference: &ThemePreference) -> Self {
        if preference.is_system() {
            ThemeMode::System
        } else {
            ThemeMode::SingleTheme
        }
    }

    /// Parse a dropdown value; anything but `system` is a single theme
    pub fn from_value(value: &str) -> Self {
        if value == "system" {
            ThemeMode::System
        } else {
            ThemeMode::SingleTheme
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::SingleTheme => "light",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub theme_panels: bool,
    pub single_theme_panel: bool,
}

impl PanelVisibility {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let system = mode == ThemeMode::System;
        Self {
            theme_panels: system,
            single_theme_panel: !system,
        }
    }
}

/// OS colour scheme (`prefers-color-scheme`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBorder {
    Primary,
    Base300,
}

impl CardBorder {
    pub fn class(&self) -> &'static str {
        match self {
            CardBorder::Primary => "border-primary",
            CardBorder::Base300 => "border-base-300",
        }
    }
}

/// Which of the light/dark cards is highlighted as active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeIndicators {
    pub light_card: CardBorder,
    pub dark_card: CardBorder,
    pub light_badge_visible: bool,
    pub dark_badge_visible: bool,
}

impl SchemeIndicators {
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Dark => Self {
                light_card: CardBorder::Base300,
                dark_card: CardBorder::Primary,
                light_badge_visible: false,
                dark_badge_visible: true,
            },
            ColorScheme::Light => Self {
                light_card: CardBorder::Primary,
                dark_card: CardBorder::Base300,
                light_badge_visible: true,
                dark_badge_visible: false,
            },
        }
    }
}

/// Payload of a theme change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeChanged {
    pub theme: String,
}

pub type ThemeListener = Box<dyn Fn(&ThemeChanged) + Send + Sync>;

/// Listener that writes every selected theme back to `store`
///
/// `system` clears the preference instead of storing it. Store failures are
/// logged; a listener has nowhere to return them.
pub fn persisting_listener(store: Arc<dyn PreferenceStore>) -> ThemeListener {
    Box::new(move |event: &ThemeChanged| {
        let result = match ThemePreference::parse(&event.theme) {
            ThemePreference::System => store.remove(PREFERENCE_KEY),
            ThemePreference::Theme(name) => store.set(PREFERENCE_KEY, &name),
        };
        if let Err(e) = result {
            warn!("Failed to persist theme '{}': {}", event.theme, e);
        }
    })
}

/// State of the appearance settings page
pub struct AppearanceSettings {
    themes: Vec<String>,
    mode: ThemeMode,
    panels: PanelVisibility,
    checked_theme: Option<String>,
    indicators: SchemeIndicators,
    listeners: Vec<ThemeListener>,
}

impl AppearanceSettings {
    pub const DEFAULT_THEMES: [&'static str; 2] = ["light", "dark"];

    /// Build the page state from the stored preference
    pub fn init(
        store: &dyn PreferenceStore,
        listeners: Vec<ThemeListener>,
        scheme: ColorScheme,
    ) -> Result<Self> {
        let themes = Self::DEFAULT_THEMES.iter().map(|t| t.to_string()).collect();
        Self::init_with_themes(store, themes, listeners, scheme)
    }

    /// Like [`AppearanceSettings::init`] with an explicit list of theme radios
    pub fn init_with_themes(
        store: &dyn PreferenceStore,
        themes: Vec<String>,
        listeners: Vec<ThemeListener>,
        scheme: ColorScheme,
    ) -> Result<Self> {
        let preference = ThemePreference::load(store)?;
        let mode = ThemeMode::for_preference(&preference);

        let mut settings = Self {
            themes,
            mode,
            panels: PanelVisibility::for_mode(mode),
            checked_theme: None,
            indicators: SchemeIndicators::for_scheme(scheme),
            listeners,
        };

        if let ThemePreference::Theme(name) = &preference {
            settings.check_radio(name);
        }

        info!(
            "Appearance settings initialised: preference={}, mode={}",
            preference, mode
        );
        Ok(settings)
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn panels(&self) -> PanelVisibility {
        self.panels
    }

    /// Value of the checked theme radio, if any
    pub fn checked_theme(&self) -> Option<&str> {
        self.checked_theme.as_deref()
    }

    pub fn indicators(&self) -> SchemeIndicators {
        self.indicators
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// The mode dropdown changed
    pub fn on_mode_changed(&mut self, value: &str) {
        self.mode = ThemeMode::from_value(value);
        self.panels = PanelVisibility::for_mode(self.mode);
        self.select_theme(value);
    }

    /// A theme radio changed
    pub fn on_theme_radio_changed(&mut self, theme: &str) {
        self.select_theme(theme);
    }

    /// Apply `theme`: notify every listener, then check its radio
    pub fn select_theme(&mut self, theme: &str) {
        let event = ThemeChanged {
            theme: theme.to_string(),
        };
        debug!("Theme selected: {} ({} listener(s))", theme, self.listeners.len());
        for listener in &self.listeners {
            listener(&event);
        }
        self.check_radio(theme);
    }

    /// The OS colour scheme changed
    pub fn on_system_scheme_changed(&mut self, scheme: ColorScheme) {
        self.indicators = SchemeIndicators::for_scheme(scheme);
    }

    fn check_radio(&mut self, theme: &str) {
        if self.themes.iter().any(|t| t == theme) {
            self.checked_theme = Some(theme.to_string());
        }
    }
}

impl fmt::Debug for AppearanceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppearanceSettings")
            .field("themes", &self.themes)
            .field("mode", &self.mode)
            .field("panels", &self.panels)
            .field("checked_theme", &self.checked_theme)
            .field("indicators", &self.indicators)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
