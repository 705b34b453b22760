//! Fortymm appearance settings
//!
//! Models the appearance settings page: which theme the user prefers, how
//! that preference is persisted, and what the page shows for it.
//!
//! - [`preference`]: the persisted `phx:theme` preference and its stores
//! - [`settings`]: the page state (mode dropdown, panels, radios, system
//!   scheme indicators) and theme change notification

pub mod error;
pub mod preference;
pub mod settings;

pub use error::{AppearanceError, Result};
pub use preference::{JsonFileStore, MemoryStore, PreferenceStore, ThemePreference, PREFERENCE_KEY};
pub use settings::{
    persisting_listener, AppearanceSettings, CardBorder, ColorScheme, PanelVisibility,
    SchemeIndicators, ThemeChanged, ThemeListener, ThemeMode,
};
