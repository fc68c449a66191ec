//! Persisted presentation preferences and the derived view theme.

use std::sync::Arc;

use shared::domain::{ColorVariant, DisplayMode, Preferences};
use storage::{KeyValueStore, KEY_THEME_COLOR, KEY_THEME_MODE};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

use crate::{StateEvent, SystemAppearance};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("'{0}' is not a recognized color variant")]
    InvalidVariant(String),
}

/// Theme flags as the view applies them, derived from [`Preferences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveTheme {
    pub dark: bool,
    pub variant: ColorVariant,
    /// The glass variant draws translucent surfaces over the palette.
    pub translucent: bool,
}

impl From<Preferences> for EffectiveTheme {
    fn from(prefs: Preferences) -> Self {
        Self {
            dark: prefs.mode == DisplayMode::Dark,
            variant: prefs.variant,
            translucent: prefs.variant.is_translucent(),
        }
    }
}

/// Owns the live [`Preferences`] and mediates every mutation: update live
/// state, persist write-through, then notify. Persist strictly precedes
/// notify so a subscriber re-reading the store mid-notification observes the
/// new value, never a stale one.
pub struct PresentationController {
    store: Arc<dyn KeyValueStore>,
    system: Arc<dyn SystemAppearance>,
    current: Mutex<Preferences>,
    events: broadcast::Sender<StateEvent>,
}

impl PresentationController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        system: Arc<dyn SystemAppearance>,
        events: broadcast::Sender<StateEvent>,
    ) -> Self {
        Self {
            store,
            system,
            current: Mutex::new(Preferences::default()),
            events,
        }
    }

    /// Loads persisted preferences into live state. Absent or unparseable
    /// mode falls back to the ambient system signal; absent variant defaults
    /// to blue. A store outage degrades to those defaults for the session
    /// rather than failing.
    pub async fn load_initial(&self) -> Preferences {
        let mode = match self.read_key(KEY_THEME_MODE).await {
            Some(raw) => raw.parse::<DisplayMode>().unwrap_or_else(|err| {
                warn!("persisted display mode ignored: {err}");
                self.ambient_mode()
            }),
            None => self.ambient_mode(),
        };

        let variant = match self.read_key(KEY_THEME_COLOR).await {
            Some(raw) => raw.parse::<ColorVariant>().unwrap_or_else(|err| {
                warn!("persisted color variant ignored: {err}");
                ColorVariant::Blue
            }),
            None => ColorVariant::Blue,
        };

        let prefs = Preferences { mode, variant };
        *self.current.lock().await = prefs;
        prefs
    }

    /// Flips light/dark, persists, notifies. Returns the applied mode.
    pub async fn toggle_mode(&self) -> DisplayMode {
        let mode = {
            let mut current = self.current.lock().await;
            current.mode = current.mode.toggled();
            current.mode
        };

        self.persist_key(KEY_THEME_MODE, mode.as_str()).await;
        let _ = self.events.send(StateEvent::PreferencesChanged);
        mode
    }

    /// Applies one of the enumerated variants, persists, notifies. The typed
    /// parameter makes out-of-set values unrepresentable for Rust callers.
    pub async fn set_variant(&self, variant: ColorVariant) {
        {
            let mut current = self.current.lock().await;
            current.variant = variant;
        }

        self.persist_key(KEY_THEME_COLOR, variant.as_str()).await;
        let _ = self.events.send(StateEvent::PreferencesChanged);
    }

    /// String-facing mutator for callers forwarding untyped input (URL
    /// params, IPC). Rejects unknown names without touching state.
    pub async fn set_variant_name(&self, name: &str) -> Result<ColorVariant, PreferenceError> {
        let variant = name
            .parse::<ColorVariant>()
            .map_err(|_| PreferenceError::InvalidVariant(name.to_string()))?;
        self.set_variant(variant).await;
        Ok(variant)
    }

    pub async fn preferences(&self) -> Preferences {
        *self.current.lock().await
    }

    pub async fn effective_theme(&self) -> EffectiveTheme {
        EffectiveTheme::from(self.preferences().await)
    }

    fn ambient_mode(&self) -> DisplayMode {
        if self.system.prefers_dark() {
            DisplayMode::Dark
        } else {
            DisplayMode::Light
        }
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!("preference read for '{key}' failed, using defaults: {err:#}");
                None
            }
        }
    }

    async fn persist_key(&self, key: &str, value: &str) {
        // Each field is written independently so a mode-only update can
        // never clobber the variant.
        if let Err(err) = self.store.set(key, value).await {
            warn!("preference write for '{key}' failed; live state kept: {err:#}");
        }
    }
}
