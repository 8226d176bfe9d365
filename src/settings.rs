/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rebindable overlay keys. In-memory only; UI state and bindings are
/// reconstructed from defaults every session.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBindings {
    pub close: KeyCode,
    pub spectate_prev: KeyCode,
    pub spectate_next: KeyCode,
}

impl Default for OverlayBindings {
    fn default() -> Self {
        Self {
            close: KeyCode::Escape,
            spectate_prev: KeyCode::KeyQ,
            spectate_next: KeyCode::KeyE,
        }
    }
}

/// Persisted overlay preferences. Deliberately tiny: mission state is never
/// written to disk, only tooling toggles live here.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Enables the local screen-switcher hotkeys (debug builds only).
    pub dev_tools: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            dev_tools: cfg!(debug_assertions),
        }
    }
}

impl OverlaySettings {
    fn config_path() -> Option<PathBuf> {
        #[cfg(debug_assertions)]
        {
            // Debug builds: keep the file next to the project
            let mut p = std::env::current_dir().ok()?;
            p.push("overlay_settings.ron");
            Some(p)
        }
        #[cfg(not(debug_assertions))]
        {
            dirs::config_dir().and_then(|mut p| {
                p.push("Heistline");
                std::fs::create_dir_all(&p).ok()?;
                p.push("overlay_settings.ron");
                Some(p)
            })
        }
    }

    pub fn load() -> Self {
        let loaded = Self::config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|contents| ron::from_str(&contents).ok());
        match loaded {
            Some(settings) => settings,
            None => {
                // First run: write the defaults so the file is discoverable.
                let settings = Self::default();
                settings.save();
                settings
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Ok(contents) = ron::ser::to_string_pretty(self, Default::default()) {
                let _ = std::fs::write(path, contents);
            }
        }
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlayBindings>()
            .insert_resource(OverlaySettings::load());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_ron() {
        let settings = OverlaySettings { dev_tools: true };
        let text = ron::ser::to_string_pretty(&settings, Default::default()).unwrap();
        let back: OverlaySettings = ron::from_str(&text).unwrap();
        assert!(back.dev_tools);
    }
}
