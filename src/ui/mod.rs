use bevy::prelude::*;

mod hud;
mod lobby;
mod result;
mod spectator;

#[cfg(debug_assertions)]
mod devtools;

// Overlay palette
pub(crate) const PANEL_BG: Color = Color::srgba(0.05, 0.06, 0.09, 0.92);
pub(crate) const ROW_BG: Color = Color::srgba(0.12, 0.14, 0.18, 0.85);
pub(crate) const BAR_TRACK: Color = Color::srgba(0.20, 0.22, 0.27, 0.9);
pub(crate) const TEXT_DIM: Color = Color::srgb(0.58, 0.62, 0.70);
pub(crate) const ALERT_RED: Color = Color::srgb(0.86, 0.18, 0.22);
pub(crate) const SUCCESS_GREEN: Color = Color::srgb(0.22, 0.78, 0.45);
pub(crate) const GOLD: Color = Color::srgb(0.93, 0.76, 0.26);
pub(crate) const ARMOR_BLUE: Color = Color::srgb(0.32, 0.56, 0.93);
pub(crate) const DISABLED_BG: Color = Color::srgba(0.25, 0.26, 0.30, 0.9);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                setup_camera,
                lobby::setup_lobby,
                hud::setup_hud,
                spectator::setup_spectator,
                result::setup_result,
            ),
        )
        .add_systems(
            Update,
            (
                crate::screen::sync_screen_visibility,
                lobby::sync_lobby,
                lobby::lobby_start_button,
                hud::sync_hud,
                spectator::sync_spectator,
                spectator::spectator_buttons,
                result::sync_result,
                result::result_close_gate,
                result::result_close_button,
            )
                .after(crate::bridge::pump_host_messages),
        );

        #[cfg(debug_assertions)]
        app.add_systems(Update, devtools::dev_screen_hotkeys);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Despawn a node's children ahead of a wholesale rebuild. Lists in this UI
/// (kill feed, squad, items, stats) are replaced, never patched.
pub(crate) fn clear_children(commands: &mut Commands, children: Option<&Children>) {
    let Some(children) = children else { return };
    let kids: Vec<Entity> = children.iter().collect();
    for child in kids {
        commands.entity(child).try_despawn();
    }
}
