/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use serde::Deserialize;

use crate::store::OverlayStore;

/// The overlay shows exactly one of these at a time, or none while hidden.
/// Transitions happen only through host messages or explicit user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lobby,
    Hud,
    Spectator,
    ResultWin,
    ResultLose,
}

impl Screen {
    pub fn is_result(self) -> bool {
        matches!(self, Screen::ResultWin | Screen::ResultLose)
    }

    /// Which spawned UI tree renders this screen. Both result variants share
    /// one surface; the win/lose difference is header styling, not layout.
    pub fn surface(self) -> Surface {
        match self {
            Screen::Lobby => Surface::Lobby,
            Screen::Hud => Surface::Hud,
            Screen::Spectator => Surface::Spectator,
            Screen::ResultWin | Screen::ResultLose => Surface::Result,
        }
    }
}

/// Screen name as it appears on the wire in `setScreen`. `result` needs the
/// accompanying victory flag to resolve to a concrete screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenRequest {
    Lobby,
    Hud,
    Spectator,
    Result,
}

impl ScreenRequest {
    pub fn resolve(self, victory: bool) -> Screen {
        match self {
            ScreenRequest::Lobby => Screen::Lobby,
            ScreenRequest::Hud => Screen::Hud,
            ScreenRequest::Spectator => Screen::Spectator,
            ScreenRequest::Result => {
                if victory {
                    Screen::ResultWin
                } else {
                    Screen::ResultLose
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Lobby,
    Hud,
    Spectator,
    Result,
}

/// Marker on the root node of each pre-spawned screen tree.
#[derive(Component)]
pub struct ScreenRoot(pub Surface);

/// Flip `Visibility` on the screen roots so exactly the active screen shows.
/// Hiding never touches the stored screen value; a later `setVisible(true)`
/// brings the same screen back.
pub fn sync_screen_visibility(
    store: Res<OverlayStore>,
    mut q: Query<(&ScreenRoot, &mut Visibility)>,
) {
    if !store.is_changed() {
        return;
    }

    let active = store.active_screen().map(Screen::surface);
    for (root, mut vis) in &mut q {
        *vis = if Some(root.0) == active {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_request_resolves_by_victory_flag() {
        assert_eq!(ScreenRequest::Result.resolve(true), Screen::ResultWin);
        assert_eq!(ScreenRequest::Result.resolve(false), Screen::ResultLose);
        assert_eq!(ScreenRequest::Hud.resolve(true), Screen::Hud);
    }

    #[test]
    fn both_result_screens_share_one_surface() {
        assert_eq!(Screen::ResultWin.surface(), Surface::Result);
        assert_eq!(Screen::ResultLose.surface(), Surface::Result);
        assert_eq!(Screen::Lobby.surface(), Surface::Lobby);
    }

    #[test]
    fn hidden_overlay_renders_no_screen() {
        let mut store = OverlayStore::default();
        store.screen = Screen::Hud;
        store.visible = false;
        assert_eq!(store.active_screen(), None);

        store.visible = true;
        assert_eq!(store.active_screen(), Some(Screen::Hud));
    }
}
