/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use serde_json::json;

use crate::bridge::CallbackSink;
use crate::screen::Screen;
use crate::settings::OverlayBindings;
use crate::store::OverlayStore;

/// Global overlay keys. Escape always requests a close from the host and
/// hides locally without waiting for the round trip; the spectator
/// navigation keys fire only while the spectator screen is the current one
/// (navigation is a request, the host answers with `updateSpectatorTarget`).
pub fn overlay_keys(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<OverlayBindings>,
    sink: Res<CallbackSink>,
    mut store: ResMut<OverlayStore>,
) {
    if keys.just_pressed(bindings.close) {
        sink.send("closeUI", json!({}));
        if store.visible {
            store.hide();
        }
    }

    if store.screen == Screen::Spectator {
        if keys.just_pressed(bindings.spectate_prev) {
            sink.send("spectatorNavigate", json!({ "direction": "prev" }));
        }
        if keys.just_pressed(bindings.spectate_next) {
            sink.send("spectatorNavigate", json!({ "direction": "next" }));
        }
    }
}
