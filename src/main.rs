use bevy::prelude::*;
use heistlib::bridge::{BridgePlugin, HostLink};
use heistlib::input::overlay_keys;
use heistlib::settings::SettingsPlugin;
use heistlib::store::StorePlugin;
use heistlib::ui::UiPlugin;

fn main() {
    // Standalone run: nobody holds the host end of the link, so inbound stays
    // quiet and outbound callbacks degrade to diagnostic logs. The embedding
    // runtime would keep `host_tx` and feed NUI messages through it.
    let (_host_tx, link) = HostLink::channel();

    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(link)
        .add_plugins((SettingsPlugin, BridgePlugin, StorePlugin, UiPlugin))
        .add_systems(Update, overlay_keys)
        .run();
}
