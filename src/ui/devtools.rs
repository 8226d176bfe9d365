/*
Heistline - heist mode overlay UI
*/
//! Local screen-switcher hotkeys for running the overlay without a host.
//! Debug builds only, and off unless `dev_tools` is set in the settings file.
//! Everything goes through the same `apply` entry points a real host message
//! would, so exercising a screen here exercises the production path.

use bevy::prelude::*;

use crate::bridge::{
    HeistPayload, HostAction, ItemPayload, KillPayload, LobbyPayload, MvpPayload, PolicePayload,
    ResultPlayerPayload, ResultsPayload, SquadPayload, TargetPayload,
};
use crate::screen::{Screen, ScreenRequest};
use crate::settings::OverlaySettings;
use crate::store::OverlayStore;

pub(super) fn dev_screen_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<OverlaySettings>,
    mut store: ResMut<OverlayStore>,
) {
    if !settings.dev_tools {
        return;
    }

    if keys.just_pressed(KeyCode::F10) {
        let visible = !store.visible;
        store.apply(HostAction::SetVisible { visible });
        info!("devtools: overlay {}", if visible { "shown" } else { "hidden" });
    }

    if keys.just_pressed(KeyCode::F9) {
        seed_demo_data(&mut store);
        info!("devtools: demo data seeded");
    }

    let forced = [
        (KeyCode::Digit1, ScreenRequest::Lobby, false),
        (KeyCode::Digit2, ScreenRequest::Hud, false),
        (KeyCode::Digit3, ScreenRequest::Spectator, false),
        (KeyCode::Digit4, ScreenRequest::Result, true),
        (KeyCode::Digit5, ScreenRequest::Result, false),
    ];
    for (key, screen, victory) in forced {
        if keys.just_pressed(key) {
            store.apply(HostAction::SetScreen {
                screen: Some(screen),
                victory,
            });
            if !store.visible {
                store.apply(HostAction::SetVisible { visible: true });
            }
        }
    }
}

/// Stand-in host data so every screen has something to show.
fn seed_demo_data(store: &mut OverlayStore) {
    let before = store.screen;

    store.apply(HostAction::UpdateLobby {
        data: LobbyPayload {
            robbery: HeistPayload {
                name: "Central Bank".into(),
                image: String::new(),
                difficulty: "Extreme".into(),
                reward: "$400,000 - $600,000".into(),
            },
            police: PolicePayload {
                current: 5,
                required: 6,
            },
            items: vec![
                ItemPayload {
                    id: "c4".into(),
                    name: "C4 Charge".into(),
                    owned: true,
                },
                ItemPayload {
                    id: "card".into(),
                    name: "Cloned Keycard".into(),
                    owned: true,
                },
                ItemPayload {
                    id: "saw".into(),
                    name: "Industrial Saw".into(),
                    owned: false,
                },
            ],
        },
    });

    store.apply(HostAction::UpdateSquad {
        squad: vec![
            demo_member("1", "Caveira", 100, 75, false),
            demo_member("2", "Rogerio", 65, 0, false),
            demo_member("3", "Thunder", 0, 0, true),
            demo_member("4", "Ninja", 45, 50, false),
        ],
    });

    for (killer, victim, team) in [
        ("Caveira", "Oficial_Rex", false),
        ("Shadow_X", "Agente_Cruz", false),
        ("Ninja", "Rogerio", true),
    ] {
        store.apply(HostAction::AddKill {
            kill: KillPayload {
                killer: killer.into(),
                victim: victim.into(),
                is_team_kill: team,
                timestamp: None,
            },
        });
    }

    store.apply(HostAction::UpdateSpectatorTarget {
        target: TargetPayload {
            id: None,
            name: "Caveira".into(),
            health: 100,
            armor: 75,
        },
    });

    store.apply(HostAction::ShowResults {
        data: ResultsPayload {
            victory: true,
            players: vec![
                demo_result("Caveira", 8, 1250, 450),
                demo_result("Rogerio", 5, 890, 320),
                demo_result("Thunder", 3, 450, 180),
                demo_result("Ninja", 4, 720, 280),
            ],
            mvp: Some(MvpPayload {
                name: "Caveira".into(),
            }),
        },
    });

    // showResults forces a result screen; put the screen back where it was.
    let (request, victory) = match before {
        Screen::Lobby => (ScreenRequest::Lobby, false),
        Screen::Hud => (ScreenRequest::Hud, false),
        Screen::Spectator => (ScreenRequest::Spectator, false),
        Screen::ResultWin => (ScreenRequest::Result, true),
        Screen::ResultLose => (ScreenRequest::Result, false),
    };
    store.apply(HostAction::SetScreen {
        screen: Some(request),
        victory,
    });
}

fn demo_member(id: &str, name: &str, health: i64, armor: i64, dead: bool) -> SquadPayload {
    SquadPayload {
        id: Some(crate::bridge::PlayerId::Text(id.into())),
        name: name.into(),
        avatar: String::new(),
        health,
        armor,
        is_dead: dead,
    }
}

fn demo_result(name: &str, kills: u32, damage: u32, xp: u32) -> ResultPlayerPayload {
    ResultPlayerPayload {
        name: name.into(),
        avatar: String::new(),
        kills,
        damage,
        xp,
    }
}
