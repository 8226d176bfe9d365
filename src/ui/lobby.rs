/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use serde_json::json;

use super::{
    clear_children, ALERT_RED, DISABLED_BG, GOLD, PANEL_BG, ROW_BG, SUCCESS_GREEN, TEXT_DIM,
};
use crate::bridge::CallbackSink;
use crate::screen::{ScreenRoot, Surface};
use crate::store::{epoch_millis, LobbyData, OverlayStore};

#[derive(Component)]
pub(super) struct LobbyTitleText;

#[derive(Component)]
pub(super) struct LobbyDifficultyText;

#[derive(Component)]
pub(super) struct LobbyPoliceText;

#[derive(Component)]
pub(super) struct LobbyRewardText;

#[derive(Component)]
pub(super) struct LobbyItemGrid;

#[derive(Component)]
pub(super) struct LobbyStartButton;

#[derive(Component)]
pub(super) struct LobbyStartLabel;

/// The start gate lives on the screen, not in the store: enough police
/// online and every required item owned.
pub fn can_start(lobby: &LobbyData) -> bool {
    lobby.police.current >= lobby.police.required && lobby.items.iter().all(|item| item.owned)
}

pub(super) fn setup_lobby(mut commands: Commands) {
    commands
        .spawn((
            ScreenRoot(Surface::Lobby),
            Visibility::Hidden,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
        ))
        .with_children(|ui| {
            ui.spawn((
                Node {
                    width: Val::Px(460.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(20.0)),
                    row_gap: Val::Px(14.0),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
            ))
            .with_children(|panel| {
                panel.spawn((
                    LobbyDifficultyText,
                    Text::new(""),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(ALERT_RED),
                ));
                panel.spawn((
                    LobbyTitleText,
                    Text::new(""),
                    TextFont {
                        font_size: 34.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));

                // Police headcount requirement
                panel
                    .spawn((
                        Node {
                            width: Val::Percent(100.0),
                            padding: UiRect::all(Val::Px(12.0)),
                            justify_content: JustifyContent::SpaceBetween,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(ROW_BG),
                    ))
                    .with_children(|row| {
                        row.spawn((
                            Text::new("POLICE ONLINE"),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(TEXT_DIM),
                        ));
                        row.spawn((
                            LobbyPoliceText,
                            Text::new(""),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(ALERT_RED),
                        ));
                    });

                panel.spawn((
                    Text::new("REQUIRED ITEMS"),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(TEXT_DIM),
                ));
                panel.spawn((
                    LobbyItemGrid,
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Row,
                        flex_wrap: FlexWrap::Wrap,
                        column_gap: Val::Px(10.0),
                        row_gap: Val::Px(10.0),
                        ..default()
                    },
                ));

                // Reward line
                panel
                    .spawn((
                        Node {
                            width: Val::Percent(100.0),
                            padding: UiRect::all(Val::Px(12.0)),
                            justify_content: JustifyContent::SpaceBetween,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(ROW_BG),
                    ))
                    .with_children(|row| {
                        row.spawn((
                            Text::new("ESTIMATED REWARD"),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(TEXT_DIM),
                        ));
                        row.spawn((
                            LobbyRewardText,
                            Text::new(""),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(GOLD),
                        ));
                    });

                panel
                    .spawn((
                        LobbyStartButton,
                        Button,
                        Node {
                            width: Val::Percent(100.0),
                            padding: UiRect::all(Val::Px(14.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(DISABLED_BG),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            LobbyStartLabel,
                            Text::new("REQUIREMENTS NOT MET"),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            });
        });
}

pub(super) fn sync_lobby(
    mut commands: Commands,
    store: Res<OverlayStore>,
    mut q_text: Query<(
        &mut Text,
        &mut TextColor,
        Option<&LobbyTitleText>,
        Option<&LobbyDifficultyText>,
        Option<&LobbyPoliceText>,
        Option<&LobbyRewardText>,
        Option<&LobbyStartLabel>,
    )>,
    q_grid: Query<(Entity, Option<&Children>), With<LobbyItemGrid>>,
    mut q_button: Query<&mut BackgroundColor, With<LobbyStartButton>>,
) {
    if !store.is_changed() {
        return;
    }

    let lobby = &store.lobby;
    let ready = can_start(lobby);
    let police_ok = lobby.police.current >= lobby.police.required;

    for (mut text, mut color, title, difficulty, police, reward, start) in &mut q_text {
        if title.is_some() {
            *text = Text::new(lobby.heist.name.to_uppercase());
        } else if difficulty.is_some() {
            *text = Text::new(format!("DIFFICULTY: {}", lobby.heist.difficulty.to_uppercase()));
        } else if police.is_some() {
            *text = Text::new(format!(
                "{}/{} available",
                lobby.police.current, lobby.police.required
            ));
            *color = TextColor(if police_ok { SUCCESS_GREEN } else { ALERT_RED });
        } else if reward.is_some() {
            *text = Text::new(lobby.heist.reward.clone());
        } else if start.is_some() {
            *text = Text::new(if ready {
                "START OPERATION"
            } else {
                "REQUIREMENTS NOT MET"
            });
        }
    }

    if let Ok(mut bg) = q_button.single_mut() {
        *bg = BackgroundColor(if ready { SUCCESS_GREEN } else { DISABLED_BG });
    }

    let Ok((grid, children)) = q_grid.single() else { return };
    clear_children(&mut commands, children);
    commands.entity(grid).with_children(|grid| {
        for item in &lobby.items {
            grid.spawn((
                Node {
                    width: Val::Px(130.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    padding: UiRect::all(Val::Px(10.0)),
                    row_gap: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(ROW_BG),
            ))
            .with_children(|cell| {
                cell.spawn((
                    Text::new(item.name.clone()),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
                cell.spawn((
                    Text::new(if item.owned { "OWNED" } else { "MISSING" }),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(if item.owned { SUCCESS_GREEN } else { ALERT_RED }),
                ));
            });
        }
    });
}

pub(super) fn lobby_start_button(
    q: Query<&Interaction, (Changed<Interaction>, With<LobbyStartButton>)>,
    sink: Res<CallbackSink>,
    mut store: ResMut<OverlayStore>,
) {
    for interaction in &q {
        if *interaction != Interaction::Pressed {
            continue;
        }
        // Unsatisfied requirements swallow the press entirely.
        if !can_start(&store.lobby) {
            continue;
        }
        sink.send("startRobbery", json!({ "timestamp": epoch_millis() }));
        store.start_mission();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{PoliceRequirement, RequiredItem};

    fn lobby(current: u32, required: u32, owned: &[bool]) -> LobbyData {
        LobbyData {
            police: PoliceRequirement { current, required },
            items: owned
                .iter()
                .enumerate()
                .map(|(i, &owned)| RequiredItem {
                    id: format!("item-{i}"),
                    name: format!("Item {i}"),
                    owned,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn start_requires_police_and_every_item() {
        assert!(can_start(&lobby(6, 6, &[true, true, true])));
        assert!(!can_start(&lobby(5, 6, &[true, true, true])));
        assert!(!can_start(&lobby(6, 6, &[true, false, true])));
    }

    #[test]
    fn start_with_no_listed_items_only_gates_on_police() {
        assert!(can_start(&lobby(2, 1, &[])));
        assert!(!can_start(&lobby(0, 1, &[])));
    }
}
