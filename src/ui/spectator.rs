/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use serde_json::json;

use super::{clear_children, ALERT_RED, ARMOR_BLUE, BAR_TRACK, PANEL_BG, ROW_BG, SUCCESS_GREEN, TEXT_DIM};
use crate::bridge::CallbackSink;
use crate::screen::{ScreenRoot, Surface};
use crate::store::OverlayStore;

const HEALTH_CRITICAL: i32 = 30;

#[derive(Component)]
pub(super) struct SpectatorInfo;

#[derive(Component)]
pub(super) struct SpectatorPrevButton;

#[derive(Component)]
pub(super) struct SpectatorNextButton;

pub(super) fn setup_spectator(mut commands: Commands) {
    commands
        .spawn((
            ScreenRoot(Surface::Spectator),
            Visibility::Hidden,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
        ))
        .with_children(|ui| {
            // Top center - death notice
            ui.spawn(Node {
                position_type: PositionType::Absolute,
                top: Val::Px(36.0),
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(6.0),
                ..default()
            })
            .with_children(|banner| {
                banner.spawn((
                    Text::new("YOU ARE DEAD"),
                    TextFont {
                        font_size: 32.0,
                        ..default()
                    },
                    TextColor(ALERT_RED),
                ));
                banner.spawn((
                    Text::new("Spectator mode active"),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(TEXT_DIM),
                ));
            });

            // Bottom center - target card with navigation
            ui.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(36.0),
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
            ))
            .with_children(|dock| {
                dock.spawn((
                    Node {
                        padding: UiRect::all(Val::Px(16.0)),
                        align_items: AlignItems::Center,
                        column_gap: Val::Px(18.0),
                        ..default()
                    },
                    BackgroundColor(PANEL_BG),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        SpectatorPrevButton,
                        Button,
                        Node {
                            width: Val::Px(56.0),
                            height: Val::Px(56.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(ROW_BG),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("< Q"),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });

                    bar.spawn((
                        SpectatorInfo,
                        Node {
                            width: Val::Px(240.0),
                            flex_direction: FlexDirection::Column,
                            align_items: AlignItems::Center,
                            row_gap: Val::Px(6.0),
                            ..default()
                        },
                    ));

                    bar.spawn((
                        SpectatorNextButton,
                        Button,
                        Node {
                            width: Val::Px(56.0),
                            height: Val::Px(56.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(ROW_BG),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("E >"),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
                });
            });
        });
}

pub(super) fn sync_spectator(
    mut commands: Commands,
    store: Res<OverlayStore>,
    q_info: Query<(Entity, Option<&Children>), With<SpectatorInfo>>,
) {
    if !store.is_changed() {
        return;
    }
    let Ok((info, children)) = q_info.single() else { return };

    let target = &store.spectator;
    let health_color = if target.health < HEALTH_CRITICAL {
        ALERT_RED
    } else {
        SUCCESS_GREEN
    };

    clear_children(&mut commands, children);
    commands.entity(info).with_children(|info| {
        info.spawn((
            Text::new("SPECTATING"),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(TEXT_DIM),
        ));
        info.spawn((
            Text::new(target.name.clone()),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));

        for (value, fill, height) in [
            (target.health, health_color, 10.0),
            (target.armor, ARMOR_BLUE, 7.0),
        ] {
            info.spawn(Node {
                width: Val::Percent(100.0),
                align_items: AlignItems::Center,
                column_gap: Val::Px(8.0),
                ..default()
            })
            .with_children(|line| {
                line.spawn((
                    Node {
                        flex_grow: 1.0,
                        height: Val::Px(height),
                        ..default()
                    },
                    BackgroundColor(BAR_TRACK),
                ))
                .with_children(|track| {
                    track.spawn((
                        Node {
                            width: Val::Percent(value as f32),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(fill),
                    ));
                });
                line.spawn((
                    Text::new(format!("{value}%")),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
        }
    });
}

/// On-screen navigation mirrors the Q/E keys: a request to the host, never a
/// local mutation.
pub(super) fn spectator_buttons(
    q_prev: Query<&Interaction, (Changed<Interaction>, With<SpectatorPrevButton>)>,
    q_next: Query<&Interaction, (Changed<Interaction>, With<SpectatorNextButton>)>,
    sink: Res<CallbackSink>,
) {
    for interaction in &q_prev {
        if *interaction == Interaction::Pressed {
            sink.send("spectatorNavigate", json!({ "direction": "prev" }));
        }
    }
    for interaction in &q_next {
        if *interaction == Interaction::Pressed {
            sink.send("spectatorNavigate", json!({ "direction": "next" }));
        }
    }
}
