/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;

use super::{clear_children, ALERT_RED, GOLD, PANEL_BG, ROW_BG, SUCCESS_GREEN, TEXT_DIM};
use crate::bridge::CallbackSink;
use crate::screen::{Screen, ScreenRoot, Surface};
use crate::store::{OverlayStore, ResultGate};

#[derive(Component)]
pub(super) struct ResultHeaderText;

#[derive(Component)]
pub(super) struct ResultSubText;

#[derive(Component)]
pub(super) struct MvpCard;

#[derive(Component)]
pub(super) struct ResultTable;

#[derive(Component)]
pub(super) struct ResultCloseButton;

pub(super) fn setup_result(mut commands: Commands) {
    commands
        .spawn((
            ScreenRoot(Surface::Result),
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
                    width: Val::Px(560.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(24.0)),
                    row_gap: Val::Px(16.0),
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(PANEL_BG),
            ))
            .with_children(|panel| {
                panel.spawn((
                    ResultHeaderText,
                    Text::new(""),
                    TextFont {
                        font_size: 36.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
                panel.spawn((
                    ResultSubText,
                    Text::new(""),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(TEXT_DIM),
                ));

                panel.spawn((
                    MvpCard,
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(4.0),
                        ..default()
                    },
                ));

                panel.spawn((
                    ResultTable,
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(2.0),
                        ..default()
                    },
                ));

                // Hidden until the close gate opens
                panel
                    .spawn((
                        ResultCloseButton,
                        Button,
                        Visibility::Hidden,
                        Node {
                            width: Val::Percent(100.0),
                            padding: UiRect::all(Val::Px(12.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(ROW_BG),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("CLOSE"),
                            TextFont {
                                font_size: 16.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            });
        });
}

pub(super) fn sync_result(
    mut commands: Commands,
    store: Res<OverlayStore>,
    mut q_text: Query<(
        &mut Text,
        &mut TextColor,
        Option<&ResultHeaderText>,
        Option<&ResultSubText>,
    )>,
    q_mvp: Query<(Entity, Option<&Children>), With<MvpCard>>,
    q_table: Query<(Entity, Option<&Children>), With<ResultTable>>,
) {
    if !store.is_changed() {
        return;
    }

    let victory = store.screen == Screen::ResultWin;
    for (mut text, mut color, header, sub) in &mut q_text {
        if header.is_some() {
            *text = Text::new(if victory {
                "MISSION ACCOMPLISHED"
            } else {
                "OPERATION FAILED"
            });
            *color = TextColor(if victory { SUCCESS_GREEN } else { ALERT_RED });
        } else if sub.is_some() {
            *text = Text::new(if victory {
                "The take is secured."
            } else {
                "The police won this one."
            });
        }
    }

    if let Ok((card, children)) = q_mvp.single() {
        clear_children(&mut commands, children);
        if let Some(mvp) = store.results.players.iter().find(|p| p.is_mvp) {
            let name = mvp.name.clone();
            let line = format!("{} kills   {} damage", mvp.kills, mvp.damage);
            commands.entity(card).with_children(|card| {
                card.spawn((
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(12.0)),
                        row_gap: Val::Px(2.0),
                        ..default()
                    },
                    BackgroundColor(ROW_BG),
                ))
                .with_children(|inner| {
                    inner.spawn((
                        Text::new("MATCH MVP"),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(GOLD),
                    ));
                    inner.spawn((
                        Text::new(name),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                    inner.spawn((
                        Text::new(line),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(TEXT_DIM),
                    ));
                });
            });
        }
    }

    if let Ok((table, children)) = q_table.single() {
        clear_children(&mut commands, children);
        commands.entity(table).with_children(|table| {
            spawn_row(
                table,
                "PLAYER",
                "KILLS",
                "DAMAGE",
                "XP",
                TEXT_DIM,
                ROW_BG,
            );
            for player in &store.results.players {
                let name = if player.is_mvp {
                    format!("{} *", player.name)
                } else {
                    player.name.clone()
                };
                spawn_row(
                    table,
                    &name,
                    &player.kills.to_string(),
                    &player.damage.to_string(),
                    &format!("+{}", player.xp),
                    Color::WHITE,
                    if player.is_mvp {
                        Color::srgba(0.93, 0.76, 0.26, 0.10)
                    } else {
                        Color::NONE
                    },
                );
            }
        });
    }
}

fn spawn_row(
    table: &mut ChildSpawnerCommands<'_>,
    name: &str,
    kills: &str,
    damage: &str,
    xp: &str,
    color: Color,
    bg: Color,
) {
    table
        .spawn((
            Node {
                width: Val::Percent(100.0),
                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(bg),
        ))
        .with_children(|row| {
            for (value, width) in [(name, 40.0), (kills, 20.0), (damage, 20.0), (xp, 20.0)] {
                row.spawn(Node {
                    width: Val::Percent(width),
                    justify_content: JustifyContent::FlexStart,
                    ..default()
                })
                .with_children(|cell| {
                    cell.spawn((
                        Text::new(value),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(color),
                    ));
                });
            }
        });
}

/// The close button only exists once the five second gate has run down.
pub(super) fn result_close_gate(
    store: Res<OverlayStore>,
    gate: Res<ResultGate>,
    mut q: Query<&mut Visibility, With<ResultCloseButton>>,
) {
    let Ok(mut vis) = q.single_mut() else { return };
    let on_result = matches!(store.active_screen(), Some(s) if s.is_result());
    let shown = on_result && gate.open();
    let wanted = if shown {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if *vis != wanted {
        *vis = wanted;
    }
}

pub(super) fn result_close_button(
    q: Query<&Interaction, (Changed<Interaction>, With<ResultCloseButton>)>,
    gate: Res<ResultGate>,
    sink: Res<CallbackSink>,
    mut store: ResMut<OverlayStore>,
) {
    for interaction in &q {
        if *interaction != Interaction::Pressed {
            continue;
        }
        // A press that races the gate has no effect.
        if !gate.open() {
            continue;
        }
        sink.send("exitResults", serde_json::json!({}));
        store.close_results();
    }
}
