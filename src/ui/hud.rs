use bevy::prelude::*;

use super::{clear_children, ALERT_RED, ARMOR_BLUE, BAR_TRACK, PANEL_BG, SUCCESS_GREEN, TEXT_DIM};
use crate::screen::{ScreenRoot, Surface};
use crate::store::{format_clock, OverlayStore};

/// The feed stores six entries but the HUD shows only the freshest five.
const KILL_FEED_DISPLAY: usize = 5;

const HEALTH_CRITICAL: i32 = 30;

#[derive(Component)]
pub(super) struct HudClockText;

#[derive(Component)]
pub(super) struct KillFeedList;

#[derive(Component)]
pub(super) struct SquadList;

pub(super) fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            ScreenRoot(Surface::Hud),
            Visibility::Hidden,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
        ))
        .with_children(|ui| {
            // Top center - mission clock
            ui.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    left: Val::Percent(50.0),
                    margin: UiRect::left(Val::Px(-70.0)),
                    padding: UiRect::axes(Val::Px(18.0), Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
            ))
            .with_children(|clock| {
                clock.spawn((
                    HudClockText,
                    Text::new("--:-- / --:--"),
                    TextFont {
                        font_size: 24.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });

            // Top left - kill feed
            ui.spawn((
                KillFeedList,
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    left: Val::Px(24.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(6.0),
                    ..default()
                },
            ));

            // Top right - squad roster
            ui.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    right: Val::Px(24.0),
                    width: Val::Px(230.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(12.0)),
                    row_gap: Val::Px(10.0),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new("SQUAD"),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(TEXT_DIM),
                ));
                panel.spawn((
                    SquadList,
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(10.0),
                        ..default()
                    },
                ));
            });
        });
}

pub(super) fn sync_hud(
    mut commands: Commands,
    store: Res<OverlayStore>,
    mut q_clock: Query<&mut Text, With<HudClockText>>,
    q_feed: Query<(Entity, Option<&Children>), With<KillFeedList>>,
    q_squad: Query<(Entity, Option<&Children>), With<SquadList>>,
) {
    if !store.is_changed() {
        return;
    }

    if let Ok(mut text) = q_clock.single_mut() {
        *text = Text::new(format!(
            "{} / {}",
            format_clock(store.clock.seconds_remaining),
            format_clock(store.clock.total_seconds)
        ));
    }

    if let Ok((feed, children)) = q_feed.single() {
        clear_children(&mut commands, children);
        commands.entity(feed).with_children(|feed| {
            for entry in store.kill_feed.iter().take(KILL_FEED_DISPLAY) {
                let tag_color = if entry.is_team_kill {
                    ARMOR_BLUE
                } else {
                    ALERT_RED
                };
                let tag = if entry.is_team_kill { "[TEAM]" } else { "[ENEMY]" };
                feed.spawn((
                    Node {
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                        column_gap: Val::Px(6.0),
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(PANEL_BG),
                ))
                .with_children(|row| {
                    row.spawn((
                        Text::new(tag),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(tag_color),
                    ));
                    row.spawn((
                        Text::new(format!("{} eliminated {}", entry.killer, entry.victim)),
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

    if let Ok((list, children)) = q_squad.single() {
        clear_children(&mut commands, children);
        commands.entity(list).with_children(|list| {
            for member in &store.squad {
                let name_color = if member.is_alive {
                    Color::WHITE
                } else {
                    ALERT_RED
                };
                let health_color = if member.health < HEALTH_CRITICAL {
                    ALERT_RED
                } else {
                    SUCCESS_GREEN
                };

                list.spawn(Node {
                    width: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(3.0),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        Text::new(if member.is_alive {
                            member.name.clone()
                        } else {
                            format!("{} (down)", member.name)
                        }),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(name_color),
                    ));

                    if member.is_alive {
                        row.spawn((
                            Node {
                                width: Val::Percent(100.0),
                                height: Val::Px(6.0),
                                ..default()
                            },
                            BackgroundColor(BAR_TRACK),
                        ))
                        .with_children(|track| {
                            track.spawn((
                                Node {
                                    width: Val::Percent(member.health as f32),
                                    height: Val::Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(health_color),
                            ));
                        });

                        if member.armor > 0 {
                            row.spawn((
                                Node {
                                    width: Val::Percent(100.0),
                                    height: Val::Px(4.0),
                                    ..default()
                                },
                                BackgroundColor(BAR_TRACK),
                            ))
                            .with_children(|track| {
                                track.spawn((
                                    Node {
                                        width: Val::Percent(member.armor as f32),
                                        height: Val::Percent(100.0),
                                        ..default()
                                    },
                                    BackgroundColor(ARMOR_BLUE),
                                ));
                            });
                        }
                    }
                });
            }
        });
    }
}
