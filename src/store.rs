/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::bridge::{
    HostAction, KillPayload, LobbyPayload, ResultsPayload, SquadPayload, TargetPayload,
};
use crate::screen::Screen;

/// The kill feed keeps only the freshest entries.
pub const KILL_FEED_CAP: usize = 6;

const RESULT_CLOSE_DELAY_SECS: f32 = 5.0;

#[derive(Debug, Clone, Default)]
pub struct HeistInfo {
    pub name: String,
    pub image: String,
    pub difficulty: String,
    pub reward: String,
}

#[derive(Debug, Clone)]
pub struct PoliceRequirement {
    pub current: u32,
    pub required: u32,
}

impl Default for PoliceRequirement {
    fn default() -> Self {
        // Gate a fresh lobby until the host reports real headcounts.
        Self {
            current: 0,
            required: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequiredItem {
    pub id: String,
    pub name: String,
    pub owned: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LobbyData {
    pub heist: HeistInfo,
    pub police: PoliceRequirement,
    pub items: Vec<RequiredItem>,
}

#[derive(Debug, Clone)]
pub struct MissionClock {
    pub seconds_remaining: u32,
    /// Display denominator only; the host may set `seconds_remaining` above it.
    pub total_seconds: u32,
}

impl Default for MissionClock {
    fn default() -> Self {
        Self {
            seconds_remaining: 299,
            total_seconds: 300,
        }
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone)]
pub struct KillFeedEntry {
    pub id: String,
    pub killer: String,
    pub victim: String,
    pub is_team_kill: bool,
    pub timestamp_millis: u64,
}

#[derive(Debug, Clone)]
pub struct SquadMember {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub health: i32,
    pub armor: i32,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SpectatorTarget {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub armor: i32,
}

#[derive(Debug, Clone)]
pub struct PlayerStats {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub kills: u32,
    pub damage: u32,
    pub xp: u32,
    pub is_mvp: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ResultBoard {
    pub victory: bool,
    pub players: Vec<PlayerStats>,
}

/// Everything the overlay shows, in one owned aggregate. Mutation happens
/// only through `apply` (one entry point per host action), the one-second
/// mission tick, and the Escape local hide; render code only reads.
#[derive(Resource, Debug, Clone)]
pub struct OverlayStore {
    pub visible: bool,
    pub screen: Screen,
    pub lobby: LobbyData,
    pub clock: MissionClock,
    pub kill_feed: Vec<KillFeedEntry>,
    pub squad: Vec<SquadMember>,
    pub spectator: SpectatorTarget,
    pub results: ResultBoard,
    next_kill_seq: u64,
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self {
            visible: false,
            screen: Screen::Lobby,
            lobby: LobbyData::default(),
            clock: MissionClock::default(),
            kill_feed: Vec::new(),
            squad: Vec::new(),
            spectator: SpectatorTarget::default(),
            results: ResultBoard::default(),
            next_kill_seq: 0,
        }
    }
}

impl OverlayStore {
    /// The screen the controller should render right now, or `None` while the
    /// overlay is hidden. The stored screen survives hiding untouched.
    pub fn active_screen(&self) -> Option<Screen> {
        if self.visible {
            Some(self.screen)
        } else {
            None
        }
    }

    /// Apply one decoded host message. Never fails; omitted fields were
    /// already defaulted at the decode boundary.
    pub fn apply(&mut self, action: HostAction) {
        match action {
            HostAction::SetVisible { visible } => self.visible = visible,
            HostAction::SetScreen { screen, victory } => {
                if let Some(req) = screen {
                    self.screen = req.resolve(victory);
                }
            }
            HostAction::UpdateLobby { data } => self.lobby = lobby_from(data),
            HostAction::UpdateTimer { time, total_time } => {
                if let Some(seconds) = time.and_then(|t| t.as_seconds()) {
                    self.clock.seconds_remaining = seconds;
                }
                if let Some(total) = total_time {
                    if total > 0 {
                        self.clock.total_seconds = total;
                    }
                }
            }
            HostAction::AddKill { kill } => self.push_kill(kill),
            HostAction::UpdateSquad { squad } => {
                self.squad = squad.into_iter().map(squad_member_from).collect();
            }
            HostAction::UpdateSpectatorTarget { target } => {
                self.spectator = target_from(target);
            }
            HostAction::PlayerDied => self.screen = Screen::Spectator,
            HostAction::ShowResults { data } => {
                self.screen = if data.victory {
                    Screen::ResultWin
                } else {
                    Screen::ResultLose
                };
                self.results = results_from(data);
            }
            // Filtered out by the bridge; harmless if it slips through.
            HostAction::Unrecognized => {}
        }
    }

    /// One second of mission time elapsed while on the HUD.
    pub fn tick_second(&mut self) {
        self.clock.seconds_remaining = self.clock.seconds_remaining.saturating_sub(1);
    }

    /// Escape closes optimistically; the host usually confirms with a
    /// `setVisible(false)` of its own.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Lobby confirm: the start request went to the host, switch to the HUD.
    pub fn start_mission(&mut self) {
        self.screen = Screen::Hud;
    }

    /// Result close: back to the lobby.
    pub fn close_results(&mut self) {
        self.screen = Screen::Lobby;
    }

    fn push_kill(&mut self, kill: KillPayload) {
        self.next_kill_seq += 1;
        let entry = KillFeedEntry {
            id: format!("kill-{}", self.next_kill_seq),
            killer: kill.killer,
            victim: kill.victim,
            is_team_kill: kill.is_team_kill,
            timestamp_millis: kill.timestamp.unwrap_or_else(epoch_millis),
        };
        self.kill_feed.insert(0, entry);
        self.kill_feed.truncate(KILL_FEED_CAP);
    }
}

fn lobby_from(data: LobbyPayload) -> LobbyData {
    LobbyData {
        heist: HeistInfo {
            name: data.robbery.name,
            image: data.robbery.image,
            difficulty: data.robbery.difficulty,
            reward: data.robbery.reward,
        },
        police: PoliceRequirement {
            current: data.police.current,
            required: data.police.required,
        },
        items: data
            .items
            .into_iter()
            .map(|item| RequiredItem {
                id: item.id,
                name: item.name,
                owned: item.owned,
            })
            .collect(),
    }
}

fn squad_member_from(member: SquadPayload) -> SquadMember {
    let health = clamp_stat(member.health);
    SquadMember {
        id: member.id.map(|id| id.into_string()).unwrap_or_default(),
        name: member.name,
        avatar: member.avatar,
        health,
        armor: clamp_stat(member.armor),
        is_alive: !member.is_dead && health > 0,
    }
}

fn target_from(target: TargetPayload) -> SpectatorTarget {
    SpectatorTarget {
        id: target
            .id
            .map(|id| id.into_string())
            .unwrap_or_else(|| format!("target-{}", epoch_millis())),
        name: target.name,
        health: clamp_stat(target.health),
        armor: clamp_stat(target.armor),
    }
}

fn results_from(data: ResultsPayload) -> ResultBoard {
    let mvp_name = data.mvp.map(|m| m.name);
    let mut mvp_taken = false;
    let players = data
        .players
        .into_iter()
        .enumerate()
        .map(|(index, player)| {
            // First name match only; the board never carries two MVPs.
            let is_mvp = !mvp_taken && mvp_name.as_deref() == Some(player.name.as_str());
            mvp_taken |= is_mvp;
            PlayerStats {
                id: (index + 1).to_string(),
                name: player.name,
                avatar: player.avatar,
                kills: player.kills,
                damage: player.damage,
                xp: player.xp,
                is_mvp,
            }
        })
        .collect();
    ResultBoard {
        victory: data.victory,
        players,
    }
}

fn clamp_stat(value: i64) -> i32 {
    value.clamp(0, 100) as i32
}

pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Drives the one-second HUD countdown. The repeating timer lives only while
/// the HUD is the current screen; any other screen resets it so a queued
/// partial second never carries over. Hiding the overlay does not stop the
/// clock, the mission keeps running either way.
#[derive(Resource, Debug)]
pub struct MissionTick {
    timer: Timer,
}

impl Default for MissionTick {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

pub fn tick_mission_clock(
    time: Res<Time>,
    mut tick: ResMut<MissionTick>,
    mut store: ResMut<OverlayStore>,
) {
    if store.screen != Screen::Hud {
        tick.timer.reset();
        return;
    }

    tick.timer.tick(time.delta());
    for _ in 0..tick.timer.times_finished_this_tick() {
        store.tick_second();
    }
}

/// Results cannot be skipped instantly: the close action stays unavailable
/// for the first five seconds after a result screen comes up.
#[derive(Resource, Debug)]
pub struct ResultGate {
    timer: Timer,
}

impl Default for ResultGate {
    fn default() -> Self {
        let mut timer = Timer::from_seconds(RESULT_CLOSE_DELAY_SECS, TimerMode::Once);
        // Start finished so the gate is inert until a result screen arms it.
        timer.set_elapsed(timer.duration());
        Self { timer }
    }
}

impl ResultGate {
    pub fn arm(&mut self) {
        self.timer.reset();
    }

    pub fn open(&self) -> bool {
        self.timer.is_finished()
    }

    pub fn tick(&mut self, delta: std::time::Duration) {
        self.timer.tick(delta);
    }
}

/// Re-arm the close gate whenever a result screen becomes the rendered
/// screen, no matter which path put it there (host message, dev tools, or a
/// local transition).
pub fn arm_result_gate(
    time: Res<Time>,
    store: Res<OverlayStore>,
    mut gate: ResMut<ResultGate>,
    mut prev: Local<Option<Screen>>,
) {
    let active = store.active_screen();
    let on_result = matches!(active, Some(s) if s.is_result());
    let was_result = matches!(*prev, Some(s) if s.is_result());

    if on_result && !was_result {
        gate.arm();
    }
    if on_result {
        gate.tick(time.delta());
    }
    *prev = active;
}

pub struct StorePlugin;

impl Plugin for StorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlayStore>()
            .init_resource::<MissionTick>()
            .init_resource::<ResultGate>()
            .add_systems(
                Update,
                (tick_mission_clock, arm_result_gate).after(crate::bridge::pump_host_messages),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{ClockValue, MvpPayload, ResultPlayerPayload};
    use crate::screen::ScreenRequest;
    use serde_json::json;
    use std::time::Duration;

    fn apply_json(store: &mut OverlayStore, v: serde_json::Value) {
        store.apply(serde_json::from_value(v).expect("decode"));
    }

    #[test]
    fn kill_feed_is_capped_and_newest_first() {
        let mut store = OverlayStore::default();
        for i in 0..10 {
            store.apply(HostAction::AddKill {
                kill: KillPayload {
                    killer: format!("K{i}"),
                    victim: format!("V{i}"),
                    is_team_kill: false,
                    timestamp: Some(i),
                },
            });
        }
        assert_eq!(store.kill_feed.len(), KILL_FEED_CAP);
        assert_eq!(store.kill_feed[0].killer, "K9");
        assert_eq!(store.kill_feed[KILL_FEED_CAP - 1].killer, "K4");

        let mut ids: Vec<_> = store.kill_feed.iter().map(|k| k.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), KILL_FEED_CAP, "kill ids must be unique");
    }

    #[test]
    fn hiding_preserves_the_screen_underneath() {
        let mut store = OverlayStore::default();
        apply_json(&mut store, json!({"action": "setVisible", "visible": true}));
        apply_json(&mut store, json!({"action": "setScreen", "screen": "spectator"}));
        assert_eq!(store.active_screen(), Some(Screen::Spectator));

        apply_json(&mut store, json!({"action": "setVisible", "visible": false}));
        assert_eq!(store.active_screen(), None);

        // No new setScreen needed; visibility alone restores the screen.
        apply_json(&mut store, json!({"action": "setVisible", "visible": true}));
        assert_eq!(store.active_screen(), Some(Screen::Spectator));
    }

    #[test]
    fn timer_accepts_integer_and_clock_text_identically() {
        let mut a = OverlayStore::default();
        let mut b = OverlayStore::default();
        apply_json(&mut a, json!({"action": "updateTimer", "time": 299}));
        apply_json(&mut b, json!({"action": "updateTimer", "time": "04:59"}));
        assert_eq!(a.clock.seconds_remaining, 299);
        assert_eq!(b.clock.seconds_remaining, 299);
    }

    #[test]
    fn timer_total_updates_only_when_provided_and_positive() {
        let mut store = OverlayStore::default();
        apply_json(
            &mut store,
            json!({"action": "updateTimer", "time": 10, "totalTime": 600}),
        );
        assert_eq!(store.clock.total_seconds, 600);

        apply_json(&mut store, json!({"action": "updateTimer", "time": 5}));
        assert_eq!(store.clock.total_seconds, 600);

        apply_json(
            &mut store,
            json!({"action": "updateTimer", "time": 5, "totalTime": 0}),
        );
        assert_eq!(store.clock.total_seconds, 600);
    }

    #[test]
    fn ticks_decrement_and_clamp_at_zero() {
        let mut store = OverlayStore::default();
        store.apply(HostAction::UpdateTimer {
            time: Some(ClockValue::Seconds(10)),
            total_time: None,
        });
        for _ in 0..10 {
            store.tick_second();
        }
        assert_eq!(store.clock.seconds_remaining, 0);
        store.tick_second();
        assert_eq!(store.clock.seconds_remaining, 0);
    }

    #[test]
    fn leaving_hud_does_not_reset_remaining_seconds() {
        let mut store = OverlayStore::default();
        store.visible = true;
        store.screen = Screen::Hud;
        store.apply(HostAction::UpdateTimer {
            time: Some(ClockValue::Seconds(100)),
            total_time: None,
        });
        store.tick_second();
        store.tick_second();

        store.apply(HostAction::PlayerDied);
        assert_eq!(store.screen, Screen::Spectator);
        store.apply(HostAction::SetScreen {
            screen: Some(ScreenRequest::Hud),
            victory: false,
        });
        assert_eq!(store.clock.seconds_remaining, 98);
    }

    #[test]
    fn clock_runs_on_hud_even_while_hidden() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        world.init_resource::<Time>();
        world.init_resource::<MissionTick>();
        let mut store = OverlayStore::default();
        store.visible = false;
        store.screen = Screen::Hud;
        store.apply(HostAction::UpdateTimer {
            time: Some(ClockValue::Seconds(10)),
            total_time: None,
        });
        world.insert_resource(store);

        let advance = |world: &mut World, secs: f32| {
            world
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(secs));
            world
                .run_system_once(tick_mission_clock)
                .expect("run tick system");
        };

        // Hidden but still on the HUD screen: the mission clock keeps going.
        advance(&mut world, 1.0);
        assert_eq!(
            world.resource::<OverlayStore>().clock.seconds_remaining,
            9,
            "hiding the overlay must not pause the countdown"
        );

        // Off the HUD the clock holds, and the queued partial second is dropped.
        world.resource_mut::<OverlayStore>().screen = Screen::Spectator;
        advance(&mut world, 0.6);
        assert_eq!(world.resource::<OverlayStore>().clock.seconds_remaining, 9);

        world.resource_mut::<OverlayStore>().screen = Screen::Hud;
        advance(&mut world, 0.5);
        assert_eq!(
            world.resource::<OverlayStore>().clock.seconds_remaining,
            9,
            "partial seconds from another screen must not carry over"
        );
        advance(&mut world, 0.5);
        assert_eq!(world.resource::<OverlayStore>().clock.seconds_remaining, 8);
    }

    #[test]
    fn exactly_one_mvp_from_name_match() {
        let mut store = OverlayStore::default();
        store.apply(HostAction::ShowResults {
            data: ResultsPayload {
                victory: true,
                players: vec![
                    ResultPlayerPayload {
                        name: "Caveira".into(),
                        kills: 8,
                        ..Default::default()
                    },
                    ResultPlayerPayload {
                        name: "Rogerio".into(),
                        kills: 5,
                        ..Default::default()
                    },
                ],
                mvp: Some(MvpPayload {
                    name: "Caveira".into(),
                }),
            },
        });
        let mvps: Vec<_> = store.results.players.iter().filter(|p| p.is_mvp).collect();
        assert_eq!(mvps.len(), 1);
        assert_eq!(mvps[0].name, "Caveira");
        assert_eq!(store.screen, Screen::ResultWin);
    }

    #[test]
    fn no_name_match_means_no_mvp() {
        let mut store = OverlayStore::default();
        store.apply(HostAction::ShowResults {
            data: ResultsPayload {
                victory: false,
                players: vec![ResultPlayerPayload {
                    name: "Thunder".into(),
                    ..Default::default()
                }],
                mvp: Some(MvpPayload {
                    name: "Nobody".into(),
                }),
            },
        });
        assert!(store.results.players.iter().all(|p| !p.is_mvp));
        assert_eq!(store.screen, Screen::ResultLose);
    }

    #[test]
    fn duplicate_names_still_yield_a_single_mvp() {
        let mut store = OverlayStore::default();
        store.apply(HostAction::ShowResults {
            data: ResultsPayload {
                victory: true,
                players: vec![
                    ResultPlayerPayload {
                        name: "Ninja".into(),
                        ..Default::default()
                    },
                    ResultPlayerPayload {
                        name: "Ninja".into(),
                        ..Default::default()
                    },
                ],
                mvp: Some(MvpPayload {
                    name: "Ninja".into(),
                }),
            },
        });
        assert_eq!(
            store.results.players.iter().filter(|p| p.is_mvp).count(),
            1
        );
    }

    #[test]
    fn squad_replacement_derives_liveness() {
        let mut store = OverlayStore::default();
        apply_json(
            &mut store,
            json!({"action": "updateSquad", "squad": [
                {"id": 1, "name": "Caveira", "health": 80, "armor": 40},
                {"id": 2, "name": "Thunder", "health": 0},
                {"id": 3, "name": "Ninja", "health": 50, "isDead": true}
            ]}),
        );
        assert_eq!(store.squad.len(), 3);
        assert!(store.squad[0].is_alive);
        assert!(!store.squad[1].is_alive, "zero health is dead");
        assert!(!store.squad[2].is_alive, "isDead overrides health");

        apply_json(
            &mut store,
            json!({"action": "updateSquad", "squad": [
                {"id": 9, "name": "Solo", "health": 250}
            ]}),
        );
        assert_eq!(store.squad.len(), 1, "squad is replaced wholesale");
        assert_eq!(store.squad[0].health, 100, "health clamps to 0..=100");
    }

    #[test]
    fn spectator_target_gets_generated_id_when_absent() {
        let mut store = OverlayStore::default();
        apply_json(
            &mut store,
            json!({"action": "updateSpectatorTarget", "target": {"name": "Viper_01", "health": 64}}),
        );
        assert_eq!(store.spectator.name, "Viper_01");
        assert!(!store.spectator.id.is_empty());
        assert_eq!(store.spectator.armor, 0);
    }

    #[test]
    fn player_death_switches_to_spectator() {
        let mut store = OverlayStore::default();
        store.screen = Screen::Hud;
        apply_json(&mut store, json!({"action": "playerDied"}));
        assert_eq!(store.screen, Screen::Spectator);
    }

    #[test]
    fn set_screen_without_name_is_a_no_op() {
        let mut store = OverlayStore::default();
        store.screen = Screen::Hud;
        store.apply(HostAction::SetScreen {
            screen: None,
            victory: true,
        });
        assert_eq!(store.screen, Screen::Hud);
    }

    #[test]
    fn result_gate_opens_only_after_the_delay() {
        let mut gate = ResultGate::default();
        gate.arm();
        gate.tick(Duration::from_secs_f32(4.9));
        assert!(!gate.open());
        gate.tick(Duration::from_secs_f32(0.2));
        assert!(gate.open());

        // A fresh result screen re-arms it.
        gate.arm();
        assert!(!gate.open());
    }

    #[test]
    fn clock_formats_as_mm_ss() {
        assert_eq!(format_clock(299), "04:59");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(600), "10:00");
    }
}
