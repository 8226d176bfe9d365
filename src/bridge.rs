/*
Heistline - heist mode overlay UI
*/
use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Deserialize;
use serde_json::Value;

use crate::screen::ScreenRequest;
use crate::store::OverlayStore;

/// Inbound host message, decoded once at the boundary. The host sends JSON
/// objects shaped `{ "action": <name>, ...payload }`; anything that is not one
/// of the nine recognized actions falls into `Unrecognized` and is dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum HostAction {
    #[serde(rename = "setVisible")]
    SetVisible {
        #[serde(default)]
        visible: bool,
    },
    #[serde(rename = "setScreen")]
    SetScreen {
        #[serde(default)]
        screen: Option<ScreenRequest>,
        #[serde(default)]
        victory: bool,
    },
    #[serde(rename = "updateLobby")]
    UpdateLobby {
        #[serde(default)]
        data: LobbyPayload,
    },
    #[serde(rename = "updateTimer")]
    UpdateTimer {
        #[serde(default)]
        time: Option<ClockValue>,
        #[serde(default, rename = "totalTime")]
        total_time: Option<u32>,
    },
    #[serde(rename = "addKill")]
    AddKill {
        #[serde(default)]
        kill: KillPayload,
    },
    #[serde(rename = "updateSquad")]
    UpdateSquad {
        #[serde(default)]
        squad: Vec<SquadPayload>,
    },
    #[serde(rename = "updateSpectatorTarget")]
    UpdateSpectatorTarget {
        #[serde(default)]
        target: TargetPayload,
    },
    #[serde(rename = "playerDied")]
    PlayerDied,
    #[serde(rename = "showResults")]
    ShowResults {
        #[serde(default)]
        data: ResultsPayload,
    },
    #[serde(other)]
    Unrecognized,
}

/// The `time` field of `updateTimer`: the host may send either a plain second
/// count or a preformatted `"MM:SS"` string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClockValue {
    Seconds(i64),
    Text(String),
}

impl ClockValue {
    /// Resolve to whole seconds. Unparseable text yields `None` (the field is
    /// then ignored, it never raises an error). Negative counts clamp to 0.
    pub fn as_seconds(&self) -> Option<u32> {
        match self {
            ClockValue::Seconds(s) => Some((*s).max(0) as u32),
            ClockValue::Text(t) => {
                let t = t.trim();
                if let Some((m, s)) = t.split_once(':') {
                    let m: u32 = m.parse().ok()?;
                    let s: u32 = s.parse().ok()?;
                    Some(m * 60 + s)
                } else {
                    t.parse::<i64>().ok().map(|s| s.max(0) as u32)
                }
            }
        }
    }
}

// Payload shapes. Defaults for omitted fields live here, on the decode types,
// so the handlers never see a half-specified message.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LobbyPayload {
    pub robbery: HeistPayload,
    pub police: PolicePayload,
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeistPayload {
    pub name: String,
    pub image: String,
    pub difficulty: String,
    pub reward: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicePayload {
    pub current: u32,
    pub required: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemPayload {
    pub id: String,
    pub name: String,
    pub owned: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KillPayload {
    pub killer: String,
    pub victim: String,
    pub is_team_kill: bool,
    /// Millis since epoch; receipt time when absent.
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquadPayload {
    pub id: Option<PlayerId>,
    pub name: String,
    pub avatar: String,
    pub health: i64,
    pub armor: i64,
    pub is_dead: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TargetPayload {
    pub id: Option<PlayerId>,
    pub name: String,
    pub health: i64,
    pub armor: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultsPayload {
    pub victory: bool,
    pub players: Vec<ResultPlayerPayload>,
    pub mvp: Option<MvpPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultPlayerPayload {
    pub name: String,
    pub avatar: String,
    pub kills: u32,
    pub damage: u32,
    pub xp: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MvpPayload {
    pub name: String,
}

/// Hosts are sloppy about id types; accept both numbers and strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    Num(i64),
    Text(String),
}

impl PlayerId {
    pub fn into_string(self) -> String {
        match self {
            PlayerId::Num(n) => n.to_string(),
            PlayerId::Text(t) => t,
        }
    }
}

/// Receiving end of the host's message channel. The embedding runtime (or a
/// test) keeps the matching `Sender`; standalone runs simply never send.
#[derive(Resource)]
pub struct HostLink {
    rx: Receiver<Value>,
}

impl HostLink {
    pub fn channel() -> (Sender<Value>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self { rx })
    }
}

/// Outbound fire-and-forget callback to the host.
#[derive(Debug, Clone)]
pub struct HostCallback {
    pub name: String,
    pub payload: Value,
}

/// Where outbound callbacks go. `Standalone` (no host attached) downgrades
/// every send to a diagnostic log; local development depends on that mode.
#[derive(Resource, Default)]
pub enum CallbackSink {
    Host(Sender<HostCallback>),
    #[default]
    Standalone,
}

impl CallbackSink {
    /// Fire and forget. No return value, no retry; a dead host link is a
    /// logged diagnostic, never an error.
    pub fn send(&self, name: &str, payload: Value) {
        match self {
            CallbackSink::Host(tx) => {
                let call = HostCallback {
                    name: name.to_string(),
                    payload,
                };
                if tx.send(call).is_err() {
                    debug!("host link closed, dropped callback '{name}'");
                }
            }
            CallbackSink::Standalone => {
                info!("[callback] {name}: {payload}");
            }
        }
    }
}

/// Drain the host channel in arrival order and apply each message to the
/// store within the same invocation. One writer, one message at a time; a
/// renderer never observes a half-applied update.
pub fn pump_host_messages(link: Option<Res<HostLink>>, mut store: ResMut<OverlayStore>) {
    let Some(link) = link else { return };

    while let Ok(raw) = link.rx.try_recv() {
        match serde_json::from_value::<HostAction>(raw) {
            Ok(HostAction::Unrecognized) => {
                debug!("ignoring unrecognized host action");
            }
            Ok(action) => store.apply(action),
            Err(err) => {
                debug!("dropping undecodable host message: {err}");
            }
        }
    }
}

pub struct BridgePlugin;

impl Plugin for BridgePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CallbackSink>()
            .add_systems(Update, pump_host_messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(v: Value) -> HostAction {
        serde_json::from_value(v).expect("decode")
    }

    #[test]
    fn decodes_all_recognized_actions() {
        assert!(matches!(
            decode(json!({"action": "setVisible", "visible": true})),
            HostAction::SetVisible { visible: true }
        ));
        assert!(matches!(
            decode(json!({"action": "setScreen", "screen": "hud"})),
            HostAction::SetScreen {
                screen: Some(ScreenRequest::Hud),
                victory: false
            }
        ));
        assert!(matches!(
            decode(json!({"action": "playerDied"})),
            HostAction::PlayerDied
        ));
        assert!(matches!(
            decode(json!({"action": "updateTimer", "time": 299})),
            HostAction::UpdateTimer { .. }
        ));
    }

    #[test]
    fn unknown_action_is_unrecognized_not_an_error() {
        assert!(matches!(
            decode(json!({"action": "openInventory", "slot": 3})),
            HostAction::Unrecognized
        ));
    }

    #[test]
    fn clock_value_accepts_seconds_and_mm_ss() {
        assert_eq!(ClockValue::Seconds(299).as_seconds(), Some(299));
        assert_eq!(ClockValue::Text("04:59".into()).as_seconds(), Some(299));
        assert_eq!(ClockValue::Text("299".into()).as_seconds(), Some(299));
        assert_eq!(ClockValue::Seconds(-5).as_seconds(), Some(0));
        assert_eq!(ClockValue::Text("junk".into()).as_seconds(), None);
    }

    #[test]
    fn kill_payload_defaults_omitted_fields() {
        let HostAction::AddKill { kill } = decode(json!({
            "action": "addKill",
            "kill": {"killer": "Shadow_X", "victim": "Oficial_Rex"}
        })) else {
            panic!("wrong variant");
        };
        assert_eq!(kill.killer, "Shadow_X");
        assert!(!kill.is_team_kill);
        assert!(kill.timestamp.is_none());
    }

    #[test]
    fn squad_payload_accepts_numeric_and_string_ids() {
        let HostAction::UpdateSquad { squad } = decode(json!({
            "action": "updateSquad",
            "squad": [
                {"id": 7, "name": "Caveira", "health": 80},
                {"id": "p2", "name": "Thunder", "health": 0, "isDead": true}
            ]
        })) else {
            panic!("wrong variant");
        };
        assert_eq!(squad[0].clone().id.unwrap().into_string(), "7");
        assert_eq!(squad[1].clone().id.unwrap().into_string(), "p2");
        assert_eq!(squad[0].armor, 0);
        assert!(squad[1].is_dead);
    }

    #[test]
    fn set_screen_without_screen_field_decodes_to_none() {
        assert!(matches!(
            decode(json!({"action": "setScreen"})),
            HostAction::SetScreen { screen: None, .. }
        ));
    }
}
