mod algorithm;
mod battle;
mod configuration;
mod definitions;
mod environment;
mod error;
mod event_recorder;
mod fleet;
mod null_visualizer;
mod player;
mod position;
mod rng;
mod setup;
mod transient;
mod unit;
mod utils;
mod visualizer;

use std::sync::Once;

use log::info;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use algorithm::Algorithm;
pub use battle::{Battle, UnitOutcome};
pub use configuration::Configuration;
pub use environment::{ArrayOption, Environment, ExperienceOption, ScalarOption, StaticEnvironment};
pub use error::{FlakError, Result};
pub use event_recorder::{Event, EventRecorder};
pub use fleet::{FleetData, FleetIndex, FleetStatus};
pub use null_visualizer::NullVisualizer;
pub use player::{PlayerIndex, PlayerStatus};
pub use position::Position;
pub use rng::{CaptorRng, Lcg, ThreadCaptorRng};
pub use setup::Setup;
pub use transient::{ObjectKind, TransientObject, VisId};
pub use unit::{UnitConfig, UnitData, UnitIndex, UnitStatus};
pub use visualizer::{ShipInfo, Visualizer};

static INIT: Once = Once::new();

/// Installs the panic hook and the wasm-facing log backend. Idempotent; every
/// exported entry point calls this before doing anything else.
fn initialize() {
    INIT.call_once(|| {
        utils::set_panic_hook();
        wasm_logger::init(wasm_logger::Config::default());
        info!("Logger initialized");
    });
}

/// Wire request for [`run_battle`]: the setup to fight plus the rule
/// configuration and weapon tables it's fought under.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RunBattleRequest {
    pub setup: Setup,
    pub environment: StaticEnvironment,
}

/// Wire response for [`run_battle`]: every visualization event emitted while
/// playing the battle to completion, plus the final per-unit outcome.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RunBattleResponse {
    pub events: Vec<Event>,
    pub outcomes: Vec<UnitOutcome>,
}

/// Plays one battle to completion and returns its recorded events plus the
/// final outcome of every unit, as JSON. `request_val` must deserialize to a
/// [`RunBattleRequest`].
#[wasm_bindgen]
pub fn run_battle(request_val: JsValue) -> std::result::Result<JsValue, JsValue> {
    initialize();

    let request: RunBattleRequest = serde_wasm_bindgen::from_value(request_val).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let RunBattleRequest { setup, environment } = request;

    info!("Battle started: {} fleets, {} units", setup.num_fleets(), setup.num_ships());

    let mut algo = Algorithm::new(&setup, &environment);
    let mut recorder = EventRecorder::new();
    algo.init(&environment, &mut recorder);
    while algo.play_cycle(&environment, &mut recorder) {}

    let mut captor_rng = ThreadCaptorRng;
    let ending_status = algo.set_ending_status(&environment, &mut captor_rng);
    let outcomes = (0..algo.num_units())
        .map(|i| {
            let status = algo.unit_status(UnitIndex(i)).expect("index within num_units");
            UnitOutcome {
                shield: algorithm::round_half_up(status.shield),
                damage: algorithm::round_half_up(status.damage),
                crew: algorithm::round_half_up(status.crew),
                num_torpedoes: status.torpedoes,
                num_fighters: status.fighters_remaining,
                ending_status: ending_status[i],
            }
        })
        .collect();

    info!("Battle finished at tick {}", algo.get_time());

    let response = RunBattleResponse { events: recorder.events().to_vec(), outcomes };
    serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `run_battle`'s wire schema round-trips through plain `serde_json` too,
    /// not just the wasm `JsValue` boundary — useful for a host that wants to
    /// log or replay a battle outside the browser.
    #[test]
    fn unit_outcome_round_trips_through_serde_json() {
        let outcome = UnitOutcome {
            shield: 100,
            damage: 0,
            crew: 200,
            num_torpedoes: 5,
            num_fighters: 0,
            ending_status: 0,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"numTorpedoes\":5"));
        let back: UnitOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
