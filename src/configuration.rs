use serde::{Deserialize, Serialize};

/// FLAK-specific setup-time configuration. These scale factors drive rating,
/// compensation, and initial positioning; they are distinct from the
/// per-player/per-weapon values reached through [`crate::environment::Environment`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub rating_beam_scale: i32,
    pub rating_torp_scale: i32,
    pub rating_bay_scale: i32,
    pub rating_mass_scale: i32,
    pub rating_pe_bonus: i32,
    pub rating_full_attack_bonus: i32,
    pub rating_random_bonus: i32,

    pub starting_distance_ship: i32,
    pub starting_distance_planet: i32,
    pub starting_distance_per_player: i32,
    pub starting_distance_per_fleet: i32,

    pub compensation_ship_scale: i32,
    pub compensation_beam_scale: i32,
    pub compensation_torp_scale: i32,
    pub compensation_fighter_scale: i32,
    pub compensation_limit: i32,
    pub compensation_mass100_kt_scale: i32,
    pub compensation_adjust: i32,

    pub cyborg_debris_rate: i32,
    pub maximum_fleet_size: i32,
    pub send_util_data: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        // ex initConfiguration
        Self {
            rating_beam_scale: 1,
            rating_torp_scale: 1,
            rating_bay_scale: 1,
            rating_mass_scale: 1,
            rating_pe_bonus: 0,
            rating_full_attack_bonus: 0,
            rating_random_bonus: 0,

            starting_distance_ship: 26000,
            starting_distance_planet: 15000,
            starting_distance_per_player: 2500,
            starting_distance_per_fleet: 2000,

            compensation_ship_scale: 0,
            compensation_beam_scale: 0,
            compensation_torp_scale: 0,
            compensation_fighter_scale: 0,
            compensation_limit: 0,
            compensation_mass100_kt_scale: 0,
            compensation_adjust: 0,

            cyborg_debris_rate: 0,
            maximum_fleet_size: 999,
            send_util_data: false,
        }
    }
}
