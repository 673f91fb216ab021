//! Day/night, season and weather state machines plus the per-tick survival
//! stat update they drive.

use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{ClockConfig, SurvivalConfig, WeatherWeights};
use crate::player::Player;
use crate::terrain::Biome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Rain,
    Snow,
    Storm,
}

impl Weather {
    pub fn soaks(self) -> bool {
        matches!(self, Weather::Rain | Weather::Snow)
    }
}

pub fn roll_weather<R: Rng>(weights: &WeatherWeights, rng: &mut R) -> Weather {
    let entries = weights.entries();
    match WeightedIndex::new(entries.iter().map(|(_, w)| *w)) {
        Ok(dist) => entries[dist.sample(rng)].0,
        Err(err) => {
            warn!(%err, "unusable weather weights, falling back to clear");
            Weather::Clear
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    NightFell { day: u32 },
    DayBroke { day: u32 },
    SeasonChanged(Season),
    WeatherChanged(Weather),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub season: Season,
    pub weather: Weather,
    /// Seconds since dawn; night starts at `day_length`.
    pub time_of_day: f32,
    pub day_count: u32,
    pub season_timer: f32,
    pub weather_timer: f32,
    /// Seconds of uninterrupted night since the last enemy spawn.
    pub spawn_timer: f32,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            season: Season::Spring,
            weather: Weather::Clear,
            time_of_day: 0.0,
            day_count: 1,
            season_timer: 0.0,
            weather_timer: 0.0,
            spawn_timer: 0.0,
        }
    }
}

impl EnvironmentState {
    pub fn is_night(&self, clock: &ClockConfig) -> bool {
        self.time_of_day >= clock.day_length
    }

    /// Advances the day cycle and the independent season and weather timers.
    pub fn advance<R: Rng>(&mut self, dt: f32, clock: &ClockConfig, rng: &mut R) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        let cycle = clock.day_length + clock.night_length;

        let was_night = self.is_night(clock);
        self.time_of_day += dt;
        while self.time_of_day >= cycle {
            self.time_of_day -= cycle;
            self.day_count += 1;
            events.push(ClockEvent::DayBroke {
                day: self.day_count,
            });
        }
        let is_night = self.is_night(clock);
        if is_night && (!was_night || events.iter().any(|e| matches!(e, ClockEvent::DayBroke { .. }))) {
            events.push(ClockEvent::NightFell {
                day: self.day_count,
            });
        }

        self.season_timer += dt;
        while self.season_timer >= clock.season_period {
            self.season_timer -= clock.season_period;
            self.season = self.season.next();
            events.push(ClockEvent::SeasonChanged(self.season));
        }

        self.weather_timer += dt;
        while self.weather_timer >= clock.weather_period {
            self.weather_timer -= clock.weather_period;
            let weights = clock.weather_weights.get(self.season);
            let next = roll_weather(weights, rng);
            if next != self.weather {
                self.weather = next;
                events.push(ClockEvent::WeatherChanged(next));
            }
        }
        events
    }
}

/// Everything about the player's surroundings the survival update reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalInputs {
    pub season: Season,
    pub weather: Weather,
    pub biome: Biome,
    pub is_night: bool,
    pub has_light: bool,
}

pub fn target_temperature(inputs: &SurvivalInputs, config: &SurvivalConfig) -> f32 {
    let mut target = match inputs.season {
        Season::Winter => config.winter_base,
        Season::Summer => config.summer_base,
        Season::Spring | Season::Autumn => config.mild_base,
    };
    target += config.biome_offsets.get(inputs.biome);
    if inputs.is_night {
        target += config.night_offset;
    }
    if inputs.weather.soaks() {
        target += config.wet_weather_offset;
    }
    target
}

/// One survival step. Order is significant: warming, wetness and extremity
/// terms apply after the relaxation toward ambient.
pub fn update_survival(player: &mut Player, inputs: &SurvivalInputs, dt: f32, config: &SurvivalConfig) {
    // 1. hunger
    let temp = player.temperature.current;
    let mut hunger_rate = config.hunger_decay;
    if temp < config.comfort_min || temp > config.comfort_max {
        hunger_rate *= config.discomfort_hunger_multiplier;
    }
    player.hunger.add(-hunger_rate * dt);

    // 2. relax toward ambient
    if inputs.weather.soaks() {
        player.wetness = config.wetness_duration;
    }
    let target = target_temperature(inputs, config);
    let k = (config.relax_rate * dt).min(1.0);
    player.temperature.current += (target - player.temperature.current) * k;

    // 3. light
    if inputs.has_light {
        player.temperature.current += config.light_warmth * dt;
    }

    // 4. wetness
    if player.wetness > 0.0 {
        player.temperature.current -= config.wet_chill * dt;
        player.wetness = (player.wetness - dt).max(0.0);
    }

    // 5. extremes
    let temp = player.temperature.current;
    if temp < config.extreme_cold || temp > config.extreme_heat {
        player.health.current -= config.extreme_health_drain * dt;
        player.hunger.current -= config.extreme_hunger_drain * dt;
        player.sanity.current -= config.extreme_sanity_drain * dt;
    }

    // 6. sanity
    if inputs.is_night {
        let mut rate = config.sanity_night_decay;
        if !inputs.has_light {
            rate *= config.darkness_multiplier;
        }
        if inputs.weather == Weather::Storm {
            rate *= config.storm_multiplier;
        }
        player.sanity.current -= rate * dt;
    } else {
        let mut rate = config.sanity_day_regen;
        if inputs.weather == Weather::Clear {
            rate *= config.clear_multiplier;
        }
        player.sanity.current += rate * dt;
    }

    // 7. starvation and insanity
    if player.hunger.current <= 0.0 {
        player.health.current -= config.starvation_health_drain * dt;
    }
    if player.sanity.current <= config.insanity_threshold {
        player.health.current -= config.insanity_health_drain * dt;
    }

    // 8. clamp
    player.clamp_stats();
}
