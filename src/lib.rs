pub mod autopilot;
pub mod building;
pub mod combat;
pub mod config;
pub mod crafting;
pub mod enemy;
pub mod engine;
pub mod environment;
pub mod error;
pub mod feedback;
pub mod game;
pub mod items;
pub mod objects;
pub mod placement;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod systems;
pub mod terrain;
pub mod world;

pub use config::{ConfigLoader, SimConfig};
pub use engine::{Engine, EngineBuilder, SimEvent, TickInput, TickReport};
pub use error::{ActionError, ConfigError};
pub use game::Game;
pub use world::World;
