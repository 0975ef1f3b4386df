//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical update per host frame, per-frame units
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - Host coupling through an event outbox, never callbacks

pub mod collision;
pub mod effects;
pub mod scene;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{actor_hits_boundary, actor_hits_obstacle, circles_overlap};
pub use scene::{SceneKind, SceneState, Weather};
pub use state::{
    Achievement, Actor, AmbientParticle, Collectible, Debuff, DebuffKind, GameState, GroundProp,
    Hazard, HazardKind, HudSnapshot, Obstacle, PowerUp, PowerUpKind, RunConfig, RunEvent, RunPhase,
    RunStats, TickInput, TickOutput,
};
pub use tick::tick;
