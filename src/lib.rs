//! Sky Dash - a side-scrolling arcade flyer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, run state)
//! - `characters`: Immutable character roster and ability flags
//!
//! Rendering, menus, audio and persistence live in the host. The simulation
//! exposes plain entity data plus a per-frame HUD snapshot and an event list
//! the host drains after each step.

pub mod characters;
pub mod sim;

pub use characters::{CharacterConfig, CharacterId, SpecialTrait};
pub use sim::{
    GameState, HudSnapshot, RunConfig, RunEvent, RunPhase, TickInput, TickOutput, tick,
};

/// Game configuration constants
pub mod consts {
    /// Logical view size (portrait). One update per host frame at ~60 Hz;
    /// all motion constants are in pixels per frame.
    pub const VIEW_W: f32 = 480.0;
    pub const VIEW_H: f32 = 720.0;
    /// Top of the ground band; the playfield ends here.
    pub const GROUND_Y: f32 = 640.0;

    /// Actor defaults
    pub const ACTOR_X: f32 = 132.0;
    pub const ACTOR_RADIUS: f32 = 16.0;
    pub const BASE_GRAVITY: f32 = 0.42;
    pub const BASE_FLAP: f32 = -7.2;
    pub const MAX_FALL_SPEED: f32 = 11.0;
    /// Respawn height used by revive and continue
    pub const SAFE_RESPAWN_Y: f32 = 288.0;

    /// World scroll
    pub const BASE_SCROLL: f32 = 2.6;
    pub const SCROLL_DIFFICULTY_GAIN: f32 = 0.12;

    /// Difficulty scalar band and ramp cadence
    pub const DIFFICULTY_START: f32 = 1.0;
    pub const DIFFICULTY_MAX: f32 = 6.0;
    pub const DIFFICULTY_STEP: f32 = 0.1;
    pub const DIFFICULTY_INTERVAL: u32 = 300;

    /// Obstacles (pipe pairs with a fly-through gap)
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    pub const OBSTACLE_BASE_INTERVAL: u32 = 110;
    pub const OBSTACLE_MIN_INTERVAL: u32 = 62;
    pub const OBSTACLE_INTERVAL_SCALE: f32 = 9.0;
    pub const GAP_BASE: f32 = 210.0;
    pub const GAP_SHRINK_PER_DIFFICULTY: f32 = 14.0;
    pub const GAP_MIN: f32 = 140.0;
    /// Margin kept clear above the gap band and above the ground
    pub const GAP_MARGIN: f32 = 48.0;
    /// Slow power-up widens obstacle spacing by this factor
    pub const SLOW_SPACING_FACTOR: f32 = 1.5;

    /// Collectibles
    pub const COIN_RADIUS: f32 = 11.0;
    pub const COIN_INTERVAL: u32 = 75;
    pub const COIN_CHANCE: f64 = 0.65;
    pub const COIN_VALUE: u32 = 1;
    pub const MAGNET_BONUS_RADIUS: f32 = 70.0;
    pub const MAGNET_PULL: f32 = 3.0;

    /// Hazards
    pub const HAZARD_BASE_INTERVAL: u32 = 420;
    pub const HAZARD_MIN_INTERVAL: u32 = 200;
    pub const HAZARD_INTERVAL_SCALE: f32 = 40.0;

    /// Power gauge
    pub const GAUGE_MAX: f32 = 100.0;
    pub const GAUGE_PER_COIN: f32 = 12.0;

    /// Combo decay window
    pub const COMBO_DECAY_FRAMES: u32 = 90;

    /// Power-up effect factors
    pub const SLOW_SCROLL_FACTOR: f32 = 0.6;
    pub const SPEED_SCROLL_FACTOR: f32 = 1.45;
    pub const SHRINK_RADIUS_FACTOR: f32 = 0.6;

    /// Phase trait window (obstacle collisions suppressed)
    pub const PHASE_WINDOW_FRAMES: u32 = 45;
    /// Grace window after a forgiven hit
    pub const HIT_GRACE_FRAMES: u32 = 45;
    /// Shield granted by revive and continue
    pub const REVIVE_SHIELD_FRAMES: u32 = 90;
    /// Continue allowance consumed per run, independent of the session pool
    pub const CONTINUES_PER_RUN: u8 = 1;

    /// Scene/weather cross-fade cadence and duration
    pub const SCENE_INTERVAL: u32 = 1800;
    pub const SCENE_FADE_FRAMES: u32 = 120;
}
