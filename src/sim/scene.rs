//! Scene/weather transition engine
//!
//! On a fixed cadence the next scene in the cycle starts a time-boxed
//! cross-fade. Ground decorations for the destination are reseeded the
//! moment the fade begins (they appear under the blend); ambient weather
//! particles regenerate when the fade commits.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Achievement, AmbientParticle, GameState, GroundProp, RunEvent};
use crate::consts::*;

/// Environment configurations, visited cyclically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SceneKind {
    #[default]
    Meadow,
    Sunset,
    Night,
    Rainstorm,
    Snowdrift,
}

/// Weather carried by a scene; drives ambient particles and the
/// distinct-weather progress counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Rain,
    Snow,
}

impl SceneKind {
    pub const CYCLE: [SceneKind; 5] = [
        SceneKind::Meadow,
        SceneKind::Sunset,
        SceneKind::Night,
        SceneKind::Rainstorm,
        SceneKind::Snowdrift,
    ];

    pub fn next(self) -> SceneKind {
        let i = Self::CYCLE.iter().position(|&s| s == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    pub fn weather(self) -> Weather {
        match self {
            SceneKind::Rainstorm => Weather::Rain,
            SceneKind::Snowdrift => Weather::Snow,
            _ => Weather::Clear,
        }
    }

    fn ambient_count(self) -> usize {
        match self {
            SceneKind::Meadow | SceneKind::Sunset => 10,
            SceneKind::Night => 14,
            SceneKind::Rainstorm => 80,
            SceneKind::Snowdrift => 60,
        }
    }

    fn prop_count(self) -> usize {
        match self {
            SceneKind::Meadow => 12,
            SceneKind::Sunset => 10,
            SceneKind::Night => 8,
            SceneKind::Rainstorm => 6,
            SceneKind::Snowdrift => 9,
        }
    }
}

/// Cross-fade bookkeeping. `next` is non-`None` only while a fade runs;
/// on completion `current` becomes the destination and `next` clears.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneState {
    pub current: SceneKind,
    pub next: Option<SceneKind>,
    pub progress: u32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            current: SceneKind::Meadow,
            next: None,
            progress: 0,
        }
    }
}

impl SceneState {
    /// Blend factor for the renderer: 0 = current only, 1 = destination
    pub fn blend(&self) -> f32 {
        if self.next.is_none() {
            return 0.0;
        }
        (self.progress as f32 / SCENE_FADE_FRAMES as f32).clamp(0.0, 1.0)
    }
}

/// Advance the transition engine one frame
pub fn step_scene(state: &mut GameState, events: &mut Vec<RunEvent>) {
    match state.scene.next {
        None => {
            state.scene_timer = state.scene_timer.saturating_sub(1);
            if state.scene_timer == 0 {
                let dest = state.scene.current.next();
                state.scene.next = Some(dest);
                state.scene.progress = 0;
                // Destination decor shows through the blend right away
                reseed_props(state, dest);
                log::debug!("scene fade {:?} -> {:?}", state.scene.current, dest);
            }
        }
        Some(dest) => {
            state.scene.progress = (state.scene.progress + 1).min(SCENE_FADE_FRAMES);
            if state.scene.progress >= SCENE_FADE_FRAMES {
                state.scene.current = dest;
                state.scene.next = None;
                state.scene.progress = 0;
                state.scene_timer = SCENE_INTERVAL;
                reseed_ambient(state, dest);
                mark_weather_visited(state, dest.weather(), events);
            }
        }
    }
}

fn mark_weather_visited(state: &mut GameState, weather: Weather, events: &mut Vec<RunEvent>) {
    if state.seen_weather.contains(&weather) {
        return;
    }
    state.seen_weather.push(weather);
    state.stats.weather_visited += 1;
    events.push(RunEvent::AchievementProgress {
        achievement: Achievement::WeatherWatcher,
        total: state.stats.weather_visited,
    });
}

/// Replace the ground decoration set for `scene`
pub fn reseed_props(state: &mut GameState, scene: SceneKind) {
    state.props.clear();
    for _ in 0..scene.prop_count() {
        let x = state.rng.random_range(0.0..VIEW_W);
        let variant = state.rng.random_range(0..4u8);
        let scale = state.rng.random_range(0.7..1.3);
        state.props.push(GroundProp { x, variant, scale });
    }
}

/// Replace the ambient particle field to match `scene`'s weather
pub fn reseed_ambient(state: &mut GameState, scene: SceneKind) {
    state.ambient.clear();
    for _ in 0..scene.ambient_count() {
        let pos = Vec2::new(
            state.rng.random_range(0.0..VIEW_W),
            state.rng.random_range(0.0..GROUND_Y),
        );
        let (vel, size) = match scene.weather() {
            Weather::Rain => (
                Vec2::new(-1.5, state.rng.random_range(7.0..10.0)),
                2.0,
            ),
            Weather::Snow => (
                Vec2::new(
                    state.rng.random_range(-0.6..0.6),
                    state.rng.random_range(1.0..2.2),
                ),
                state.rng.random_range(2.0..3.5),
            ),
            Weather::Clear => (
                Vec2::new(
                    state.rng.random_range(-0.3..0.3),
                    state.rng.random_range(-0.15..0.15),
                ),
                state.rng.random_range(1.0..2.5),
            ),
        };
        state.ambient.push(AmbientParticle { pos, vel, size });
    }
}
