//! Run state and entity collections
//!
//! Everything the renderer needs to draw a frame is plain data here. The
//! engine instance exclusively owns one `GameState` per run; nothing is
//! shared across runs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects;
use super::scene::{self, SceneState, Weather};
use crate::characters::{CharacterConfig, CharacterId};
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    /// Suspended until the host reports the continue authorization result.
    /// There is no internal timeout; the run waits as long as it takes.
    AwaitingContinue,
    Over,
}

/// The player-controlled flyer. Exactly one per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel_y: f32,
    /// Base collision radius, already scaled by the character size
    pub radius: f32,
    /// Effective gravity, recomputed every frame
    pub gravity: f32,
    /// Effective flap impulse, recomputed every frame
    pub flap: f32,
}

impl Actor {
    pub fn new(character: &CharacterConfig) -> Self {
        Self {
            pos: Vec2::new(ACTOR_X, VIEW_H * 0.45),
            vel_y: 0.0,
            radius: ACTOR_RADIUS * character.size,
            gravity: BASE_GRAVITY * character.gravity,
            flap: BASE_FLAP * character.flap,
        }
    }
}

/// A pipe pair with a fly-through gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Flips exactly once, when the actor clears the trailing edge
    pub scored: bool,
}

/// A floating coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub taken: bool,
}

/// Hazard subtypes, unlocked as difficulty rises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Crow,
    Wasp,
    Thundercloud,
}

impl HazardKind {
    pub const ALL: [HazardKind; 3] = [
        HazardKind::Crow,
        HazardKind::Wasp,
        HazardKind::Thundercloud,
    ];

    /// Minimum difficulty before this subtype may spawn
    pub fn difficulty_threshold(self) -> f32 {
        match self {
            HazardKind::Crow => 1.0,
            HazardKind::Wasp => 2.2,
            HazardKind::Thundercloud => 3.8,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            HazardKind::Crow => 18.0,
            HazardKind::Wasp => 12.0,
            HazardKind::Thundercloud => 26.0,
        }
    }

    /// Extra leftward speed on top of the world scroll
    pub fn drift(self) -> f32 {
        match self {
            HazardKind::Crow => 1.6,
            HazardKind::Wasp => 1.1,
            HazardKind::Thundercloud => 0.7,
        }
    }

    pub fn wobble_rate(self) -> f32 {
        match self {
            HazardKind::Crow => 0.06,
            HazardKind::Wasp => 0.18,
            HazardKind::Thundercloud => 0.02,
        }
    }

    pub fn wobble_amp(self) -> f32 {
        match self {
            HazardKind::Crow => 1.4,
            HazardKind::Wasp => 2.2,
            HazardKind::Thundercloud => 0.6,
        }
    }

    /// Debuff applied on unmitigated contact: (kind, duration, magnitude)
    pub fn debuff(self) -> (DebuffKind, u32, f32) {
        match self {
            HazardKind::Crow => (DebuffKind::Leaden, 240, 1.6),
            HazardKind::Wasp => (DebuffKind::Sapped, 300, 0.55),
            HazardKind::Thundercloud => (DebuffKind::Leaden, 300, 1.9),
        }
    }
}

/// A moving hazard; contact applies its debuff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// One-shot contact flag; cleared when the hazard is consumed
    pub alive: bool,
    pub wobble_phase: f32,
}

/// Cosmetic weather particle (rain, snow, motes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// Ground decoration (grass tufts, rocks, drifts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundProp {
    pub x: f32,
    pub variant: u8,
    pub scale: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Slow,
    Speed,
    Shrink,
    Magnet,
    Shield,
}

impl PowerUpKind {
    /// Type-specific duration in frames
    pub fn duration(self) -> u32 {
        match self {
            PowerUpKind::Slow => 480,
            PowerUpKind::Speed => 420,
            PowerUpKind::Shrink => 540,
            PowerUpKind::Magnet => 600,
            PowerUpKind::Shield => 360,
        }
    }
}

/// Single-slot timed buff
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub frames_left: u32,
}

/// Debuff types: one drags the actor down, one weakens the flap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebuffKind {
    Leaden,
    Sapped,
}

/// Single-slot timed penalty applied by hazard contact
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Debuff {
    pub kind: DebuffKind,
    pub frames_left: u32,
    pub magnitude: f32,
    /// Pre-debuff values, restored verbatim on expiry
    pub saved_gravity: f32,
    pub saved_flap: f32,
}

/// Per-run scoring and one-shot bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u32,
    /// Currency collected this run
    pub coins: u32,
    pub gauge: f32,
    pub difficulty: f32,
    pub combo: u32,
    pub combo_timer: u32,
    /// Latched false on the first unmitigated hit, never reverts
    pub perfect: bool,
    pub free_hit_used: bool,
    pub revive_used: bool,
    pub negate_used: bool,
    pub continues_used: u8,
    pub continue_allowance: u8,
    /// Distinct weather types entered this run
    pub weather_visited: u32,
}

impl RunStats {
    fn new(continue_allowance: u8) -> Self {
        Self {
            score: 0,
            coins: 0,
            gauge: 0.0,
            difficulty: DIFFICULTY_START,
            combo: 0,
            combo_timer: 0,
            perfect: true,
            free_hit_used: false,
            revive_used: false,
            negate_used: false,
            continues_used: 0,
            continue_allowance,
            weather_visited: 0,
        }
    }
}

/// Named achievements reported through the event outbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Achievement {
    WeatherWatcher,
}

/// Lifecycle notifications, drained by the host after each update.
/// Each variant is emitted at most once per originating event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RunEvent {
    ObstaclePassed { score: u32 },
    CoinCollected { amount: u32, combo: u32 },
    AchievementProgress { achievement: Achievement, total: u32 },
    PowerUpActivated { kind: PowerUpKind },
    ContinueRequested,
    RunOver { score: u32, coins: u32, perfect: bool },
}

/// Host-facing HUD snapshot, emitted once per update
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub score: u32,
    pub gauge_pct: f32,
    pub power_up: Option<(PowerUpKind, u32)>,
    pub debuff: Option<(DebuffKind, u32)>,
    pub difficulty: f32,
    pub perfect: bool,
    /// Zero whenever the decay timer is not running
    pub combo: u32,
    pub phase: RunPhase,
}

/// Input for a single update. The host debounces to at most one flap
/// per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub flap: bool,
}

/// Result of one update step
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub hud: HudSnapshot,
    pub events: Vec<RunEvent>,
}

/// Supplied by the host at run reset
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub character: CharacterId,
    pub starting_power_up: Option<PowerUpKind>,
    /// Continues the player still has available this session
    pub continue_allowance: u8,
    pub seed: u64,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub frame: u64,
    pub phase: RunPhase,
    pub character: &'static CharacterConfig,
    pub actor: Actor,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub hazards: Vec<Hazard>,
    pub ambient: Vec<AmbientParticle>,
    pub props: Vec<GroundProp>,
    pub stats: RunStats,
    pub power_up: Option<PowerUp>,
    pub debuff: Option<Debuff>,
    pub scene: SceneState,
    /// Obstacle collisions are suppressed while this counts down
    pub phase_frames: u32,
    pub phase_cooldown: u32,
    /// Damage contacts are absorbed while this counts down
    pub grace_frames: u32,
    /// Cosmetic screen shake amplitude, decays every frame
    pub shake: f32,
    pub god_mode: bool,
    pub(crate) rng: Pcg32,
    pub(crate) obstacle_timer: u32,
    pub(crate) coin_timer: u32,
    pub(crate) hazard_timer: u32,
    pub(crate) scene_timer: u32,
    pub(crate) continue_notified: bool,
    pub(crate) seen_weather: Vec<Weather>,
    next_id: u32,
}

impl GameState {
    /// Create the state for a fresh run
    pub fn new(config: &RunConfig) -> Self {
        let character = config.character.config();
        let mut state = Self {
            seed: config.seed,
            frame: 0,
            phase: RunPhase::Running,
            character,
            actor: Actor::new(character),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            hazards: Vec::new(),
            ambient: Vec::new(),
            props: Vec::new(),
            stats: RunStats::new(config.continue_allowance),
            power_up: None,
            debuff: None,
            scene: SceneState::default(),
            phase_frames: 0,
            phase_cooldown: 0,
            grace_frames: 0,
            shake: 0.0,
            god_mode: false,
            rng: Pcg32::seed_from_u64(config.seed),
            obstacle_timer: OBSTACLE_BASE_INTERVAL,
            coin_timer: COIN_INTERVAL,
            hazard_timer: HAZARD_BASE_INTERVAL,
            scene_timer: SCENE_INTERVAL,
            continue_notified: false,
            seen_weather: Vec::new(),
            next_id: 1,
        };

        let opening = state.scene.current;
        scene::reseed_props(&mut state, opening);
        scene::reseed_ambient(&mut state, opening);

        // The starting scene counts as visited; no event for it, the host
        // already knows the run just began.
        state.seen_weather.push(opening.weather());
        state.stats.weather_visited = 1;

        if let Some(kind) = config.starting_power_up {
            state.power_up = Some(PowerUp {
                kind,
                frames_left: kind.duration(),
            });
        }

        log::info!(
            "run start: character={} seed={}",
            character.name,
            config.seed
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn power_active(&self, kind: PowerUpKind) -> bool {
        self.power_up.is_some_and(|p| p.kind == kind)
    }

    /// Actor collision radius after any shrink buff
    pub fn effective_radius(&self) -> f32 {
        let mut r = self.actor.radius;
        if self.power_active(PowerUpKind::Shrink) {
            r *= SHRINK_RADIUS_FACTOR;
        }
        r
    }

    /// True while damage contacts are absorbed outright
    pub fn invulnerable(&self) -> bool {
        self.god_mode || self.grace_frames > 0 || self.power_active(PowerUpKind::Shield)
    }

    /// World scroll speed this frame
    pub fn scroll_speed(&self) -> f32 {
        let difficulty = self.stats.difficulty.clamp(DIFFICULTY_START, DIFFICULTY_MAX);
        let mut v = BASE_SCROLL
            * (1.0 + (difficulty - 1.0) * SCROLL_DIFFICULTY_GAIN)
            * self.character.speed;
        if self.power_active(PowerUpKind::Slow) {
            v *= SLOW_SCROLL_FACTOR;
        }
        if self.power_active(PowerUpKind::Speed) {
            v *= SPEED_SCROLL_FACTOR;
        }
        v
    }

    /// Build the HUD snapshot for this frame
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.stats.score,
            gauge_pct: (self.stats.gauge / GAUGE_MAX * 100.0).clamp(0.0, 100.0),
            power_up: self.power_up.map(|p| (p.kind, p.frames_left)),
            debuff: self.debuff.map(|d| (d.kind, d.frames_left)),
            difficulty: self.stats.difficulty,
            perfect: self.stats.perfect,
            combo: if self.stats.combo_timer > 0 {
                self.stats.combo
            } else {
                0
            },
            phase: self.phase,
        }
    }

    /// Host entry point: the external continue authorization succeeded.
    /// No-op unless the run is actually waiting on it.
    pub fn grant_continue(&mut self) {
        if self.phase != RunPhase::AwaitingContinue {
            return;
        }
        self.actor.pos.y = SAFE_RESPAWN_Y;
        self.actor.vel_y = 0.0;
        effects::grant_shield(self, REVIVE_SHIELD_FRAMES);
        self.stats.continues_used += 1;
        self.phase = RunPhase::Running;
        log::info!("continue granted ({} used)", self.stats.continues_used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RunConfig {
        RunConfig {
            character: CharacterId::Robin,
            starting_power_up: None,
            continue_allowance: 1,
            seed: 7,
        }
    }

    #[test]
    fn test_new_run_is_clean() {
        let state = GameState::new(&test_config());
        assert_eq!(state.phase, RunPhase::Running);
        assert!(state.stats.perfect);
        assert_eq!(state.stats.score, 0);
        assert!(state.power_up.is_none());
        assert!(state.debuff.is_none());
        assert_eq!(state.stats.weather_visited, 1);
        assert!(!state.props.is_empty());
    }

    #[test]
    fn test_starting_power_up_applied() {
        let config = RunConfig {
            starting_power_up: Some(PowerUpKind::Magnet),
            ..test_config()
        };
        let state = GameState::new(&config);
        assert!(state.power_active(PowerUpKind::Magnet));
    }

    #[test]
    fn test_shrink_reduces_effective_radius() {
        let mut state = GameState::new(&test_config());
        let base = state.effective_radius();
        state.power_up = Some(PowerUp {
            kind: PowerUpKind::Shrink,
            frames_left: 10,
        });
        assert!(state.effective_radius() < base);
    }

    #[test]
    fn test_hud_combo_zero_without_timer() {
        let mut state = GameState::new(&test_config());
        state.stats.combo = 5;
        state.stats.combo_timer = 0;
        assert_eq!(state.hud().combo, 0);
        state.stats.combo_timer = 10;
        assert_eq!(state.hud().combo, 5);
    }

    #[test]
    fn test_grant_continue_requires_waiting_phase() {
        let mut state = GameState::new(&test_config());
        state.grant_continue();
        assert_eq!(state.stats.continues_used, 0);

        state.phase = RunPhase::AwaitingContinue;
        state.grant_continue();
        assert_eq!(state.stats.continues_used, 1);
        assert_eq!(state.phase, RunPhase::Running);
        assert!(state.power_active(PowerUpKind::Shield));
        assert_eq!(state.actor.pos.y, SAFE_RESPAWN_Y);
    }
}
