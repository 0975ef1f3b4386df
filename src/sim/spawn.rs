//! Procedural spawning under the difficulty curve
//!
//! All cadences and geometry derive from the run's difficulty scalar.
//! Degenerate geometry never errors: it falls back to a centered default
//! gap, and every computed value is clamped to its valid band.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::collectible_blocked;
use super::state::{Collectible, GameState, Hazard, HazardKind, Obstacle};
use crate::consts::*;

/// Raise the difficulty scalar on its fixed cadence. Monotonic, capped.
pub fn step_difficulty(state: &mut GameState) {
    if state.frame > 0 && state.frame % DIFFICULTY_INTERVAL as u64 == 0 {
        state.stats.difficulty =
            (state.stats.difficulty + DIFFICULTY_STEP).min(DIFFICULTY_MAX);
    }
}

/// Frames between obstacle spawns at the given difficulty, clamped to the
/// configured band. The slow power-up widens the spacing.
pub fn obstacle_interval(difficulty: f32, slow_active: bool) -> u32 {
    let base = OBSTACLE_BASE_INTERVAL as f32 - (difficulty - 1.0) * OBSTACLE_INTERVAL_SCALE;
    let clamped = base.clamp(OBSTACLE_MIN_INTERVAL as f32, OBSTACLE_BASE_INTERVAL as f32);
    let spaced = if slow_active {
        clamped * SLOW_SPACING_FACTOR
    } else {
        clamped
    };
    spaced.round() as u32
}

/// Gap height at the given difficulty, shrinking linearly to a floor
pub fn gap_height(difficulty: f32) -> f32 {
    (GAP_BASE - (difficulty - 1.0) * GAP_SHRINK_PER_DIFFICULTY).max(GAP_MIN)
}

/// Pick gap bounds for a gap of height `gap`. Randomized within the
/// margin-respecting band; if that band is degenerate, a centered
/// default-size gap is substituted instead.
pub fn place_gap(gap: f32, rng: &mut Pcg32) -> (f32, f32) {
    let lo = GAP_MARGIN + gap * 0.5;
    let hi = GROUND_Y - GAP_MARGIN - gap * 0.5;
    if hi > lo {
        let center = rng.random_range(lo..hi);
        (center - gap * 0.5, center + gap * 0.5)
    } else {
        let center = GROUND_Y * 0.5;
        (center - GAP_BASE * 0.5, center + GAP_BASE * 0.5)
    }
}

/// Spawn one obstacle just past the right edge
pub fn spawn_obstacle(state: &mut GameState) {
    let gap = gap_height(state.stats.difficulty);
    let (gap_top, gap_bottom) = place_gap(gap, &mut state.rng);
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        x: VIEW_W + OBSTACLE_WIDTH,
        width: OBSTACLE_WIDTH,
        gap_top,
        gap_bottom,
        scored: false,
    });
}

/// Maybe place a coin. A candidate overlapping any obstacle's solid
/// region is discarded outright; the rejection test runs before the coin
/// ever enters the store.
pub fn try_spawn_collectible(state: &mut GameState) {
    if !state.rng.random_bool(COIN_CHANCE) {
        return;
    }
    let y = state
        .rng
        .random_range(GAP_MARGIN..GROUND_Y - GAP_MARGIN);
    let pos = Vec2::new(VIEW_W + COIN_RADIUS, y);
    let blocked = state
        .obstacles
        .iter()
        .any(|o| collectible_blocked(pos, COIN_RADIUS, o));
    if blocked {
        return;
    }
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        pos,
        radius: COIN_RADIUS,
        taken: false,
    });
}

/// Frames between hazard spawns, shrinking with difficulty to a floor
pub fn hazard_interval(difficulty: f32) -> u32 {
    let base = HAZARD_BASE_INTERVAL as f32 - (difficulty - 1.0) * HAZARD_INTERVAL_SCALE;
    base.max(HAZARD_MIN_INTERVAL as f32).round() as u32
}

/// Spawn a hazard drawn uniformly from the subtypes whose difficulty
/// threshold is already met.
pub fn spawn_hazard(state: &mut GameState) {
    let difficulty = state.stats.difficulty;
    let pool: Vec<HazardKind> = HazardKind::ALL
        .iter()
        .copied()
        .filter(|k| k.difficulty_threshold() <= difficulty)
        .collect();
    if pool.is_empty() {
        return;
    }
    let kind = pool[state.rng.random_range(0..pool.len())];
    let y = state.rng.random_range(GAP_MARGIN..GROUND_Y * 0.6);
    let wobble_phase = state.rng.random_range(0.0..std::f32::consts::TAU);
    let id = state.next_entity_id();
    state.hazards.push(Hazard {
        id,
        kind,
        pos: Vec2::new(VIEW_W + kind.size(), y),
        vel: Vec2::new(-kind.drift(), 0.0),
        size: kind.size(),
        alive: true,
        wobble_phase,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CharacterId;
    use crate::sim::state::RunConfig;
    use rand::SeedableRng;

    fn new_state(seed: u64) -> GameState {
        GameState::new(&RunConfig {
            character: CharacterId::Robin,
            starting_power_up: None,
            continue_allowance: 0,
            seed,
        })
    }

    #[test]
    fn test_difficulty_monotonic_and_capped() {
        let mut state = new_state(1);
        let mut last = state.stats.difficulty;
        for frame in 1..=40_000u64 {
            state.frame = frame;
            step_difficulty(&mut state);
            assert!(state.stats.difficulty >= last);
            assert!(state.stats.difficulty <= DIFFICULTY_MAX);
            last = state.stats.difficulty;
        }
        assert_eq!(state.stats.difficulty, DIFFICULTY_MAX);
    }

    #[test]
    fn test_obstacle_interval_band() {
        assert_eq!(obstacle_interval(1.0, false), OBSTACLE_BASE_INTERVAL);
        let tightest = obstacle_interval(DIFFICULTY_MAX, false);
        assert!(tightest >= OBSTACLE_MIN_INTERVAL);
        assert!(tightest < OBSTACLE_BASE_INTERVAL);
        // Absurd difficulty still clamps to the band
        assert!(obstacle_interval(100.0, false) >= OBSTACLE_MIN_INTERVAL);
    }

    #[test]
    fn test_slow_widens_spacing() {
        let normal = obstacle_interval(3.0, false);
        let slowed = obstacle_interval(3.0, true);
        assert!(slowed > normal);
    }

    #[test]
    fn test_gap_height_floor() {
        assert_eq!(gap_height(1.0), GAP_BASE);
        assert_eq!(gap_height(100.0), GAP_MIN);
        assert!(gap_height(DIFFICULTY_MAX) >= GAP_MIN);
    }

    #[test]
    fn test_degenerate_gap_falls_back_centered() {
        let mut rng = Pcg32::seed_from_u64(9);
        // A gap taller than the playfield leaves no room to randomize
        let (top, bottom) = place_gap(GROUND_Y * 2.0, &mut rng);
        assert_eq!(bottom - top, GAP_BASE);
        assert_eq!((top + bottom) * 0.5, GROUND_Y * 0.5);
    }

    #[test]
    fn test_collectible_rejection_before_insert() {
        let mut state = new_state(5);
        // Wall off the whole spawn column so every candidate is rejected
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            x: VIEW_W - OBSTACLE_WIDTH,
            width: OBSTACLE_WIDTH * 4.0,
            gap_top: 1.0,
            gap_bottom: 2.0,
            scored: false,
        });
        for _ in 0..50 {
            try_spawn_collectible(&mut state);
        }
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_hazard_pool_respects_thresholds() {
        let mut state = new_state(11);
        state.stats.difficulty = 1.0;
        for _ in 0..30 {
            spawn_hazard(&mut state);
        }
        assert!(
            state
                .hazards
                .iter()
                .all(|h| h.kind.difficulty_threshold() <= 1.0)
        );

        state.hazards.clear();
        state.stats.difficulty = DIFFICULTY_MAX;
        for _ in 0..200 {
            spawn_hazard(&mut state);
        }
        // At the cap every subtype is eligible and a long draw hits each
        for kind in HazardKind::ALL {
            assert!(state.hazards.iter().any(|h| h.kind == kind));
        }
    }
}
