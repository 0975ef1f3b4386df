//! Per-frame update step
//!
//! One logical update per host frame callback, in a fixed order:
//! modifiers -> physics -> spawners -> movement -> hit resolution ->
//! scoring -> HUD. The step never blocks and never panics; edge cases
//! clamp or fall back instead of failing.

use rand::Rng;

use super::collision::{actor_hits_boundary, actor_hits_obstacle, circles_overlap};
use super::effects::{
    activate_power_up, apply_debuff, grant_shield, resolve_modifiers, step_effects,
};
use super::scene::step_scene;
use super::spawn;
use super::state::{
    GameState, PowerUpKind, RunEvent, RunPhase, TickInput, TickOutput,
};
use crate::characters::SpecialTrait;
use crate::consts::*;

/// Advance the run by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutput {
    let mut events = Vec::new();

    match state.phase {
        RunPhase::Over => {
            return TickOutput {
                hud: state.hud(),
                events,
            };
        }
        RunPhase::AwaitingContinue => {
            // Logical suspension: the host keeps scheduling frames and
            // rendering its waiting overlay; nothing advances until the
            // external authorization callback. There is no timeout.
            return TickOutput {
                hud: state.hud(),
                events,
            };
        }
        RunPhase::Running => {}
    }

    state.frame += 1;

    state.shake *= 0.9;
    if state.shake < 0.01 {
        state.shake = 0.0;
    }

    // 1. Status-effect timers, then this frame's effective modifiers
    step_effects(state);
    resolve_modifiers(state);

    // 2. Physics
    integrate(state, input);

    // 3. Spawners and timers
    spawn::step_difficulty(state);
    run_spawners(state);
    step_scene(state, &mut events);

    // 4. Entity movement and culling
    advance_entities(state);

    // 5. Hit resolution (may suspend or end the run)
    resolve_hits(state, &mut events);

    // 6. Scoring and combo upkeep
    update_score(state, &mut events);

    TickOutput {
        hud: state.hud(),
        events,
    }
}

/// Apply the impulse and gravity, then move. Per-frame units: one update
/// per host callback, no delta-time scaling.
fn integrate(state: &mut GameState, input: &TickInput) {
    if input.flap {
        state.actor.vel_y = state.actor.flap;
    }
    state.actor.vel_y = (state.actor.vel_y + state.actor.gravity).min(MAX_FALL_SPEED);
    state.actor.pos.y += state.actor.vel_y * state.character.speed;

    if state.phase_frames > 0 {
        state.phase_frames -= 1;
    }
    if state.phase_cooldown > 0 {
        state.phase_cooldown -= 1;
    }
}

fn run_spawners(state: &mut GameState) {
    state.obstacle_timer = state.obstacle_timer.saturating_sub(1);
    if state.obstacle_timer == 0 {
        spawn::spawn_obstacle(state);
        state.obstacle_timer = spawn::obstacle_interval(
            state.stats.difficulty,
            state.power_active(PowerUpKind::Slow),
        );
    }

    state.coin_timer = state.coin_timer.saturating_sub(1);
    if state.coin_timer == 0 {
        spawn::try_spawn_collectible(state);
        state.coin_timer = COIN_INTERVAL;
    }

    state.hazard_timer = state.hazard_timer.saturating_sub(1);
    if state.hazard_timer == 0 {
        spawn::spawn_hazard(state);
        state.hazard_timer = spawn::hazard_interval(state.stats.difficulty);
    }
}

fn advance_entities(state: &mut GameState) {
    let scroll = state.scroll_speed();

    for o in &mut state.obstacles {
        o.x -= scroll;
    }
    state.obstacles.retain(|o| o.x + o.width > -OBSTACLE_WIDTH);

    let magnet = state.power_active(PowerUpKind::Magnet);
    let actor_pos = state.actor.pos;
    for c in &mut state.collectibles {
        c.pos.x -= scroll;
        if magnet {
            let to_actor = actor_pos - c.pos;
            let dist = to_actor.length();
            if dist > 1.0 && dist < MAGNET_BONUS_RADIUS * 2.0 {
                c.pos += to_actor / dist * MAGNET_PULL;
            }
        }
    }
    state
        .collectibles
        .retain(|c| !c.taken && c.pos.x + c.radius > 0.0);

    for h in &mut state.hazards {
        h.wobble_phase += h.kind.wobble_rate();
        h.vel.y = h.wobble_phase.sin() * h.kind.wobble_amp();
        h.pos.x += h.vel.x - scroll;
        h.pos.y += h.vel.y;
    }
    state
        .hazards
        .retain(|h| h.alive && h.pos.x + h.size > -OBSTACLE_WIDTH);

    // Ambient particles drift with a touch of parallax and wrap
    for p in &mut state.ambient {
        p.pos += p.vel;
        p.pos.x -= scroll * 0.4;
        if p.pos.y > GROUND_Y {
            p.pos.y -= GROUND_Y;
        }
        if p.pos.x < 0.0 {
            p.pos.x += VIEW_W;
        } else if p.pos.x > VIEW_W {
            p.pos.x -= VIEW_W;
        }
    }

    for prop in &mut state.props {
        prop.x -= scroll;
        if prop.x < -24.0 {
            prop.x += VIEW_W + 48.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImpactSource {
    Obstacle,
    Boundary,
}

fn resolve_hits(state: &mut GameState, events: &mut Vec<RunEvent>) {
    let radius = state.effective_radius();

    // Obstacle bodies. Suppressed entirely while a phase window runs.
    if state.phase_frames == 0 {
        let pos = state.actor.pos;
        let hit = state
            .obstacles
            .iter()
            .any(|o| actor_hits_obstacle(pos, radius, o));
        if hit && !try_phase(state) {
            impact(state, events, ImpactSource::Obstacle);
            if state.phase != RunPhase::Running {
                return;
            }
        }
    }

    // World boundaries reuse the same ladder, minus the phase attempt
    if actor_hits_boundary(state.actor.pos, radius) {
        impact(state, events, ImpactSource::Boundary);
        if state.phase != RunPhase::Running {
            return;
        }
    }

    hazard_contacts(state);
    collect_coins(state, events);
}

/// Branch 1 of the obstacle ladder: roll the phase trait. Every attempt
/// starts the per-character cooldown, success or not.
fn try_phase(state: &mut GameState) -> bool {
    let Some(SpecialTrait::PhaseChance { chance, cooldown }) = state.character.special else {
        return false;
    };
    if state.phase_frames > 0 || state.phase_cooldown > 0 {
        return false;
    }
    state.phase_cooldown = cooldown;
    if state.rng.random_bool(chance as f64) {
        state.phase_frames = PHASE_WINDOW_FRAMES;
        log::debug!("phase window opened");
        true
    } else {
        false
    }
}

/// Branches 2-6 of the hit ladder, in order; first match wins.
fn impact(state: &mut GameState, events: &mut Vec<RunEvent>, source: ImpactSource) {
    // 2. Invulnerable: absorb, cosmetic feedback only
    if state.invulnerable() {
        state.shake = (state.shake + 0.05).min(1.0);
        if source == ImpactSource::Boundary {
            clamp_to_bounds(state);
        }
        return;
    }

    // 3. One-time revive; only fires on hits after the free hit is gone
    if matches!(state.character.special, Some(SpecialTrait::Revive))
        && !state.stats.revive_used
        && state.stats.free_hit_used
    {
        state.stats.revive_used = true;
        state.stats.perfect = false;
        state.actor.pos.y = SAFE_RESPAWN_Y;
        state.actor.vel_y = 0.0;
        grant_shield(state, REVIVE_SHIELD_FRAMES);
        state.shake = (state.shake + 0.3).min(1.0);
        log::debug!("revive trait consumed");
        return;
    }

    // 4. First-hit forgiveness
    if !state.stats.free_hit_used {
        state.stats.free_hit_used = true;
        state.stats.perfect = false;
        state.grace_frames = HIT_GRACE_FRAMES;
        state.shake = (state.shake + 0.2).min(1.0);
        if source == ImpactSource::Boundary {
            clamp_to_bounds(state);
        }
        return;
    }

    // 5. Continue gate: suspend and ask the host, at most once per run
    if state.stats.continue_allowance > 0 && state.stats.continues_used < CONTINUES_PER_RUN {
        state.phase = RunPhase::AwaitingContinue;
        if !state.continue_notified {
            state.continue_notified = true;
            events.push(RunEvent::ContinueRequested);
        }
        return;
    }

    // 6. Terminal
    finish_run(state, events);
}

/// Keep the actor inside the playfield after a non-fatal boundary hit
fn clamp_to_bounds(state: &mut GameState) {
    let r = state.effective_radius();
    let max_y = GROUND_Y - r;
    if state.actor.pos.y < r {
        state.actor.pos.y = r;
        state.actor.vel_y = 0.0;
    } else if state.actor.pos.y > max_y {
        state.actor.pos.y = max_y;
        state.actor.vel_y = 0.0;
    }
}

fn hazard_contacts(state: &mut GameState) {
    let radius = state.effective_radius();
    let pos = state.actor.pos;
    let invulnerable = state.invulnerable();

    let mut contact: Option<usize> = None;
    for (i, h) in state.hazards.iter_mut().enumerate() {
        if !h.alive || !circles_overlap(pos, radius, h.pos, h.size) {
            continue;
        }
        if invulnerable {
            // Destroyed outright, no penalty
            h.alive = false;
            continue;
        }
        if contact.is_none() {
            contact = Some(i);
        }
    }
    let Some(i) = contact else {
        return;
    };

    // Singleton: while a debuff runs, further contacts neither consume the
    // hazard nor apply anything.
    if state.debuff.is_some() {
        return;
    }

    if matches!(state.character.special, Some(SpecialTrait::NegateDebuff))
        && !state.stats.negate_used
    {
        state.stats.negate_used = true;
        state.hazards[i].alive = false;
        log::debug!("debuff negated by trait");
        return;
    }

    let (kind, duration, magnitude) = state.hazards[i].kind.debuff();
    apply_debuff(state, kind, duration, magnitude);
    state.stats.perfect = false;
    state.hazards[i].alive = false;
    state.shake = (state.shake + 0.25).min(1.0);
}

fn collect_coins(state: &mut GameState, events: &mut Vec<RunEvent>) {
    let magnet = state.power_active(PowerUpKind::Magnet);
    let reach = state.effective_radius()
        + if magnet { MAGNET_BONUS_RADIUS } else { 0.0 };
    let pos = state.actor.pos;

    let mut picked = 0u32;
    for c in &mut state.collectibles {
        if !c.taken && circles_overlap(pos, reach, c.pos, c.radius) {
            c.taken = true;
            picked += 1;
        }
    }

    for _ in 0..picked {
        state.stats.coins += COIN_VALUE;
        state.stats.combo += 1;
        state.stats.combo_timer = COMBO_DECAY_FRAMES;
        events.push(RunEvent::CoinCollected {
            amount: COIN_VALUE,
            combo: state.stats.combo,
        });

        let gain = GAUGE_PER_COIN * state.character.gauge;
        state.stats.gauge = (state.stats.gauge + gain).clamp(0.0, GAUGE_MAX);
        if state.stats.gauge >= GAUGE_MAX {
            state.stats.gauge = 0.0;
            activate_power_up(state, state.character.signature, events);
        }
    }
}

fn update_score(state: &mut GameState, events: &mut Vec<RunEvent>) {
    let actor_x = state.actor.pos.x;
    for o in &mut state.obstacles {
        if !o.scored && o.x + o.width < actor_x {
            o.scored = true;
            state.stats.score += 1;
            events.push(RunEvent::ObstaclePassed {
                score: state.stats.score,
            });
        }
    }

    if state.stats.combo_timer > 0 {
        state.stats.combo_timer -= 1;
        if state.stats.combo_timer == 0 {
            state.stats.combo = 0;
        }
    }
}

fn finish_run(state: &mut GameState, events: &mut Vec<RunEvent>) {
    state.phase = RunPhase::Over;
    events.push(RunEvent::RunOver {
        score: state.stats.score,
        coins: state.stats.coins,
        perfect: state.stats.perfect,
    });
    log::info!(
        "run over: score={} coins={} perfect={}",
        state.stats.score,
        state.stats.coins,
        state.stats.perfect
    );
}
