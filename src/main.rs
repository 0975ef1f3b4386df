//! Headless demo driver
//!
//! Pilots a run with a simple autopilot and prints HUD snapshots as JSON
//! lines plus lifecycle events through the logger. Handy for eyeballing
//! balance and spawn pacing without a renderer.

use sky_dash::CharacterId;
use sky_dash::consts::*;
use sky_dash::sim::{GameState, RunConfig, RunEvent, RunPhase, TickInput, tick};

/// Two minutes of simulated play at one update per frame
const MAX_FRAMES: u32 = 60 * 120;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = RunConfig {
        character: CharacterId::Robin,
        starting_power_up: None,
        continue_allowance: 1,
        seed,
    };
    let mut state = GameState::new(&config);

    for _ in 0..MAX_FRAMES {
        let input = TickInput {
            flap: pilot_wants_flap(&state),
        };
        let out = tick(&mut state, &input);

        for event in &out.events {
            match event {
                RunEvent::ContinueRequested => {
                    log::info!("continue requested; demo host grants it");
                }
                other => log::info!("event: {:?}", other),
            }
        }

        // A real host would show an ad here; the demo just says yes
        if state.phase == RunPhase::AwaitingContinue {
            state.grant_continue();
        }

        if state.frame % 300 == 0
            && let Ok(json) = serde_json::to_string(&out.hud)
        {
            println!("{json}");
        }

        if state.phase == RunPhase::Over {
            break;
        }
    }

    println!(
        "final: score={} coins={} perfect={} difficulty={:.1} frames={}",
        state.stats.score,
        state.stats.coins,
        state.stats.perfect,
        state.stats.difficulty,
        state.frame
    );
}

/// Flap when sinking below the next gap's midpoint
fn pilot_wants_flap(state: &GameState) -> bool {
    let target = state
        .obstacles
        .iter()
        .filter(|o| o.x + o.width > ACTOR_X)
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        .map(|o| (o.gap_top + o.gap_bottom) * 0.5)
        .unwrap_or(VIEW_H * 0.45);
    state.actor.pos.y > target && state.actor.vel_y > 0.0
}
