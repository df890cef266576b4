//! Slingshot headless driver
//!
//! Plays the game with the autoplay aimer and logs what happens. Useful for
//! checking balance changes in a tuning file without a renderer.
//!
//! Usage: `slingshot [--seed N] [--levels N] [--tuning path.json]`

#[cfg(not(target_arch = "wasm32"))]
use slingshot::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use slingshot::sim::{GameEvent, GamePhase, plan_shot};
#[cfg(not(target_arch = "wasm32"))]
use slingshot::{GameSession, Tuning};

/// Give up after this many shots so a hopeless tuning still terminates
#[cfg(not(target_arch = "wasm32"))]
const MAX_SHOTS: u32 = 200;
/// Upper bound on ticks spent resolving a single shot or level advance
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS_PER_SHOT: u32 = 10_000;

#[cfg(not(target_arch = "wasm32"))]
struct Options {
    seed: Option<u64>,
    levels: u32,
    tuning: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Options {
    let mut options = Options {
        seed: None,
        levels: 5,
        tuning: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => options.seed = args.next().and_then(|v| v.parse().ok()),
            "--levels" => {
                if let Some(levels) = args.next().and_then(|v| v.parse().ok()) {
                    options.levels = levels;
                }
            }
            "--tuning" => options.tuning = args.next(),
            other => log::warn!("Ignoring unknown argument `{}`", other),
        }
    }
    options
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let options = parse_args();

    let tuning = options
        .tuning
        .as_deref()
        .map(Tuning::load_or_default)
        .unwrap_or_default();
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut session = GameSession::with_tuning(seed, tuning);
    log::info!("Slingshot (headless) starting, seed {}", seed);

    let mut shots = 0;
    let mut cleared = 0;
    while cleared < options.levels && shots < MAX_SHOTS {
        let Some(plan) = plan_shot(session.state()) else {
            if !wait_for_aiming(&mut session) {
                log::warn!(
                    "Stuck in {:?} for {} ticks, stopping",
                    session.state().phase,
                    MAX_TICKS_PER_SHOT
                );
                break;
            }
            continue;
        };

        let anchor = session.state().tuning.anchor;
        if !session.on_aim_start(anchor) {
            log::warn!("Drag rejected at the anchor");
            break;
        }
        session.on_aim_move(plan.drag_to);
        session.on_aim_release();
        shots += 1;

        let mut ticks = 0;
        while session.state().phase == GamePhase::InFlight && ticks < MAX_TICKS_PER_SHOT {
            session.tick(SIM_DT);
            ticks += 1;
        }
        let unresolved = session.state().phase == GamePhase::InFlight;

        for event in session.drain_events() {
            match event {
                GameEvent::LevelCleared { .. } => cleared += 1,
                GameEvent::TargetHit { target_id, by_obstacle } => {
                    log::info!("Target {} down (obstacle: {:?})", target_id, by_obstacle)
                }
                other => log::debug!("{:?}", other),
            }
        }
        if unresolved {
            log::warn!(
                "Shot {} still in flight after {} ticks, stopping",
                shots,
                MAX_TICKS_PER_SHOT
            );
            break;
        }
    }

    let snapshot = session.snapshot();
    println!(
        "Cleared {} level(s) in {} shot(s); now on level {} with score {}",
        cleared, shots, snapshot.level, snapshot.score
    );
}

/// Tick through a pending level advance. False if there is none or aiming
/// never comes back.
#[cfg(not(target_arch = "wasm32"))]
fn wait_for_aiming(session: &mut GameSession) -> bool {
    let mut ticks = 0;
    while session.state().phase == GamePhase::LevelCleared && ticks < MAX_TICKS_PER_SHOT {
        session.tick(SIM_DT);
        ticks += 1;
    }
    ticks > 0 && session.state().phase == GamePhase::Aiming
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `GameSession` directly
}
