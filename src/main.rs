//! Night radar entry point
//!
//! The browser build is driven from `platform::web`. Natively this runs the
//! simulation headless under the autopilot and logs how the runs went.
//!
//! Usage: night-radar [seed] [seconds] [tuning.json]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use night_radar::Tuning;
    use night_radar::consts::{DEFAULT_SEED, FRAME_DT};
    use night_radar::sim::{GameMode, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let seconds = args
        .get(2)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(60.0);
    let tuning = match args.get(3) {
        Some(path) => match Tuning::load(path) {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Night radar (native) starting: seed={} seconds={}", seed, seconds);

    let mut state = GameState::with_tuning(seed, tuning);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut crashes = 0u32;
    let mut pulses_seen = 0usize;
    let mut last_mode = state.mode;
    for frame in 0..frames {
        tick(&mut state, &input, FRAME_DT);
        pulses_seen = pulses_seen.max(state.pulses.len());

        if state.mode != last_mode {
            if state.mode == GameMode::Crash {
                crashes += 1;
            }
            last_mode = state.mode;
        }
        if frame % 600 == 0 {
            log::info!(
                "t={:>5.1}s mode={:?} score={} lit={} pulses={} energy={:.0}%",
                frame as f32 * FRAME_DT,
                state.mode,
                state.score,
                state.points.lit_count(),
                state.pulses.len(),
                state.energy_ratio() * 100.0
            );
        }
    }

    let best = state.high_score.max(state.score);
    log::info!(
        "Done: {} frames, {} crashes, best score {}, peak live pulses {}",
        frames,
        crashes,
        best,
        pulses_seen
    );
    println!("seed={} crashes={} best={}", seed, crashes, best);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
