//! TNT Miner headless entry point
//!
//! Runs a scripted session against the simulation core and logs a summary.
//! Usage: `tnt-miner [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tnt_miner::Settings;
    use tnt_miner::consts::*;
    use tnt_miner::renderer::build_frame;
    use tnt_miner::sim::{GameEvent, GameState, Recorder, tick};

    env_logger::init();
    log::info!("TNT Miner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring settings file {path}: {e}");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);

    let mut state = GameState::new(settings, seed);
    let mut sink = Recorder::default();

    // Fixed-step accumulator fed by a simulated 50 Hz display
    const FRAME_DT: f32 = 1.0 / 50.0;
    const SESSION_SECONDS: f32 = 60.0;
    let mut accumulator = 0.0;
    let mut frames = 0u32;
    let mut instances = 0usize;

    while state.elapsed() < SESSION_SECONDS {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = scripted_input(&state);
            tick(&mut state, &input, SIM_DT, &mut sink);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        let center = state.player.center();
        let half_view = glam::Vec2::new(400.0, 300.0);
        instances += build_frame(&state, center - half_view, center + half_view).len();
        frames += 1;
    }

    let detonations = sink.count(|e| matches!(e, GameEvent::HazardDetonated { .. }));
    let stats = &sink.stats;
    log::info!(
        "Session over after {:.1}s ({frames} frames, {:.0} sprites/frame)",
        state.elapsed(),
        instances as f32 / frames.max(1) as f32
    );
    log::info!(
        "Depth {} | mined {} ({} ore) | items {} | detonations {detonations} | hits {} | deaths {}",
        stats.deepest,
        stats.blocks_mined,
        stats.ores_mined,
        stats.items_collected,
        stats.damage_taken,
        stats.deaths
    );
}

/// Walk back and forth, hop now and then, and drop TNT every few seconds
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(state: &tnt_miner::sim::GameState) -> tnt_miner::sim::TickInput {
    let t = state.time_ticks;
    let second = t / 60;
    tnt_miner::sim::TickInput {
        move_x: if (second / 3) % 2 == 0 { 1 } else { -1 },
        jump: t % 150 == 0,
        jump_release: t % 150 == 12,
        drop_tnt: t % 240 == 120,
        mine_target: (t % 20 == 0).then(|| state.player.cell() + glam::IVec2::new(0, 2)),
        ..Default::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The crate is driven by an embedding frontend on the web
}
