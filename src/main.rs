//! Demo driving the pool manager through a few seconds of simulated frames
//!
//! Usage: `skelpool [pools.ron|pools.json] [skeletons.ron]`

use std::env;
use std::time::Duration;

use skelpool::animation::play_appear_then_loop;
use skelpool::prelude::*;

const DEFAULT_POOLS: &str = include_str!("../assets/pools.ron");
const DEFAULT_SKELETONS: &str = include_str!("../assets/skeletons.ron");

const FRAME: Duration = Duration::from_millis(16);

fn load_settings(path: Option<&str>) -> Result<PoolSettings, Box<dyn std::error::Error>> {
    let settings = match path {
        Some(path) if path.ends_with(".json") => PoolSettings::load_json(path)?,
        Some(path) => PoolSettings::load_ron(path)?,
        None => PoolSettings::from_ron_str(DEFAULT_POOLS)?,
    };
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let settings = load_settings(args.first().map(String::as_str))?;

    let mut factory = SkeletonFactory::new();
    let templates = match args.get(1) {
        Some(path) => factory.register_ron_file(path)?,
        None => factory.register_ron_str(DEFAULT_SKELETONS)?,
    };
    log::info!("Registered {} skeleton templates", templates);

    let hud = factory.spawn_node("HUD");
    let mut pools = PoolManager::create(factory, settings);

    // Combo text that intros once then idles until the combo breaks
    let combo = pools.spawn(OverlayEffect::ComboText, Placement::default().under(hud));
    if let Some(instance) = combo.and_then(|id| pools.get_mut(id)) {
        play_appear_then_loop(instance, "appear", "idle");
    }

    for frame in 0..180_u32 {
        if frame % 10 == 0 {
            let x = frame as f32 * 0.1;
            pools.spawn_auto_recycle(WorldEffect::HitEffect, Vec3::new(x, 0.0, 0.0), "explode", false);
        }
        if frame % 45 == 0 {
            pools.spawn_timed(
                OverlayEffect::ScorePopup,
                Placement::default().under(hud),
                Duration::from_millis(700),
            );
        }
        if frame == 60 {
            // Second one is refused: this pool does not expand
            pools.spawn_auto_recycle(WorldEffect::LevelComplete, Vec3::ZERO, "celebrate", false);
            pools.spawn_auto_recycle(WorldEffect::LevelComplete, Vec3::ZERO, "celebrate", false);
        }
        if frame == 120 {
            pools.recycle(combo);
        }

        pools.tick(FRAME);
        for event in pools.events_mut().drain() {
            if let PoolEvent::Fault(error) = event {
                log::info!("Frame {}: {}", frame, error);
            }
        }
    }

    pools.apply(AdminAction::LogStatistics);
    pools.apply(AdminAction::ResetAll);
    pools.apply(AdminAction::LogStatistics);

    let factory = pools.shutdown();
    log::info!(
        "Done: {} instances created, {} destroyed",
        factory.created(),
        factory.destroyed()
    );
    Ok(())
}
