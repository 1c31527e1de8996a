//! Headless driver that runs scripted input against an in-memory world and
//! logs every protocol action and event the interaction engine produces.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p tactile-sim -- --log-level debug` to see dig and
//! placement internals.

mod world;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glam::{DVec3, IVec3};
use tactile_config::{CliArgs, Config};
use tactile_interaction::{InteractionController, InteractionError, InteractionSettings};
use tactile_world::{EntityId, EntitySnapshot, GameMode, ItemStack, PlayerView};
use tracing::{error, info};

use world::{SimWorld, build_catalog};

const TICK: Duration = Duration::from_millis(50);

/// Runs `ticks` game ticks, completing any dig whose break time has elapsed.
fn run_ticks(
    ctl: &mut InteractionController,
    world: &mut SimWorld,
    ticks: u32,
) -> Result<(), InteractionError> {
    for _ in 0..ticks {
        world.advance(TICK);
        if let Some(session) = ctl.dig_session().copied()
            && world.now_elapsed(session.started_at) >= session.dig_time
            && let Some(block) = world.remove(session.position)
        {
            ctl.on_dig_completed(&*world, &block);
        }
        ctl.tick(world)?;
        flush(ctl);
    }
    Ok(())
}

fn flush(ctl: &mut InteractionController) {
    for action in ctl.drain_actions() {
        info!(?action, "send");
    }
    for event in ctl.drain_events() {
        tracing::debug!(?event, "event");
    }
}

fn demonstrate_digging(
    settings: &InteractionSettings,
    world: &mut SimWorld,
) -> Result<(), InteractionError> {
    info!("--- digging a column ---");
    world.place(IVec3::new(0, 1, -2), "stone");
    world.place(IVec3::new(0, 1, -3), "dirt");

    let mut ctl = InteractionController::new(settings.clone());
    ctl.attack_start(world)?;
    flush(&mut ctl);
    run_ticks(&mut ctl, world, 40)?;
    ctl.attack_end(world)?;
    flush(&mut ctl);
    info!(status = %ctl.dig_status(), broken = ctl.broken_blocks().count(), "digging finished");
    Ok(())
}

fn demonstrate_placement(
    settings: &InteractionSettings,
    world: &mut SimWorld,
) -> Result<(), InteractionError> {
    info!("--- placing slabs ---");
    world.place(IVec3::new(0, 1, -2), "stone");
    world.player.held_item = Some(ItemStack::new("oak_slab"));
    world.player.pitch = -0.3;

    let mut ctl = InteractionController::new(settings.clone());
    ctl.use_start(world)?;
    flush(&mut ctl);
    run_ticks(&mut ctl, world, 8)?;
    ctl.use_end(world)?;
    flush(&mut ctl);

    let placed = world.block(IVec3::new(0, 1, -1)).map(|b| b.name.clone());
    info!(?placed, "placement finished");
    world.player.held_item = None;
    world.player.pitch = 0.0;
    world.clear_region(IVec3::new(-1, 0, -3), IVec3::new(1, 2, 1));
    Ok(())
}

fn demonstrate_combat(
    settings: &InteractionSettings,
    world: &mut SimWorld,
) -> Result<(), InteractionError> {
    info!("--- hitting a zombie ---");
    world.entities.push(EntitySnapshot {
        id: EntityId(7),
        name: Some("zombie".to_string()),
        position: DVec3::new(0.5, 0.0, -1.0),
        width: 0.6,
        height: 1.95,
        client_flags: 0,
    });

    let mut ctl = InteractionController::new(settings.clone());
    ctl.attack_click(world)?;
    ctl.use_click(world)?;
    flush(&mut ctl);
    world.entities.clear();
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| Config::default_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tactile_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let catalog = match build_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to build block catalog: {e}");
            std::process::exit(1);
        }
    };
    let player = PlayerView {
        id: EntityId(1),
        position: DVec3::new(0.5, 0.0, 0.5),
        yaw: 0.0,
        pitch: 0.0,
        on_ground: true,
        sneaking: false,
        game_mode: GameMode::Survival,
        held_item: None,
        offhand_item: None,
        quick_bar_slot: 0,
    };
    let mut world = SimWorld::new(player, catalog);
    for x in -2..=2 {
        for z in -4..=2 {
            world.place(IVec3::new(x, -1, z), "bedrock");
        }
    }

    let settings = InteractionSettings::from_config(&config);
    let result = demonstrate_digging(&settings, &mut world)
        .and_then(|()| demonstrate_placement(&settings, &mut world))
        .and_then(|()| demonstrate_combat(&settings, &mut world));

    if let Err(e) = result {
        error!("Simulation failed: {e}");
        std::process::exit(1);
    }
    info!("Simulation completed successfully");
}
