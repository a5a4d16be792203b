use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use reroll_core::settings::{load_settings_from_env, read_settings_from_file};
use reroll_core::{
    Defs, Host, NewGameConfig, RerollController, RerollEvent, ThingKind, WorldSquare,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed string the first map is generated from
    #[arg(short, long, default_value = "bucolic")]
    seed: String,
    /// Seed for the reroll RNG (new seed strings, depletion picks, loading messages)
    #[arg(long, default_value_t = 7)]
    rng_seed: u64,
    #[arg(long, default_value_t = 60)]
    map_size: usize,
    /// Number of full map rerolls to perform
    #[arg(short, long, default_value_t = 1)]
    maps: u32,
    /// Number of geyser rerolls to perform after the map rerolls
    #[arg(short, long, default_value_t = 1)]
    geysers: u32,
    /// Reroll settings TOML; defaults to MAP_REROLL_SETTINGS_PATH or the built-in file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Skip the built-in settings entirely and run without any
    #[arg(long)]
    no_settings: bool,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StepReport {
    step: String,
    seed_string: String,
    budget: f64,
    deposits: usize,
    geysers: usize,
    fingerprint: u64,
}

#[derive(Serialize)]
struct RunReport {
    steps: Vec<StepReport>,
    events: Vec<RerollEvent>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let settings = match (&args.settings, args.no_settings) {
        (_, true) => None,
        (Some(path), false) => Some(
            read_settings_from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        ),
        (None, false) => Some(load_settings_from_env()),
    };

    let config = NewGameConfig {
        seed_string: args.seed.clone(),
        rng_seed: args.rng_seed,
        map_size: args.map_size,
        starting_square: WorldSquare { x: 24, z: 61 },
        ..NewGameConfig::default()
    };
    let mut host = Host::new_game(&config, Defs::new(settings));
    host.complete_loading().context("Failed to generate the starting map")?;

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut controller = RerollController::new();
    controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    controller.on_session_loaded(&mut host).context("Session load rejected")?;

    let mut steps = vec![describe("initial", &host, &controller)?];
    for index in 0..args.maps {
        controller.trigger_map_reroll(&mut host).context("Map reroll failed")?;
        host.complete_loading().context("Failed to generate the rerolled map")?;
        controller.on_session_loaded(&mut host).context("Rerolled session load rejected")?;
        steps.push(describe(&format!("map reroll {}", index + 1), &host, &controller)?);
    }
    for index in 0..args.geysers {
        controller.trigger_geyser_reroll(&mut host).context("Geyser reroll failed")?;
        steps.push(describe(&format!("geyser reroll {}", index + 1), &host, &controller)?);
    }

    let report = RunReport { steps, events: events.borrow().clone() };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for step in &report.steps {
            println!(
                "{:<16} seed={:<12} budget={:>6.2} deposits={:>4} geysers={:>2} map={:016x}",
                step.step, step.seed_string, step.budget, step.deposits, step.geysers,
                step.fingerprint
            );
        }
        println!("Events published: {}", report.events.len());
    }
    Ok(())
}

fn describe(step: &str, host: &Host, controller: &RerollController) -> Result<StepReport> {
    let Some(map) = host.session.map.as_ref() else {
        bail!("No active map after {step}");
    };
    Ok(StepReport {
        step: step.to_string(),
        seed_string: host.session.world.info.seed_string.clone(),
        budget: controller.remaining_budget(),
        deposits: map.deposits().len(),
        geysers: map.count_of_kind(ThingKind::SteamGeyser),
        fingerprint: map.fingerprint(),
    })
}
