use anyhow::{Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use reroll_core::settings::builtin_settings;
use reroll_core::{Defs, Host, NewGameConfig, RerollController, RerollPhase, RerollTrigger};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    ops: u32,
}

#[derive(Clone, Copy, Debug)]
enum Op {
    TriggerMap,
    CompleteLoad,
    TriggerGeysers,
    AddSquatter,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    println!("Starting reroll fuzz on seed {} for {} operations...", args.seed, args.ops);
    let config = NewGameConfig { rng_seed: args.seed, map_size: 48, ..NewGameConfig::default() };
    let square = config.starting_square;
    let mut host = Host::new_game(&config, Defs::new(Some(builtin_settings())));
    host.complete_loading()?;
    let mut controller = RerollController::new();
    controller.on_session_loaded(&mut host)?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut last_budget = controller.remaining_budget();
    let mut completed = 0;

    // Loads are doubled so pending rerolls usually complete.
    let ops =
        [Op::TriggerMap, Op::CompleteLoad, Op::CompleteLoad, Op::TriggerGeysers, Op::AddSquatter];
    for step in 0..args.ops {
        let op = choose(&mut rng, &ops);
        match op {
            Op::TriggerMap => {
                let was_pending = controller.phase() == RerollPhase::RerollPending;
                let trigger = controller.trigger_map_reroll(&mut host)?;
                assert_eq!(
                    was_pending,
                    trigger == RerollTrigger::AlreadyPending,
                    "Invariant failed: pending flag and trigger result disagree"
                );
                let foreign = host
                    .session
                    .world
                    .factions
                    .iter()
                    .filter(|f| f.square == Some(square) && !f.is_player)
                    .count();
                if trigger == RerollTrigger::Started && foreign > 0 {
                    bail!("Invariant failed at op {step}: {foreign} foreign factions survived");
                }
            }
            Op::CompleteLoad if controller.phase() == RerollPhase::RerollPending => {
                host.complete_loading()?;
                controller.on_session_loaded(&mut host)?;
                completed += 1;
            }
            Op::TriggerGeysers if host.session.map.is_some() => {
                controller.trigger_geyser_reroll(&mut host)?;
            }
            Op::AddSquatter => {
                host.session.world.factions.add("Squatters", false, Some(square));
            }
            _ => {}
        }

        let budget = controller.remaining_budget();
        assert!(budget <= last_budget, "Invariant failed: budget rose {last_budget} -> {budget}");
        assert!((0.0..=100.0).contains(&budget), "Invariant failed: budget {budget} out of range");
        last_budget = budget;
        assert!(host.long_events.len() <= 1, "Invariant failed: more than one reroll queued");
        assert!(
            controller.phase() == RerollPhase::RerollPending || host.session.map.is_some(),
            "Invariant failed: idle session without a map"
        );
    }

    println!(
        "Fuzzing completed: {} rerolls committed, budget {:.2}, generation {}.",
        completed, last_budget, host.session.generation
    );
    Ok(())
}
