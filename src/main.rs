//! Knickebein entry point
//!
//! Native: headless run that logs events and prints a summary.
//! Web: the browser front end drives `platform::BeamsSession`; nothing to do here.
//!
//! Usage: `knickebein [CONFIG.json] [--seconds N] [--realtime] [--jam DOT DASH]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use knickebein::SimConfig;
    use knickebein::sim::Simulation;

    env_logger::init();
    log::info!("Knickebein (native) starting...");

    let args = Args::parse();

    let config = SimConfig::load_or_default(args.config.as_deref());
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("invalid config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(&[dot, dash]) = args.jam.as_deref() {
        sim.set_interference_enabled(true);
        sim.set_interference(dot, dash);
    }

    let mut drops = 0;
    let mut respawns = 0;
    let mut count_events = |sim: &mut Simulation| {
        for event in sim.drain_events() {
            match event {
                knickebein::sim::SimEvent::LoadDropped { .. } => drops += 1,
                knickebein::sim::SimEvent::AircraftRespawned { .. } => respawns += 1,
                _ => {}
            }
        }
    };

    if args.realtime {
        let clock = knickebein::platform::WallClock::start();
        let frame = std::time::Duration::from_millis(16);
        loop {
            let elapsed = clock.elapsed_secs().min(args.seconds);
            sim.advance(elapsed);
            count_events(&mut sim);
            if elapsed >= args.seconds {
                break;
            }
            std::thread::sleep(frame);
        }
    } else {
        // Same catch-up path as a timer, one simulated second per call
        let mut elapsed = 0.0;
        while elapsed < args.seconds {
            elapsed = (elapsed + 1.0).min(args.seconds);
            sim.advance(elapsed);
            count_events(&mut sim);
        }
    }

    let snapshot = sim.snapshot();
    println!("simulated:         {:.2}s ({} steps)", snapshot.time_secs.unwrap_or(0.0), sim.state().ticks);
    println!("loads dropped:     {drops}");
    println!("aircraft replaced: {respawns}");
    println!(
        "aircraft:          ({:.2}, {:.2}) load {}",
        snapshot.aircraft.pos.x,
        snapshot.aircraft.pos.y,
        if snapshot.aircraft.load_dropped { "dropped" } else { "aboard" }
    );
    println!("projected targets: {:?}", snapshot.projected_targets);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

/// Command line options for the native run
#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug, PartialEq)]
#[command(about = "Headless Knickebein beam guidance run")]
struct Args {
    /// JSON config file; defaults are used when omitted or unreadable
    config: Option<std::path::PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 90.0, value_parser = parse_seconds)]
    seconds: f64,

    /// Pace the run against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Switch interference on with the given dot and dash amplitudes
    #[arg(long, num_args = 2, value_names = ["DOT", "DASH"])]
    jam: Option<Vec<f64>>,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value.parse().map_err(|e| format!("{value}: {e}"))?;
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(format!("must be a non-negative number, got {seconds}"))
    }
}
