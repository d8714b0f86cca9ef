//! Colony sim headless driver
//!
//! Runs the simulation with a fixed-step accumulator and logs a summary.
//! Usage: `colony-sim [config.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
use colony_sim::SimConfig;
#[cfg(not(target_arch = "wasm32"))]
use colony_sim::consts::{MAX_SUBSTEPS, SIM_DT};
#[cfg(not(target_arch = "wasm32"))]
use colony_sim::sim::{EntityKind, Simulation, TickInput};

/// Wall-clock frame length fed to the accumulator
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 30.0;

/// Fixed-step driver: converts variable frame times into whole sim ticks
#[cfg(not(target_arch = "wasm32"))]
struct Driver {
    sim: Simulation,
    accumulator: f32,
    input: TickInput,
}

#[cfg(not(target_arch = "wasm32"))]
impl Driver {
    fn new(sim: Simulation) -> Self {
        Self {
            sim,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Run as many sim ticks as `dt` covers, capped at `MAX_SUBSTEPS`
    fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.sim.tick(&self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.scroll = 0.0;
        }
        substeps
    }

    fn log_summary(&self) {
        let state = &self.sim.state;
        let count = |kind: EntityKind| state.entities().iter().filter(|e| e.kind == kind).count();
        let orders = state.map.iter().filter(|(_, t)| !t.order.is_none()).count();
        log::info!(
            "tick {}: {} workers, {} guards, {} pests, {} open orders, {} particles",
            state.time_ticks,
            count(EntityKind::Worker),
            count(EntityKind::Guard),
            count(EntityKind::Pest),
            orders,
            state.particles().len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Colony sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        Some(Ok(s)) if s > 0.0 => s,
        Some(_) => {
            log::error!("Duration must be a positive number of seconds");
            std::process::exit(1);
        }
        None => 10.0,
    };

    let sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    let mut driver = Driver::new(sim);
    driver.log_summary();

    let frames = (seconds / FRAME_DT).ceil() as u32;
    for frame in 1..=frames {
        driver.update(FRAME_DT);
        if frame % 30 == 0 {
            driver.log_summary();
        }
    }
    driver.log_summary();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds drive `Simulation` from the host page; nothing to run here
}
