//! Idle Tower headless runner
//!
//! Usage: `idle-tower [settings.json]`
//!
//! Runs the fixed-tick loop with the idle-mode player, logs a status line
//! now and then, and prints the final snapshot as JSON.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use idle_tower::autopilot::choose_action;
use idle_tower::consts::MAX_SUBSTEPS;
use idle_tower::sim::{GameState, build_snapshot, tick};
use idle_tower::{Ledger, Settings};

struct Runner {
    settings: Settings,
    state: GameState,
    ledger: Ledger,
    /// Simulation clock
    now_ms: u64,
    tick_ms: u64,
    last_summary_ms: u64,
}

impl Runner {
    fn new(settings: Settings) -> Self {
        let config = settings.sim_config();
        log::info!(
            "Starting: seed {}, {}x{} field, {} ticks/s",
            config.seed,
            config.width,
            config.height,
            settings.frame_rate
        );
        Self {
            tick_ms: settings.tick_ms(),
            ledger: Ledger::new(settings.starting_resources),
            state: GameState::new(config),
            settings,
            now_ms: 0,
            last_summary_ms: 0,
        }
    }

    fn finished(&self) -> bool {
        let limit = self.settings.run_seconds * 1000;
        self.state.is_over() || (limit > 0 && self.now_ms >= limit)
    }

    /// One fixed step: player, simulation, rewards
    fn step(&mut self) {
        self.now_ms += self.tick_ms;

        if self.settings.autopilot
            && let Some(action) = choose_action(&self.state, &self.ledger, self.now_ms)
        {
            // Refusals are logged by the ledger
            let _ = self.ledger.apply(&mut self.state, action, self.now_ms);
        }

        let report = tick(&mut self.state, self.now_ms);
        self.ledger.credit(&report);

        let every = self.settings.summary_every_seconds * 1000;
        if every > 0 && self.now_ms - self.last_summary_ms >= every {
            self.last_summary_ms = self.now_ms;
            self.summary();
        }
    }

    fn summary(&self) {
        let town = &self.state.town;
        log::info!(
            "t={}s level {} ({}/{} xp) | town {}/{} | units {} | drones {} | resources {} | defeated {}",
            self.now_ms / 1000,
            self.state.progression.level,
            self.state.progression.xp,
            self.state.progression.xp_to_next_level,
            town.health,
            town.max_health,
            self.state.entities.len(),
            self.state.drones.len(),
            self.ledger.resources,
            self.state.total_defeated
        );
    }

    /// Run flat out on the simulation clock
    fn run_virtual(&mut self) {
        while !self.finished() {
            self.step();
        }
    }

    /// Pace ticks against the wall clock
    fn run_realtime(&mut self) {
        let frame = Duration::from_millis(self.tick_ms);
        let mut last = Instant::now();
        let mut accumulator = Duration::ZERO;

        while !self.finished() {
            let now = Instant::now();
            // Clamp long stalls so we don't try to catch up forever
            accumulator += (now - last).min(frame * MAX_SUBSTEPS);
            last = now;

            let mut substeps = 0;
            while accumulator >= frame && substeps < MAX_SUBSTEPS && !self.finished() {
                self.step();
                accumulator -= frame;
                substeps += 1;
            }

            thread::sleep(frame.saturating_sub(last.elapsed()));
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let realtime = settings.realtime;
    let mut runner = Runner::new(settings);
    if realtime {
        runner.run_realtime();
    } else {
        runner.run_virtual();
    }

    runner.summary();
    if runner.state.is_over() {
        log::info!("Game over");
    }
    log::info!(
        "Earned {} and spent {} resources",
        runner.ledger.earned,
        runner.ledger.spent
    );

    match serde_json::to_string_pretty(&build_snapshot(&runner.state)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}
