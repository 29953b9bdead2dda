//! Scroll Runner entry point
//!
//! Headless shell: loads tuning and the player texture, then drives the
//! simulation from a fixed frame clock with the autopilot at the controls,
//! printing a text frame every few seconds and a JSON summary at the end.

#[cfg(not(target_arch = "wasm32"))]
mod shell {
    use std::path::PathBuf;

    use serde::Serialize;

    use scroll_runner::consts::*;
    use scroll_runner::render::render;
    use scroll_runner::sim::{GameEvent, GameState, TickInput, tick};
    use scroll_runner::{FsTextureLoader, TextCanvas, TextureLoader, Tuning};

    const USAGE: &str = "usage: scroll-runner [--tuning PATH] [--texture PATH] [--seconds N] [--seed N] [--print-every SECS]";

    /// Host frame rate the shell pretends to run at
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug)]
    pub struct CliArgs {
        pub tuning: Option<PathBuf>,
        pub texture: Option<PathBuf>,
        pub seconds: f32,
        pub seed: Option<u64>,
        pub print_every: f32,
    }

    impl Default for CliArgs {
        fn default() -> Self {
            Self {
                tuning: None,
                texture: None,
                seconds: 60.0,
                seed: None,
                print_every: 5.0,
            }
        }
    }

    pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
        let mut out = CliArgs::default();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| format!("{} needs a value", name))
            };
            match arg.as_str() {
                "--tuning" => out.tuning = Some(PathBuf::from(value("--tuning")?)),
                "--texture" => out.texture = Some(PathBuf::from(value("--texture")?)),
                "--seconds" => {
                    out.seconds = value("--seconds")?
                        .parse::<f32>()
                        .map_err(|e| format!("--seconds: {}", e))?
                }
                "--seed" => {
                    out.seed = Some(
                        value("--seed")?
                            .parse::<u64>()
                            .map_err(|e| format!("--seed: {}", e))?,
                    )
                }
                "--print-every" => {
                    out.print_every = value("--print-every")?
                        .parse::<f32>()
                        .map_err(|e| format!("--print-every: {}", e))?
                }
                "-h" | "--help" => return Err(USAGE.to_string()),
                other => return Err(format!("unknown argument: {}\n{}", other, USAGE)),
            }
        }
        Ok(out)
    }

    /// End-of-run report
    #[derive(Debug, Default, Serialize)]
    struct RunSummary {
        seed: u64,
        seconds: f32,
        ticks: u64,
        score: u64,
        kills: u32,
        hits: u32,
        power_ups: u32,
        spawned: u32,
        escalation_level: u32,
        spawn_rate: f32,
        speed_multiplier: f32,
        live_blocks: usize,
        live_enemies: usize,
        live_bullets: usize,
        live_enemy_bullets: usize,
    }

    /// Fixed-timestep driver around the simulation
    struct Shell {
        state: GameState,
        accumulator: f32,
        input: TickInput,
        power_ups: u32,
        spawned: u32,
    }

    impl Shell {
        fn new(state: GameState) -> Self {
            Self {
                state,
                accumulator: 0.0,
                input: TickInput {
                    autopilot: true,
                    ..Default::default()
                },
                power_ups: 0,
                spawned: 0,
            }
        }

        /// Run simulation ticks for one host frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = false;
                self.input.pause = false;

                self.observe_events();
            }
        }

        fn observe_events(&mut self) {
            for event in self.state.events() {
                match event {
                    GameEvent::Spawned { .. } => self.spawned += 1,
                    GameEvent::PowerUpCollected { .. } => self.power_ups += 1,
                    GameEvent::PlayerHit { hazard, id } => {
                        log::info!(
                            "t={:.2}s player hit by {:?} #{}",
                            self.state.elapsed,
                            hazard,
                            id
                        );
                    }
                    GameEvent::Escalated {
                        level,
                        spawn_rate,
                        speed_multiplier,
                    } => {
                        log::info!(
                            "level {} -> spawn rate {:.2}/s, speed x{:.2}",
                            level,
                            spawn_rate,
                            speed_multiplier
                        );
                    }
                    _ => {}
                }
            }
        }

        fn summary(&self, seconds: f32) -> RunSummary {
            let state = &self.state;
            RunSummary {
                seed: state.seed,
                seconds,
                ticks: state.time_ticks,
                score: state.score,
                kills: state.kills,
                hits: state.hits,
                power_ups: self.power_ups,
                spawned: self.spawned,
                escalation_level: state.escalation_level,
                spawn_rate: state.spawn_rate(),
                speed_multiplier: state.speed_multiplier(),
                live_blocks: state.blocks().len(),
                live_enemies: state.enemies().len(),
                live_bullets: state.bullets().len(),
                live_enemy_bullets: state.enemy_bullets().len(),
            }
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    }

    pub fn run(args: CliArgs) {
        let tuning = match &args.tuning {
            Some(path) => match Tuning::load(path) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::error!("Bad tuning file {}: {}; using defaults", path.display(), e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };

        let seed = args.seed.unwrap_or_else(clock_seed);
        let mut state = GameState::with_tuning(seed, tuning);

        if let Some(path) = &args.texture {
            match FsTextureLoader::new().load(path) {
                Ok(texture) => state.set_player_texture(texture),
                Err(e) => log::warn!("Player texture unavailable ({}); using default hitbox", e),
            }
        }

        let mut shell = Shell::new(state);
        let mut canvas = TextCanvas::new(80, 22);
        let frames = (args.seconds.max(0.0) / FRAME_DT).round() as u64;
        let print_every = (args.print_every.max(FRAME_DT) / FRAME_DT).round().max(1.0) as u64;

        for frame in 1..=frames {
            shell.update(FRAME_DT);

            if frame % print_every == 0 {
                render(&shell.state, &mut canvas);
                println!(
                    "t={:.1}s score={} hits={} level={}",
                    shell.state.elapsed,
                    shell.state.score,
                    shell.state.hits,
                    shell.state.escalation_level
                );
                println!("{}", canvas);
            }
        }

        let summary = shell.summary(args.seconds);
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Scroll Runner (headless) starting...");

    match shell::parse_args(std::env::args().skip(1)) {
        Ok(args) => shell::run(args),
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library; a web host drives `tick` itself
}
