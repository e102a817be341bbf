//! Swarm Survivor headless host
//!
//! Drives the simulation at a fixed step without a window: the autopilot
//! plays, every frame is rendered into a recording canvas, and the run ends
//! with a summary in the log.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use swarm_survivor::Tuning;
    use swarm_survivor::consts::TICKS_PER_SECOND;
    use swarm_survivor::renderer::{CommandBuffer, SceneRenderer};
    use swarm_survivor::sim::{GameEvent, GameState, TickInput, tick};

    /// Headless runner for the survival shooter core
    #[derive(Debug, Parser)]
    #[command(name = "swarm-survivor", version, about)]
    pub struct Args {
        /// Seed for the simulation RNG
        #[arg(long, default_value_t = 0)]
        pub seed: u64,

        /// Number of fixed ticks to simulate
        #[arg(long, default_value_t = 3600)]
        pub ticks: u64,

        /// JSON tuning file overriding the default balance
        #[arg(long)]
        pub tuning: Option<PathBuf>,

        /// Write the last rendered frame as JSON draw commands
        #[arg(long)]
        pub dump_frame: Option<PathBuf>,

        /// Disable the autopilot and feed empty input every tick
        #[arg(long)]
        pub manual: bool,
    }

    /// Running totals gathered from drained events
    #[derive(Debug, Default)]
    struct RunStats {
        kills: u32,
        hits_taken: u32,
        deaths: u32,
    }

    impl RunStats {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::EnemyKilled { .. } => self.kills += 1,
                GameEvent::PlayerHit { .. } => self.hits_taken += 1,
                GameEvent::GameOver { score } => {
                    self.deaths += 1;
                    log::info!("Run ended with score {}", score);
                }
                GameEvent::SkillChosen { skill } => log::info!("Took skill: {}", skill.name()),
                other => log::debug!("{:?}", other),
            }
        }
    }

    pub fn run(args: Args) -> Result<()> {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let mut state = GameState::with_tuning(args.seed, tuning);
        let mut renderer = SceneRenderer::new(args.seed);
        let mut frame = CommandBuffer::new();
        let mut stats = RunStats::default();
        let input = TickInput {
            idle_mode: !args.manual,
            ..TickInput::default()
        };

        log::info!(
            "Simulating {} ticks (seed {}, {})",
            args.ticks,
            args.seed,
            if args.manual { "manual" } else { "autopilot" }
        );

        for _ in 0..args.ticks {
            tick(&mut state, &input);
            for event in state.drain_events() {
                stats.record(&event);
            }
            frame.reset();
            renderer.render(&state, input.pointer, &mut frame);
        }

        if let Some(path) = &args.dump_frame {
            let json = serde_json::to_string_pretty(&frame).context("serializing frame")?;
            std::fs::write(path, json)
                .with_context(|| format!("writing frame to {}", path.display()))?;
            log::info!("Wrote {} draw commands to {}", frame.len(), path.display());
        }

        let skills: Vec<&str> = state.skills_taken.iter().map(|s| s.name()).collect();
        log::info!(
            "Done: {} ticks ({:.1}s game time), phase {:?}",
            args.ticks,
            args.ticks as f64 / TICKS_PER_SECOND as f64,
            state.phase
        );
        log::info!(
            "Score {}, level {}, experience {}, skills [{}]",
            state.player.score,
            state.player.level,
            state.player.experience,
            skills.join(", ")
        );
        log::info!(
            "Kills {}, hits taken {}, deaths {}",
            stats.kills,
            stats.hits_taken,
            stats.deaths
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Swarm Survivor (headless) starting...");
    native::run(native::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the library directly
}
