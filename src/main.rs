//! Space Defender headless runner
//!
//! Plays one autopilot encounter with no display or audio and logs the result.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;

    use space_defender::consts::FRAMES_PER_SECOND;
    use space_defender::platform::{
        FrameDriver, HeadlessScheduler, NullAudioSink, NullRenderTarget, ScriptedInput,
    };
    use space_defender::{Error, Result, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "space-defender")]
    #[command(about = "Play one deterministic autopilot encounter headlessly")]
    pub struct Args {
        /// RNG seed; the same seed and tuning replay the same encounter
        #[arg(default_value_t = 42)]
        pub seed: u64,
        /// JSON file with tuning overrides
        pub tuning: Option<PathBuf>,
        /// Stop after this many minutes of game time
        #[arg(long, default_value_t = 10)]
        pub max_minutes: u64,
        /// Always spawn this boss (e.g. "Chronos")
        #[arg(long)]
        pub boss: Option<String>,
        /// Always spawn this elite (e.g. "Phantom")
        #[arg(long)]
        pub elite: Option<String>,
    }

    fn load_tuning(args: &Args) -> Result<Tuning> {
        let mut tuning = match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| Error::TuningRead {
                    path: path.clone(),
                    source,
                })?;
                Tuning::from_json(&json)?
            }
            None => Tuning::default(),
        };
        if args.boss.is_some() {
            tuning.boss = args.boss.clone();
        }
        if args.elite.is_some() {
            tuning.elite = args.elite.clone();
        }
        Ok(tuning)
    }

    pub fn run(args: Args) -> Result<()> {
        log::info!("Seed {}", args.seed);
        let mut driver = FrameDriver::builder()
            .seed(args.seed)
            .tuning(load_tuning(&args)?)
            .autopilot(true)
            .render_target(Box::new(NullRenderTarget))
            .audio_sink(Box::new(NullAudioSink))
            .scheduler(Box::new(HeadlessScheduler::default()))
            .input(Box::new(ScriptedInput::default()))
            .build()?;

        let max_frames = args.max_minutes * 60 * FRAMES_PER_SECOND as u64;
        match driver.run_headless(max_frames) {
            Some(result) => log::info!(
                "{} | score {} | {:.1}s",
                if result.survived { "VICTORY" } else { "GAME OVER" },
                result.final_score,
                result.elapsed_secs()
            ),
            None => {
                let state = driver.state();
                log::info!(
                    "Time limit reached | score {} | hearts {}",
                    state.score,
                    state.player.hearts
                );
            }
        }
        driver.exit();
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let args = cli::Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Defender (headless) starting...");

    if let Err(e) = cli::run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page through `platform::FrameDriver`
}
