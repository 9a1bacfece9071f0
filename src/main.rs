// ============================================================================
// main.rs — bouncelab
// Entry point. Initializes logging, parses CLI flags, and starts either the
// windowed event loop or a headless batch run.
// ============================================================================

use bouncelab::app::{App, AppConfig};
use bouncelab::config::MIN_BALL_COUNT;
use bouncelab::headless::{run_headless, HeadlessConfig};
use winit::event_loop::EventLoop;

const USAGE: &str = "Usage: bouncelab [OPTIONS]\n\
    --headless <frames>   run without a window for <frames> ticks\n\
    --balls <n>           initial/target ball count (floor 1)\n\
    --seed <u64>          fix the RNG seed for reproducible spawns\n\
    --no-gravity          start with gravity disabled";

struct CliConfig {
    headless_frames: Option<u64>,
    ball_count: Option<usize>,
    seed: Option<u64>,
    gravity_enabled: bool,
}

fn main() {
    env_logger::init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            std::process::exit(2);
        }
    };

    if let Some(frames) = cli.headless_frames {
        let defaults = HeadlessConfig::default();
        let config = HeadlessConfig {
            frames,
            ball_count: cli.ball_count.unwrap_or(defaults.ball_count),
            gravity_enabled: cli.gravity_enabled,
            seed: cli.seed,
            ..defaults
        };
        if let Err(err) = run_headless(&config) {
            log::error!("Headless run failed: {err}");
            std::process::exit(1);
        }
        return;
    }

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App::new(AppConfig {
        ball_count: cli.ball_count.unwrap_or(MIN_BALL_COUNT),
        gravity_enabled: cli.gravity_enabled,
        seed: cli.seed,
        ..AppConfig::default()
    });
    event_loop.run_app(&mut app).unwrap();
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliConfig, String> {
    let mut cli = CliConfig {
        headless_frames: None,
        ball_count: None,
        seed: None,
        gravity_enabled: true,
    };

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--headless" => {
                let value = args.next().ok_or("--headless needs a frame count")?;
                cli.headless_frames = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid frame count: {value}"))?,
                );
            }
            "--balls" => {
                let value = args.next().ok_or("--balls needs a count")?;
                let count: usize = value
                    .parse()
                    .map_err(|_| format!("Invalid ball count: {value}"))?;
                cli.ball_count = Some(count.max(MIN_BALL_COUNT));
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                cli.seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid seed: {value}"))?,
                );
            }
            "--no-gravity" => cli.gravity_enabled = false,
            other => return Err(format!("Unknown option: {other}")),
        }
    }

    Ok(cli)
}
