#![deny(unsafe_code)]
//! CLI binary for the resonance particle simulator.
//!
//! Subcommands:
//! - `render [engine]`: run N steps, write a PNG and its seed file
//! - `frames [engine]`: write a numbered PNG every K steps
//! - `export [engine]`: run N steps, write a JSON snapshot
//! - `list`: print available engines and palettes

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use resonance_core::params::out_of_schema_range;
use resonance_core::{Engine, Palette, Schedule, Seed};
use resonance_engines::export::Snapshot;
use resonance_engines::raster::{RenderStyle, Viewport};
use resonance_engines::snapshot::{frame_path, write_png};
use resonance_engines::EngineKind;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::{debug, info, warn, Level};

const DEFAULT_PARTICLES: usize = 4000;

#[derive(Parser)]
#[command(name = "resonance", about = "Particle field simulator CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RunArgs {
    /// Engine name.
    #[arg(default_value = "galaxy")]
    engine: String,

    /// Number of particles.
    #[arg(short = 'n', long, default_value_t = DEFAULT_PARTICLES)]
    particles: usize,

    /// Number of simulation steps.
    #[arg(short, long, default_value_t = 200)]
    steps: usize,

    /// PRNG seed for the initial cloud.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Engine parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// JSON file with an array of parameter keyframes.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Replay a seed file instead of the options above.
    #[arg(long, conflicts_with_all = ["particles", "steps", "seed", "params", "schedule"])]
    from_seed: Option<PathBuf>,
}

#[derive(Args)]
struct ImageArgs {
    /// Image width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: usize,

    /// Image height in pixels.
    #[arg(short = 'H', long, default_value_t = 800)]
    height: usize,

    /// Palette for resonance coloring (winter, ocean, fire, neon, monochrome).
    #[arg(short, long, default_value = "winter")]
    palette: String,

    /// Half-size of each particle splat in pixels.
    #[arg(long, default_value_t = 0)]
    point_radius: usize,

    /// Half-width of the visible world square.
    #[arg(long, default_value_t = 6.0)]
    extent: f64,
}

impl ImageArgs {
    fn style(&self) -> Result<RenderStyle, CliError> {
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(CliError::Input(format!(
                "--extent must be positive, got {}",
                self.extent
            )));
        }
        Ok(RenderStyle {
            viewport: Viewport::square(self.extent),
            palette: Palette::from_name(&self.palette)?,
            point_radius: self.point_radius,
            ..RenderStyle::default()
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N steps and write a PNG snapshot plus its seed file.
    Render {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        image: ImageArgs,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Skip writing `<output>.seed.json`.
        #[arg(long)]
        no_seed_file: bool,
    },
    /// Write a numbered PNG sequence while the engine runs.
    Frames {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        image: ImageArgs,

        /// Output directory (created if missing).
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,

        /// Write a frame every K steps.
        #[arg(long, default_value_t = 1)]
        every: usize,
    },
    /// Run an engine for N steps and write a JSON snapshot.
    Export {
        #[command(flatten)]
        run: RunArgs,

        /// Output file path.
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,
    },
    /// List available engines and palettes.
    List,
}

/// Resolves the run description from a seed file or the individual options.
fn build_seed(run: &RunArgs) -> Result<Seed, CliError> {
    if let Some(path) = &run.from_seed {
        let seed = Seed::load(path)?;
        debug!(path = %path.display(), "loaded seed file");
        return Ok(seed);
    }

    let params: serde_json::Value = serde_json::from_str(&run.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    let schedule = match &run.schedule {
        Some(path) => Schedule::from_json(&std::fs::read_to_string(path)?)?,
        None => Schedule::default(),
    };

    let mut seed = Seed::new(&run.engine, run.particles, run.seed);
    seed.params = params;
    seed.steps = run.steps;
    seed.schedule = schedule;
    seed.validate()?;
    Ok(seed)
}

/// Logs parameters that fall outside the engine's documented ranges.
///
/// Such values are accepted unchanged; they only reshape the simulation.
fn warn_out_of_range(engine: &EngineKind, seed: &Seed) {
    let schema = engine.param_schema();
    let scheduled = seed.schedule.keyframes().iter().map(|k| k.to_params());
    for params in std::iter::once(seed.params.clone()).chain(scheduled) {
        let Some(map) = params.as_object() else {
            continue;
        };
        for (name, value) in map {
            if let Some(v) = value.as_f64() {
                if out_of_schema_range(&schema, name, v) {
                    warn!(param = %name, value = v, "outside documented range; accepted as-is");
                }
            }
        }
    }
}

/// Builds the engine for `seed` and runs it, calling `on_step` after each step.
fn simulate<F>(seed: &Seed, on_step: F) -> Result<EngineKind, CliError>
where
    F: FnMut(&EngineKind) -> Result<(), resonance_core::EngineError>,
{
    let mut engine = EngineKind::from_name(&seed.engine, seed.particles, seed.seed, &seed.params)?;
    warn_out_of_range(&engine, seed);

    let start = Instant::now();
    seed.schedule.run(&mut engine, seed.steps, on_step)?;
    debug!(
        steps = seed.steps,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation finished"
    );
    Ok(engine)
}

fn seed_path(output: &Path) -> PathBuf {
    output.with_extension("seed.json")
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            let palettes = Palette::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "engines": engines,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Render {
            run,
            image,
            output,
            no_seed_file,
        } => {
            let style = image.style()?;
            let seed = build_seed(&run)?;
            let engine = simulate(&seed, |_| Ok(()))?;

            write_png(&engine, &style, image.width, image.height, &output)?;
            info!(path = %output.display(), "wrote image");
            if !no_seed_file {
                let path = seed_path(&output);
                seed.save(&path)?;
                info!(path = %path.display(), "wrote seed file");
            }

            if cli.json {
                let info = serde_json::json!({
                    "engine": seed.engine,
                    "particles": seed.particles,
                    "steps": seed.steps,
                    "seed": seed.seed,
                    "mode": engine.mode_label(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({} particles, {} steps, seed {}) -> {}",
                    seed.engine,
                    seed.particles,
                    seed.steps,
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Frames {
            run,
            image,
            out_dir,
            every,
        } => {
            if every == 0 {
                return Err(CliError::Input("--every must be at least 1".into()));
            }
            let style = image.style()?;
            let seed = build_seed(&run)?;
            std::fs::create_dir_all(&out_dir)?;

            let mut written = 0usize;
            simulate(&seed, |engine| {
                let step = engine.step_count();
                if step % every != 0 {
                    return Ok(());
                }
                let path = frame_path(&out_dir, "frame", step / every);
                write_png(engine, &style, image.width, image.height, &path)?;
                debug!(step, path = %path.display(), "wrote frame");
                written += 1;
                Ok(())
            })?;
            seed.save(&out_dir.join("seed.json"))?;
            info!(frames = written, dir = %out_dir.display(), "wrote frame sequence");

            if cli.json {
                let info = serde_json::json!({
                    "engine": seed.engine,
                    "steps": seed.steps,
                    "frames": written,
                    "out_dir": out_dir.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "wrote {written} frames of {} ({} steps) -> {}",
                    seed.engine,
                    seed.steps,
                    out_dir.display()
                );
            }
        }
        Command::Export { run, output } => {
            let seed = build_seed(&run)?;
            let engine = simulate(&seed, |_| Ok(()))?;
            Snapshot::capture(&engine).write(&output)?;
            info!(path = %output.display(), "wrote snapshot");

            if cli.json {
                let info = serde_json::json!({
                    "engine": seed.engine,
                    "steps": seed.steps,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!("exported {} after {} steps -> {}", seed.engine, seed.steps, output.display());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("resonance").chain(args.iter().copied())).unwrap()
    }

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Command::Render { run, .. } | Command::Frames { run, .. } | Command::Export { run, .. } => run,
            Command::List => panic!("list has no run args"),
        }
    }

    #[test]
    fn render_defaults_describe_a_full_galaxy_run() {
        let run = run_args(parse(&["render"]));
        let seed = build_seed(&run).unwrap();
        assert_eq!(seed.engine, "galaxy");
        assert_eq!(seed.particles, DEFAULT_PARTICLES);
        assert_eq!(seed.steps, 200);
        assert!(seed.schedule.is_empty());
    }

    #[test]
    fn params_must_be_a_json_object() {
        let run = run_args(parse(&["export", "--params", "[1, 2]"]));
        assert_eq!(build_seed(&run).err().map(|e| e.exit_code()), Some(12));
        let run = run_args(parse(&["export", "--params", "{bad"]));
        assert_eq!(build_seed(&run).err().map(|e| e.exit_code()), Some(12));
    }

    #[test]
    fn zero_particles_is_an_engine_error() {
        let run = run_args(parse(&["render", "-n", "0"]));
        assert_eq!(build_seed(&run).err().map(|e| e.exit_code()), Some(10));
    }

    #[test]
    fn schedule_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        std::fs::write(&path, r#"[{"at": 5, "acoustic_strength": 0.8}]"#).unwrap();
        let run = run_args(parse(&["frames", "--schedule", path.to_str().unwrap()]));
        let seed = build_seed(&run).unwrap();
        assert_eq!(seed.schedule.keyframes().len(), 1);
    }

    #[test]
    fn seed_file_round_trips_through_build_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.seed.json");
        let mut original = Seed::new("galaxy", 64, 7);
        original.steps = 12;
        original.save(&path).unwrap();
        let run = run_args(parse(&["render", "--from-seed", path.to_str().unwrap()]));
        assert_eq!(build_seed(&run).unwrap(), original);
    }

    #[test]
    fn malformed_seed_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.seed.json");
        std::fs::write(&path, "{\"engine\": \"galaxy\",").unwrap();
        let run = run_args(parse(&["render", "--from-seed", path.to_str().unwrap()]));
        let err = build_seed(&run).unwrap_err();
        assert_eq!(err.exit_code(), 12, "got {err}");
    }

    #[test]
    fn missing_seed_file_is_io_error() {
        let run = run_args(parse(&["render", "--from-seed", "/definitely/not/here.json"]));
        assert_eq!(build_seed(&run).unwrap_err().exit_code(), 11);
    }

    #[test]
    fn from_seed_conflicts_with_inline_options() {
        let result = Cli::try_parse_from(["resonance", "render", "--from-seed", "a.json", "--steps", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn seed_path_sits_next_to_output() {
        assert_eq!(seed_path(Path::new("out/galaxy.png")), Path::new("out/galaxy.seed.json"));
    }

    #[test]
    fn simulate_replays_identically() {
        let mut seed = Seed::new("galaxy", 50, 3);
        seed.steps = 20;
        seed.params = serde_json::json!({"acoustic_strength": 0.5});
        let a = simulate(&seed, |_| Ok(())).unwrap();
        let b = simulate(&seed, |_| Ok(())).unwrap();
        assert!(a
            .positions()
            .iter()
            .zip(b.positions())
            .all(|(pa, pb)| pa.x.to_bits() == pb.x.to_bits() && pa.y.to_bits() == pb.y.to_bits()));
    }

    #[test]
    fn image_style_rejects_bad_extent_and_palette() {
        let cli = parse(&["render", "--extent", "0"]);
        let Command::Render { image, .. } = cli.command else {
            panic!("expected render");
        };
        assert!(image.style().is_err());

        let cli = parse(&["render", "--palette", "plaid"]);
        let Command::Render { image, .. } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(image.style().err().map(|e| e.exit_code()), Some(12));
    }
}
