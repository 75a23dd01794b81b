//! Courtboard CLI
//!
//! Validate animation documents, sample interpolated frames and run the
//! playback scheduler headless against a simulated clock.

use anyhow::{Context, Result, bail};
use cb_core::interpolate::locate_segment;
use cb_core::lint::has_errors;
use cb_core::{
    AnimationDocument, LintSeverity, Playback, PlaybackEnd, TickOutcome, default_formation, interpolate,
    lint_document,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "courtboard")]
#[command(about = "Courtboard - keyframe animations for coaching drills")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a document and report diagnostics
    Validate {
        /// Animation JSON file
        input: PathBuf,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the interpolated frame at a progress value
    Sample {
        input: PathBuf,

        /// Normalized progress in [0, 1]
        #[arg(short, long, default_value = "0.5")]
        progress: f64,
    },

    /// Play the animation against a simulated clock
    Play {
        input: PathBuf,

        /// Simulated frames per second
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Loop instead of stopping at the end (preview behaviour)
        #[arg(long = "loop")]
        looping: bool,

        /// Passes to run when looping
        #[arg(long, default_value = "2")]
        cycles: u32,
    },

    /// Print a blank document with the default formation
    New {
        /// Players in the starting formation
        #[arg(long, default_value = "6")]
        players: usize,

        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Validate { input, json } => validate(&input, json)?,
        Commands::Sample { input, progress } => sample(&input, progress)?,
        Commands::Play {
            input,
            fps,
            looping,
            cycles,
        } => play(&input, fps, looping, cycles)?,
        Commands::New { players, name } => {
            let doc = AnimationDocument::new(name, vec![default_formation(players)], cb_core::DEFAULT_SPEED);
            println!("{}", doc.to_json()?);
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<AnimationDocument> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    AnimationDocument::from_json(&text).with_context(|| format!("Invalid animation {}", path.display()))
}

fn validate(path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc: AnimationDocument = serde_json::from_str(&text).context("Not an animation document")?;
    let diags = lint_document(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&diags)?);
    } else {
        for d in &diags {
            let level = match d.severity {
                LintSeverity::Error => "error",
                LintSeverity::Warning => "warning",
                LintSeverity::Info => "info",
            };
            match d.frame {
                Some(frame) => println!("{level}[{}] keyframe {}: {}", d.rule, frame + 1, d.message),
                None => println!("{level}[{}]: {}", d.rule, d.message),
            }
        }
        println!(
            "{}: {} keyframe(s), {} diagnostic(s)",
            path.display(),
            doc.keyframes.len(),
            diags.len()
        );
    }

    if has_errors(&diags) {
        bail!("{} is not a valid animation", path.display());
    }
    Ok(())
}

fn sample(path: &Path, progress: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&progress) {
        bail!("progress must be within [0, 1], got {progress}");
    }
    let doc = load(path)?;
    let frame = interpolate(&doc.keyframes, progress)
        .context("Sampling needs at least two keyframes")?;
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

/// One simulated clock callback.
#[derive(Debug, Clone, PartialEq)]
struct PlayStep {
    time: f64,
    progress: f64,
    outcome: TickOutcome,
}

/// Drive a scheduler at `fps` until it finishes, or for `cycles` loops.
fn simulate(frame_count: usize, speed: f64, fps: f64, end: PlaybackEnd, cycles: u32) -> Result<Vec<PlayStep>> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("fps must be positive, got {fps}");
    }
    let mut playback = Playback::new(speed, end);
    if !playback.play(frame_count) {
        bail!("Playback needs at least two keyframes");
    }

    let interval = 1000.0 / fps;
    let mut steps = Vec::new();
    let mut loops = 0;
    let mut now = 0.0;
    while playback.is_armed() {
        let outcome = playback.tick(now, frame_count);
        steps.push(PlayStep {
            time: now,
            progress: playback.progress(),
            outcome,
        });
        if outcome == TickOutcome::Looped {
            loops += 1;
            if loops >= cycles {
                playback.stop();
            }
        }
        now += interval;
    }
    Ok(steps)
}

fn play(path: &Path, fps: f64, looping: bool, cycles: u32) -> Result<()> {
    let doc = load(path)?;
    let end = if looping { PlaybackEnd::Loop } else { PlaybackEnd::Stop };
    let frames = doc.keyframes.len();
    let steps = simulate(frames, doc.speed, fps, end, cycles.max(1))?;

    for step in &steps {
        match step.outcome {
            TickOutcome::Advanced(p) => {
                if let Some(seg) = locate_segment(frames, p) {
                    println!(
                        "{:>8.1}ms  progress {:.3}  keyframe {} -> {} ({:>3.0}%)",
                        step.time,
                        p,
                        seg.from + 1,
                        seg.to + 1,
                        seg.t * 100.0
                    );
                }
            }
            TickOutcome::Looped => println!("{:>8.1}ms  loop", step.time),
            TickOutcome::Finished => println!("{:>8.1}ms  finished", step.time),
            TickOutcome::Idle | TickOutcome::Cancelled => {}
        }
    }
    log::info!("{} tick(s) over {} keyframe(s)", steps.len(), frames);
    Ok(())
}
