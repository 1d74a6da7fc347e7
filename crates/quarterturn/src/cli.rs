use std::io::Read;
use std::path::PathBuf;

use eyre::{Context, Result, eyre};
use itertools::Itertools;
use quarterturn_core::parse_moves;
use quarterturn_prefs::Preferences;
use quarterturn_view::{Duration, Pipeline};
use serde::Serialize;

use crate::replay::{self, GestureScript};

/// Drives a 3x3x3 twisty puzzle without a window.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    /// YAML file with preferences to layer over the defaults.
    #[arg(long, global = true)]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Subcommand {
    /// Animate a sequence of moves and print the result as JSON.
    Moves {
        /// Moves in standard notation (such as `R U R' U'`).
        notation: Vec<String>,
        /// Frames per second to animate at.
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
    },
    /// Replay a YAML gesture script and print the resulting events as JSON.
    Gesture {
        /// Gesture script, use '-' for stdin.
        #[arg(value_parser)]
        script: clio::Input,
    },
    /// Print the effective preferences as YAML.
    Prefs,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct MovesReport {
    committed: Vec<String>,
    frames: usize,
    solved: bool,
}

pub(crate) fn exec(args: Args) -> Result<()> {
    let prefs = Preferences::load(args.prefs.as_deref());

    match args.subcommand {
        Subcommand::Moves { notation, fps } => {
            let report = run_moves(prefs, &notation.join(" "), fps)?;
            write_json_output(&report)
        }

        Subcommand::Gesture { mut script } => {
            let mut buffer = String::new();
            script
                .read_to_string(&mut buffer)
                .context("error reading gesture script")?;
            let script: GestureScript =
                serde_norway::from_str(&buffer).context("error parsing gesture script")?;
            let report = replay::run(prefs, &script)?;
            write_json_output(&report)
        }

        Subcommand::Prefs => {
            let yaml = prefs
                .to_yaml_string()
                .context("error serializing preferences")?;
            print!("{yaml}");
            Ok(())
        }
    }
}

/// Highest frame rate accepted by `moves`. Much higher rates make frames so
/// short that they round to zero and animations never finish.
const MAX_FPS: f32 = 1000.0;

/// Animates each move to completion before starting the next.
fn run_moves(prefs: Preferences, notation: &str, fps: f32) -> Result<MovesReport> {
    if !(fps > 0.0 && fps <= MAX_FPS) {
        return Err(eyre!("frame rate must be above 0 and at most {MAX_FPS}"));
    }
    let frame = Duration::from_secs_f32(1.0 / fps);
    let moves = parse_moves(notation).context("error parsing moves")?;

    let mut pipeline = Pipeline::new(prefs);
    let mut frames = 0;
    for m in moves {
        pipeline
            .do_move(m)
            .wrap_err_with(|| format!("error starting {m}"))?;
        while pipeline.is_animating() {
            pipeline.step(frame);
            frames += 1;
        }
    }
    log::info!(
        "animated {} in {frames} frames",
        pipeline.history().iter().join(" "),
    );

    Ok(MovesReport {
        committed: pipeline.history().iter().map(|m| m.to_string()).collect(),
        frames,
        solved: pipeline.cube().is_solved(),
    })
}

fn write_json_output<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("error serializing data and writing to stdout")?;
    println!();
    Ok(())
}
