//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod detect;
mod pose;
mod render;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::variant::GameVariant;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Render creature breed sprites in any pose
#[derive(Parser)]
#[command(name = "render-creatures")]
#[command(about = "Render creature breeds in any pose to PNG")]
#[command(version)]
pub struct Cli {
    /// Log pipeline steps to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log everything, including per-file detail
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a creature to one PNG per pose
    Render(RenderArgs),

    /// Resolve pose tokens and print their pose strings
    Pose {
        /// Pose tokens: pose strings, left/right/front/back, random[:qualifier] or eemfoo
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,

        /// Game the poses are for
        #[arg(long, default_value = "C3")]
        game: GameVariant,

        /// Mood applied to every pose (rand for a random mood)
        #[arg(short, long)]
        mood: Option<String>,

        /// Close the eyes in every pose
        #[arg(short, long)]
        closed: bool,

        /// Age used for eemfoo placeholders
        #[arg(short, long)]
        age: Option<i64>,

        /// Gender used for eemfoo placeholders
        #[arg(short, long, allow_hyphen_values = true)]
        gender: Option<String>,

        /// Seed for reproducible random poses
        #[arg(long)]
        seed: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect the game variant of breed sprite folders
    Detect {
        /// Folders, files or glob patterns to scan
        #[arg(required = true)]
        sources: Vec<String>,
    },
}

/// Options for `render`.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output PNG file or folder
    pub output: String,

    /// Breed sprite folders, files or glob patterns
    pub sources: Vec<String>,

    /// Game variant (C1, C2, CV, C3, DS); detected from sources when omitted
    #[arg(long)]
    pub game: Option<GameVariant>,

    /// Fallback breed for every part, as genus:breed or genus:gender:breed
    #[arg(short, long)]
    pub breed: Option<String>,

    /// Head breed
    #[arg(long)]
    pub head: Option<String>,

    /// Hair breed
    #[arg(long)]
    pub hair: Option<String>,

    /// Body breed
    #[arg(long)]
    pub body: Option<String>,

    /// Arms breed
    #[arg(long)]
    pub arms: Option<String>,

    /// Legs breed
    #[arg(long)]
    pub legs: Option<String>,

    /// Tail breed
    #[arg(long)]
    pub tail: Option<String>,

    /// Pose to render; repeat for several images
    #[arg(short, long = "pose", allow_hyphen_values = true)]
    pub poses: Vec<String>,

    /// Life stage 0..6
    #[arg(short, long, allow_negative_numbers = true)]
    pub age: Option<i64>,

    /// Gender: male, female or random
    #[arg(short, long, allow_hyphen_values = true)]
    pub gender: Option<String>,

    /// Scale output by integer factor (1-10)
    #[arg(short, long)]
    pub scale: Option<u32>,

    /// Game whose palette math the color transform follows
    #[arg(long)]
    pub transform_variant: Option<GameVariant>,

    /// Tint as r:g:b, #rgb, #rrggbb or rand
    #[arg(long, allow_hyphen_values = true)]
    pub tint: Option<String>,

    /// Red/blue swap 0..255 or rand
    #[arg(long, allow_hyphen_values = true)]
    pub swap: Option<String>,

    /// Color rotation 0..255 or rand
    #[arg(long, allow_hyphen_values = true)]
    pub rotation: Option<String>,

    /// Only use sprites that exactly match the requested breed
    #[arg(short = 'x', long)]
    pub exact_match: bool,

    /// Parts to draw translucent, as letters a-q
    #[arg(long)]
    pub ghost: Vec<String>,

    /// Opacity of ghost parts, 0.0..1.0
    #[arg(long)]
    pub ghost_alpha: Option<f64>,

    /// Draw ghost parts beneath the others
    #[arg(long)]
    pub ghost_parts_below: bool,

    /// Parts to leave out, as letters a-q
    #[arg(long)]
    pub hidden: Vec<String>,

    /// Crop transparent edges
    #[arg(long)]
    pub trim: bool,

    /// Transparent border in pixels
    #[arg(short = 'd', long)]
    pub padding: Option<u32>,

    /// Mood for every pose (rand for a random mood)
    #[arg(short, long)]
    pub mood: Option<String>,

    /// Never overwrite; number output files after existing ones
    #[arg(short, long)]
    pub increment: bool,

    /// Close the eyes in every pose
    #[arg(short, long)]
    pub closed: bool,

    /// Do not let overlapping parts intersect
    #[arg(long)]
    pub no_intersect: bool,

    /// Genome file supplying breeds and colors
    #[arg(long)]
    pub genome: Option<String>,

    /// Exported creature supplying breeds and colors
    #[arg(long)]
    pub export: Option<String>,

    /// Genome variant 0..8
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub gene_variant: i64,

    /// Print an equivalent breed-util alter-genome command
    #[arg(long)]
    pub print_alter_genome_command: bool,

    /// Seed for reproducible random values
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file (defaults to creature-render.toml discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` logs everything and
/// `--debug` logs pipeline steps.
fn init_logging(debug: bool, verbose: bool) {
    let default = if verbose {
        "trace"
    } else if debug {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Already installed when embedded; keep the existing subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).without_time())
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.verbose);

    match cli.command {
        Commands::Render(args) => render::run_render(&args),
        Commands::Pose { tokens, game, mood, closed, age, gender, seed, json } => {
            pose::run_pose(&tokens, game, mood.as_deref(), closed, age, gender.as_deref(), seed, json)
        }
        Commands::Detect { sources } => detect::run_detect(&sources),
    }
}
