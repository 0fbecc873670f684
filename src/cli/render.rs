//! Render command implementation

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, RenderConfig};
use crate::output::OutputNamer;
use crate::pose::MoodArg;
use crate::preview::SkeletonRenderer;
use crate::render::render_poses;
use crate::report::{
    alter_genome_command, random_values_command, ALTER_GENOME_HEADER, RANDOM_VALUES_HEADER,
};
use crate::request::{finalize_poses, resolve_request_poses, RequestArgs, RequestError};
use crate::sources::{qualify, resolve_sources, SourceError, SourceFiles};
use crate::variant::GameVariant;

use super::{RenderArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Print a request error; coded errors already start with `Error 10xx:`.
fn print_request_error(error: &RequestError) {
    if error.code().is_some() {
        eprintln!("{}", error);
    } else {
        eprintln!("Error: {}", error);
    }
}

fn source_exit_code(error: &SourceError) -> ExitCode {
    match error {
        SourceError::LikelyOptions(_) | SourceError::Missing(_) => ExitCode::from(EXIT_INVALID_ARGS),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Qualify a genome or export path, which must exist.
fn genetics_path(value: Option<&str>, cwd: &Path) -> Result<Option<PathBuf>, SourceError> {
    match value {
        Some(value) => {
            let path = qualify(value, cwd);
            if !path.exists() {
                return Err(SourceError::Missing(path));
            }
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

fn load_render_config(args: &RenderArgs) -> Result<RenderConfig, ExitCode> {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    merge_cli_overrides(
        &mut config,
        &CliOverrides {
            game: args.game,
            scale: args.scale,
            padding: args.padding,
            ghost_alpha: args.ghost_alpha,
            seed: args.seed,
            trim: args.trim,
            exact_match: args.exact_match,
            increment: args.increment,
            no_intersect: args.no_intersect,
        },
    );
    Ok(config)
}

/// Execute the render command
pub fn run_render(args: &RenderArgs) -> ExitCode {
    let config = match load_render_config(args) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Error: Cannot read working directory: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut source_args = args.sources.clone();
    source_args.extend(config.sources.paths.iter().map(|p| p.display().to_string()));
    let sources = match resolve_sources(&source_args, &cwd) {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("Error: {}", e);
            return source_exit_code(&e);
        }
    };

    let variant: GameVariant = match config.game() {
        Some(variant) => variant,
        None => match SourceFiles::new(sources.clone()).detect_variant() {
            Ok(variant) => variant,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
    };
    debug!(variant = %variant, sources = sources.len(), "resolved sources");

    let (genome, export) = match (
        genetics_path(args.genome.as_deref(), &cwd),
        genetics_path(args.export.as_deref(), &cwd),
    ) {
        (Ok(genome), Ok(export)) => (genome, export),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut rng = match config.defaults.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let request_args = RequestArgs {
        sources,
        genome,
        export,
        gene_variant: args.gene_variant,
        age: args.age,
        gender: args.gender.clone(),
        breed: args.breed.clone(),
        head: args.head.clone(),
        hair: args.hair.clone(),
        body: args.body.clone(),
        arms: args.arms.clone(),
        legs: args.legs.clone(),
        tail: args.tail.clone(),
        tint: args.tint.clone(),
        swap: args.swap.clone(),
        rotation: args.rotation.clone(),
        transform_variant: args.transform_variant,
        ghost: args.ghost.clone(),
        hidden: args.hidden.clone(),
        ghost_alpha: config.defaults.ghost_alpha,
        ghost_parts_below: args.ghost_parts_below,
        exact_match: config.defaults.exact_match,
        no_intersect: config.defaults.no_intersect,
        trim: config.defaults.trim,
        scale: config.defaults.scale,
        padding: config.defaults.padding,
    };

    let request = match request_args.build(variant, &mut rng) {
        Ok(request) => request,
        Err(e) => {
            print_request_error(&e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mood = match args.mood.as_deref().map(str::parse::<MoodArg>).transpose() {
        Ok(mood) => mood,
        Err(e) => {
            print_request_error(&RequestError::from(e));
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let poses = match resolve_request_poses(variant, &args.poses, mood, args.closed, &mut rng)
        .and_then(|specs| finalize_poses(specs, &request, &mut rng))
    {
        Ok(poses) => poses,
        Err(e) => {
            print_request_error(&e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let output = qualify(&args.output, &cwd);
    let namer = OutputNamer::new(output, poses.len() > 1, config.defaults.increment);

    let rendered = match render_poses(&SkeletonRenderer, &request, &poses, namer) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    for result in &rendered {
        println!("Saved: {} ({})", result.path.display(), result.pose);
    }

    let command_line: Vec<String> = env::args().skip(1).collect();
    let bold = atty::is(atty::Stream::Stderr);
    if let Some(command) =
        random_values_command("render-creatures", &command_line, &request, &poses, bold)
    {
        eprintln!("{}\n{}", RANDOM_VALUES_HEADER, command);
    }

    if args.print_alter_genome_command {
        println!("{}\n{}", ALTER_GENOME_HEADER, alter_genome_command(&request));
    }

    ExitCode::from(EXIT_SUCCESS)
}
