//! Detect command: report which game a set of breed folders belongs to

use std::env;
use std::process::ExitCode;

use crate::sources::{resolve_sources, SourceError, SourceFiles};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the detect command
pub fn run_detect(sources: &[String]) -> ExitCode {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Error: Cannot read working directory: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let roots = match resolve_sources(sources, &cwd) {
        Ok(roots) => roots,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    match SourceFiles::new(roots).detect_variant() {
        Ok(variant) => {
            println!("{}", variant);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ (SourceError::UnknownVariant | SourceError::AmbiguousVariant(_))) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
    }
}
