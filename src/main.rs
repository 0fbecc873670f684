//! render-creatures - Command-line tool for rendering creature breeds in any pose

use std::process::ExitCode;

use creature_render::cli;

fn main() -> ExitCode {
    cli::run()
}
