use clap::Parser;
use retrospect::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
