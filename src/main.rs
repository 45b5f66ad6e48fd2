use clap::Parser;
use tickback::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
